use super::{BrowserLauncher, BrowserSession};
use anyhow::anyhow;
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use std::{path::PathBuf, str::FromStr, sync::Arc, time::Duration};

const USER_AGENT_DEFAULT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Launches an isolated chromium process per session. Honors `CHROME_PATH`
/// for non-standard installs.
pub struct ChromeLauncher {
    user_agent: String,
}

impl ChromeLauncher {
    pub fn new(user_agent: Option<String>) -> Self {
        Self {
            user_agent: user_agent.unwrap_or_else(|| USER_AGENT_DEFAULT.to_string()),
        }
    }
}

impl BrowserLauncher for ChromeLauncher {
    fn launch(&self) -> anyhow::Result<Box<dyn BrowserSession>> {
        let options = LaunchOptionsBuilder::default()
            .sandbox(false)
            .path(
                std::env::var("CHROME_PATH")
                    .ok()
                    .map(|p| PathBuf::from_str(&p).expect("infallible PathBuf::from_str for &str")),
            )
            .build()
            .map_err(|err| anyhow!("browser launch options: {err}"))?;

        let browser = Browser::new(options)?;
        let tab = browser.new_tab()?;

        tab.set_user_agent(&self.user_agent, Some("en-US,en"), None)?;

        Ok(Box::new(ChromeSession {
            browser: Some(browser),
            tab: Some(tab),
        }))
    }
}

struct ChromeSession {
    // dropping the browser tears down the chromium process
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
}

impl ChromeSession {
    fn tab(&self) -> anyhow::Result<&Arc<Tab>> {
        self.tab.as_ref().ok_or_else(|| anyhow!("session already closed"))
    }
}

impl BrowserSession for ChromeSession {
    fn open(&mut self, url: &str, timeout: Duration) -> anyhow::Result<()> {
        let tab = self.tab()?;
        tab.set_default_timeout(timeout);
        tab.navigate_to(url)?;
        tab.wait_until_navigated()?;
        Ok(())
    }

    fn markup(&mut self) -> anyhow::Result<String> {
        Ok(self.tab()?.get_content()?)
    }

    fn close(&mut self) {
        self.tab = None;
        self.browser = None;
    }
}
