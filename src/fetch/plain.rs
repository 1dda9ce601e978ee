use super::{FetchError, PageFetcher};
use std::time::Duration;

const USER_AGENT_DEFAULT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Plain HTTP fetcher with a browser-like identity. Single attempt, fixed
/// timeout, non-2xx is an error.
pub struct PlainFetcher {
    user_agent: String,
    timeout: Duration,
}

impl PlainFetcher {
    pub fn new(user_agent: Option<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.unwrap_or_else(|| USER_AGENT_DEFAULT.to_string()),
            timeout,
        }
    }
}

impl PageFetcher for PlainFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()?;

        log::debug!("{url}: requesting");

        let resp = client.get(url).send()?;
        let status = resp.status();

        if !status.is_success() {
            log::debug!("{url}: {}", status);
            return Err(FetchError::Status(status));
        }

        // we might get OK with a non-utf8 body; replace rather than fail
        let bytes = resp.bytes()?;
        Ok(String::from_utf8_lossy(&bytes).to_string())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
