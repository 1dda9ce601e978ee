#[cfg(feature = "headless")]
pub mod headless;
pub mod plain;

use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {0}")]
    Status(reqwest::StatusCode),

    #[error("browser error: {0}")]
    Browser(String),
}

/// How a page's markup was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchVia {
    Static,
    Dynamic,
    /// Placeholder markup containing only the URL; used when every real
    /// fetch option failed for a dynamic-first URL.
    Synthetic,
}

/// Raw markup of a fetched page. Created once per ingestion attempt and
/// discarded after extraction.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub html: String,
    pub via: FetchVia,
}

/// A way of turning a URL into markup. One attempt per call; retry policy
/// belongs to the caller.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Name of this fetcher for logging.
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    Static,
    Dynamic,
}

/// Host-pattern table deciding which acquisition path a URL takes.
#[derive(Debug, Clone, Default)]
pub struct FetchPlanner {
    dynamic_hosts: Vec<String>,
}

impl FetchPlanner {
    pub fn new(dynamic_hosts: Vec<String>) -> Self {
        Self { dynamic_hosts }
    }

    /// Dynamic for configured script-heavy hosts (and their subdomains),
    /// static for everything else.
    pub fn strategy_for(&self, url: &str) -> FetchStrategy {
        let host = match reqwest::Url::parse(url) {
            Ok(parsed) => parsed.host_str().unwrap_or_default().to_lowercase(),
            Err(_) => return FetchStrategy::Static,
        };

        let dynamic = self
            .dynamic_hosts
            .iter()
            .any(|h| host == *h || host.ends_with(&format!(".{h}")));

        if dynamic {
            FetchStrategy::Dynamic
        } else {
            FetchStrategy::Static
        }
    }
}

/// Minimal markup carrying only the URL, so the generator can still infer
/// something when no real content could be fetched.
pub fn synthetic_page(url: &str) -> String {
    format!("<html><body><p>URL: {url}</p></body></html>")
}

/// Runs the acquisition chain for a URL.
///
/// Dynamic-first URLs degrade dynamic -> static -> synthetic and always
/// produce a page. Static-first URLs get a single attempt and surface the
/// error.
pub fn acquire_page(
    url: &str,
    planner: &FetchPlanner,
    static_fetcher: &dyn PageFetcher,
    dynamic_fetcher: Option<&dyn PageFetcher>,
) -> Result<RawPage, FetchError> {
    match planner.strategy_for(url) {
        FetchStrategy::Dynamic => {
            match dynamic_fetcher {
                Some(dynamic) => match dynamic.fetch(url) {
                    Ok(html) => {
                        return Ok(RawPage {
                            html,
                            via: FetchVia::Dynamic,
                        })
                    }
                    Err(err) => {
                        log::warn!("{url}: {} fetch failed, trying static: {err}", dynamic.name());
                    }
                },
                None => {
                    log::warn!("{url}: dynamic fetch unavailable, trying static");
                }
            }

            match static_fetcher.fetch(url) {
                Ok(html) => Ok(RawPage {
                    html,
                    via: FetchVia::Static,
                }),
                Err(err) => {
                    log::warn!("{url}: static fallback failed, using synthetic page: {err}");
                    Ok(RawPage {
                        html: synthetic_page(url),
                        via: FetchVia::Synthetic,
                    })
                }
            }
        }
        FetchStrategy::Static => {
            let html = static_fetcher.fetch(url)?;
            Ok(RawPage {
                html,
                via: FetchVia::Static,
            })
        }
    }
}

/// A browser automation session. `close` must be called on every path once
/// the session exists.
pub trait BrowserSession {
    fn open(&mut self, url: &str, timeout: Duration) -> anyhow::Result<()>;
    fn markup(&mut self) -> anyhow::Result<String>;
    fn close(&mut self);
}

pub trait BrowserLauncher: Send + Sync {
    fn launch(&self) -> anyhow::Result<Box<dyn BrowserSession>>;
}

/// Fetcher that drives a headless browser session per call: launch,
/// navigate, settle, snapshot, tear down. No session pooling.
pub struct DynamicFetcher {
    launcher: Box<dyn BrowserLauncher>,
    navigation_timeout: Duration,
    settle_delay: Duration,
}

impl DynamicFetcher {
    pub fn new(
        launcher: Box<dyn BrowserLauncher>,
        navigation_timeout: Duration,
        settle_delay: Duration,
    ) -> Self {
        Self {
            launcher,
            navigation_timeout,
            settle_delay,
        }
    }
}

impl PageFetcher for DynamicFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut session = self
            .launcher
            .launch()
            .map_err(|err| FetchError::Browser(err.to_string()))?;

        // session exists from here on: close on both outcomes
        let result = session.open(url, self.navigation_timeout).and_then(|_| {
            std::thread::sleep(self.settle_delay);
            session.markup()
        });

        session.close();

        result.map_err(|err| FetchError::Browser(err.to_string()))
    }

    fn name(&self) -> &'static str {
        "dynamic"
    }
}
