use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Hosts that render their content client-side and need a real browser.
const DEFAULT_DYNAMIC_HOSTS: [&str; 3] = ["twitter.com", "x.com", "instagram.com"];

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 60;
/// Delay between DOM-ready and snapshotting, to let client-side rendering finish.
const DEFAULT_SETTLE_DELAY_SECS: u64 = 3;
/// Hard cap on the plain-text excerpt fed to the generative model.
const DEFAULT_EXCERPT_LIMIT: usize = 3000;
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Hosts fetched through the headless browser instead of plain HTTP.
    /// Matches the host itself and any subdomain.
    #[serde(default = "default_dynamic_hosts")]
    pub dynamic_hosts: Vec<String>,

    /// Timeout for a plain HTTP fetch, in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Timeout for browser navigation, in seconds.
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// Settle delay after navigation before capturing markup, in seconds.
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,

    /// Maximum excerpt length in characters.
    #[serde(default = "default_excerpt_limit")]
    pub excerpt_limit: usize,

    /// Generative model used for metadata derivation.
    #[serde(default = "default_model")]
    pub model: String,

    /// Override the browser-like user agent sent with fetches.
    #[serde(default)]
    pub user_agent: Option<String>,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dynamic_hosts: default_dynamic_hosts(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            settle_delay_secs: DEFAULT_SETTLE_DELAY_SECS,
            excerpt_limit: DEFAULT_EXCERPT_LIMIT,
            model: DEFAULT_MODEL.to_string(),
            user_agent: None,
            base_path: PathBuf::new(),
        }
    }
}

fn default_dynamic_hosts() -> Vec<String> {
    DEFAULT_DYNAMIC_HOSTS.iter().map(|h| h.to_string()).collect()
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_navigation_timeout_secs() -> u64 {
    DEFAULT_NAVIGATION_TIMEOUT_SECS
}

fn default_settle_delay_secs() -> u64 {
    DEFAULT_SETTLE_DELAY_SECS
}

fn default_excerpt_limit() -> usize {
    DEFAULT_EXCERPT_LIMIT
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Config {
    fn validate(&self) {
        if self.fetch_timeout_secs == 0 {
            panic!("fetch_timeout_secs must be greater than 0");
        }

        if self.navigation_timeout_secs == 0 {
            panic!("navigation_timeout_secs must be greater than 0");
        }

        if self.excerpt_limit == 0 {
            panic!("excerpt_limit must be greater than 0");
        }

        if self.model.trim().is_empty() {
            panic!("model must not be empty");
        }

        for host in &self.dynamic_hosts {
            if host.trim().is_empty() {
                panic!("dynamic_hosts must not contain empty entries");
            }
        }
    }

    pub fn load() -> Self {
        Self::load_with(&base_dir())
    }

    pub fn load_with(base_path: &Path) -> Self {
        let config_path = base_path.join("config.yaml");

        // create new if does not exist
        if !config_path.exists() {
            std::fs::create_dir_all(base_path).expect("could not create config directory");
            std::fs::write(
                &config_path,
                serde_yml::to_string(&Self::default()).unwrap(),
            )
            .expect("could not write default config");
        }

        let config_str =
            std::fs::read_to_string(&config_path).expect("config file is not readable");
        let mut config: Self = serde_yml::from_str(&config_str).expect("config is malformed");

        config.base_path = base_path.to_path_buf();

        config.validate();

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config).unwrap() {
            config.save();
        }

        config
    }

    pub fn save(&self) {
        let config_path = self.base_path.join("config.yaml");
        let config_str = serde_yml::to_string(&self).unwrap();
        std::fs::write(config_path, config_str).expect("could not write config");
    }

    pub fn records_path(&self) -> PathBuf {
        self.base_path.join("records.jsonl")
    }
}

fn base_dir() -> PathBuf {
    if let Ok(path) = std::env::var("LINKDEX_HOME") {
        return PathBuf::from(path);
    }

    homedir::my_home()
        .ok()
        .flatten()
        .map(|home| home.join(".config").join("linkdex"))
        .unwrap_or_else(|| PathBuf::from("."))
}
