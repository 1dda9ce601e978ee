use crate::config::Config;
use crate::extract;
use crate::fetch::{self, FetchError, FetchPlanner, PageFetcher};
use crate::generate::{self, GenerateResult, TextModel};
use crate::record::{IngestRequest, NewRecord, StoredRecord};
use crate::store::Store;

#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("could not fetch URL: {0}")]
    Fetch(#[from] FetchError),

    #[error("could not store record: {0}")]
    Store(#[source] anyhow::Error),
}

/// Composes fetch, extraction, generation and storage into the single
/// `ingest` operation. Holds no per-request state; concurrent ingestions
/// are independent.
pub struct Ingestor {
    config: Config,
    planner: FetchPlanner,
    static_fetcher: Box<dyn PageFetcher>,
    dynamic_fetcher: Option<Box<dyn PageFetcher>>,
    model: Box<dyn TextModel>,
    store: Box<dyn Store>,
}

impl Ingestor {
    pub fn new(
        config: Config,
        static_fetcher: Box<dyn PageFetcher>,
        dynamic_fetcher: Option<Box<dyn PageFetcher>>,
        model: Box<dyn TextModel>,
        store: Box<dyn Store>,
    ) -> Self {
        let planner = FetchPlanner::new(config.dynamic_hosts.clone());

        Self {
            config,
            planner,
            static_fetcher,
            dynamic_fetcher,
            model,
            store,
        }
    }

    /// Turns a URL into a stored record. Only fetch and store failures
    /// abort; everything downstream of a successful fetch degrades to a
    /// cheaper fallback.
    pub fn ingest(&self, request: IngestRequest) -> Result<StoredRecord, IngestError> {
        validate_url(&request.url)?;

        let page = fetch::acquire_page(
            &request.url,
            &self.planner,
            self.static_fetcher.as_ref(),
            self.dynamic_fetcher.as_deref(),
        )?;

        log::info!(
            "{}: fetched via {:?} ({} bytes)",
            request.url,
            page.via,
            page.html.len()
        );

        let excerpt = extract::extract_excerpt(&page.html, self.config.excerpt_limit);
        log::debug!("{}: excerpt length {}", request.url, excerpt.len());

        let metadata = match generate::generate_metadata(
            self.model.as_ref(),
            &request.url,
            &excerpt,
            request.resource_type,
            request.description.as_deref(),
        ) {
            GenerateResult::Success(meta) => {
                log::info!("{}: generated title \"{}\"", request.url, meta.title);
                meta
            }
            GenerateResult::Unavailable(reason) => {
                log::warn!("{}: generator unavailable ({reason}), using markup fallback", request.url);
                extract::fallback_metadata(&page.html)
            }
        };

        let record = NewRecord {
            url: request.url,
            title: metadata.title,
            description: metadata.description,
            tags: metadata.tags,
            source: request.source,
            resource_type: request.resource_type,
        };

        self.store.save(record).map_err(IngestError::Store)
    }
}

fn validate_url(raw: &str) -> Result<(), IngestError> {
    let parsed =
        url::Url::parse(raw).map_err(|err| IngestError::InvalidUrl(format!("{raw}: {err}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(IngestError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            parsed.scheme()
        )));
    }

    Ok(())
}
