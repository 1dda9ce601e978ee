//! End-to-end pipeline tests with mock collaborators.

use crate::config::Config;
use crate::fetch::{FetchError, PageFetcher};
use crate::generate::TextModel;
use crate::ingest::{IngestError, Ingestor};
use crate::record::{IngestRequest, NewRecord, ResourceType, StoredRecord};
use crate::store::{MemoryStore, Store};
use std::sync::{Arc, Mutex};

struct MockFetcher {
    html: Option<String>,
}

impl MockFetcher {
    fn ok(html: &str) -> Self {
        Self {
            html: Some(html.to_string()),
        }
    }

    fn failing() -> Self {
        Self { html: None }
    }
}

impl PageFetcher for MockFetcher {
    fn fetch(&self, _url: &str) -> Result<String, FetchError> {
        match &self.html {
            Some(html) => Ok(html.clone()),
            None => Err(FetchError::Browser("simulated failure".into())),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Records every prompt it sees, then answers with a fixed output (or an
/// error when `output` is None).
struct CapturingModel {
    output: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl CapturingModel {
    fn ok(output: &str) -> (Self, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                output: Some(output.to_string()),
                prompts: prompts.clone(),
            },
            prompts,
        )
    }

    fn failing() -> (Self, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                output: None,
                prompts: prompts.clone(),
            },
            prompts,
        )
    }
}

impl TextModel for CapturingModel {
    fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.output {
            Some(output) => Ok(output.clone()),
            None => Err(anyhow::anyhow!("model offline")),
        }
    }
}

struct FailingStore;

impl Store for FailingStore {
    fn save(&self, _record: NewRecord) -> anyhow::Result<StoredRecord> {
        Err(anyhow::anyhow!("disk full"))
    }

    fn list(&self, _limit: usize) -> anyhow::Result<Vec<StoredRecord>> {
        Ok(Vec::new())
    }
}

struct SharedStore(Arc<MemoryStore>);

impl Store for SharedStore {
    fn save(&self, record: NewRecord) -> anyhow::Result<StoredRecord> {
        self.0.save(record)
    }

    fn list(&self, limit: usize) -> anyhow::Result<Vec<StoredRecord>> {
        self.0.list(limit)
    }
}

const GOOD_MODEL_OUTPUT: &str =
    r#"{"title": "Rust Error Handling", "description": "A practical guide to Result.", "tags": ["rust", "tutorial"]}"#;

fn request(url: &str) -> IngestRequest {
    IngestRequest {
        url: url.to_string(),
        resource_type: ResourceType::Article,
        description: None,
        source: Some("cli".to_string()),
    }
}

#[test]
fn test_article_ingest_uses_generated_metadata() {
    let (model, _) = CapturingModel::ok(GOOD_MODEL_OUTPUT);
    let store = Arc::new(MemoryStore::new());
    let ingestor = Ingestor::new(
        Config::default(),
        Box::new(MockFetcher::ok("<html><body><p>Some article text</p></body></html>")),
        None,
        Box::new(model),
        Box::new(SharedStore(store.clone())),
    );

    let record = ingestor.ingest(request("https://example.com/post")).unwrap();

    assert_eq!(record.id, 1);
    assert_eq!(record.title, "Rust Error Handling");
    assert_eq!(record.description, "A practical guide to Result.");
    assert_eq!(record.tags, vec!["rust", "tutorial"]);
    assert_eq!(record.source.as_deref(), Some("cli"));
    assert_eq!(record.resource_type, ResourceType::Article);
    assert!(!record.read);
    assert_eq!(store.records.lock().unwrap().len(), 1);
}

#[test]
fn test_generator_failure_falls_back_to_markup() {
    let (model, _) = CapturingModel::failing();
    let html = r#"<html><head><title>Example</title></head><body></body></html>"#;
    let ingestor = Ingestor::new(
        Config::default(),
        Box::new(MockFetcher::ok(html)),
        None,
        Box::new(model),
        Box::new(MemoryStore::new()),
    );

    let record = ingestor.ingest(request("https://example.com/post")).unwrap();

    assert_eq!(record.title, "Example");
    assert_eq!(record.description, "No description");
    assert_eq!(record.tags, vec!["web".to_string()]);
}

#[test]
fn test_dynamic_double_failure_still_succeeds() {
    // Every fetch option fails for a dynamic host, the model is offline:
    // the synthetic page must still carry the ingestion through.
    let url = "https://twitter.com/someone/status/1";
    let (model, prompts) = CapturingModel::failing();
    let ingestor = Ingestor::new(
        Config::default(),
        Box::new(MockFetcher::failing()),
        Some(Box::new(MockFetcher::failing())),
        Box::new(model),
        Box::new(MemoryStore::new()),
    );

    let record = ingestor.ingest(request(url)).unwrap();

    assert!(!record.title.is_empty());
    assert!(!record.description.is_empty());
    assert_eq!(record.title, "No title found");

    // the generator saw an excerpt containing the literal URL
    let prompts = prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(url));
}

#[test]
fn test_dynamic_failure_falls_back_to_static_content() {
    let (model, _) = CapturingModel::failing();
    let html = r#"<html><head><title>Static Copy</title></head><body></body></html>"#;
    let ingestor = Ingestor::new(
        Config::default(),
        Box::new(MockFetcher::ok(html)),
        Some(Box::new(MockFetcher::failing())),
        Box::new(model),
        Box::new(MemoryStore::new()),
    );

    let record = ingestor
        .ingest(request("https://twitter.com/someone/status/1"))
        .unwrap();

    assert_eq!(record.title, "Static Copy");
}

#[test]
fn test_resource_description_reaches_prompt() {
    let (model, prompts) = CapturingModel::ok(GOOD_MODEL_OUTPUT);
    let ingestor = Ingestor::new(
        Config::default(),
        Box::new(MockFetcher::ok("<html><body>repo page</body></html>")),
        None,
        Box::new(model),
        Box::new(MemoryStore::new()),
    );

    let record = ingestor
        .ingest(IngestRequest {
            url: "https://github.com/example/tool".to_string(),
            resource_type: ResourceType::Resource,
            description: Some("my favorite linter".to_string()),
            source: Some("chat".to_string()),
        })
        .unwrap();

    assert_eq!(record.resource_type, ResourceType::Resource);

    let prompts = prompts.lock().unwrap();
    assert!(prompts[0].contains("my favorite linter"));
}

#[test]
fn test_invalid_url_rejected() {
    let (model, _) = CapturingModel::ok(GOOD_MODEL_OUTPUT);
    let ingestor = Ingestor::new(
        Config::default(),
        Box::new(MockFetcher::ok("<html></html>")),
        None,
        Box::new(model),
        Box::new(MemoryStore::new()),
    );

    assert!(matches!(
        ingestor.ingest(request("not a url")),
        Err(IngestError::InvalidUrl(_))
    ));
    assert!(matches!(
        ingestor.ingest(request("ftp://example.com/file")),
        Err(IngestError::InvalidUrl(_))
    ));
}

#[test]
fn test_static_failure_surfaces_fetch_error() {
    let (model, prompts) = CapturingModel::ok(GOOD_MODEL_OUTPUT);
    let ingestor = Ingestor::new(
        Config::default(),
        Box::new(MockFetcher::failing()),
        None,
        Box::new(model),
        Box::new(MemoryStore::new()),
    );

    let err = ingestor.ingest(request("https://example.com/post")).unwrap_err();

    assert!(matches!(err, IngestError::Fetch(_)));
    assert!(err.to_string().contains("could not fetch URL"));
    // nothing downstream of the fetch ran
    assert!(prompts.lock().unwrap().is_empty());
}

#[test]
fn test_store_failure_propagates() {
    let (model, _) = CapturingModel::ok(GOOD_MODEL_OUTPUT);
    let ingestor = Ingestor::new(
        Config::default(),
        Box::new(MockFetcher::ok("<html><body>text</body></html>")),
        None,
        Box::new(model),
        Box::new(FailingStore),
    );

    let err = ingestor.ingest(request("https://example.com/post")).unwrap_err();
    assert!(matches!(err, IngestError::Store(_)));
}

#[test]
fn test_malformed_model_output_never_aborts() {
    let (model, _) = CapturingModel::ok("```json\n{'title': 'T', 'description': 'D'}\n```");
    let ingestor = Ingestor::new(
        Config::default(),
        Box::new(MockFetcher::ok("<html><body>text</body></html>")),
        None,
        Box::new(model),
        Box::new(MemoryStore::new()),
    );

    // fenced single-quoted output is repaired and used
    let record = ingestor.ingest(request("https://example.com/post")).unwrap();
    assert_eq!(record.title, "T");
    assert_eq!(record.description, "D");
}
