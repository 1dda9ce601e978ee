use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of an ingested link. Selects the prompt mode and tag
/// vocabulary used by the metadata generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// Long-form article or blog post.
    #[default]
    Article,
    /// Tool, repo, software or other terse reference.
    Resource,
}

/// A single ingestion request. Immutable once accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestRequest {
    pub url: String,

    #[serde(default)]
    pub resource_type: ResourceType,

    /// User-supplied description, folded into the resource prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Where the request came from (e.g. "cli", "chat").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Derived metadata for a page. Produced by either the generator or the
/// markup fallback extractor; exactly one source wins per ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The record handed to the store. Title and description are always
/// present; tags may be empty but never missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub resource_type: ResourceType,
}

/// A record as returned by the store, with its assigned id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: u64,

    pub url: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub resource_type: ResourceType,

    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}
