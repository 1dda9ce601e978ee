pub mod gemini;

use crate::extract::truncate_chars;
use crate::record::{Metadata, ResourceType};
use serde::Deserialize;

/// Tag lists are clamped to this many category-level entries.
pub const MAX_TAGS: usize = 4;

/// Resource classification needs far less content than article summarizing.
const RESOURCE_EXCERPT_LIMIT: usize = 1000;

/// A generative text model. Single synchronous call, no streaming, no
/// multi-turn state.
pub trait TextModel: Send + Sync {
    fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Outcome of a generation attempt. `Unavailable` is recovered locally by
/// the orchestrator and never surfaced to the caller.
#[derive(Debug, Clone)]
pub enum GenerateResult {
    Success(Metadata),
    Unavailable(String),
}

/// Asks the model for {title, description, tags} for a page. Best-effort:
/// any model or parse failure degrades to `Unavailable` with a reason.
/// One model call, no retries.
pub fn generate_metadata(
    model: &dyn TextModel,
    url: &str,
    excerpt: &str,
    resource_type: ResourceType,
    user_description: Option<&str>,
) -> GenerateResult {
    let prompt = match resource_type {
        ResourceType::Article => article_prompt(url, excerpt),
        ResourceType::Resource => resource_prompt(url, excerpt, user_description),
    };

    let raw = match model.generate(&prompt) {
        Ok(raw) => raw,
        Err(err) => {
            return GenerateResult::Unavailable(format!("model call failed: {err}"));
        }
    };

    log::debug!("{url}: raw model output: {raw}");

    match parse_model_output(&raw) {
        Some(mut meta) => {
            meta.tags.truncate(MAX_TAGS);
            GenerateResult::Success(meta)
        }
        None => GenerateResult::Unavailable("model output was not a usable JSON object".into()),
    }
}

fn article_prompt(url: &str, excerpt: &str) -> String {
    format!(
        r#"You are an assistant that summarizes web articles concisely and accurately.

URL: {url}

Page content:
{excerpt}

STRICT INSTRUCTIONS:
1. Produce a SHORT title (3-8 words maximum) that captures the essence of the article
2. Produce a CONCISE description (1-2 sentences, 150 characters maximum)
3. Extract 2-4 GENERAL categories (no overly specific words). Examples of good categories:
   - Technology: backend, frontend, devops, cloud, mobile, web, ai, data
   - Development: tutorial, guide, documentation, tips
   - Domain: software, hardware, design, business, productivity
   - Theme: security, performance, architecture, testing
4. Be DIRECT and FACTUAL, no marketing phrasing
5. Tags must be GENERIC and REUSABLE (no proper nouns, no overly specific words)

IMPORTANT: Answer ONLY with this JSON (no ```json, no backticks):
{{"title": "your title here", "description": "your description here", "tags": ["category1", "category2", "category3"]}}"#
    )
}

fn resource_prompt(url: &str, excerpt: &str, user_description: Option<&str>) -> String {
    let desc_info = match user_description {
        Some(description) => format!("\nDescription provided by the user: {description}"),
        None => String::new(),
    };

    let excerpt = truncate_chars(excerpt, RESOURCE_EXCERPT_LIMIT);

    format!(
        r#"You are an assistant that categorizes technical resources (GitHub repos, software, tools, etc.).

URL: {url}{desc_info}

Page content:
{excerpt}

INSTRUCTIONS:
1. Produce a VERY SIMPLE and SHORT title (3-6 words max) that identifies the resource
   Examples: "Rust GitHub Repo", "VSCode Extension", "PostgreSQL Database", "Docker Tool"
2. Produce a CONCISE description (1 short sentence, 100 characters maximum)
3. Assign 1-3 GENERIC categories among:
   - Type: repo, tool, software, library, framework, extension
   - Technology: backend, frontend, database, devops, cloud, mobile
   - Domain: development, productivity, security, data, ai

IMPORTANT: Answer ONLY with this JSON (no ```json, no backticks):
{{"title": "simple title", "description": "short description", "tags": ["category1", "category2"]}}"#
    )
}

#[derive(Debug, Deserialize)]
struct ModelMetadata {
    title: String,
    description: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// Strip fences, parse, and on failure run one quote-normalization repair
/// pass. The repair is heuristic and can mangle content containing
/// apostrophes; it is a last resort before giving up.
fn parse_model_output(raw: &str) -> Option<Metadata> {
    let cleaned = strip_code_fences(raw);

    match serde_json::from_str::<ModelMetadata>(&cleaned) {
        Ok(meta) => sanitize(meta),
        Err(err) => {
            log::debug!("model output parse failed ({err}), normalizing quotes");
            let repaired = normalize_quotes(&cleaned);
            serde_json::from_str::<ModelMetadata>(&repaired)
                .ok()
                .and_then(sanitize)
        }
    }
}

fn strip_code_fences(raw: &str) -> String {
    let re = regex::Regex::new(r"```(?:json)?\s*").unwrap();
    re.replace_all(raw.trim(), "").trim().to_string()
}

fn normalize_quotes(text: &str) -> String {
    text.replace("\\\"", "\"").replace('\'', "\"")
}

fn sanitize(meta: ModelMetadata) -> Option<Metadata> {
    let title = meta.title.trim();
    let description = meta.description.trim();

    if title.is_empty() || description.is_empty() {
        return None;
    }

    let tags = meta
        .tags
        .into_iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();

    Some(Metadata {
        title: title.to_string(),
        description: description.to_string(),
        tags,
    })
}
