use crate::record::Metadata;
use scraper::{ElementRef, Html, Node, Selector};

pub const NO_TITLE: &str = "No title found";
pub const NO_DESCRIPTION: &str = "No description";

/// Reduces raw markup to a whitespace-collapsed plain-text excerpt of at
/// most `limit` characters. Script and style content is dropped, and text
/// inside a primary content landmark is preferred over the full document.
/// Always returns a string, possibly empty.
pub fn extract_excerpt(html: &str, limit: usize) -> String {
    let document = Html::parse_document(html);

    let article_selector = Selector::parse("article").unwrap();
    let main_selector = Selector::parse("main").unwrap();
    let container_selector = Selector::parse("div.content, div.post, div.article").unwrap();

    let landmark = document
        .select(&article_selector)
        .next()
        .or_else(|| document.select(&main_selector).next())
        .or_else(|| document.select(&container_selector).next());

    let mut text = String::new();
    collect_text(landmark.unwrap_or_else(|| document.root_element()), &mut text);

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    truncate_chars(&collapsed, limit)
}

/// Descendant text, skipping script and style subtrees.
fn collect_text(root: ElementRef, out: &mut String) {
    for node in root.children() {
        match node.value() {
            Node::Text(text) => {
                out.push_str(text);
            }
            Node::Element(element) => {
                if element.name() == "script" || element.name() == "style" {
                    continue;
                }
                if let Some(child) = ElementRef::wrap(node) {
                    collect_text(child, out);
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Character-wise truncation; `limit` counts chars, not bytes.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Derives metadata straight from markup when the generator is unavailable.
/// Pure and infallible: missing fields get fixed placeholders.
pub fn fallback_metadata(html: &str) -> Metadata {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse("title").unwrap();
    let meta_selector = Selector::parse("meta").unwrap();

    let mut title = None;
    for element in document.select(&title_selector) {
        let title_text = element.text().collect::<String>().trim().to_string();
        if !title_text.is_empty() {
            title = Some(title_text);
            break;
        }
    }

    let mut description = None;
    for element in document.select(&meta_selector) {
        let meta_key = element.attr("name").unwrap_or_default();
        if meta_key == "description" {
            if let Some(content) = element.attr("content") {
                description = Some(content.to_string());
                break;
            }
        }
    }

    Metadata {
        title: title.unwrap_or_else(|| NO_TITLE.to_string()),
        description: description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        tags: vec!["web".to_string()],
    }
}
