//! Visible-text extraction from HTML.

use scraper::Html;

/// Elements whose text never renders on the page.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extract the human-readable text of an HTML document.
///
/// Text nodes are trimmed and joined with single spaces; markup, comments,
/// and the contents of [`HIDDEN_ELEMENTS`] are dropped. Parsing is lenient,
/// so plain text passes through unchanged.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_body_text() {
        let html = "<html><body><h1>Fresh Bread</h1><p>Our <b>bakery</b> opens at 7.</p></body></html>";
        assert_eq!(visible_text(html), "Fresh Bread Our bakery opens at 7.");
    }

    #[test]
    fn skips_scripts_and_styles() {
        let html = r#"<html><head><title>Daily Bread</title><style>body { color: red }</style></head>
            <body><script>var sale = 1;</script><noscript>enable js</noscript><p>Visible</p></body></html>"#;
        assert_eq!(visible_text(html), "Daily Bread Visible");
    }

    #[test]
    fn drops_comments() {
        let html = "<body><!-- hidden marketing --><p>shown</p></body>";
        assert_eq!(visible_text(html), "shown");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(visible_text("we offer seo"), "we offer seo");
    }

    #[test]
    fn empty_document_is_empty() {
        assert_eq!(visible_text(""), "");
    }
}
