//! DOM cleaning: detach non-content nodes before Markdown rendering.
//!
//! ## Why clean the tree instead of filtering the output?
//!
//! Script bodies and stylesheet text survive a text-level conversion as
//! garbage paragraphs; regexes that try to remove them afterwards are
//! fragile. Detaching the nodes from the parsed tree removes the subtree
//! wholesale — content never reaches the renderer, and retained nodes keep
//! their order and attributes untouched.
//!
//! Parsing uses html5ever (via `scraper`), which recovers from arbitrary
//! malformed input instead of failing, matching the reality of
//! decompiled vendor help pages.

use scraper::{ElementRef, Html};

/// Parse `html` into a document tree and detach every element whose tag name
/// is in `remove_tags` (case-insensitive), subtree and all.
///
/// Operates in place on the freshly parsed tree and returns it. Node order
/// and attributes of retained nodes are untouched.
pub fn clean_document(html: &str, remove_tags: &[String]) -> Html {
    let mut document = Html::parse_document(html);

    // Collect ids first: detaching while iterating the arena would skip
    // nodes re-ordered by the removal.
    let doomed: Vec<_> = document
        .tree
        .nodes()
        .filter(|node| {
            node.value()
                .as_element()
                .is_some_and(|el| remove_tags.iter().any(|t| t.eq_ignore_ascii_case(el.name())))
        })
        .map(|node| node.id())
        .collect();

    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    document
}

/// Serialize the content subtree of a cleaned document.
///
/// Prefers the `<body>` element; when the document has none, the whole
/// document element is used instead — no failure either way. (html5ever
/// synthesises a body for most inputs, so the fallback guards against
/// exotic fragments rather than everyday pages.)
pub fn content_html(document: &Html) -> String {
    let root = document.root_element();
    let body = root
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "body");
    match body {
        Some(body) => body.html(),
        None => root.html(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_remove_tags() -> Vec<String> {
        crate::config::ConversionConfig::default().remove_tags
    }

    fn element_names(document: &Html) -> Vec<String> {
        document
            .root_element()
            .descendants()
            .filter_map(|n| n.value().as_element().map(|el| el.name().to_string()))
            .collect()
    }

    #[test]
    fn removes_all_non_content_nodes() {
        let html = r#"<html><head>
            <meta charset="gbk">
            <link rel="stylesheet" href="style.css">
            <style>body { color: red; }</style>
            <script src="nav.js"></script>
          </head><body>
            <noscript>enable javascript</noscript>
            <script>alert("hi")</script>
            <h1>Title</h1><p>text</p>
          </body></html>"#;
        let cleaned = clean_document(html, &default_remove_tags());
        let names = element_names(&cleaned);
        for tag in ["script", "style", "noscript", "meta", "link"] {
            assert!(
                !names.iter().any(|n| n == tag),
                "expected no <{tag}> left, got {names:?}"
            );
        }
        assert!(names.iter().any(|n| n == "h1"));
        assert!(names.iter().any(|n| n == "p"));
    }

    #[test]
    fn retained_nodes_keep_count_and_order() {
        let html = "<body><h1>a</h1><script>x()</script><p>b</p><em>c</em></body>";
        let before = Html::parse_document(html);
        let before_names: Vec<String> = element_names(&before)
            .into_iter()
            .filter(|n| n != "script")
            .collect();

        let cleaned = clean_document(html, &default_remove_tags());
        assert_eq!(element_names(&cleaned), before_names);
    }

    #[test]
    fn retained_attributes_are_untouched() {
        let html = r#"<body><a href="page.html" title="t">link</a><style>p{}</style></body>"#;
        let cleaned = clean_document(html, &default_remove_tags());
        let serialised = content_html(&cleaned);
        assert!(serialised.contains(r#"href="page.html""#));
        assert!(serialised.contains(r#"title="t""#));
        assert!(!serialised.contains("style"));
    }

    #[test]
    fn removal_is_case_insensitive() {
        let html = "<body><SCRIPT>x()</SCRIPT><p>kept</p></body>";
        let cleaned = clean_document(html, &default_remove_tags());
        let serialised = content_html(&cleaned);
        assert!(!serialised.contains("x()"));
        assert!(serialised.contains("kept"));
    }

    #[test]
    fn script_content_does_not_survive() {
        let html = "<body><script>var secret = 1;</script><p>visible</p></body>";
        let cleaned = clean_document(html, &default_remove_tags());
        let serialised = content_html(&cleaned);
        assert!(!serialised.contains("secret"));
        assert!(serialised.contains("visible"));
    }

    #[test]
    fn bare_fragment_still_yields_content() {
        // No explicit body tag in the source; the parser synthesises one.
        let cleaned = clean_document("<p>loose paragraph</p>", &default_remove_tags());
        let serialised = content_html(&cleaned);
        assert!(serialised.contains("loose paragraph"));
    }

    #[test]
    fn empty_input_yields_empty_body() {
        let cleaned = clean_document("", &default_remove_tags());
        let serialised = content_html(&cleaned);
        assert!(serialised.contains("body"));
    }
}
