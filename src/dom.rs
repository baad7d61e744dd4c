//! DOM helpers over the `dom_query` crate.
//!
//! Thin adapter functions shared by the extraction grammars and the template
//! injector: collapsed-text access, attribute lookup, element sibling walks,
//! and the escape/unescape helpers used when building replacement markup.

use dom_query::NodeRef;

// Re-export core types for the rest of the crate.
pub use dom_query::{Document, Selection};
pub use tendril::StrTendril;

use crate::patterns::WHITESPACE_NORMALIZE;

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Text Content ===

/// Collapse interior whitespace runs to single spaces and trim the ends.
#[must_use]
pub fn collapse(text: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(text.trim(), " ").into_owned()
}

/// Whitespace-collapsed text content of a selection.
///
/// All classification in the grammars compares this form, never raw markup.
#[inline]
#[must_use]
pub fn collapsed_text(sel: &Selection) -> String {
    collapse(&sel.text())
}

/// Whitespace-collapsed text content of a single node (element or text).
#[inline]
#[must_use]
pub fn node_collapsed_text(node: &NodeRef) -> String {
    collapse(&node.text())
}

// === Attributes and Tags ===

/// Get tag name (lowercase) of the first node in a selection.
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(NodeRef::node_name)
        .map(|t| t.to_lowercase())
}

/// Get tag name (lowercase) of a node, empty for non-elements.
#[must_use]
pub fn node_tag(node: &NodeRef) -> String {
    node.node_name().map(|t| t.to_lowercase()).unwrap_or_default()
}

/// Get any attribute value.
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get an attribute value directly from a node.
#[inline]
#[must_use]
pub fn node_attribute(node: &NodeRef, name: &str) -> Option<String> {
    get_attribute(&Selection::from(*node), name)
}

/// Inline style attribute of a node, empty when absent.
#[inline]
#[must_use]
pub fn node_style(node: &NodeRef) -> String {
    node_attribute(node, "style").unwrap_or_default()
}

// === Tree Navigation ===

/// Get the next element sibling, skipping text and comment nodes.
#[must_use]
pub fn next_element_sibling<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes()
        .first()
        .and_then(NodeRef::next_element_sibling)
        .map(Selection::from)
}

/// Check whether any descendant of the selection matches a selector.
#[inline]
#[must_use]
pub fn has_descendant(sel: &Selection, selector: &str) -> bool {
    sel.select(selector).exists()
}

// === Mutation ===

/// Replace the inner content of a selection with escaped text.
#[inline]
pub fn set_text(sel: &Selection, text: &str) {
    let escaped = escape_text(text);
    sel.set_html(escaped.as_str());
}

// === Escaping ===

/// Escape text for use inside an element's content.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let s = text.replace('&', "&amp;");
    let s = s.replace('<', "&lt;");
    s.replace('>', "&gt;")
}

/// Escape text for use inside a double-quoted attribute value.
#[must_use]
pub fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

/// Reverse the basic HTML entity set.
///
/// `&amp;` is handled last so that doubly escaped sequences unescape one
/// level per call, matching a single-pass entity decoder.
#[must_use]
pub fn unescape_html(s: &str) -> String {
    let s = s.replace("&lt;", "<");
    let s = s.replace("&gt;", ">");
    let s = s.replace("&quot;", "\"");
    let s = s.replace("&#34;", "\"");
    let s = s.replace("&apos;", "'");
    let s = s.replace("&#39;", "'");
    let s = s.replace("&nbsp;", "\u{a0}");
    s.replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_collapsed_text() {
        let doc = parse("<div>  hello \n\t world  </div>");
        let div = doc.select("div");

        assert_eq!(collapsed_text(&div), "hello world");
    }

    #[test]
    fn test_tag_name_lowercase() {
        let doc = parse("<DIV><SPAN>x</SPAN></DIV>");

        assert_eq!(tag_name(&doc.select("div")), Some("div".to_string()));
        assert_eq!(tag_name(&doc.select("span")), Some("span".to_string()));
        assert_eq!(tag_name(&doc.select("article")), None);
    }

    #[test]
    fn test_attribute_access() {
        let doc = parse(r#"<img src="a.jpg" data-src="b.jpg">"#);
        let img = doc.select("img");

        assert_eq!(get_attribute(&img, "src"), Some("a.jpg".to_string()));
        assert_eq!(get_attribute(&img, "data-src"), Some("b.jpg".to_string()));
        assert_eq!(get_attribute(&img, "alt"), None);
    }

    #[test]
    fn test_node_style() {
        let doc = parse(r#"<p style="font-weight: bold">x</p><p>y</p>"#);
        let nodes: Vec<_> = doc.select("p").nodes().to_vec();

        assert_eq!(node_style(&nodes[0]), "font-weight: bold");
        assert_eq!(node_style(&nodes[1]), "");
    }

    #[test]
    fn test_next_element_sibling_skips_text() {
        let doc = parse(r#"<div><p id="first">First</p> between <span id="second">x</span></div>"#);
        let p = doc.select("#first");

        let next = next_element_sibling(&p).map(|s| tag_name(&s));
        assert_eq!(next, Some(Some("span".to_string())));

        let last = doc.select("#second");
        assert!(next_element_sibling(&last).is_none());
    }

    #[test]
    fn test_has_descendant() {
        let doc = parse("<div><p><b>x</b></p></div>");
        let div = doc.select("div");

        assert!(has_descendant(&div, "b"));
        assert!(!has_descendant(&div, "table"));
    }

    #[test]
    fn test_set_text_escapes() {
        let doc = parse("<h1>old</h1>");
        let h1 = doc.select("h1");

        set_text(&h1, "Bolts & <nuts>");

        assert_eq!(h1.text().as_ref(), "Bolts & <nuts>");
        assert!(h1.inner_html().contains("&amp;"));
    }

    #[test]
    fn test_escape_attr_quotes() {
        assert_eq!(escape_attr(r#"a"b&c"#), "a&quot;b&amp;c");
    }

    #[test]
    fn test_unescape_html_single_level() {
        assert_eq!(unescape_html("a &amp; b"), "a & b");
        assert_eq!(unescape_html("&lt;tag&gt;"), "<tag>");
        // One level at a time for doubly escaped input.
        assert_eq!(unescape_html("&amp;lt;"), "&lt;");
    }
}
