// ABOUTME: DOM guarantees applied by the patcher: skeleton, head tags, container, fragment.
// ABOUTME: Each step records the changes it made so callers can tell unchanged documents apart.

//! DOM utilities for idempotent document patching.
//!
//! Every function here follows the same pattern: look for the target first,
//! insert only if it is missing, and push a [`Change`] for each insertion.

use std::fmt;

use dom_query::{Document, NodeData, NodeRef};

pub mod container;
pub mod head;
pub mod query;
pub mod skeleton;

pub use container::{ensure_container, ensure_fragment};
pub use head::insert_once_in_head;
pub use skeleton::{ensure_skeleton, Skeleton, SkeletonError, SourceShape};

/// A single structural edit applied to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    CreatedHtml,
    CreatedHead,
    CreatedBody,
    InsertedHead(String),
    WrappedContainer,
    AppendedFragment,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::CreatedHtml => write!(f, "created <html>"),
            Change::CreatedHead => write!(f, "created <head>"),
            Change::CreatedBody => write!(f, "created <body>"),
            Change::InsertedHead(tag) => write!(f, "inserted <{}> into <head>", tag),
            Change::WrappedContainer => write!(f, "wrapped body content"),
            Change::AppendedFragment => write!(f, "appended fragment"),
        }
    }
}

/// Creates a detached element in the namespace of the document's `<html>` root.
///
/// `Tree::new_element` leaves the namespace empty, and the serializer only
/// treats HTML-namespace elements as void, so `<meta>` would gain a `</meta>`.
pub fn new_html_element<'a>(doc: &'a Document, tag: &str) -> NodeRef<'a> {
    let ns = query::child_element(&doc.root(), "html")
        .and_then(|root| root.qual_name_ref().map(|name| name.ns.clone()));
    let element = doc.tree.new_element(tag);
    if let Some(ns) = ns {
        element.update(|node| {
            if let NodeData::Element(el) = &mut node.data {
                el.name.ns = ns;
            }
        });
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_element_serializes_as_html_void() {
        let doc = Document::from("<html><head></head><body></body></html>");
        let head = doc.tree.head().unwrap();
        let meta = new_html_element(&doc, "meta");
        meta.set_attr("name", "app-slug");
        head.append_child(&meta);

        let html = doc.html().to_string();
        assert!(html.contains(r#"<meta name="app-slug">"#));
        assert!(!html.contains("</meta>"));
        assert_eq!(Document::from(html.as_str()).html().to_string(), html);
    }
}
