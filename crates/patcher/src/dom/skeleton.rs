// ABOUTME: Guarantees the <html>, <head> and <body> skeleton of a parsed document.
// ABOUTME: Probes the raw source so implicit sections count as changes and get written out explicitly.

use dom_query::{Document, NodeRef};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::query::child_element;
use super::{new_html_element, Change};

static HIDDEN_MARKUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .unwrap()
});
static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<html[\s/>]").unwrap());
static HEAD_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<head[\s/>]").unwrap());
static BODY_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<body[\s/>]").unwrap());

/// Which skeleton start tags appear literally in the source text, outside
/// comments and `<script>`/`<style>` bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceShape {
    pub has_html: bool,
    pub has_head: bool,
    pub has_body: bool,
}

impl SourceShape {
    pub fn probe(source: &str) -> Self {
        let visible = HIDDEN_MARKUP_RE.replace_all(source, "");
        Self {
            has_html: HTML_TAG_RE.is_match(&visible),
            has_head: HEAD_TAG_RE.is_match(&visible),
            has_body: BODY_TAG_RE.is_match(&visible),
        }
    }
}

/// Why a document cannot be given a patchable skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SkeletonError {
    #[error("document has no root element")]
    NoRoot,
    #[error("frameset document has no body to hold content")]
    Frameset,
}

/// Handles to the three skeleton elements.
pub struct Skeleton<'a> {
    pub html: NodeRef<'a>,
    pub head: NodeRef<'a>,
    pub body: NodeRef<'a>,
}

/// Makes sure the document has a root, head and body, recording a change for
/// every section the source did not spell out.
///
/// Frameset documents are rejected before anything is touched: a body placed
/// after `<frameset>` is dropped again when the page is reparsed.
pub fn ensure_skeleton<'a>(
    doc: &'a Document,
    shape: SourceShape,
    lang: &str,
    changes: &mut Vec<Change>,
) -> Result<Skeleton<'a>, SkeletonError> {
    let html = child_element(&doc.root(), "html").ok_or(SkeletonError::NoRoot)?;
    if child_element(&html, "body").is_none() && child_element(&html, "frameset").is_some() {
        return Err(SkeletonError::Frameset);
    }

    if !shape.has_html {
        if html.attr("lang").is_none() {
            html.set_attr("lang", lang);
        }
        debug!("created <html> root");
        changes.push(Change::CreatedHtml);
    }

    let head = match child_element(&html, "head") {
        Some(head) => {
            if !shape.has_head {
                changes.push(Change::CreatedHead);
            }
            head
        }
        None => {
            let head = new_html_element(doc, "head");
            html.prepend_child(&head);
            changes.push(Change::CreatedHead);
            head
        }
    };

    let body = match child_element(&html, "body") {
        Some(body) => {
            if !shape.has_body {
                changes.push(Change::CreatedBody);
            }
            body
        }
        None => {
            let body = new_html_element(doc, "body");
            html.append_child(&body);
            changes.push(Change::CreatedBody);
            body
        }
    };

    Ok(Skeleton { html, head, body })
}
