// ABOUTME: Inserts head tags only when no equivalent tag is already present.
// ABOUTME: Matching uses the rule's match attributes; extra attributes are written on insertion.

use dom_query::{Document, NodeRef};
use tracing::debug;

use super::query::{find_descendant, matches_rule};
use super::{new_html_element, Change};
use crate::profile::HeadRule;

/// Appends `rule`'s tag to `head` unless the head subtree already has one.
/// Returns true if a tag was inserted.
pub fn insert_once_in_head(
    doc: &Document,
    head: &NodeRef,
    rule: &HeadRule,
    slug: &str,
    changes: &mut Vec<Change>,
) -> bool {
    let wanted = rule.resolved_match(slug);
    if find_descendant(head, &|node: &NodeRef| matches_rule(node, &rule.tag, &wanted)).is_some() {
        return false;
    }

    let tag = new_html_element(doc, &rule.tag);
    for (name, value) in rule.resolved_all(slug) {
        tag.set_attr(&name, &value);
    }
    head.append_child(&tag);

    debug!(rule = %rule, "inserted head tag");
    changes.push(Change::InsertedHead(rule.tag.clone()));
    true
}
