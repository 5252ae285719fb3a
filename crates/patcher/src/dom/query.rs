// ABOUTME: Typed element predicates and depth-first lookups over a dom_query tree.
// ABOUTME: Replaces selector strings with direct name/attribute comparison.

use dom_query::NodeRef;

/// Returns true if `node` is an element named `tag` (ASCII case-insensitive).
pub fn is_tag(node: &NodeRef, tag: &str) -> bool {
    node.is_element()
        && node
            .node_name()
            .map(|name| name.eq_ignore_ascii_case(tag))
            .unwrap_or(false)
}

/// Returns true if `node` is a `tag` element carrying every attribute in `attrs`
/// with exactly the given value. An empty expected value matches a boolean attribute.
pub fn matches_rule(node: &NodeRef, tag: &str, attrs: &[(String, String)]) -> bool {
    is_tag(node, tag)
        && attrs
            .iter()
            .all(|(name, value)| node.attr(name).is_some_and(|v| &*v == value.as_str()))
}

/// Depth-first search below `root` (excluding `root` itself) for the first node accepted by `pred`.
pub fn find_descendant<'a, F>(root: &NodeRef<'a>, pred: &F) -> Option<NodeRef<'a>>
where
    F: Fn(&NodeRef<'a>) -> bool,
{
    for child in root.children() {
        if pred(&child) {
            return Some(child);
        }
        if let Some(found) = find_descendant(&child, pred) {
            return Some(found);
        }
    }
    None
}

/// Counts nodes below `root` accepted by `pred`.
pub fn count_descendants<'a, F>(root: &NodeRef<'a>, pred: &F) -> usize
where
    F: Fn(&NodeRef<'a>) -> bool,
{
    root.children()
        .iter()
        .map(|child| usize::from(pred(child)) + count_descendants(child, pred))
        .sum()
}

/// Finds the first element below `root` whose `id` attribute equals `id`.
pub fn find_by_id<'a>(root: &NodeRef<'a>, id: &str) -> Option<NodeRef<'a>> {
    find_descendant(root, &|node: &NodeRef<'a>| {
        node.is_element() && node.attr("id").is_some_and(|v| &*v == id)
    })
}

/// Finds the first direct child of `parent` that is a `tag` element.
pub fn child_element<'a>(parent: &NodeRef<'a>, tag: &str) -> Option<NodeRef<'a>> {
    parent.children().into_iter().find(|child| is_tag(child, tag))
}
