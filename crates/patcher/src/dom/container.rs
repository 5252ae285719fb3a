// ABOUTME: Wraps body content in the designated container and appends the optional fragment.
// ABOUTME: Both steps are skipped when their target element already exists.

use dom_query::{Document, NodeRef};
use tracing::debug;

use super::query::find_by_id;
use super::{new_html_element, Change};
use crate::profile::{ContainerSpec, FragmentSpec};

/// Returns the container element, creating it around the current body children
/// when no element anywhere in the document carries the container id.
pub fn ensure_container<'a>(
    doc: &'a Document,
    body: &NodeRef<'a>,
    spec: &ContainerSpec,
    changes: &mut Vec<Change>,
) -> NodeRef<'a> {
    if let Some(existing) = find_by_id(&doc.root(), &spec.id) {
        return existing;
    }

    let wrapper = new_html_element(doc, &spec.tag);
    wrapper.set_attr("id", &spec.id);
    for child in body.children() {
        child.remove_from_parent();
        wrapper.append_child(&child);
    }
    body.append_child(&wrapper);

    debug!(id = %spec.id, moved = wrapper.children().len(), "wrapped body content");
    changes.push(Change::WrappedContainer);
    wrapper
}

/// Appends `fragment` as the container's last child unless the container
/// already holds an element with the fragment's id.
pub fn ensure_fragment(
    container: &NodeRef,
    fragment: &FragmentSpec,
    changes: &mut Vec<Change>,
) -> bool {
    if find_by_id(container, &fragment.id).is_some() {
        return false;
    }

    container.append_html(fragment.html.as_str());
    debug!(id = %fragment.id, "appended fragment");
    changes.push(Change::AppendedFragment);
    true
}
