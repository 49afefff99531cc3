//! Small helpers over the `markup5ever_rcdom` handle tree.
//!
//! The snippet wrapper holds its parsed tree as plain rcdom handles rather
//! than a bespoke AST; these functions cover the two walks it needs
//! (marker lookup and text extraction) without pulling in a query engine.

use markup5ever_rcdom::{Handle, NodeData};

/// Find the first element in preorder whose `id` attribute equals `id`.
///
/// The search visits `root` itself before its children, so an ancestor
/// always wins over a descendant carrying the same id.
pub fn find_element_by_id(root: &Handle, id: &str) -> Option<Handle> {
    if element_id(root).as_deref() == Some(id) {
        return Some(root.clone());
    }
    for child in root.children.borrow().iter() {
        if let Some(found) = find_element_by_id(child, id) {
            return Some(found);
        }
    }
    None
}

/// Concatenated text of all descendant text nodes, in document order.
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

/// The value of an element's `id` attribute, if the node is an element
/// and carries one.
fn element_id(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == "id")
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

fn collect_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in node.children.borrow().iter() {
                collect_text(child, out);
            }
        }
    }
}
