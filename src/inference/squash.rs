use indexmap::IndexMap;
use indexmap::map::Entry;

use super::{Node, TypeTag};

/// Merge the fields of struct-shaped list elements into one field set.
///
/// The first occurrence of a field is kept as-is; any later occurrence with a
/// different shape widens it to [`TypeTag::Any`]. Fields are never dropped.
///
/// The result is ordered by raw key, not by rendered identifier: the
/// sanitization policy is only known to the renderer, which re-sorts every
/// struct by identifier. Only the tree dump shows this order.
pub(super) fn squash(elements: Vec<Node>) -> Vec<Node> {
    let mut fields: IndexMap<String, Node> = IndexMap::new();

    for element in elements {
        for field in element.children {
            match fields.entry(field.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(field);
                }
                Entry::Occupied(mut slot) => {
                    let seen = slot.get_mut();
                    if !same_shape(seen, &field) {
                        widen(seen, &field);
                    }
                }
            }
        }
    }

    let mut merged: Vec<Node> = fields.into_values().collect();
    merged.sort_by(|a, b| a.name.cmp(&b.name));
    merged
}

fn widen(seen: &mut Node, other: &Node) {
    tracing::trace!(field = %seen.name, "conflicting field shapes, widening to any");
    seen.ty = TypeTag::Any;
    seen.children.clear();
    // list-ness survives only if every occurrence agrees on it
    seen.is_list &= other.is_list;
}

/// Deep structural equality over (name, is_list, type, children).
///
/// Children are matched by name, so source key order does not matter.
pub fn same_shape(a: &Node, b: &Node) -> bool {
    a.name == b.name
        && a.is_list == b.is_list
        && a.ty == b.ty
        && a.children.len() == b.children.len()
        && a.children.iter().all(|x| {
            b.children
                .iter()
                .find(|y| y.name == x.name)
                .is_some_and(|y| same_shape(x, y))
        })
}
