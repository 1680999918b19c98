//! Type tree inference for a single JSON document.
//!
//! Three passes over one in-memory tree:
//! - [`populate`] mirrors the literal shape of the value, one node per value.
//! - [`Node::normalize`] resolves every array to a single element type,
//!   bottom-up: primitives collapse, `Int`/`Float` widen, objects squash.
//! - rendering lives in [`crate::codegen`] and only reads the tree.
//!
//! Every JSON value has a type here (worst case [`TypeTag::Any`]), so none of
//! these passes can fail.
pub mod squash;

use rayon::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

// ------------------------------- Policy ---------------------------------- //

/// Child lists at least this wide are normalized on the rayon pool.
const PARALLEL_MIN_CHILDREN: usize = 64;

// ------------------------------- Model ----------------------------------- //

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// `null`, and the fallback whenever no precise type exists.
    #[default]
    Any,
    Bool,
    Int,
    Float,
    String,
    Struct,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Source key; empty for array elements and the root.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// On a list, `ty` and `children` describe the element.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_list: bool,
    #[serde(rename = "type")]
    pub ty: TypeTag,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn named(name: impl Into<String>, ty: TypeTag) -> Self {
        Self { name: name.into(), ty, ..Self::default() }
    }

    pub fn list_of(name: impl Into<String>, ty: TypeTag) -> Self {
        Self { name: name.into(), is_list: true, ty, children: Vec::new() }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Total node count including `self`.
    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(Node::count_nodes).sum::<usize>()
    }

    /// A list the parser produced that still holds its raw elements.
    fn is_pending_list(&self) -> bool {
        self.is_list && self.ty == TypeTag::Any
    }
}

// ------------------------------ Populate --------------------------------- //

pub fn populate(v: &Value) -> Node {
    populate_named(String::new(), v)
}

fn populate_named(name: String, v: &Value) -> Node {
    match v {
        Value::Null => Node::named(name, TypeTag::Any),
        Value::Bool(_) => Node::named(name, TypeTag::Bool),
        Value::Number(n) => {
            // `as_i64` only succeeds on an integral literal within range, so
            // `1.0`, `1e3` and anything past i64 are floats.
            let ty = if n.as_i64().is_some() { TypeTag::Int } else { TypeTag::Float };
            Node::named(name, ty)
        }
        Value::String(_) => Node::named(name, TypeTag::String),
        Value::Array(xs) => populate_array(name, xs),
        Value::Object(m) => populate_object(name, m),
    }
}

fn populate_array(name: String, xs: &[Value]) -> Node {
    let children = xs.iter().map(|el| populate_named(String::new(), el)).collect();
    Node::list_of(name, TypeTag::Any).with_children(children)
}

fn populate_object(name: String, map: &Map<String, Value>) -> Node {
    let children = map
        .iter()
        .map(|(k, v)| populate_named(k.clone(), v))
        .collect();
    Node::named(name, TypeTag::Struct).with_children(children)
}

// ------------------------------ Normalize -------------------------------- //

impl Node {
    /// Flattens homogeneous lists of primitives and squashes lists of struct
    /// into one struct. Conflicting fields become [`TypeTag::Any`].
    pub fn normalize(&mut self) {
        if self.children.len() >= PARALLEL_MIN_CHILDREN {
            self.children.par_iter_mut().for_each(Node::normalize);
        } else {
            self.children.iter_mut().for_each(Node::normalize);
        }

        // A resolved list already carries its element type.
        if !self.is_pending_list() || self.children.is_empty() {
            return;
        }

        let tags: BTreeSet<TypeTag> = self.children.iter().map(|c| c.ty).collect();
        let elements = std::mem::take(&mut self.children);

        self.ty = match tags.len() {
            1 => match tags.first().copied().unwrap_or_default() {
                TypeTag::Struct => {
                    self.children = squash::squash(elements);
                    TypeTag::Struct
                }
                primitive => primitive,
            },
            2 if tags.contains(&TypeTag::Int) && tags.contains(&TypeTag::Float) => TypeTag::Float,
            _ => TypeTag::Any,
        };
    }
}

/// Populate and (optionally) normalize in one step.
pub fn infer(v: &Value, normalize: bool) -> Node {
    let mut root = populate(v);
    tracing::debug!(nodes = root.count_nodes(), "populated type tree");
    if normalize {
        root.normalize();
        tracing::debug!(nodes = root.count_nodes(), "normalized type tree");
    }
    root
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalized(v: Value) -> Node {
        infer(&v, true)
    }

    #[test]
    fn scalars_map_to_tags() {
        assert_eq!(populate(&json!(null)).ty, TypeTag::Any);
        assert_eq!(populate(&json!(true)).ty, TypeTag::Bool);
        assert_eq!(populate(&json!("x")).ty, TypeTag::String);
    }

    #[test]
    fn integer_and_float_literals_are_distinct() {
        let int: Value = serde_json::from_str("1").unwrap();
        let float: Value = serde_json::from_str("1.0").unwrap();
        let exp: Value = serde_json::from_str("1e3").unwrap();
        let huge: Value = serde_json::from_str("9223372036854775808").unwrap();
        let neg: Value = serde_json::from_str("-9223372036854775808").unwrap();
        assert_eq!(populate(&int).ty, TypeTag::Int);
        assert_eq!(populate(&float).ty, TypeTag::Float);
        assert_eq!(populate(&exp).ty, TypeTag::Float);
        assert_eq!(populate(&huge).ty, TypeTag::Float);
        assert_eq!(populate(&neg).ty, TypeTag::Int);
    }

    #[test]
    fn populate_keeps_literal_shape() {
        let t = populate(&json!({"b": [1, "x"], "a": {"c": null}}));
        assert_eq!(t.ty, TypeTag::Struct);
        let names: Vec<&str> = t.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["b", "a"], "source order is kept until rendering");

        let b = t.child("b").unwrap();
        assert!(b.is_list);
        assert_eq!(b.ty, TypeTag::Any);
        assert_eq!(b.children.len(), 2);
        assert!(b.children.iter().all(|c| c.name.is_empty()));
        assert_eq!(t.child("a").unwrap().child("c").unwrap().ty, TypeTag::Any);
    }

    #[test]
    fn homogeneous_and_widened_lists() {
        let ints: Value = serde_json::from_str("[1, 2, 3]").unwrap();
        let t = normalized(ints);
        assert_eq!((t.is_list, t.ty), (true, TypeTag::Int));
        assert!(t.children.is_empty());

        let mixed: Value = serde_json::from_str("[1, 2.0]").unwrap();
        let t = normalized(mixed);
        assert_eq!((t.is_list, t.ty), (true, TypeTag::Float));
        assert!(t.children.is_empty());
    }

    #[test]
    fn heterogeneous_list_falls_back_to_any() {
        let t = normalized(json!([true, 1, "x"]));
        assert_eq!((t.is_list, t.ty), (true, TypeTag::Any));
        assert!(t.children.is_empty());

        // only Int+Float widens
        let t = normalized(json!([true, "x"]));
        assert_eq!(t.ty, TypeTag::Any);
        assert!(t.children.is_empty());
    }

    #[test]
    fn empty_and_null_lists() {
        let t = normalized(json!([]));
        assert_eq!((t.is_list, t.ty), (true, TypeTag::Any));

        let t = normalized(json!([null, null]));
        assert_eq!((t.is_list, t.ty), (true, TypeTag::Any));
        assert!(t.children.is_empty());
    }

    #[test]
    fn squash_flags_conflicting_fields() {
        let t = normalized(json!([{"a": 1, "b": true}, {"a": "x", "b": true}]));
        assert_eq!((t.is_list, t.ty), (true, TypeTag::Struct));
        assert_eq!(t.child("a").unwrap().ty, TypeTag::Any);
        assert_eq!(t.child("b").unwrap().ty, TypeTag::Bool);
    }

    #[test]
    fn squash_keeps_partially_present_fields() {
        let t = normalized(json!([{"a": 1}, {"a": 1, "b": "x"}]));
        assert_eq!(t.children.len(), 2);
        assert_eq!(t.child("a").unwrap().ty, TypeTag::Int);
        assert_eq!(t.child("b").unwrap().ty, TypeTag::String);
    }

    #[test]
    fn squash_compares_nested_shapes() {
        let t = normalized(json!([
            {"inner": {"x": 1}, "same": {"y": [1]}},
            {"inner": {"x": "1"}, "same": {"y": [2, 3]}},
        ]));
        let inner = t.child("inner").unwrap();
        assert_eq!(inner.ty, TypeTag::Any);
        assert!(inner.children.is_empty());

        let same = t.child("same").unwrap();
        assert_eq!(same.ty, TypeTag::Struct);
        let y = same.child("y").unwrap();
        assert_eq!((y.is_list, y.ty), (true, TypeTag::Int));
    }

    #[test]
    fn squash_ignores_source_key_order() {
        let t = normalized(json!([{"p": {"x": 1, "y": 2}}, {"p": {"y": 3, "x": 4}}]));
        assert_eq!(t.child("p").unwrap().ty, TypeTag::Struct);
    }

    #[test]
    fn squash_recurses_into_lists_of_struct() {
        let t = normalized(json!({"rows": [
            {"tags": [{"k": "a"}], "n": 1},
            {"tags": [{"k": "b", "v": 2}], "n": 2.5},
        ]}));
        let rows = t.child("rows").unwrap();
        assert_eq!(rows.child("n").unwrap().ty, TypeTag::Any);
        // `tags` squashed differently in each row, so the shapes disagree
        let tags = rows.child("tags").unwrap();
        assert_eq!((tags.is_list, tags.ty), (true, TypeTag::Any));
    }

    #[test]
    fn list_conflict_is_order_independent() {
        let ab = normalized(json!([{"a": [1]}, {"a": 1}]));
        let ba = normalized(json!([{"a": 1}, {"a": [1]}]));
        assert_eq!(ab, ba);
        let a = ab.child("a").unwrap();
        assert_eq!((a.is_list, a.ty), (false, TypeTag::Any));

        let lists = normalized(json!([{"a": [1]}, {"a": ["x"]}]));
        let a = lists.child("a").unwrap();
        assert_eq!((a.is_list, a.ty), (true, TypeTag::Any));
    }

    #[test]
    fn merged_fields_are_sorted() {
        let t = normalized(json!([{"zeta": 1, "alpha": 2}, {"mid": 3}]));
        let names: Vec<&str> = t.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn struct_and_null_elements_do_not_squash() {
        let t = normalized(json!([{"a": 1}, null]));
        assert_eq!((t.is_list, t.ty), (true, TypeTag::Any));
        assert!(t.children.is_empty());
    }

    #[test]
    fn normalize_is_idempotent() {
        let wide: Vec<Value> = (0..100).map(|i| json!({ "i": i })).collect();
        let docs = [
            json!({"a": [1, 2.5], "b": [{"x": 1}, {"x": 2, "y": [true]}], "c": []}),
            json!([[{"a": 1}], [{"b": 2}]]),
            json!([{"a": {"b": [{"c": 1}, {"c": "s"}]}}, {"a": {"b": []}}]),
            json!([1, [2], {"k": null}]),
            json!({ "wide": wide }),
        ];
        for doc in docs {
            let once = normalized(doc.clone());
            let mut twice = once.clone();
            twice.normalize();
            assert_eq!(once, twice, "{doc}");
        }
    }

    #[test]
    fn wide_lists_normalize_like_narrow_ones() {
        let wide: Vec<Value> = (0..200).map(|i| json!({"id": i, "name": format!("n{i}")})).collect();
        let t = normalized(json!({ "items": wide }));
        let items = t.child("items").unwrap();
        assert_eq!(items.ty, TypeTag::Struct);
        assert_eq!(items.child("id").unwrap().ty, TypeTag::Int);
        assert_eq!(items.child("name").unwrap().ty, TypeTag::String);
    }

    #[test]
    fn skipped_normalization_keeps_raw_elements() {
        let t = infer(&json!([1, 2]), false);
        assert_eq!((t.is_list, t.ty), (true, TypeTag::Any));
        assert_eq!(t.children.len(), 2);
    }

    #[test]
    fn dump_mirrors_model_fields() {
        let t = normalized(json!({"xs": [1]}));
        let dump = serde_json::to_value(&t).unwrap();
        assert_eq!(
            dump,
            json!({
                "type": "struct",
                "children": [{ "name": "xs", "is_list": true, "type": "int" }]
            })
        );
    }
}
