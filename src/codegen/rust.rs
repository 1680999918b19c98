//! Rust emitter: every struct node becomes a named `serde` struct.
//!
//! Rust has no anonymous struct types, so nested structs are hoisted and named
//! after the field they came from (`address` → `Address`), breadth-first from
//! the root. Type names are unique across the whole output; field names are
//! `snake_case` and carry `#[serde(rename = "...")]` when they differ from the
//! source key. Every struct is `#[serde(default)]`: squashed list elements
//! need not carry every field.
use std::collections::{BTreeSet, VecDeque};

use super::{fields, unique};
use crate::ident::{self, Case};
use crate::inference::{Node, TypeTag};

const DERIVES: &str = "#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]\n#[serde(default)]";

/// Names the emitted code refers to; a hoisted struct must not shadow them.
const RESERVED: &[&str] = &[
    "Self", "String", "Vec", "Option", "Box", "Result", "Some", "None", "Ok", "Err",
    "Serialize", "Deserialize", "Value", "Default", "Clone", "Debug", "PartialEq",
];

struct Hoister<'a> {
    case: Case,
    type_names: BTreeSet<String>,
    pending: VecDeque<(String, &'a Node)>,
}

pub(super) fn emit(out: &mut String, root: &Node, root_type: &str, case: Case) {
    let mut h = Hoister {
        case,
        type_names: RESERVED.iter().map(|s| s.to_string()).collect(),
        pending: VecDeque::new(),
    };
    let root_type = h.claim("", root_type);

    out.push_str("use serde::{Deserialize, Serialize};\n");

    if root.ty == TypeTag::Struct && !root.is_list {
        h.pending.push_back((root_type, root));
    } else {
        let ty = h.type_expr(root, &root_type, &format!("{root_type}Item"));
        out.push_str(&format!("\npub type {root_type} = {ty};\n"));
    }

    while let Some((name, node)) = h.pending.pop_front() {
        h.emit_struct(out, &name, node);
    }
}

impl<'a> Hoister<'a> {
    fn emit_struct(&mut self, out: &mut String, name: &str, node: &'a Node) {
        out.push('\n');
        out.push_str(DERIVES);
        out.push('\n');
        if node.children.is_empty() {
            out.push_str(&format!("pub struct {name} {{}}\n"));
            return;
        }

        let case = self.case;
        let members = fields(node, |raw: &str| ident::to_snake(&ident::sanitize(raw, case)), "_");

        out.push_str(&format!("pub struct {name} {{\n"));
        for field in members {
            let base = match ident::sanitize(&field.node.name, case) {
                s if s == ident::FALLBACK => format!("{name}Field"),
                s => s,
            };
            let ty = self.type_expr(field.node, name, &base);
            if field.renamed() {
                out.push_str(&format!("    #[serde(rename = {:?})]\n", field.node.name));
            }
            out.push_str(&format!("    pub {}: {ty},\n", field.ident));
        }
        out.push_str("}\n");
    }

    /// Type expression for `node`; struct shapes are queued under a fresh name
    /// derived from `base`.
    fn type_expr(&mut self, node: &'a Node, parent: &str, base: &str) -> String {
        let elem = match node.ty {
            TypeTag::Any => "serde_json::Value".to_string(),
            TypeTag::Bool => "bool".to_string(),
            TypeTag::Int => "i64".to_string(),
            TypeTag::Float => "f64".to_string(),
            TypeTag::String => "String".to_string(),
            TypeTag::Struct => {
                let name = self.claim(parent, base);
                self.pending.push_back((name.clone(), node));
                name
            }
        };
        if node.is_list { format!("Vec<{elem}>") } else { elem }
    }

    /// `base`, then `{parent}{base}`, then numbered variants.
    fn claim(&mut self, parent: &str, base: &str) -> String {
        if !self.type_names.contains(base) {
            self.type_names.insert(base.to_string());
            return base.to_string();
        }
        unique(&format!("{parent}{base}"), &mut self.type_names, "")
    }
}
