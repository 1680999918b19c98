//! Declaration emitters.
//!
//! Rendering only reads the tree. Output is byte-for-byte reproducible: struct
//! fields are ordered by their rendered identifier, never by source order.
pub mod go;
pub mod rust;

use std::collections::BTreeSet;

use crate::ident::{self, Case};
use crate::inference::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// One nested `type` declaration with `json` struct tags.
    #[default]
    Go,
    /// Hoisted `serde` structs.
    Rust,
}

pub struct Codegen {
    dialect: Dialect,
    case: Case,
    out: String,
}

impl Codegen {
    pub fn new(dialect: Dialect, case: Case) -> Self {
        Self { dialect, case, out: String::new() }
    }

    /// `root_type` is sanitized like a key; one that sanitizes to nothing
    /// becomes [`DEFAULT_ROOT`].
    pub fn emit(&mut self, root: &Node, root_type: &str) {
        let root_type = root_name(root_type);
        match self.dialect {
            Dialect::Go => go::emit(&mut self.out, root, &root_type, self.case),
            Dialect::Rust => rust::emit(&mut self.out, root, &root_type, self.case),
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

/// Render `root` as a complete declaration named `root_type`.
pub fn render(root: &Node, root_type: &str, dialect: Dialect, case: Case) -> String {
    let mut cg = Codegen::new(dialect, case);
    cg.emit(root, root_type);
    cg.into_string()
}

pub const DEFAULT_ROOT: &str = "Root";

fn root_name(root_type: &str) -> String {
    match ident::sanitize(root_type, Case::Title) {
        s if s == ident::FALLBACK => DEFAULT_ROOT.to_string(),
        s => s,
    }
}

// ------------------------------- Fields ---------------------------------- //

/// A struct member with its final identifier.
pub(crate) struct Field<'a> {
    pub ident: String,
    pub node: &'a Node,
}

impl Field<'_> {
    /// The source key must be carried as metadata.
    pub fn renamed(&self) -> bool {
        self.ident != self.node.name
    }
}

/// Children of a struct node in rendering order, with identifiers made unique
/// within the struct by a numeric suffix joined with `sep`.
pub(crate) fn fields<'a>(
    node: &'a Node,
    ident_of: impl Fn(&str) -> String,
    sep: &str,
) -> Vec<Field<'a>> {
    let mut keyed: Vec<(String, &Node)> = node
        .children
        .iter()
        .map(|child| (ident_of(&child.name), child))
        .collect();
    keyed.sort_by(|(ia, a), (ib, b)| ia.cmp(ib).then_with(|| a.name.cmp(&b.name)));

    let mut used = BTreeSet::new();
    keyed
        .into_iter()
        .map(|(base, node)| {
            let ident = unique(&base, &mut used, sep);
            Field { ident, node }
        })
        .collect()
}

/// First of `base`, `base{sep}2`, `base{sep}3`, ... not yet in `used`.
pub(crate) fn unique(base: &str, used: &mut BTreeSet<String>, sep: &str) -> String {
    let mut candidate = base.to_string();
    let mut n = 2;
    while used.contains(&candidate) {
        candidate = format!("{base}{sep}{n}");
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}

/// Go-style exported identifier for a key under `case`.
pub(crate) fn exported(case: Case) -> impl Fn(&str) -> String {
    move |raw: &str| ident::sanitize(raw, case)
}
