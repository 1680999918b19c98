//! Identifier sanitizer: JSON keys → exported host-language identifiers.
//!
//! Identifiers must begin with a letter and may contain letters, digits and
//! `_`. `-` and `_` in a key are word boundaries; how a boundary is spelled
//! depends on [`Case`].
use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// Word-boundary policy for [`sanitize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Case {
    /// `foo-bar_baz` → `FooBarBaz`
    #[default]
    Title,
    /// `foo-bar_baz` → `Foo_bar_baz`
    Underscore,
}

impl Case {
    pub fn from_title_flag(title_case: bool) -> Self {
        if title_case { Case::Title } else { Case::Underscore }
    }
}

/// Identifier used when nothing of the key survives sanitization.
pub const FALLBACK: &str = "_";

pub fn sanitize(raw: &str, case: Case) -> String {
    let trimmed = raw.trim_start_matches(|c: char| !c.is_alphabetic());

    let mut out = String::with_capacity(trimmed.len());
    let mut boundary = true; // first letter is always capitalized
    for c in trimmed.chars() {
        match c {
            '-' | '_' => match case {
                Case::Title => boundary = true,
                Case::Underscore => out.push('_'),
            },
            // Digits are ASCII only: `²` or `½` are numeric but not identifier characters.
            c if c.is_alphabetic() || c.is_ascii_digit() => {
                out.push(if boundary { upper(c) } else { c });
                boundary = false;
            }
            _ => {}
        }
    }

    if out.is_empty() {
        return FALLBACK.to_string();
    }
    out
}

/// Upper-case `c` unless the mapping expands it (`ΐ` → `Ι` + combining marks);
/// the marks would be dropped on a second pass.
fn upper(c: char) -> char {
    let mut mapped = c.to_uppercase();
    match (mapped.next(), mapped.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// True when `raw` cannot be used verbatim and the original name must be kept.
pub fn needs_rename(raw: &str, case: Case) -> bool {
    sanitize(raw, case) != raw
}

// ------------------------------ Rust naming ------------------------------- //

static RUST_KEYWORDS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    [
        "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
        "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen",
        "if", "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override",
        "priv", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true",
        "try", "type", "typeof", "unsafe", "unsized", "use", "virtual", "where", "while",
        "yield",
    ]
    .into_iter()
    .collect()
});

/// `FieldConflict` → `field_conflict`. Input is expected to be sanitized.
pub fn to_snake(ident: &str) -> String {
    if ident == FALLBACK {
        return "field".to_string();
    }
    let mut out = String::with_capacity(ident.len() + 4);
    let mut prev: Option<char> = None;
    for c in ident.chars() {
        if c.is_uppercase() {
            if prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                out.push('_');
            }
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) => out.push(l),
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    if RUST_KEYWORDS.contains(out.as_str()) {
        out.push('_');
    }
    out
}
