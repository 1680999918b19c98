//! Go emitter: a single nested `type` declaration.
//!
//! ```go
//! type Root struct {
//! 	FieldConflict []struct {
//! 		A interface{} `json:"a"`
//! 	} `json:"field-conflict"`
//! }
//! ```
//!
//! Indentation is one tab per depth and columns are not aligned; run the
//! result through `gofmt` for that.
use super::{exported, fields};
use crate::ident::Case;
use crate::inference::{Node, TypeTag};

pub(super) fn emit(out: &mut String, root: &Node, root_type: &str, case: Case) {
    out.push_str("type ");
    out.push_str(root_type);
    out.push(' ');
    emit_type(out, root, 0, case);
    out.push('\n');
}

fn emit_type(out: &mut String, node: &Node, depth: usize, case: Case) {
    if node.is_list {
        out.push_str("[]");
    }
    if node.ty != TypeTag::Struct {
        out.push_str(keyword(node.ty));
        return;
    }
    if node.children.is_empty() {
        out.push_str("struct{}");
        return;
    }

    out.push_str("struct {\n");
    for field in fields(node, exported(case), "") {
        indent(out, depth + 1);
        out.push_str(&field.ident);
        out.push(' ');
        emit_type(out, field.node, depth + 1, case);
        if field.renamed() {
            out.push(' ');
            out.push_str(&json_tag(&field.node.name));
        }
        out.push('\n');
    }
    indent(out, depth);
    out.push('}');
}

fn keyword(ty: TypeTag) -> &'static str {
    match ty {
        TypeTag::Any => "interface{}",
        TypeTag::Bool => "bool",
        TypeTag::Int => "int64",
        TypeTag::Float => "float64",
        TypeTag::String => "string",
        TypeTag::Struct => "struct",
    }
}

fn indent(out: &mut String, depth: usize) {
    out.extend(std::iter::repeat_n('\t', depth));
}

/// Struct tag carrying the original key. Raw string literal unless the key
/// contains a backtick.
fn json_tag(key: &str) -> String {
    let tag = format!("json:{}", quote(key));
    if tag.contains('`') {
        quote(&tag)
    } else {
        format!("`{tag}`")
    }
}

/// Go interpreted string literal.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
