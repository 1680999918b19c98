//! Infer a static type declaration from one JSON document.
//!
//! ```
//! use jsongen::{codegen::Dialect, config::Options};
//!
//! let value = jsongen::decode(br#"[{"id": 1, "tags": ["a"]}, {"id": 2.5}]"#).unwrap();
//! let src = jsongen::generate(&value, Options::default(), Dialect::Go, "Root");
//! assert_eq!(
//!     src,
//!     "type Root []struct {\n\tId interface{} `json:\"id\"`\n\tTags []string `json:\"tags\"`\n}\n",
//! );
//! ```
pub mod cli;
pub mod codegen;
pub mod config;
pub mod error;
pub mod ident;
pub mod inference;
pub mod jq_exec;
pub mod path_de;
pub mod pretty;

use serde_json::Value;

pub use crate::codegen::Dialect;
pub use crate::config::{Options, Settings};
pub use crate::error::{Error, Result};
pub use crate::inference::{Node, TypeTag};

/// Decode a complete JSON document, keeping numeric literals as written.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Infer and render in one go.
pub fn generate(value: &Value, options: Options, dialect: Dialect, root_type: &str) -> String {
    let tree = inference::infer(value, options.normalize);
    codegen::render(&tree, root_type, dialect, options.case)
}
