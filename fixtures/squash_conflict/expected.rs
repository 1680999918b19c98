use serde::{Deserialize, Serialize};

pub type Root = Vec<RootItem>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootItem {
    pub a: serde_json::Value,
    pub b: bool,
    pub c: Vec<f64>,
    #[serde(rename = "field-conflict")]
    pub field_conflict: serde_json::Value,
}
