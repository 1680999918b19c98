use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Root {
    pub id: i64,
    #[serde(rename = "in-stock")]
    pub in_stock: bool,
    pub meta: serde_json::Value,
    pub name: String,
    pub price: f64,
    pub tags: Vec<String>,
}
