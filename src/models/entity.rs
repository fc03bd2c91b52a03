use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "sharedId", default, skip_serializing_if = "Option::is_none")]
    pub shared_id: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub template: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}
