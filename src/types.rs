use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The seven fixed attribute categories as (display name, short key) pairs.
/// The short keys double as query-string parameter names.
pub const ATTRIBUTE_CATEGORIES: [(&str, &str); 7] = [
    ("Background", "bg"),
    ("Fur", "fur"),
    ("Eyes", "eyes"),
    ("Mouth", "mouth"),
    ("Head", "head"),
    ("Body accessory", "body"),
    ("Mouth accessory", "mouthAcc"),
];

/// Short keys only, in canonical order (filter parameter order)
pub const FILTER_KEYS: [&str; 7] = ["bg", "fur", "eyes", "mouth", "head", "body", "mouthAcc"];

/// Raw metadata file: `{ "total": N, "data": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCollection {
    pub total: u64,
    pub data: Vec<RawItem>,
}

/// One item as scraped: attributes keyed by display name, absent categories omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    /// Decimal integer encoded as a string in the source data
    pub item_id: String,
    pub inscription_id: String,
    pub inscription_number: i64,
    pub attributes: HashMap<String, String>,
}

/// One entry of the persisted gallery index (`doges-index.json`),
/// ordered by ascending id. Absent attributes are empty strings here,
/// unlike the "None" bucket used internally for rarity frequencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DogeIndexEntry {
    pub id: u32,
    #[serde(rename = "inscriptionNumber")]
    pub inscription_number: i64,
    /// Rarity score rounded to one decimal (ranks were assigned at full precision)
    pub score: f64,
    pub rank: u32,
    pub bg: String,
    pub fur: String,
    pub eyes: String,
    pub mouth: String,
    pub head: String,
    pub body: String,
    #[serde(rename = "mouthAcc")]
    pub mouth_acc: String,
}

impl DogeIndexEntry {
    /// Attribute value for a filter short key. Unknown keys match nothing.
    pub fn attribute(&self, key: &str) -> &str {
        match key {
            "bg" => &self.bg,
            "fur" => &self.fur,
            "eyes" => &self.eyes,
            "mouth" => &self.mouth,
            "head" => &self.head,
            "body" => &self.body,
            "mouthAcc" => &self.mouth_acc,
            _ => "",
        }
    }
}

/// One (value, count) pair of a trait category summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitValue {
    pub value: String,
    pub count: u32,
}

/// Filter option list for one category (`trait-values.json`), values
/// sorted by descending count. Counts cover present attributes only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitCategory {
    pub name: String,
    pub key: String,
    pub values: Vec<TraitValue>,
}

/// Per-item detail record (`metadata/items/<id>.json`), keyed by id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogeDetail {
    pub id: u32,
    pub inscription_id: String,
    pub inscription_number: i64,
    pub attributes: HashMap<String, String>,
}
