use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Raw travel dataset as published in `travel_recommendation_api.json`.
///
/// Every top-level list is optional. A list that is missing, `null`, or not an
/// array decodes as empty.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct RawDataset {
    #[serde(default, deserialize_with = "lenient_list")]
    pub countries: Vec<RawCountry>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub temples: Vec<RawPlace>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub beaches: Vec<RawPlace>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct RawCountry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub cities: Vec<RawPlace>,
}

/// A leaf item: a city, temple, or beach.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct RawPlace {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, rename = "imageUrl", deserialize_with = "lenient_text")]
    pub image_url: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
}

impl RawDataset {
    /// Decode an already-parsed JSON document. Anything other than an object
    /// yields an empty dataset.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

/// Non-object items become empty placeholders so the item count is preserved.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
                _ => T::default(),
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}
