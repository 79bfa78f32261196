//! Raw documents and search responses as the API returns them

use serde::{Deserialize, Deserializer, Serialize};

/// An unprocessed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,

    #[serde(default)]
    pub uid: Option<String>,

    #[serde(rename = "type", default)]
    pub doc_type: String,

    #[serde(default)]
    pub first_publication_date: Option<String>,

    /// Type-specific fields, shaped by the custom type
    #[serde(default)]
    pub data: serde_json::Value,
}

impl RawDocument {
    /// The identifier used in routes: the uid, or the document id when the
    /// custom type has no uid field
    pub fn slug(&self) -> &str {
        self.uid.as_deref().unwrap_or(&self.id)
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub results: Vec<RawDocument>,

    /// Continuation URL; an empty string from the wire is read as absent
    #[serde(default, deserialize_with = "empty_as_none")]
    pub next_page: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
