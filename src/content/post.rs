//! Post models and their projection from raw documents

use serde::{Deserialize, Serialize};

use crate::prismic::{PrismicError, RawDocument};

/// A post as the listing shows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Document uid, used as the route slug
    pub id: String,
    /// Raw ISO-8601 timestamp as the repository sent it
    pub first_publication_date: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// A post as the reading view shows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    pub id: String,
    pub first_publication_date: Option<String>,
    pub title: String,
    /// Not displayed by the reading view, kept with the post
    pub subtitle: String,
    pub banner_url: String,
    pub author: String,
    pub content: Vec<Section>,
}

/// A heading followed by its paragraphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub body: Vec<BodyEntry>,
}

/// One rich-text block. Only `text` is rendered; `kind` and `spans` are kept
/// so a rich-text renderer could use them later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyEntry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<serde_json::Value>,
}

impl BodyEntry {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: "paragraph".to_string(),
            text: text.into(),
            spans: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SummaryFields {
    title: String,
    subtitle: String,
    author: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DetailFields {
    title: String,
    subtitle: String,
    banner: Banner,
    author: String,
    content: Vec<Section>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Banner {
    url: String,
}

fn decode_data<T: serde::de::DeserializeOwned + Default>(
    doc: &RawDocument,
) -> Result<T, PrismicError> {
    if doc.data.is_null() {
        return Ok(T::default());
    }
    T::deserialize(&doc.data)
        .map_err(|e| PrismicError::Decode(format!("document {}: {}", doc.slug(), e)))
}

impl PostSummary {
    /// Keep only the id, publication date, title, subtitle and author
    pub fn from_document(doc: &RawDocument) -> Result<Self, PrismicError> {
        let fields: SummaryFields = decode_data(doc)?;
        Ok(Self {
            id: doc.slug().to_string(),
            first_publication_date: doc.first_publication_date.clone(),
            title: fields.title,
            subtitle: fields.subtitle,
            author: fields.author,
        })
    }
}

impl PostDetail {
    pub fn from_document(doc: &RawDocument) -> Result<Self, PrismicError> {
        let fields: DetailFields = decode_data(doc)?;
        Ok(Self {
            id: doc.slug().to_string(),
            first_publication_date: doc.first_publication_date.clone(),
            title: fields.title,
            subtitle: fields.subtitle,
            banner_url: fields.banner.url,
            author: fields.author,
            content: fields.content,
        })
    }
}
