// src/article.rs
//! Article record shared by the content API and the search index.
//!
//! Both sources deliver the same JSON shape. Search hits only carry the
//! projected subset, so every member defaults to empty when absent or `null`.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Article {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub web_url: String,
    /// Named fields: headline, intro, publicationDate, hiddenArticle, ...
    #[serde(deserialize_with = "null_values_as_empty")]
    pub fields: BTreeMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<Keyword>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
    #[serde(deserialize_with = "null_as_default")]
    pub sections: Sections,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sub_type: String,
}

impl Article {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Labels of keywords scoring strictly above `threshold`, in document order.
    pub fn keywords_above(&self, threshold: f64) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|k| k.score > threshold)
            .map(|k| k.label.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keyword {
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
}

/// Section memberships: the home section plus every section the article appears in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sections {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub all: Vec<String>,
}

/// Content API envelope: `{ "content": Article }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEnvelope {
    #[serde(deserialize_with = "null_as_default")]
    pub content: Article,
}

/// Upstream payloads send `null` for empty members; read it as the zero value.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}

fn null_values_as_empty<'de, D>(d: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<String>>> = Option::deserialize(d)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.unwrap_or_default()))
        .collect())
}
