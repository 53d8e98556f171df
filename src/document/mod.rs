//! Document model: front matter + body.
//!
//! A document is what the store versions: a Markdown body with a structured
//! metadata block (front matter) in front of it. The two are encoded into a
//! single blob payload by [`codec`] so that one file on disk is one blob in
//! the object graph.

pub mod codec;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// structured metadata prepended to a document's body when encoded.
///
/// All fields are optional in the encoded form; fields at their default are
/// omitted so identical metadata always encodes to identical bytes. Keys
/// outside the known set are carried in `extra` and written back on encode,
/// so decoding and re-encoding never drops metadata (a BTreeMap keeps their
/// order stable).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub draft: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl FrontMatter {
    /// whether every field is at its default (nothing to encode)
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}

/// a decoded document: metadata plus body text
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub front_matter: FrontMatter,
    pub body: String,
}

impl Document {
    /// create a document from front matter and body
    pub fn new(front_matter: FrontMatter, body: impl Into<String>) -> Self {
        Self {
            front_matter,
            body: body.into(),
        }
    }

    /// the empty document (blank metadata, empty body) used for placeholders
    pub fn empty() -> Self {
        Self::default()
    }
}
