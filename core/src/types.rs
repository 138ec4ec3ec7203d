//! Domain DTOs for the character API.
//!
//! # Design
//! Only the fields the screen consumes are decoded; every other field of the
//! upstream record (tv shows, allies, url, ...) is ignored by serde. The
//! mock-server crate defines its own copy of the schema so integration tests
//! catch drift between the two.

use serde::Deserialize;

/// A single character record as returned by `GET /character`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Character {
    #[serde(rename = "_id")]
    pub id: u64,
    pub name: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    /// Film titles in upstream order. Absent or `null` decodes as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub films: Vec<String>,
}

impl Character {
    /// Identity key for list rows: the identifier, stringified.
    pub fn list_key(&self) -> String {
        self.id.to_string()
    }
}

/// The response envelope of `GET /character`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CharacterEnvelope {
    pub data: Vec<Character>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
