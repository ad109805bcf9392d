use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, SharucoError};

/// Raw stored document: top-level attribute name to JSON value.
pub type Document = Map<String, Value>;

/// Named collections of the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Users,
    Snippets,
}

impl Collection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Snippets => "codes",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentRef {
    pub collection: Collection,
    pub id: String,
}

impl DocumentRef {
    pub fn new(collection: Collection, id: impl Into<String>) -> Self {
        Self {
            collection,
            id: id.into(),
        }
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self::new(Collection::Users, id)
    }

    pub fn snippet(id: impl Into<String>) -> Self {
        Self::new(Collection::Snippets, id)
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// Two mirrored list attributes kept in sync across two user documents.
///
/// `from` lives on the acting user, `to` on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationPair {
    pub from: &'static str,
    pub to: &'static str,
}

impl RelationPair {
    pub const FOLLOW: RelationPair = RelationPair::new("following", "followers");

    pub const fn new(from: &'static str, to: &'static str) -> Self {
        Self { from, to }
    }

    /// The same relation seen from the target's side.
    pub const fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

/// Opaque personal access token. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(****)")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub pseudo: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub followers: Vec<String>,
    #[serde(default)]
    pub following: Vec<String>,
    #[serde(default)]
    pub premium: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_access_token: Option<AccessToken>,
}

impl User {
    /// Fresh profile as created at first sign-in.
    pub fn new(pseudo: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            pseudo: pseudo.into(),
            display_name: None,
            photo_url: None,
            created_at,
            followers: Vec::new(),
            following: Vec::new(),
            premium: false,
            personal_access_token: None,
        }
    }

    pub fn is_following(&self, handle: &str) -> bool {
        self.following.iter().any(|id| id == handle)
    }

    pub fn is_followed_by(&self, handle: &str) -> bool {
        self.followers.iter().any(|id| id == handle)
    }

    pub fn from_document(document: Document) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(document))?)
    }

    pub fn to_document(&self) -> Result<Document> {
        into_document(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub id_author: String,
    pub language: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favoris: Vec<String>,
    #[serde(default)]
    pub is_private: bool,
    /// Comment payloads are not interpreted here.
    #[serde(default)]
    pub comments: Vec<Value>,
}

impl Snippet {
    pub fn is_favorite_of(&self, handle: &str) -> bool {
        self.favoris.iter().any(|id| id == handle)
    }

    pub fn from_document(document: Document) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(document))?)
    }

    pub fn to_document(&self) -> Result<Document> {
        into_document(self)
    }
}

fn into_document<T: Serialize>(value: &T) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(SharucoError::Other {
            message: format!("expected a JSON object, got {other}").into(),
        }),
    }
}

/// Reads a list-of-strings attribute. A missing attribute is an empty list.
pub fn string_list(document: &Document, attribute: &str, owner: &DocumentRef) -> Result<Vec<String>> {
    let invalid = || SharucoError::InvalidAttribute {
        document: owner.clone(),
        attribute: attribute.to_string(),
    };
    match document.get(attribute) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        Some(_) => Err(invalid()),
    }
}
