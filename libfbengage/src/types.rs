//! Core types for fbengage

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::extract::PostId;

/// Engagement actions the dispatcher knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Comment,
    React,
    Follow,
    Validate,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::React => "react",
            Self::Follow => "follow",
            Self::Validate => "validate",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Credential selected at startup; immutable for the whole session
#[derive(Debug, Clone)]
pub enum Credential {
    /// Graph API access token
    Token(String),
    /// Raw browser cookies: a `Cookie:` header string or an appstate JSON
    /// array, parsed by the web backend
    Cookies(String),
}

/// Reaction types accepted by the reactions endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Love,
    Haha,
    Wow,
    Sad,
    Angry,
}

impl Reaction {
    pub const ALL: [Reaction; 6] = [
        Reaction::Like,
        Reaction::Love,
        Reaction::Haha,
        Reaction::Wow,
        Reaction::Sad,
        Reaction::Angry,
    ];

    /// Wire form sent as the `type` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            Self::Love => "LOVE",
            Self::Haha => "HAHA",
            Self::Wow => "WOW",
            Self::Sad => "SAD",
            Self::Angry => "ANGRY",
        }
    }
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Reaction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LIKE" => Ok(Self::Like),
            "LOVE" => Ok(Self::Love),
            "HAHA" => Ok(Self::Haha),
            "WOW" => Ok(Self::Wow),
            "SAD" => Ok(Self::Sad),
            "ANGRY" => Ok(Self::Angry),
            other => Err(format!(
                "Unknown reaction '{}' (expected LIKE, LOVE, HAHA, WOW, SAD or ANGRY)",
                other
            )),
        }
    }
}

/// Account details returned by token validation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountInfo {
    pub id: String,
    pub name: Option<String>,
}

/// A post to act on: the canonical identifier, plus the original URL when
/// the input was one (the cookie backend fetches the page itself)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTarget {
    pub id: PostId,
    pub source_url: Option<String>,
}

impl PostTarget {
    pub fn new(id: PostId, source_url: Option<String>) -> Self {
        Self { id, source_url }
    }

    /// Canonical identifier string used for cooldown keys and API paths
    pub fn canonical_id(&self) -> String {
        self.id.canonical()
    }
}
