// Copyright 2025 The Commune Project Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Wire types of the Commune reaction API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One entry of the emoji catalog, mapping a unique name to its glyph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiCatalogEntry {
    /// The unique name of the emoji, e.g. `like`.
    pub name: String,
    /// The rendered glyph, e.g. `👍`.
    pub emoji: String,
}

/// The kind of entity a reaction is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum TargetType {
    /// A post on a community feed.
    Post,
    /// A comment below a post.
    Comment,
}

impl TargetType {
    /// The wire representation of this target type, as used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Post => "POST",
            TargetType::Comment => "COMMENT",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The entity a reaction is attached to.
///
/// Supplied by the caller; the SDK never creates targets on its own.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReactionTarget {
    /// The backend identifier of the entity.
    pub target_id: String,
    /// The kind of the entity.
    pub target_type: TargetType,
}

impl ReactionTarget {
    /// Create a new target of the given type.
    pub fn new(target_id: impl Into<String>, target_type: TargetType) -> Self {
        Self { target_id: target_id.into(), target_type }
    }

    /// Create a target referring to a post.
    pub fn post(target_id: impl Into<String>) -> Self {
        Self::new(target_id, TargetType::Post)
    }

    /// Create a target referring to a comment.
    pub fn comment(target_id: impl Into<String>) -> Self {
        Self::new(target_id, TargetType::Comment)
    }
}

/// One entry of the server-ranked top reactions of a target.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopReactionEntry {
    /// The emoji this entry ranks.
    pub reaction_type: EmojiCatalogEntry,
    /// How many users reacted with it.
    pub count: u64,
}

/// Body of the requests identifying a (user, target) pair.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserTargetBody<'a> {
    pub user_id: &'a str,
    pub target_id: &'a str,
    pub target_type_code: TargetType,
}

/// Body of the reaction upsert request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpsertReactionBody<'a> {
    pub user_id: &'a str,
    pub target_id: &'a str,
    pub target_type_code: TargetType,
    pub emoji_name: &'a str,
}

/// Response of the current-user-reaction request.
#[derive(Debug, Deserialize)]
pub(crate) struct UserReactionResponse {
    pub emoji: String,
}
