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

use crate::{api::TopReactionEntry, catalog::EmojiCatalogMap, client::ReactionCounts};

/// One displayable reaction: name, glyph and how many users chose it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReactionSummary {
    /// The unique name of the emoji.
    pub name: String,
    /// The rendered glyph.
    pub emoji: String,
    /// How many users reacted with it.
    pub count: u64,
}

impl From<TopReactionEntry> for ReactionSummary {
    fn from(entry: TopReactionEntry) -> Self {
        Self {
            name: entry.reaction_type.name,
            emoji: entry.reaction_type.emoji,
            count: entry.count,
        }
    }
}

/// Compute the overflow menu of a reaction picker: every catalog emoji that
/// didn't make it into the top reactions, paired with its count (0 when the
/// target has no such reactions).
///
/// Pure derivation; the result preserves catalog order.
pub fn overflow_reactions(
    catalog: &EmojiCatalogMap,
    counts: &ReactionCounts,
    top: &[ReactionSummary],
) -> Vec<ReactionSummary> {
    catalog
        .iter()
        .filter(|(name, _)| !top.iter().any(|entry| entry.name == **name))
        .map(|(name, emoji)| ReactionSummary {
            name: name.clone(),
            emoji: emoji.clone(),
            count: counts.get(name).copied().unwrap_or(0),
        })
        .collect()
}
