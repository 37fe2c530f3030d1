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

//! Synchronization of one target's reaction state with the server.
//!
//! A [`Reactions`] handle owns three independent slices of state — the user's
//! own reaction, the per-emoji counts and the server-ranked top reactions —
//! each exposed as an observable so UI layers can subscribe per slice and
//! tolerate any fetch arrival order.

use eyeball::{SharedObservable, Subscriber};
use futures_util::join;
use tracing::{instrument, warn};

use crate::{
    api::ReactionTarget,
    client::{Client, ReactionCounts},
    error::Result,
};

mod overflow;
mod sequence;

pub use self::overflow::{overflow_reactions, ReactionSummary};
use self::sequence::{SequenceGuard, SliceSequence};

/// The reaction state of one (user, target) pair.
///
/// Created with [`Client::reactions`]. Mutations are optimistic only after
/// the server confirmed them: `send`/`remove` update the local current
/// reaction on success and then re-fetch the aggregate counts, so counts are
/// always the server's numbers and never derived locally.
///
/// Operations may run concurrently; every state write carries the sequence
/// number of the request that produced it and writes from stale requests are
/// discarded.
#[derive(Debug)]
pub struct Reactions {
    client: Client,
    user_id: String,
    target: ReactionTarget,
    sequence: SequenceGuard,
    current: SharedObservable<Option<String>>,
    current_applied: SliceSequence,
    counts: SharedObservable<ReactionCounts>,
    counts_applied: SliceSequence,
    top: SharedObservable<Vec<ReactionSummary>>,
    top_applied: SliceSequence,
}

impl Reactions {
    pub(crate) fn new(client: Client, user_id: String, target: ReactionTarget) -> Self {
        Self {
            client,
            user_id,
            target,
            sequence: Default::default(),
            current: Default::default(),
            current_applied: Default::default(),
            counts: Default::default(),
            counts_applied: Default::default(),
            top: Default::default(),
            top_applied: Default::default(),
        }
    }

    /// The target this handle synchronizes.
    pub fn target(&self) -> &ReactionTarget {
        &self.target
    }

    /// The glyph of the user's active reaction, if any.
    pub fn current(&self) -> Option<String> {
        self.current.get()
    }

    /// The per-emoji counts of the target, as last reported by the server.
    pub fn counts(&self) -> ReactionCounts {
        self.counts.get()
    }

    /// The server-ranked top reactions of the target, at most three.
    pub fn top(&self) -> Vec<ReactionSummary> {
        self.top.get()
    }

    /// Subscribe to changes of the user's active reaction.
    pub fn subscribe_current(&self) -> Subscriber<Option<String>> {
        self.current.subscribe()
    }

    /// Subscribe to changes of the per-emoji counts.
    pub fn subscribe_counts(&self) -> Subscriber<ReactionCounts> {
        self.counts.subscribe()
    }

    /// Subscribe to changes of the top reactions.
    pub fn subscribe_top(&self) -> Subscriber<Vec<ReactionSummary>> {
        self.top.subscribe()
    }

    /// The overflow menu: catalog emojis that didn't make the top reactions,
    /// with their counts (0 when absent), in catalog order.
    pub async fn overflow(&self) -> Vec<ReactionSummary> {
        let catalog = self.client.emoji_catalog().await;
        overflow_reactions(&catalog, &self.counts.get(), &self.top.get())
    }

    /// Fetch all three state slices from the server concurrently.
    ///
    /// The fetches are independent: a failing one is logged and leaves its
    /// slice untouched while the others are still applied, so the view
    /// degrades per slice instead of failing as a whole.
    #[instrument(skip(self), fields(target_id = %self.target.target_id))]
    pub async fn refresh(&self) {
        join!(self.refresh_current(), self.refresh_counts(), self.refresh_top());
    }

    /// React with the emoji named `name`.
    ///
    /// Sending the reaction that is already active toggles it off, i.e. this
    /// routes to [`remove()`](Self::remove) and no upsert request is made.
    /// On success the local current reaction is updated and the counts are
    /// re-fetched; on failure local state is left untouched.
    #[instrument(skip(self), fields(target_id = %self.target.target_id))]
    pub async fn send(&self, name: &str) -> Result<()> {
        let glyph = self.client.emoji_catalog().await.get(name).cloned();

        // Re-sending the active reaction means toggling it off.
        if glyph.is_some() && glyph == self.current.get() {
            return self.remove().await;
        }

        let seq = self.sequence.issue();
        self.client.upsert_reaction(&self.user_id, &self.target, name).await?;

        if self.current_applied.try_apply(seq) {
            self.current.set(glyph);
        }

        self.refresh_counts().await;

        Ok(())
    }

    /// Remove the user's reaction from the target.
    ///
    /// Removing when no reaction is active succeeds as well; the server
    /// treats the delete as idempotent.
    #[instrument(skip(self), fields(target_id = %self.target.target_id))]
    pub async fn remove(&self) -> Result<()> {
        let seq = self.sequence.issue();
        self.client.remove_reaction(&self.user_id, &self.target).await?;

        if self.current_applied.try_apply(seq) {
            self.current.set(None);
        }

        self.refresh_counts().await;

        Ok(())
    }

    async fn refresh_current(&self) {
        let seq = self.sequence.issue();
        match self.client.user_reaction(&self.user_id, &self.target).await {
            Ok(current) => {
                if self.current_applied.try_apply(seq) {
                    self.current.set(current);
                }
            }
            Err(error) => {
                warn!("Failed to fetch the current user reaction: {error}");
            }
        }
    }

    async fn refresh_counts(&self) {
        let seq = self.sequence.issue();
        match self.client.reaction_counts(&self.target).await {
            Ok(counts) => {
                if self.counts_applied.try_apply(seq) {
                    self.counts.set(counts);
                }
            }
            Err(error) => {
                warn!("Failed to fetch the reaction counts: {error}");
            }
        }
    }

    async fn refresh_top(&self) {
        let seq = self.sequence.issue();
        match self.client.top_reactions(&self.target).await {
            Ok(entries) => {
                if self.top_applied.try_apply(seq) {
                    self.top.set(entries.into_iter().map(Into::into).collect());
                }
            }
            Err(error) => {
                warn!("Failed to fetch the top reactions: {error}");
            }
        }
    }
}
