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

use std::{future::Future, sync::Arc};

use indexmap::IndexMap;
use tokio::sync::Mutex;
use tracing::warn;

use crate::{api::EmojiCatalogEntry, error::HttpResult};

/// The emoji name → glyph mapping, in the order the server ranks the catalog.
pub type EmojiCatalogMap = IndexMap<String, String>;

/// Write-once cache of the emoji catalog, shared by all consumers of a
/// [`Client`](crate::Client).
///
/// The mutex is held across the fetch so concurrent first calls coalesce into
/// a single network request; later callers observe the populated state and
/// return without any I/O. A failed fetch leaves the cache unpopulated, so the
/// next call retries instead of pinning an empty catalog for the whole
/// session.
#[derive(Clone, Debug, Default)]
pub(crate) struct EmojiCatalog {
    inner: Arc<Mutex<Option<Arc<EmojiCatalogMap>>>>,
}

impl EmojiCatalog {
    /// Return the cached catalog, or run `fetch` to populate it.
    ///
    /// The `fetch` future is only polled when the cache is still empty.
    pub(crate) async fn get_or_fetch<Fut>(&self, fetch: Fut) -> Arc<EmojiCatalogMap>
    where
        Fut: Future<Output = HttpResult<Vec<EmojiCatalogEntry>>>,
    {
        let mut populated = self.inner.lock().await;

        if let Some(map) = &*populated {
            return map.clone();
        }

        match fetch.await {
            Ok(entries) => {
                let map: Arc<EmojiCatalogMap> = Arc::new(
                    entries.into_iter().map(|entry| (entry.name, entry.emoji)).collect(),
                );
                *populated = Some(map.clone());
                map
            }
            Err(error) => {
                warn!("Failed to fetch the emoji catalog: {error}");
                Arc::new(EmojiCatalogMap::new())
            }
        }
    }
}
