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

use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, RwLock as StdRwLock},
};

use bytes::Bytes;
use http::{header, Method, StatusCode};
use url::Url;

use crate::{
    api::{
        EmojiCatalogEntry, ReactionTarget, TopReactionEntry, UpsertReactionBody, UserReactionResponse,
        UserTargetBody,
    },
    catalog::{EmojiCatalog, EmojiCatalogMap},
    error::{Error, HttpError, HttpResult, Result},
    http_client::HttpClient,
    reactions::Reactions,
};

mod builder;

pub use builder::{ClientBuildError, ClientBuilder};

/// Per-emoji reaction counts of one target, as reported by the server.
pub type ReactionCounts = BTreeMap<String, u64>;

/// An async client to interact with the reaction API of a Commune backend.
#[derive(Clone)]
pub struct Client {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    /// The URL of the backend to connect to.
    base_url: Url,
    /// The underlying HTTP client.
    http_client: HttpClient,
    /// The bearer token attached to every request.
    ///
    /// Token acquisition is the embedding application's business; the client
    /// only stores whatever it was handed last.
    access_token: StdRwLock<Option<String>>,
    /// Write-once cache of the emoji catalog.
    emoji_catalog: EmojiCatalog,
}

impl fmt::Debug for Client {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(fmt, "Client")
    }
}

impl Client {
    pub(crate) fn new(base_url: Url, http_client: HttpClient, access_token: Option<String>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                base_url,
                http_client,
                access_token: StdRwLock::new(access_token),
                emoji_catalog: EmojiCatalog::default(),
            }),
        }
    }

    /// Create a new [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The URL of the backend this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The access token attached to outgoing requests, if any.
    pub fn access_token(&self) -> Option<String> {
        self.inner.access_token.read().expect("lock is not poisoned").clone()
    }

    /// Replace the access token attached to outgoing requests.
    ///
    /// Passing `None` suppresses all further network activity until a new
    /// token is set.
    pub fn set_access_token(&self, token: Option<String>) {
        *self.inner.access_token.write().expect("lock is not poisoned") = token;
    }

    /// Create a [`Reactions`] handle synchronizing the given user's reaction
    /// state for the given target.
    ///
    /// Returns [`Error::MissingIdentity`] when the user or target identifier
    /// is empty, since no request could be attributed then.
    pub fn reactions(&self, user_id: impl Into<String>, target: ReactionTarget) -> Result<Reactions> {
        let user_id = user_id.into();
        if user_id.is_empty() || target.target_id.is_empty() {
            return Err(Error::MissingIdentity);
        }

        Ok(Reactions::new(self.clone(), user_id, target))
    }

    /// The emoji name → glyph catalog.
    ///
    /// Fetched from the server at most once per client; concurrent first
    /// calls share a single request. When the fetch fails an empty map is
    /// returned and a later call retries.
    pub async fn emoji_catalog(&self) -> Arc<EmojiCatalogMap> {
        self.inner.emoji_catalog.get_or_fetch(self.fetch_emoji_catalog()).await
    }

    async fn fetch_emoji_catalog(&self) -> HttpResult<Vec<EmojiCatalogEntry>> {
        let request = self.request(Method::GET, self.endpoint("reactions/emoji-main-list"), None)?;
        let response = self.send_request(request).await?;

        Ok(serde_json::from_slice(response.body())?)
    }

    /// The glyph of the reaction `user_id` currently has on `target`, if any.
    pub async fn user_reaction(
        &self,
        user_id: &str,
        target: &ReactionTarget,
    ) -> HttpResult<Option<String>> {
        let body = serde_json::to_vec(&UserTargetBody {
            user_id,
            target_id: &target.target_id,
            target_type_code: target.target_type,
        })?;
        let request = self.request(Method::POST, self.endpoint("reactions/user"), Some(body))?;
        let response = self.send_request(request).await?;

        // The server answers 204 when the user has no reaction on the target.
        if response.status() == StatusCode::NO_CONTENT || response.body().is_empty() {
            return Ok(None);
        }

        let response: UserReactionResponse = serde_json::from_slice(response.body())?;
        Ok(Some(response.emoji))
    }

    /// The per-emoji reaction counts of `target`.
    pub async fn reaction_counts(&self, target: &ReactionTarget) -> HttpResult<ReactionCounts> {
        let mut url = self.endpoint("reactions/count");
        url.query_pairs_mut()
            .append_pair("targetId", &target.target_id)
            .append_pair("targetTypeCode", target.target_type.as_str());

        let request = self.request(Method::GET, url, None)?;
        let response = self.send_request(request).await?;

        Ok(serde_json::from_slice(response.body())?)
    }

    /// The server-ranked top reactions of `target`, at most three entries.
    pub async fn top_reactions(&self, target: &ReactionTarget) -> HttpResult<Vec<TopReactionEntry>> {
        let mut url = self.endpoint("reactions/top3");
        url.query_pairs_mut()
            .append_pair("targetId", &target.target_id)
            .append_pair("targetTypeCode", target.target_type.as_str());

        let request = self.request(Method::GET, url, None)?;
        let response = self.send_request(request).await?;

        Ok(serde_json::from_slice(response.body())?)
    }

    /// Set `user_id`'s reaction on `target` to the emoji named `emoji_name`,
    /// replacing a previous reaction if there was one.
    pub async fn upsert_reaction(
        &self,
        user_id: &str,
        target: &ReactionTarget,
        emoji_name: &str,
    ) -> HttpResult<()> {
        let body = serde_json::to_vec(&UpsertReactionBody {
            user_id,
            target_id: &target.target_id,
            target_type_code: target.target_type,
            emoji_name,
        })?;
        let request = self.request(Method::POST, self.endpoint("reactions/by-name"), Some(body))?;
        self.send_request(request).await?;

        Ok(())
    }

    /// Remove `user_id`'s reaction from `target`.
    ///
    /// Removing a reaction that doesn't exist is not an error.
    pub async fn remove_reaction(&self, user_id: &str, target: &ReactionTarget) -> HttpResult<()> {
        let body = serde_json::to_vec(&UserTargetBody {
            user_id,
            target_id: &target.target_id,
            target_type_code: target.target_type,
        })?;
        let request = self.request(Method::DELETE, self.endpoint("reactions/by-name"), Some(body))?;
        self.send_request(request).await?;

        Ok(())
    }

    fn endpoint(&self, path: &str) -> Url {
        // The base URL is normalized to end in `/` by the builder and the
        // paths are relative, so joining can't fail.
        self.inner.base_url.join(path).expect("endpoint path is valid")
    }

    fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> HttpResult<http::Request<Bytes>> {
        let access_token = self.access_token().ok_or(HttpError::AuthenticationRequired)?;

        let mut builder = http::Request::builder()
            .method(method)
            .uri(url.as_str())
            .header(header::AUTHORIZATION, format!("Bearer {access_token}"));
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }

        Ok(builder.body(body.map(Bytes::from).unwrap_or_default())?)
    }

    async fn send_request(&self, request: http::Request<Bytes>) -> HttpResult<http::Response<Bytes>> {
        self.inner.http_client.send(request, None).await
    }
}
