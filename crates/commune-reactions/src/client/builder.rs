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

use thiserror::Error;
use url::Url;

use super::Client;
use crate::{
    config::RequestConfig,
    error::HttpError,
    http_client::{HttpClient, HttpSettings},
};

/// Builder that allows creating and configuring various parts of a
/// [`Client`].
///
/// # Examples
///
/// ```
/// use commune_reactions::{config::RequestConfig, Client};
///
/// let client = Client::builder()
///     .base_url("https://commune.example.org")
///     .access_token("secret-token")
///     .request_config(RequestConfig::short_retry())
///     .build()?;
/// # anyhow::Ok(())
/// ```
#[must_use]
#[derive(Clone, Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    access_token: Option<String>,
    user_agent: Option<String>,
    http_client: Option<reqwest::Client>,
    request_config: RequestConfig,
}

impl ClientBuilder {
    pub(crate) fn new() -> Self {
        Self {
            base_url: None,
            access_token: None,
            user_agent: None,
            http_client: None,
            request_config: Default::default(),
        }
    }

    /// Set the URL of the backend to connect to.
    ///
    /// This method is mandatory.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the bearer token attached to every request.
    ///
    /// Without a token every request fails with
    /// [`HttpError::AuthenticationRequired`] before touching the network. The
    /// token can also be set later with
    /// [`Client::set_access_token`].
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set a custom HTTP user agent for the client.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the default timeout and retry behavior for requests.
    pub fn request_config(mut self, request_config: RequestConfig) -> Self {
        self.request_config = request_config;
        self
    }

    /// Use a pre-configured [`reqwest::Client`].
    ///
    /// Note that this ignores [`user_agent()`][Self::user_agent] — configure
    /// it on the client yourself if you want one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Create a [`Client`] with the options set on this builder.
    pub fn build(self) -> Result<Client, ClientBuildError> {
        let base_url = self.base_url.ok_or(ClientBuildError::MissingBaseUrl)?;
        let mut base_url = Url::parse(&base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::InvalidBaseUrl);
        }

        // Endpoint paths are joined onto the base URL, which only works when
        // its path ends in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let inner = match self.http_client {
            Some(client) => client,
            None => HttpSettings {
                user_agent: self.user_agent,
                timeout: self.request_config.timeout,
            }
            .make_client()?,
        };

        let http_client = HttpClient::new(inner, self.request_config);

        Ok(Client::new(base_url, http_client, self.access_token))
    }
}

/// Errors that can happen when building a [`Client`].
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// No base URL was configured.
    #[error("no base URL was configured")]
    MissingBaseUrl,

    /// The supplied base URL can't serve as a base for endpoint paths.
    #[error("the supplied base URL can't serve as a base for endpoint paths")]
    InvalidBaseUrl,

    /// An error encountered when trying to parse the base URL.
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// An error encountered when constructing the HTTP client.
    #[error(transparent)]
    Http(#[from] HttpError),
}
