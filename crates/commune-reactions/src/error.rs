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

//! Error conditions.

use http::StatusCode;
use reqwest::Error as ReqwestError;
use serde_json::Error as JsonError;
use thiserror::Error;

/// Result type of the commune-reactions SDK.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Result type of a pure HTTP request.
pub type HttpResult<T> = std::result::Result<T, HttpError>;

/// A non-success response from the Commune API.
///
/// Carries the status code and, when the server sent one, the human-readable
/// message extracted from the response body.
#[derive(Clone, Debug)]
pub struct ApiError {
    /// The HTTP status code of the response.
    pub status: StatusCode,
    /// The `message` field of the error body, if the server provided one.
    pub message: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "the server returned {}: {message}", self.status),
            None => write!(f, "the server returned {}", self.status),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Whether retrying the request may succeed.
    ///
    /// Server errors are considered transient, client errors are rejections
    /// that will not change on a retry.
    pub fn is_transient(&self) -> bool {
        self.status.is_server_error()
    }
}

/// An HTTP error, representing either a connection error or an error while
/// converting the raw HTTP response into an API response.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An error at the HTTP layer.
    #[error(transparent)]
    Reqwest(#[from] ReqwestError),

    /// Queried endpoint requires authentication but no access token is set.
    #[error("the queried endpoint requires authentication but no access token is set")]
    AuthenticationRequired,

    /// The server returned a non-success status code.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// An error while constructing the raw HTTP request.
    #[error(transparent)]
    IntoHttp(#[from] http::Error),

    /// An error while (de)serializing a request or response body.
    #[error(transparent)]
    Json(#[from] JsonError),
}

impl HttpError {
    /// If `self` is [`Api`](Self::Api), returns the API error.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            HttpError::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Internal representation of errors.
#[derive(Debug, Error)]
pub enum Error {
    /// An error occurred while sending an HTTP request.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The user ID or the reaction target identifier is empty, so no request
    /// can be attributed to a (user, target) pair.
    #[error("the user ID or the reaction target identifier is empty")]
    MissingIdentity,
}

impl Error {
    /// If `self` wraps an [`ApiError`], returns it.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Http(e) => e.as_api_error(),
            _ => None,
        }
    }
}
