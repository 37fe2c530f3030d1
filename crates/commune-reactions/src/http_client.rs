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
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, field::debug, instrument};

use crate::{
    config::RequestConfig,
    error::{ApiError, HttpError},
};

pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub(crate) struct HttpClient {
    pub(crate) inner: reqwest::Client,
    pub(crate) request_config: RequestConfig,
    next_request_id: Arc<AtomicU64>,
}

impl HttpClient {
    pub(crate) fn new(inner: reqwest::Client, request_config: RequestConfig) -> Self {
        HttpClient { inner, request_config, next_request_id: AtomicU64::new(0).into() }
    }

    fn get_request_id(&self) -> String {
        let request_id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
        format!("REQ-{request_id}")
    }

    async fn send_request_with_retries(
        &self,
        config: RequestConfig,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, HttpError> {
        use backoff::{future::retry, Error as RetryError, ExponentialBackoff};

        let backoff =
            ExponentialBackoff { max_elapsed_time: config.retry_timeout, ..Default::default() };
        let retry_count = AtomicU64::new(1);

        let send_request = || async {
            let stop = if let Some(retry_limit) = config.retry_limit {
                retry_count.fetch_add(1, Ordering::Relaxed) >= retry_limit
            } else {
                false
            };

            // Turn errors into permanent errors when the retry limit is reached
            let error_type: fn(HttpError) -> RetryError<HttpError> = if stop {
                RetryError::Permanent
            } else {
                |err: HttpError| {
                    let transient = match &err {
                        HttpError::Reqwest(_) => true,
                        HttpError::Api(api_error) => api_error.is_transient(),
                        _ => false,
                    };

                    if transient {
                        RetryError::Transient { err, retry_after: None }
                    } else {
                        RetryError::Permanent(err)
                    }
                }
            };

            let mut raw_request =
                reqwest::Request::try_from(clone_request(&request)).map_err(|e| {
                    // Only fails on invalid URLs, retrying won't change that.
                    RetryError::Permanent(HttpError::Reqwest(e))
                })?;
            *raw_request.timeout_mut() = Some(config.timeout);

            let response = self
                .inner
                .execute(raw_request)
                .await
                .map_err(|e| error_type(HttpError::Reqwest(e)))?;

            let response = response_to_http_response(response)
                .await
                .map_err(|e| error_type(HttpError::Reqwest(e)))?;

            let status_code = response.status();
            tracing::Span::current()
                .record("status", status_code.as_u16())
                .record("response_size", response.body().len());

            if !status_code.is_success() {
                let message = extract_error_message(response.body());
                return Err(error_type(HttpError::Api(ApiError {
                    status: status_code,
                    message,
                })));
            }

            Ok(response)
        };

        retry(backoff, send_request).await
    }

    #[instrument(
        skip(self, request, config),
        fields(config, method, path, request_id, status, response_size)
    )]
    pub(crate) async fn send(
        &self,
        request: http::Request<Bytes>,
        config: Option<RequestConfig>,
    ) -> Result<http::Response<Bytes>, HttpError> {
        let config = match config {
            Some(config) => config,
            None => self.request_config,
        };

        let request_id = self.get_request_id();
        let span = tracing::Span::current();

        // At this point in the code, the config isn't behind an Option anymore,
        // that's why we record it here, instead of in the #[instrument] macro.
        span.record("config", debug(config))
            .record("request_id", request_id)
            .record("method", debug(request.method()))
            .record("path", request.uri().path());

        debug!("Sending request");
        match self.send_request_with_retries(config, request).await {
            Ok(response) => {
                debug!("Got response");
                Ok(response)
            }
            Err(e) => {
                debug!("Error while sending request: {e:?}");
                Err(e)
            }
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct HttpSettings {
    pub(crate) user_agent: Option<String>,
    pub(crate) timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { user_agent: None, timeout: DEFAULT_REQUEST_TIMEOUT }
    }
}

impl HttpSettings {
    /// Build a client with the specified configuration.
    pub(crate) fn make_client(&self) -> Result<reqwest::Client, HttpError> {
        let user_agent = self.user_agent.clone().unwrap_or_else(|| "commune-reactions".to_owned());
        let http_client =
            reqwest::Client::builder().user_agent(user_agent).timeout(self.timeout).build()?;

        Ok(http_client)
    }
}

/// The shape of an error body sent by the server, when it sends one.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body).ok().map(|body| body.message)
}

// Clones all request parts except the extensions which can't be cloned.
// See also https://github.com/hyperium/http/issues/395
fn clone_request(request: &http::Request<Bytes>) -> http::Request<Bytes> {
    let mut builder = http::Request::builder()
        .version(request.version())
        .method(request.method())
        .uri(request.uri());
    *builder.headers_mut().expect("builder is valid") = request.headers().clone();
    builder.body(request.body().clone()).expect("builder is valid")
}

async fn response_to_http_response(
    mut response: reqwest::Response,
) -> Result<http::Response<Bytes>, reqwest::Error> {
    let status = response.status();

    let mut http_builder = http::Response::builder().status(status);
    let headers = http_builder.headers_mut().expect("Can't get the response builder headers");

    for (k, v) in response.headers_mut().drain() {
        if let Some(key) = k {
            headers.insert(key, v);
        }
    }

    let body = response.bytes().await?;

    Ok(http_builder.body(body).expect("Can't construct a response using the given body"))
}
