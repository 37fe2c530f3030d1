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
#![doc = include_str!("../README.md")]
#![warn(missing_debug_implementations, missing_docs)]

pub use reqwest;

pub mod api;
mod catalog;
mod client;
pub mod config;
mod error;
mod http_client;
pub mod reactions;

pub use catalog::EmojiCatalogMap;
pub use client::{Client, ClientBuildError, ClientBuilder, ReactionCounts};
pub use error::{ApiError, Error, HttpError, HttpResult, Result};
pub use reactions::{overflow_reactions, ReactionSummary, Reactions};
