// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote directory client for the GitHub REST API.
//!
//! ```text
//! DirectoryClient
//!   list_repositories(org, prefix, marker)
//!     GET /orgs/{org}/repos?page=N&per_page=100&type=all   N = 1, 2, ... until []
//!       --> keep names starting with "{prefix}-" or containing marker
//!   repository_detail(full_name)
//!     GET /repos/{full_name} --> fork, parent, permissions.push
//!
//! every request: Bearer token, v3 Accept, User-Agent, timeout,
//!                RetryPolicy on transient failures
//! ```
//!
//! # Key Types
//!
//! | Type                   | Purpose                                 |
//! |------------------------|-----------------------------------------|
//! | `RepositoryDescriptor` | One entry of the organization listing   |
//! | `RepositoryDetail`     | Lineage and push permission of one repo |
//! | `DirectoryClient`      | Authenticated, retrying API client      |


use std::fmt;

use bon::Builder;
use futures_util::future::BoxFuture;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::types::GitHubConfig;
use crate::error::{FleetResult, NetworkError};
use crate::net::{RetryPolicy, build_client, transport_error};

const ACCEPT: &str = "application/vnd.github.v3+json";
const PAGE_SIZE: u32 = 100;

/// Nested `{ "full_name": ... }` object used for `parent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub full_name: String,
}

/// One repository from the organization listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct RepositoryDescriptor {
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub full_name: String,
    #[builder(into)]
    pub clone_url: String,
    #[serde(default = "default_branch")]
    #[builder(into, default = default_branch())]
    pub default_branch: String,
    #[serde(default)]
    #[builder(into)]
    pub created_at: Option<String>,
    #[serde(default)]
    #[builder(into)]
    pub updated_at: Option<String>,
    #[serde(default)]
    #[builder(default)]
    pub fork: bool,
    #[serde(default)]
    pub parent: Option<RepositoryRef>,
}

fn default_branch() -> String {
    "main".to_string()
}

impl RepositoryDescriptor {
    /// Full name of the fork parent, if the listing carried one.
    #[must_use]
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_ref().map(|p| p.full_name.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct Permissions {
    #[serde(default)]
    push: bool,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    parent: Option<RepositoryRef>,
    #[serde(default)]
    permissions: Option<Permissions>,
}

/// Per-repository metadata used for lineage and access checks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepositoryDetail {
    pub fork: bool,
    pub parent: Option<String>,
    pub can_push: bool,
}

impl From<DetailResponse> for RepositoryDetail {
    fn from(raw: DetailResponse) -> Self {
        Self {
            fork: raw.fork,
            parent: raw.parent.map(|p| p.full_name),
            can_push: raw.permissions.unwrap_or_default().push,
        }
    }
}

/// Whether a repository name belongs to the candidate set.
///
/// Case-insensitive: the name starts with `{prefix}-` or contains the
/// marker. An empty marker never matches.
#[must_use]
pub fn is_candidate(name: &str, prefix: &str, marker: &str) -> bool {
    let name = name.to_lowercase();
    is_marked(&name, marker) || name.starts_with(&format!("{}-", prefix.to_lowercase()))
}

fn is_marked(lowercase_name: &str, marker: &str) -> bool {
    !marker.is_empty() && lowercase_name.contains(&marker.to_lowercase())
}

/// Source of per-repository metadata.
///
/// [`DirectoryClient`] is the production implementation.
pub trait DetailSource: Send + Sync {
    fn repository_detail<'a>(
        &'a self,
        full_name: &'a str,
    ) -> BoxFuture<'a, FleetResult<RepositoryDetail>>;
}

/// Authenticated GitHub API client with retry.
#[derive(Clone)]
pub struct DirectoryClient {
    client: Client,
    api_url: String,
    token: String,
    retry: RetryPolicy,
}

impl fmt::Debug for DirectoryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryClient")
            .field("api_url", &self.api_url)
            .field("token", &"[hidden]")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl DirectoryClient {
    /// Create a client from the `[github]` settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &GitHubConfig, token: impl Into<String>) -> FleetResult<Self> {
        Ok(Self {
            client: build_client(config.timeout())?,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: token.into(),
            retry: RetryPolicy::new(config.api_attempts, config.api_backoff()),
        })
    }

    /// List the organization's candidate repositories.
    ///
    /// Pages through the listing until an empty page. With `first_marker_only`
    /// set, the first marker match ends the listing and is returned alone.
    ///
    /// # Errors
    ///
    /// Returns the page fetch error once retries are exhausted, or
    /// immediately for permanent failures.
    pub async fn list_repositories(
        &self,
        org: &str,
        prefix: &str,
        marker: &str,
        first_marker_only: bool,
    ) -> FleetResult<Vec<RepositoryDescriptor>> {
        let mut candidates = Vec::new();

        for page in 1_u32.. {
            let url = format!(
                "{}/orgs/{org}/repos?page={page}&per_page={PAGE_SIZE}&type=all",
                self.api_url
            );
            let repos: Vec<RepositoryDescriptor> =
                self.retry.run(&url, || self.get_json(&url)).await?;
            if repos.is_empty() {
                break;
            }
            debug!(org, page, count = repos.len(), "fetched repository page");

            for repo in repos {
                if first_marker_only && is_marked(&repo.name.to_lowercase(), marker) {
                    info!(repo = %repo.full_name, "marker repository found, stopping listing");
                    return Ok(vec![repo]);
                }
                if is_candidate(&repo.name, prefix, marker) {
                    candidates.push(repo);
                }
            }
        }

        info!(org, count = candidates.len(), "repository discovery finished");
        Ok(candidates)
    }

    /// Fetch fork lineage and push permission for one repository.
    ///
    /// # Errors
    ///
    /// Returns the fetch error once retries are exhausted, or immediately for
    /// permanent failures.
    pub async fn repository_detail(&self, full_name: &str) -> FleetResult<RepositoryDetail> {
        let url = format!("{}/repos/{full_name}", self.api_url);
        let raw: DetailResponse = self.retry.run(&url, || self.get_json(&url)).await?;
        Ok(raw.into())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> FleetResult<T> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", ACCEPT)
            .send()
            .await
            .map_err(|e| transport_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            let rate_limited = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.trim() == "0");
            return Err(NetworkError::HttpError {
                status: status.as_u16(),
                url: url.to_string(),
                rate_limited,
            }
            .into());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, url))?;
        serde_json::from_slice(&body).map_err(|e| {
            NetworkError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

impl DetailSource for DirectoryClient {
    fn repository_detail<'a>(
        &'a self,
        full_name: &'a str,
    ) -> BoxFuture<'a, FleetResult<RepositoryDetail>> {
        Box::pin(Self::repository_detail(self, full_name))
    }
}
