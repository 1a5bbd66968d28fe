use crate::core::{Result, Revision, SnapshotStore, StoredSnapshot};
use crate::utils::error::LedgerError;
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_repo_name, validate_url, Validate};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("grade-ledger/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct GitHubSettings {
    pub token: String,
    pub repo: String,
    pub path: String,
    pub api_base: String,
    pub branch: Option<String>,
}

// Keeps the token out of logs.
impl fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("token", &"***")
            .field("repo", &self.repo)
            .field("path", &self.path)
            .field("api_base", &self.api_base)
            .field("branch", &self.branch)
            .finish()
    }
}

impl Validate for GitHubSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("github.token", &self.token)?;
        validate_repo_name("github.repo", &self.repo)?;
        validate_path("store.path", &self.path)?;
        validate_url("github.api_base", &self.api_base)?;
        if let Some(branch) = &self.branch {
            validate_non_empty_string("github.branch", branch)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    content: CommittedFile,
}

#[derive(Debug, Deserialize)]
struct CommittedFile {
    sha: String,
}

/// Snapshot kept as a file in a GitHub repository, read and written through
/// the contents API. The blob sha is the revision.
#[derive(Debug, Clone)]
pub struct GitHubStore {
    client: Client,
    settings: GitHubSettings,
}

impl GitHubStore {
    pub fn new(settings: GitHubSettings) -> Result<Self> {
        settings.validate()?;
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, settings })
    }

    pub fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.repo,
            self.settings.path.trim_start_matches('/')
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.settings.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    fn rejected(&self, status: StatusCode, body: &str) -> LedgerError {
        LedgerError::StorageUnavailable {
            message: format!(
                "GitHub answered {} for {}: {}",
                status,
                self.location(),
                body.trim()
            ),
        }
    }
}

fn decode_content(response: &ContentsResponse) -> Result<Vec<u8>> {
    if response.encoding.as_deref() == Some("none") {
        return Err(LedgerError::StorageUnavailable {
            message: "snapshot is too large for the contents API".to_string(),
        });
    }

    let compact: String = response
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    BASE64
        .decode(compact)
        .map_err(|e| LedgerError::StorageUnavailable {
            message: format!("GitHub returned undecodable content: {}", e),
        })
}

#[async_trait]
impl SnapshotStore for GitHubStore {
    async fn load(&self) -> Result<Option<StoredSnapshot>> {
        let mut request = self.authorized(self.client.get(self.contents_url()));
        if let Some(branch) = &self.settings.branch {
            request = request.query(&[("ref", branch)]);
        }

        tracing::debug!("GET {}", self.contents_url());
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("GitHub response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.rejected(status, &body));
        }

        let contents: ContentsResponse = response.json().await?;
        let data = decode_content(&contents)?;
        Ok(Some(StoredSnapshot {
            data,
            revision: Revision::new(contents.sha),
        }))
    }

    async fn save(
        &self,
        data: &[u8],
        expected: Option<&Revision>,
        message: &str,
    ) -> Result<Revision> {
        let body = PutContentsRequest {
            message,
            content: BASE64.encode(data),
            sha: expected.map(Revision::as_str),
            branch: self.settings.branch.as_deref(),
        };

        tracing::debug!("PUT {} ({} bytes)", self.contents_url(), data.len());
        let response = self
            .authorized(self.client.put(self.contents_url()))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        tracing::debug!("GitHub response status: {}", status);

        match status {
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(LedgerError::Conflict {
                    path: self.location(),
                })
            }
            StatusCode::NOT_FOUND if expected.is_some() => Err(LedgerError::Conflict {
                path: self.location(),
            }),
            s if s.is_success() => {
                let committed: PutContentsResponse = response.json().await?;
                Ok(Revision::new(committed.content.sha))
            }
            s => {
                let body = response.text().await.unwrap_or_default();
                Err(self.rejected(s, &body))
            }
        }
    }

    fn location(&self) -> String {
        format!("github:{}/{}", self.settings.repo, self.settings.path)
    }
}
