//! Talking to GitHub: creating releases, uploading assets and pushing files

use axoasset::LocalAsset;
use base64::Engine;
use camino::Utf8Path;
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use shipwright_schema::{CommitAuthor, Repo};
use tracing::{debug, info};

use crate::errors::{ShipError, ShipResult};

/// Default GitHub API root
pub const GITHUB_API_URL: &str = "https://api.github.com";
/// Default GitHub asset upload root
pub const GITHUB_UPLOAD_URL: &str = "https://uploads.github.com";

/// A release to create or update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseRequest {
    /// Tag the release is for
    pub tag_name: String,
    /// Title of the release
    pub name: String,
    /// Markdown body
    pub body: String,
    /// Whether it's a draft
    pub draft: bool,
    /// Whether it's a prerelease
    pub prerelease: bool,
}

/// A file to create or update in a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate<'a> {
    /// Path of the file in the repository
    pub path: &'a str,
    /// New contents
    pub content: &'a str,
    /// Commit message
    pub message: &'a str,
    /// Who the commit is attributed to
    pub author: &'a CommitAuthor,
}

/// The operations the publishing stages need
pub trait Client: Sync {
    /// Create the release for `release.tag_name`, or update it if it exists, returning its id
    fn create_release(&self, repo: &Repo, release: &ReleaseRequest) -> ShipResult<u64>;

    /// Attach a file to a release
    fn upload(&self, repo: &Repo, release_id: u64, name: &str, path: &Utf8Path) -> ShipResult<()>;

    /// Create a file in a repository, or update it if it exists
    fn create_file(&self, repo: &Repo, file: &FileUpdate<'_>) -> ShipResult<()>;
}

/// [`Client`][] over the GitHub REST API
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: HttpClient,
    token: String,
    api_url: String,
    upload_url: String,
}

#[derive(Deserialize)]
struct IdResponse {
    id: u64,
}

#[derive(Deserialize)]
struct ContentResponse {
    sha: String,
}

#[derive(Serialize)]
struct ContentRequest<'a> {
    message: &'a str,
    content: String,
    committer: &'a CommitAuthor,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

impl GithubClient {
    /// Make a client authenticated with `token`
    pub fn new(token: impl Into<String>) -> ShipResult<Self> {
        Ok(Self {
            http: HttpClient::builder().build()?,
            token: token.into(),
            api_url: GITHUB_API_URL.to_owned(),
            upload_url: GITHUB_UPLOAD_URL.to_owned(),
        })
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(USER_AGENT, "shipwright")
            .header(ACCEPT, "application/vnd.github+json")
    }

    /// GET something that might not be there
    fn get_optional(&self, url: &str) -> ShipResult<Option<Response>> {
        debug!("GET {url}");
        let response = self.request(self.http.get(url)).send()?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check(url, response).map(Some)
    }
}

/// Turn a non-success response into an error
fn check(url: &str, response: Response) -> ShipResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ShipError::GithubApi {
        status: status.as_u16(),
        url: url.to_owned(),
        body,
    })
}

impl Client for GithubClient {
    fn create_release(&self, repo: &Repo, release: &ReleaseRequest) -> ShipResult<u64> {
        let existing_url = format!(
            "{}/repos/{repo}/releases/tags/{}",
            self.api_url, release.tag_name
        );
        let response = match self.get_optional(&existing_url)? {
            Some(existing) => {
                let id = existing.json::<IdResponse>()?.id;
                let url = format!("{}/repos/{repo}/releases/{id}", self.api_url);
                info!("updating existing release {}", release.tag_name);
                let response = self.request(self.http.patch(&url)).json(release).send()?;
                check(&url, response)?
            }
            None => {
                let url = format!("{}/repos/{repo}/releases", self.api_url);
                info!("creating release {}", release.tag_name);
                let response = self.request(self.http.post(&url)).json(release).send()?;
                check(&url, response)?
            }
        };
        Ok(response.json::<IdResponse>()?.id)
    }

    fn upload(&self, repo: &Repo, release_id: u64, name: &str, path: &Utf8Path) -> ShipResult<()> {
        let url = format!(
            "{}/repos/{repo}/releases/{release_id}/assets",
            self.upload_url
        );
        let bytes = LocalAsset::load_bytes(path)?;
        info!("uploading {name}");
        let response = self
            .request(self.http.post(&url))
            .query(&[("name", name)])
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()?;
        check(&url, response)?;
        Ok(())
    }

    fn create_file(&self, repo: &Repo, file: &FileUpdate<'_>) -> ShipResult<()> {
        let url = format!("{}/repos/{repo}/contents/{}", self.api_url, file.path);
        let sha = match self.get_optional(&url)? {
            Some(existing) => Some(existing.json::<ContentResponse>()?.sha),
            None => None,
        };
        let request = ContentRequest {
            message: file.message,
            content: base64::engine::general_purpose::STANDARD.encode(file.content),
            committer: file.author,
            sha,
        };
        let response = self.request(self.http.put(&url)).json(&request).send()?;
        check(&url, response)?;
        Ok(())
    }
}
