//! GitHub-compatible contents API over libcurl.
//!
//! `GET  {api}/repos/{owner}/{repo}/contents/{path}?ref={branch}` for the marker,
//! `PUT  {api}/repos/{owner}/{repo}/contents/{path}` with a JSON body for the write.

use anyhow::Result;
use std::time::Duration;
use url::Url;

use super::parse::{parse_revision, parse_write_response};
use super::{CommitConfirmation, CommitError, CommitRequest, ContentApi, RevisionMarker};
use crate::config::HttpConfig;
use crate::repo_path::RepoPath;
use crate::session::Credentials;

const ACCEPT: &str = "application/vnd.github+json";

/// Content API client for one repository.
#[derive(Clone)]
pub struct GithubContentApi {
    base: Url,
    credentials: Credentials,
    http: HttpConfig,
}

impl std::fmt::Debug for GithubContentApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubContentApi")
            .field("base", &self.base.as_str())
            .field("owner", &self.credentials.owner)
            .field("repo", &self.credentials.repo)
            .finish()
    }
}

impl GithubContentApi {
    pub fn new(api_base: &str, credentials: Credentials, http: HttpConfig) -> Result<Self> {
        let base = Url::parse(api_base)
            .map_err(|e| anyhow::anyhow!("invalid api_base {:?}: {}", api_base, e))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("invalid api_base {:?}: not a hierarchical URL", api_base);
        }
        Ok(Self {
            base,
            credentials,
            http,
        })
    }

    /// URL of `path` in the contents endpoint; segments are percent-encoded.
    pub fn contents_url(&self, path: &RepoPath) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend([
                    "repos",
                    self.credentials.owner.as_str(),
                    self.credentials.repo.as_str(),
                    "contents",
                ])
                .extend(path.segments());
        }
        url
    }

    fn headers(&self, json_body: bool) -> Result<curl::easy::List, curl::Error> {
        let mut list = curl::easy::List::new();
        list.append(&format!("Authorization: token {}", self.credentials.token))?;
        list.append(&format!("Accept: {}", ACCEPT))?;
        list.append(&format!("User-Agent: imgedit/{}", env!("CARGO_PKG_VERSION")))?;
        if json_body {
            list.append("Content-Type: application/json")?;
        }
        Ok(list)
    }

    /// Performs one request and returns (status, body).
    fn perform(
        &self,
        op: &'static str,
        url: &Url,
        body: Option<&[u8]>,
    ) -> Result<(u32, Vec<u8>), CommitError> {
        let net = CommitError::network(op);
        let mut response = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str()).map_err(&net)?;
        easy.follow_location(true).map_err(&net)?;
        easy.connect_timeout(Duration::from_secs(self.http.connect_timeout_secs))
            .map_err(&net)?;
        easy.timeout(Duration::from_secs(self.http.timeout_secs))
            .map_err(&net)?;
        easy.http_headers(self.headers(body.is_some()).map_err(&net)?)
            .map_err(&net)?;
        if let Some(body) = body {
            easy.custom_request("PUT").map_err(&net)?;
            easy.post_fields_copy(body).map_err(&net)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    response.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(&net)?;
            transfer.perform().map_err(&net)?;
        }

        let code = easy.response_code().map_err(&net)?;
        Ok((code, response))
    }
}

impl ContentApi for GithubContentApi {
    fn read_revision(
        &self,
        path: &RepoPath,
        branch: &str,
    ) -> Result<Option<RevisionMarker>, CommitError> {
        let mut url = self.contents_url(path);
        url.query_pairs_mut().append_pair("ref", branch);

        let (code, body) = self.perform("read", &url, None)?;
        match code {
            200..=299 => {
                let marker = parse_revision(&body);
                if marker.is_none() {
                    tracing::warn!(path = %path, "read returned no sha; treating as new file");
                }
                Ok(marker)
            }
            404 => {
                tracing::debug!(path = %path, "file not found on {}; creating", branch);
                Ok(None)
            }
            _ => {
                tracing::warn!(
                    path = %path,
                    status = code,
                    "revision read failed: {}; continuing without marker",
                    String::from_utf8_lossy(&body).trim()
                );
                Ok(None)
            }
        }
    }

    fn write_content(&self, request: &CommitRequest) -> Result<CommitConfirmation, CommitError> {
        let url = self.contents_url(&request.path);
        let body = request.to_json()?;

        let (code, response) = self.perform("write", &url, Some(&body))?;
        tracing::debug!(path = %request.path, status = code, "write response received");
        parse_write_response(code, &response)
    }
}
