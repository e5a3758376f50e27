//! Contents API client.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::auth::Auth;
use crate::endpoint::{ApiEndpoint, normalize_repo_name};
use crate::error::{Error, Result};
use crate::traits::ContentsApi;
use crate::tree::{FileTreeNode, TreeLimits};
use crate::types::{
    ApiCommitResponse, ApiContents, ContentEntry, DeleteFile, EntryKind, FileCommit, PutFile,
};

/// Everything needed to talk to one repository.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Preset platform or custom repository API URL.
    pub endpoint: ApiEndpoint,

    /// Token source.
    pub auth: Auth,

    /// Repository owner (user or organisation).
    pub owner: String,

    /// Repository name, without a `.git` suffix.
    pub repo: String,

    /// Branch to read from and commit to (platform default when unset).
    pub branch: Option<String>,

    /// Directory levels below the root that tree listings expand.
    pub max_tree_depth: usize,

    /// Upper bound on entries a single tree listing may visit.
    pub max_tree_entries: usize,

    /// Directory listings a tree walk keeps in flight at once.
    pub tree_concurrency: usize,
}

impl ClientConfig {
    /// Default for [`ClientConfig::max_tree_depth`].
    pub const DEFAULT_MAX_TREE_DEPTH: usize = 32;
    /// Default for [`ClientConfig::max_tree_entries`].
    pub const DEFAULT_MAX_TREE_ENTRIES: usize = 10_000;
    /// Default for [`ClientConfig::tree_concurrency`].
    pub const DEFAULT_TREE_CONCURRENCY: usize = 8;

    /// Create a config with default tree limits and no branch.
    ///
    /// A trailing `.git` on `repo` is stripped.
    pub fn new(
        endpoint: ApiEndpoint,
        auth: Auth,
        owner: impl Into<String>,
        repo: impl AsRef<str>,
    ) -> Self {
        Self {
            endpoint,
            auth,
            owner: owner.into().trim().to_string(),
            repo: normalize_repo_name(repo.as_ref()),
            branch: None,
            max_tree_depth: Self::DEFAULT_MAX_TREE_DEPTH,
            max_tree_entries: Self::DEFAULT_MAX_TREE_ENTRIES,
            tree_concurrency: Self::DEFAULT_TREE_CONCURRENCY,
        }
    }

    /// Target a specific branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

/// Client for file-level operations on a single repository.
pub struct RepositoryClient {
    client: Client,
    endpoint: ApiEndpoint,
    owner: String,
    repo: String,
    branch: Option<String>,
    tree_limits: TreeLimits,
    /// Token stored as `SecretString` for automatic zeroization on drop.
    token: SecretString,
}

impl RepositoryClient {
    /// Create a new client.
    ///
    /// # Errors
    /// Returns error if the token cannot be resolved or the HTTP client
    /// cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let token = config.auth.resolve()?;
        HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::InvalidToken)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("repofs"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            owner: config.owner,
            repo: config.repo,
            branch: config.branch,
            tree_limits: TreeLimits {
                max_depth: config.max_tree_depth,
                max_entries: config.max_tree_entries,
                concurrency: config.tree_concurrency.max(1),
            },
            token,
        })
    }

    /// Repository owner.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Branch the client targets, if any.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub(crate) const fn tree_limits(&self) -> &TreeLimits {
        &self.tree_limits
    }

    /// The effective repository API base URL.
    ///
    /// Resolved on every call, never cached.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBaseUrl`] when the endpoint is misconfigured.
    pub fn base_url(&self) -> Result<String> {
        self.endpoint.resolve(&self.owner, &self.repo)
    }

    /// Build `{base}/contents/{path}` with each path segment escaped.
    ///
    /// `with_ref` adds the branch as a `ref` query parameter for reads.
    fn contents_url(&self, path: &str, with_ref: bool) -> Result<String> {
        let base = self.base_url()?;
        let mut url = Url::parse(&base).map_err(|e| Error::InvalidBaseUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;

        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl {
                url: base.clone(),
                reason: "URL cannot be a base".into(),
            })?
            .pop_if_empty()
            .push("contents")
            .extend(path.split('/').filter(|s| !s.is_empty()));

        if with_ref && let Some(branch) = &self.branch {
            url.query_pairs_mut().append_pair("ref", branch);
        }

        Ok(url.into())
    }

    // === Request execution ===

    /// Issue one authenticated request and parse the JSON response.
    async fn send<T, B>(&self, method: Method, url: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        debug!(%method, url, "sending request");

        let mut request = self
            .client
            .request(method, url)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.token.expose_secret()),
            )
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request.
    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.send::<T, ()>(Method::GET, url, None).await
    }

    /// Make a PUT request.
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(&self, url: &str, body: &B) -> Result<T> {
        self.send(Method::PUT, url, Some(body)).await
    }

    /// Make a DELETE request carrying a JSON body.
    async fn delete_with<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        self.send(Method::DELETE, url, Some(body)).await
    }

    /// Handle API response.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            // 204 and friends carry no body
            let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
            return Ok(serde_json::from_slice(body)?);
        }

        let status_code = status.as_u16();

        match status_code {
            401 => Err(Error::AuthenticationFailed),
            403 if response
                .headers()
                .get("x-ratelimit-remaining")
                .is_some_and(|v| v == "0") =>
            {
                Err(Error::RateLimited)
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(Error::ApiError {
                    status: status_code,
                    message: api_message(&text),
                })
            }
        }
    }

    /// Raw pass-through request relative to the repository base URL.
    ///
    /// An empty `path` targets the base URL itself.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the request fails.
    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let base = self.base_url()?;
        let path = path.trim_start_matches('/');
        let url = if path.is_empty() {
            base
        } else {
            format!("{base}/{path}")
        };
        self.send(method, &url, body).await
    }

    // === File operations ===

    /// Fetch the entry at `path`, `None` when the platform reports 404.
    async fn lookup(&self, path: &str) -> Result<Option<ContentEntry>> {
        let url = self.contents_url(path, true)?;
        match self.get::<ApiContents>(&url).await {
            Ok(ApiContents::Entry(entry)) if entry.kind == EntryKind::File => Ok(Some(*entry)),
            Ok(_) => Err(Error::NotAFile(path.to_string())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Check whether a file exists.
    ///
    /// Returns the file's content hash, or `None` when it is absent. Any
    /// other failure is returned as an error rather than treated as absence.
    ///
    /// # Errors
    /// Returns error if the check itself fails.
    pub async fn exists(&self, path: &str) -> Result<Option<String>> {
        let path = normalize_path(path);
        match self.lookup(&path).await {
            Ok(Some(entry)) => Ok(Some(entry.sha)),
            Ok(None) => {
                debug!(%path, "file does not exist");
                Ok(None)
            }
            Err(e) => {
                warn!(%path, error = %e, "existence check failed");
                Err(e)
            }
        }
    }

    /// Create a file, or replace it when `overwrite` is set.
    ///
    /// When the file exists and `overwrite` is false no write is issued.
    ///
    /// # Errors
    /// Returns [`Error::FileExists`] on a disallowed overwrite, or any
    /// request error.
    pub async fn create_or_update(
        &self,
        path: &str,
        content: &str,
        overwrite: bool,
        message: Option<&str>,
    ) -> Result<FileCommit> {
        let path = normalize_path(path);
        let existing = self.exists(&path).await?;

        if existing.is_some() && !overwrite {
            warn!(%path, "file exists and overwrite is disabled");
            return Err(Error::FileExists(path));
        }

        let message = message.map_or_else(
            || {
                if existing.is_some() {
                    format!("Update {path}")
                } else {
                    format!("Create {path}")
                }
            },
            ToString::to_string,
        );
        let encoded = STANDARD.encode(content.as_bytes());

        let commit = self
            .write_encoded(&path, &encoded, existing.as_deref(), &message)
            .await?;
        info!(%path, commit = %commit.commit_sha, "file written");
        Ok(commit)
    }

    /// PUT already-encoded content; `sha` must be set to replace a file.
    async fn write_encoded(
        &self,
        path: &str,
        encoded: &str,
        sha: Option<&str>,
        message: &str,
    ) -> Result<FileCommit> {
        let url = self.contents_url(path, false)?;
        let body = PutFile {
            message,
            content: encoded,
            sha,
            branch: self.branch.as_deref(),
        };

        let response: ApiCommitResponse = self.put(&url, &body).await?;
        Ok(response.into_file_commit(path))
    }

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    /// Returns [`Error::FileNotFound`] if the file is absent, or a decode
    /// error if the content is not base64-encoded UTF-8.
    pub async fn read(&self, path: &str) -> Result<String> {
        let path = normalize_path(path);
        let entry = self
            .lookup(&path)
            .await?
            .ok_or_else(|| Error::FileNotFound(path.clone()))?;

        let encoded = self.encoded_content(&entry).await?;
        let bytes = STANDARD.decode(encoded)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Base64 content of a file entry with line breaks removed.
    ///
    /// Large files come back without inline content; those are fetched
    /// from their `download_url`.
    async fn encoded_content(&self, entry: &ContentEntry) -> Result<String> {
        match (&entry.content, entry.encoding.as_deref()) {
            (Some(content), Some("base64") | None) if !content.is_empty() || entry.size == 0 => {
                Ok(content.split_whitespace().collect())
            }
            _ => {
                let Some(download_url) = entry.extra.get("download_url").and_then(|v| v.as_str())
                else {
                    return Err(Error::ApiError {
                        status: 200,
                        message: format!("no content returned for {}", entry.path),
                    });
                };
                debug!(path = %entry.path, download_url, "downloading large file");
                let mut request = self.client.get(download_url);
                if self.is_trusted_download(download_url)? {
                    request = request.header(
                        AUTHORIZATION,
                        format!("Bearer {}", self.token.expose_secret()),
                    );
                } else {
                    debug!(download_url, "download host differs from API, sending no token");
                }
                let response = request.send().await?.error_for_status()?;
                Ok(STANDARD.encode(response.bytes().await?))
            }
        }
    }

    /// Whether the token may accompany a request to `download_url`: same
    /// origin as the API base, or the preset's raw file host over https.
    fn is_trusted_download(&self, download_url: &str) -> Result<bool> {
        let Ok(download) = Url::parse(download_url) else {
            return Ok(false);
        };
        let base = self.base_url()?;
        let base = Url::parse(&base).map_err(|e| Error::InvalidBaseUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;

        if download.origin() == base.origin() {
            return Ok(true);
        }
        Ok(match &self.endpoint {
            ApiEndpoint::Preset(platform) => {
                download.scheme() == "https"
                    && platform
                        .raw_host()
                        .is_some_and(|host| download.host_str() == Some(host))
            }
            ApiEndpoint::Custom(_) => false,
        })
    }

    /// Delete a file.
    ///
    /// # Errors
    /// Returns [`Error::FileNotFound`] if the file is absent, or any request
    /// error.
    pub async fn delete(&self, path: &str, message: Option<&str>) -> Result<FileCommit> {
        let path = normalize_path(path);
        let Some(sha) = self.exists(&path).await? else {
            warn!(%path, "cannot delete missing file");
            return Err(Error::FileNotFound(path));
        };

        let message = message.map_or_else(|| format!("Delete {path}"), ToString::to_string);
        let commit = self.delete_sha(&path, &sha, &message).await?;
        info!(%path, commit = %commit.commit_sha, "file deleted");
        Ok(commit)
    }

    async fn delete_sha(&self, path: &str, sha: &str, message: &str) -> Result<FileCommit> {
        let url = self.contents_url(path, false)?;
        let body = DeleteFile {
            message,
            sha,
            branch: self.branch.as_deref(),
        };

        let response: ApiCommitResponse = self.delete_with(&url, &body).await?;
        Ok(response.into_file_commit(path))
    }

    /// Move a file: create it at `to`, then delete it at `from`.
    ///
    /// The platform offers no atomic move. If deleting `from` fails, `from`
    /// is checked again before anything else is touched:
    ///
    /// - gone: the delete went through and the rename succeeds, carrying the
    ///   create commit;
    /// - unchanged: the new copy at `to` is deleted again and
    ///   [`Error::RenameIncomplete`] reports whether that rollback succeeded;
    /// - changed or unknown: `to` is kept and `rolled_back` is false.
    ///
    /// The returned commit is the delete, with `path` and `content_sha`
    /// describing the file at `to`.
    ///
    /// # Errors
    /// Returns [`Error::FileNotFound`] if `from` is absent, the platform's
    /// error if `to` already exists, or [`Error::RenameIncomplete`].
    pub async fn rename(&self, from: &str, to: &str, message: Option<&str>) -> Result<FileCommit> {
        let from = normalize_path(from);
        let to = normalize_path(to);
        let message = message.map_or_else(|| format!("Rename {from} to {to}"), ToString::to_string);

        let source = self
            .lookup(&from)
            .await?
            .ok_or_else(|| Error::FileNotFound(from.clone()))?;
        let encoded = self.encoded_content(&source).await?;

        let created = self.write_encoded(&to, &encoded, None, &message).await?;
        debug!(path = %to, commit = %created.commit_sha, "rename: new path written");

        match self.delete_sha(&from, &source.sha, &message).await {
            Ok(deleted) => {
                info!(%from, %to, commit = %deleted.commit_sha, "file renamed");
                Ok(FileCommit {
                    path: to,
                    content_sha: created.content_sha,
                    commit_sha: deleted.commit_sha,
                })
            }
            Err(e) => {
                warn!(%from, %to, error = %e, "rename: deleting old path failed");

                // A failed response does not prove the delete was not applied.
                match self.exists(&from).await {
                    Ok(None) => {
                        info!(%from, %to, "rename: old path is gone, delete was applied");
                        Ok(FileCommit {
                            path: to,
                            content_sha: created.content_sha,
                            commit_sha: created.commit_sha,
                        })
                    }
                    Ok(Some(sha)) if sha == source.sha => {
                        let rolled_back =
                            self.roll_back_rename(&to, created.content_sha.as_deref()).await;
                        if !rolled_back {
                            error!(
                                %from,
                                %to,
                                "rename: rollback failed, file now exists at both paths"
                            );
                        }
                        Err(Error::RenameIncomplete {
                            from,
                            to,
                            rolled_back,
                            source: Box::new(e),
                        })
                    }
                    state => {
                        error!(
                            %from,
                            %to,
                            old_path_changed = state.is_ok(),
                            "rename: old path state unknown, keeping new path"
                        );
                        Err(Error::RenameIncomplete {
                            from,
                            to,
                            rolled_back: false,
                            source: Box::new(e),
                        })
                    }
                }
            }
        }
    }

    /// Remove the copy written by an interrupted rename.
    async fn roll_back_rename(&self, to: &str, sha: Option<&str>) -> bool {
        let sha = match sha {
            Some(sha) => sha.to_string(),
            None => match self.exists(to).await {
                Ok(Some(sha)) => sha,
                _ => return false,
            },
        };

        self.delete_sha(to, &sha, &format!("Roll back rename to {to}"))
            .await
            .inspect_err(|e| warn!(path = to, error = %e, "rename rollback failed"))
            .is_ok()
    }

    /// List the entries of a directory.
    ///
    /// # Errors
    /// Returns [`Error::NotADirectory`] if `path` is a file.
    pub(crate) async fn list_dir(&self, path: &str) -> Result<Vec<ContentEntry>> {
        let url = self.contents_url(path, true)?;
        match self.get::<ApiContents>(&url).await? {
            ApiContents::Listing(entries) => Ok(entries),
            ApiContents::Entry(_) => Err(Error::NotADirectory(path.to_string())),
        }
    }
}

impl std::fmt::Debug for RepositoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryClient")
            .field("endpoint", &self.endpoint)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("token", &"[redacted]")
            .finish_non_exhaustive()
    }
}

/// Trim whitespace and surrounding slashes from a repository path.
pub(crate) fn normalize_path(path: &str) -> String {
    path.trim().trim_matches('/').to_string()
}

/// Pull the `message` field out of an error body, falling back to the text.
fn api_message(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| text.to_string())
}

// === Trait Implementation ===

impl ContentsApi for RepositoryClient {
    async fn exists(&self, path: &str) -> Result<Option<String>> {
        self.exists(path).await
    }

    async fn read(&self, path: &str) -> Result<String> {
        self.read(path).await
    }

    async fn create_or_update(
        &self,
        path: &str,
        content: &str,
        overwrite: bool,
        message: Option<&str>,
    ) -> Result<FileCommit> {
        self.create_or_update(path, content, overwrite, message)
            .await
    }

    async fn delete(&self, path: &str, message: Option<&str>) -> Result<FileCommit> {
        self.delete(path, message).await
    }

    async fn rename(&self, from: &str, to: &str, message: Option<&str>) -> Result<FileCommit> {
        self.rename(from, to, message).await
    }

    async fn tree(&self, root: Option<&str>) -> Result<Vec<FileTreeNode>> {
        self.tree(root).await
    }
}
