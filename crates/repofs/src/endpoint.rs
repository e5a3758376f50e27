//! Hosting platform presets and base URL resolution.

use std::fmt;

use reqwest::Url;

use crate::error::{Error, Result};

const OWNER_PLACEHOLDER: &str = ":owner";
const REPO_PLACEHOLDER: &str = ":repo";

/// A hosting platform with a built-in contents API template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// github.com
    GitHub,
    /// gitea.com
    Gitea,
    /// codeberg.org
    Codeberg,
    /// gitee.com
    Gitee,
}

impl Platform {
    /// Every preset, in lookup order.
    pub const ALL: [Self; 4] = [Self::GitHub, Self::Gitea, Self::Codeberg, Self::Gitee];

    /// Repository API template with `:owner` and `:repo` placeholders.
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::GitHub => "https://api.github.com/repos/:owner/:repo",
            Self::Gitea => "https://gitea.com/api/v1/repos/:owner/:repo",
            Self::Codeberg => "https://codeberg.org/api/v1/repos/:owner/:repo",
            Self::Gitee => "https://gitee.com/api/v5/repos/:owner/:repo",
        }
    }

    /// Short lowercase name accepted by [`ApiEndpoint::parse`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::Gitea => "gitea",
            Self::Codeberg => "codeberg",
            Self::Gitee => "gitee",
        }
    }

    /// Host serving raw file downloads when it differs from the API host.
    #[must_use]
    pub const fn raw_host(self) -> Option<&'static str> {
        match self {
            Self::GitHub => Some("raw.githubusercontent.com"),
            Self::Gitea | Self::Codeberg | Self::Gitee => None,
        }
    }

    fn lookup(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(value) || p.template() == value)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the contents API lives: a known preset or a fully custom URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiEndpoint {
    /// Built-in template; owner and repo are substituted on resolution.
    Preset(Platform),
    /// Already-resolved repository API URL, used verbatim.
    Custom(String),
}

impl ApiEndpoint {
    /// Interpret a template-or-URL string.
    ///
    /// A preset name (`github`, `gitea`, `codeberg`, `gitee`) or the literal
    /// template of a preset selects that preset. Anything else is treated as
    /// a custom, pre-resolved URL.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        Platform::lookup(value).map_or_else(|| Self::Custom(value.trim().to_string()), Self::Preset)
    }

    /// Resolve the repository base URL for `owner`/`repo`.
    ///
    /// Computed fresh on every call.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBaseUrl`] if the result is not an absolute
    /// http(s) URL.
    pub fn resolve(&self, owner: &str, repo: &str) -> Result<String> {
        let raw = match self {
            Self::Preset(platform) => platform
                .template()
                .replace(OWNER_PLACEHOLDER, owner)
                .replace(REPO_PLACEHOLDER, repo),
            Self::Custom(url) => url.clone(),
        };
        let resolved = raw.trim_end_matches('/').to_string();

        let invalid = |reason: String| {
            tracing::warn!(url = %resolved, %reason, "cannot resolve repository base URL");
            Error::InvalidBaseUrl {
                url: resolved.clone(),
                reason,
            }
        };

        let parsed = Url::parse(&resolved).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }
        if matches!(self, Self::Preset(_)) && (owner.is_empty() || repo.is_empty()) {
            return Err(invalid("owner and repository must not be empty".into()));
        }

        Ok(resolved)
    }
}

impl Default for ApiEndpoint {
    fn default() -> Self {
        Self::Preset(Platform::GitHub)
    }
}

impl From<Platform> for ApiEndpoint {
    fn from(platform: Platform) -> Self {
        Self::Preset(platform)
    }
}

/// Strip a trailing `.git` from a repository name.
pub(crate) fn normalize_repo_name(repo: &str) -> String {
    let repo = repo.trim();
    repo.strip_suffix(".git").unwrap_or(repo).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_resolution() {
        let cases = [
            (Platform::GitHub, "https://api.github.com/repos/octo/notes"),
            (Platform::Gitea, "https://gitea.com/api/v1/repos/octo/notes"),
            (
                Platform::Codeberg,
                "https://codeberg.org/api/v1/repos/octo/notes",
            ),
            (Platform::Gitee, "https://gitee.com/api/v5/repos/octo/notes"),
        ];

        for (platform, expected) in cases {
            let url = ApiEndpoint::Preset(platform)
                .resolve("octo", "notes")
                .unwrap();
            assert_eq!(url, expected, "platform {platform}");
        }
    }

    #[test]
    fn test_parse_by_name_and_template() {
        assert_eq!(
            ApiEndpoint::parse("GitHub"),
            ApiEndpoint::Preset(Platform::GitHub)
        );
        assert_eq!(
            ApiEndpoint::parse("https://codeberg.org/api/v1/repos/:owner/:repo"),
            ApiEndpoint::Preset(Platform::Codeberg)
        );
    }

    #[test]
    fn test_custom_url_passes_through() {
        let custom = "https://git.example.com/api/v3/repos/team/project";
        let endpoint = ApiEndpoint::parse(custom);
        assert_eq!(endpoint, ApiEndpoint::Custom(custom.into()));
        // owner/repo are ignored for custom URLs
        assert_eq!(endpoint.resolve("other", "thing").unwrap(), custom);
    }

    #[test]
    fn test_custom_url_trailing_slash_trimmed() {
        let endpoint = ApiEndpoint::parse("http://localhost:8080/repos/a/b/");
        assert_eq!(
            endpoint.resolve("a", "b").unwrap(),
            "http://localhost:8080/repos/a/b"
        );
    }

    #[test]
    fn test_custom_template_is_not_substituted() {
        let endpoint = ApiEndpoint::parse("https://git.example.com/repos/:owner/:repo");
        assert_eq!(
            endpoint.resolve("a", "b").unwrap(),
            "https://git.example.com/repos/:owner/:repo"
        );
    }

    #[test]
    fn test_invalid_url() {
        let result = ApiEndpoint::parse("not a url").resolve("a", "b");
        assert!(matches!(result, Err(Error::InvalidBaseUrl { .. })));

        let result = ApiEndpoint::parse("ftp://example.com/repo").resolve("a", "b");
        assert!(matches!(result, Err(Error::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_preset_requires_owner_and_repo() {
        let result = ApiEndpoint::Preset(Platform::GitHub).resolve("", "notes");
        assert!(matches!(result, Err(Error::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_normalize_repo_name() {
        assert_eq!(normalize_repo_name("notes.git"), "notes");
        assert_eq!(normalize_repo_name("notes"), "notes");
        assert_eq!(normalize_repo_name("my.github.io"), "my.github.io");
    }
}
