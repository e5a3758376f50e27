//! Configuration management for repofs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use repofs::{ApiEndpoint, Auth, ClientConfig};
use serde::{Deserialize, Serialize};

/// repofs configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Which repository to talk to.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Tree listing limits.
    #[serde(default)]
    pub tree: TreeConfig,
}

impl Config {
    /// Load config from a TOML file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns error if file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save config to a TOML file.
    ///
    /// # Errors
    /// Returns error if serialization or write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Default config location: `$XDG_CONFIG_HOME/repofs/config.toml`,
    /// falling back to `~/.config/repofs/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        default_path_from(
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            std::env::var_os("HOME").map(PathBuf::from),
        )
    }

    /// Apply command-line (and environment) overrides on top of the file.
    pub fn apply(&mut self, overrides: &RemoteOverrides) {
        let remote = &mut self.remote;
        if let Some(api) = &overrides.api {
            remote.api.clone_from(api);
        }
        if overrides.owner.is_some() {
            remote.owner.clone_from(&overrides.owner);
        }
        if overrides.repo.is_some() {
            remote.repo.clone_from(&overrides.repo);
        }
        if overrides.branch.is_some() {
            remote.branch.clone_from(&overrides.branch);
        }
    }

    /// Build the library client configuration.
    ///
    /// # Errors
    /// Returns error if a preset API is selected without owner and repo.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let remote = &self.remote;
        let endpoint = ApiEndpoint::parse(&remote.api);

        let (owner, repo) = match (&endpoint, &remote.owner, &remote.repo) {
            (_, Some(owner), Some(repo)) => (owner.clone(), repo.clone()),
            (ApiEndpoint::Custom(_), owner, repo) => (
                owner.clone().unwrap_or_default(),
                repo.clone().unwrap_or_default(),
            ),
            (ApiEndpoint::Preset(platform), _, _) => bail!(
                "owner and repo are required for the {platform} preset - pass --owner/--repo or set them in the config"
            ),
        };

        let mut config = ClientConfig::new(
            endpoint,
            Auth::EnvVar(remote.token_env.clone()),
            owner,
            repo,
        );
        config.branch.clone_from(&remote.branch);
        config.max_tree_depth = self.tree.max_depth;
        config.max_tree_entries = self.tree.max_entries;
        config.tree_concurrency = self.tree.concurrency;
        Ok(config)
    }
}

fn default_path_from(xdg: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    let base = xdg
        .filter(|p| p.is_absolute())
        .or_else(|| home.map(|h| h.join(".config")))?;
    Some(base.join("repofs").join("config.toml"))
}

/// Repository selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Preset name (`github`, `gitea`, `codeberg`, `gitee`), preset
    /// template, or custom repository API URL.
    #[serde(default = "default_api")]
    pub api: String,

    /// Repository owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Repository name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    /// Branch to read and commit on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Environment variable holding the API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            owner: None,
            repo: None,
            branch: None,
            token_env: default_token_env(),
        }
    }
}

fn default_api() -> String {
    "github".into()
}

fn default_token_env() -> String {
    Auth::DEFAULT_ENV_VAR.into()
}

/// Tree listing limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Directory levels to expand.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum entries visited by one listing.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Directory listings in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_entries: default_max_entries(),
            concurrency: default_concurrency(),
        }
    }
}

const fn default_max_depth() -> usize {
    ClientConfig::DEFAULT_MAX_TREE_DEPTH
}

const fn default_max_entries() -> usize {
    ClientConfig::DEFAULT_MAX_TREE_ENTRIES
}

const fn default_concurrency() -> usize {
    ClientConfig::DEFAULT_TREE_CONCURRENCY
}

/// Remote settings given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct RemoteOverrides {
    pub api: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use repofs::Platform;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.remote.api, "github");
        assert_eq!(config.remote.token_env, "REPOFS_TOKEN");
        assert_eq!(config.tree.max_depth, 32);
        assert_eq!(config.tree.concurrency, 8);
    }

    #[test]
    fn test_config_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let config = Config {
            remote: RemoteConfig {
                api: "codeberg".into(),
                owner: Some("octo".into()),
                repo: Some("notes".into()),
                branch: Some("drafts".into()),
                token_env: "CODEBERG_TOKEN".into(),
            },
            tree: TreeConfig {
                max_depth: 3,
                max_entries: 50,
                concurrency: 2,
            },
        };

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();

        assert_eq!(loaded.remote.api, "codeberg");
        assert_eq!(loaded.remote.owner.as_deref(), Some("octo"));
        assert_eq!(loaded.remote.branch.as_deref(), Some("drafts"));
        assert_eq!(loaded.remote.token_env, "CODEBERG_TOKEN");
        assert_eq!(loaded.tree.max_depth, 3);
        assert_eq!(loaded.tree.concurrency, 2);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[remote]\nowner = \"octo\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.remote.api, "github");
        assert_eq!(config.remote.owner.as_deref(), Some("octo"));
        assert_eq!(config.tree.max_entries, 10_000);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[remote\n").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_config_returns_default() {
        let config = Config::load("/nonexistent/path/config.toml").unwrap();
        assert_eq!(config.remote.api, "github");
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::default();
        config.remote.owner = Some("file-owner".into());
        config.remote.repo = Some("file-repo".into());

        config.apply(&RemoteOverrides {
            api: Some("gitea".into()),
            owner: Some("flag-owner".into()),
            repo: None,
            branch: Some("dev".into()),
        });

        assert_eq!(config.remote.api, "gitea");
        assert_eq!(config.remote.owner.as_deref(), Some("flag-owner"));
        assert_eq!(config.remote.repo.as_deref(), Some("file-repo"));
        assert_eq!(config.remote.branch.as_deref(), Some("dev"));
    }

    #[test]
    fn test_client_config_from_preset() {
        let mut config = Config::default();
        config.remote.owner = Some("octo".into());
        config.remote.repo = Some("notes.git".into());
        config.tree.max_depth = 4;

        let client = config.client_config().unwrap();
        assert_eq!(client.endpoint, ApiEndpoint::Preset(Platform::GitHub));
        assert_eq!(client.repo, "notes");
        assert_eq!(client.max_tree_depth, 4);
    }

    #[test]
    fn test_preset_requires_owner_and_repo() {
        let config = Config::default();
        let err = config.client_config().unwrap_err();
        assert!(err.to_string().contains("owner and repo are required"));
    }

    #[test]
    fn test_custom_url_needs_no_owner() {
        let mut config = Config::default();
        config.remote.api = "https://git.example.com/api/v1/repos/team/site".into();

        let client = config.client_config().unwrap();
        assert!(matches!(client.endpoint, ApiEndpoint::Custom(_)));
    }

    #[test]
    fn test_default_path_prefers_xdg() {
        let path = default_path_from(
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/me")),
        );
        assert_eq!(path, Some(PathBuf::from("/xdg/repofs/config.toml")));
    }

    #[test]
    fn test_default_path_falls_back_to_home() {
        let path = default_path_from(None, Some(PathBuf::from("/home/me")));
        assert_eq!(
            path,
            Some(PathBuf::from("/home/me/.config/repofs/config.toml"))
        );

        // relative XDG_CONFIG_HOME is ignored
        let path = default_path_from(Some(PathBuf::from("rel")), None);
        assert_eq!(path, None);
    }
}
