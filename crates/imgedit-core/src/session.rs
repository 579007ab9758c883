//! Session state: credentials and target branch, read once at startup.
//!
//! Credentials live in `~/.config/imgedit/credentials.toml` (`token`, `owner`,
//! `repo`); `IMGEDIT_TOKEN`, `IMGEDIT_OWNER` and `IMGEDIT_REPO` override
//! individual keys. The branch comes from the editor config.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::EditorConfig;

/// Access to one repository on the content API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
    pub owner: String,
    pub repo: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish()
    }
}

impl Credentials {
    /// Writes the credential store, readable by the owner only on Unix.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let toml = toml::to_string_pretty(self)?;
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .with_context(|| format!("chmod {}", path.display()))?;
        }
        Ok(())
    }
}

/// Keys as stored; any may be missing until overridden from the environment.
#[derive(Debug, Default, Deserialize)]
struct StoredCredentials {
    token: Option<String>,
    owner: Option<String>,
    repo: Option<String>,
}

/// Process-wide edit session; constructed once and passed to the commit client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub credentials: Credentials,
    pub branch: String,
}

pub fn credentials_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgedit")?;
    Ok(xdg_dirs.place_config_file("credentials.toml")?)
}

impl Session {
    pub fn new(credentials: Credentials, branch: impl Into<String>) -> Self {
        Self {
            credentials,
            branch: branch.into(),
        }
    }

    /// Reads the default credential store and the process environment.
    pub fn load(cfg: &EditorConfig) -> Result<Self> {
        let path = credentials_path()?;
        Self::load_from(&path, |k| std::env::var(k).ok(), &cfg.branch)
    }

    /// Reads `path` (may be absent) and applies overrides from `env`.
    pub fn load_from<F>(path: &Path, env: F, branch: &str) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let stored = if path.exists() {
            let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            toml::from_str::<StoredCredentials>(&data)
                .with_context(|| format!("parse {}", path.display()))?
        } else {
            StoredCredentials::default()
        };

        let pick = |key: &str, var: &str, stored: Option<String>| -> Result<String> {
            env(var)
                .or(stored)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .with_context(|| {
                    format!(
                        "missing `{}`: set it in {} (imgedit login) or via {}",
                        key,
                        path.display(),
                        var
                    )
                })
        };

        let credentials = Credentials {
            token: pick("token", "IMGEDIT_TOKEN", stored.token)?,
            owner: pick("owner", "IMGEDIT_OWNER", stored.owner)?,
            repo: pick("repo", "IMGEDIT_REPO", stored.repo)?,
        };
        tracing::debug!(owner = %credentials.owner, repo = %credentials.repo, branch, "session loaded");
        Ok(Self::new(credentials, branch))
    }
}
