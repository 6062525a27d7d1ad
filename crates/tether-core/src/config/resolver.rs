//! Layered settings resolution into a session configuration

use std::path::{Path, PathBuf};

use tether_filter::RuleSource;
use tether_fs::{SessionPath, SyncLock, io};
use tether_git::GitWorkspace;

use super::settings::{Binaries, Settings};
use crate::{Error, Result};

/// Batching delay in seconds when none is configured.
pub const DEFAULT_DELAY: f64 = 0.1;

/// Everything a session needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Absolute working tree root
    pub root: PathBuf,
    /// Session state directory (`<git-dir>/tether`)
    pub state_dir: PathBuf,
    /// Remote host, optionally `user@host`
    pub host: String,
    /// Path on the remote host; relative paths are relative to the remote home
    pub remote_path: String,
    /// Ignore sources in compilation order
    pub sources: Vec<RuleSource>,
    /// lsyncd batching delay in seconds
    pub delay: f64,
    /// Whether rsync compresses data in transit
    pub compress: bool,
    pub binaries: Binaries,
}

impl SessionConfig {
    /// The rsync target, `host:remote_path`.
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.remote_path)
    }

    fn state_file(&self, name: SessionPath) -> PathBuf {
        self.state_dir.join(name.as_str())
    }

    pub fn lock_path(&self) -> PathBuf {
        self.state_file(SessionPath::LockFile)
    }

    pub fn pid_path(&self) -> PathBuf {
        self.state_file(SessionPath::PidFile)
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_file(SessionPath::LogFile)
    }

    pub fn engine_config_path(&self) -> PathBuf {
        self.state_file(SessionPath::EngineConfig)
    }

    pub fn shim_path(&self) -> PathBuf {
        self.state_file(SessionPath::TransferShim)
    }

    /// The transfer lock for this session.
    pub fn lock(&self) -> SyncLock {
        SyncLock::new(self.lock_path())
    }
}

/// Resolves a [`SessionConfig`] for a working tree.
pub struct ConfigResolver<'a> {
    workspace: &'a GitWorkspace,

    /// Override for the global config directory (used for testing).
    /// When `None`, `dirs::config_dir()` is used.
    global_config_dir_override: Option<PathBuf>,

    /// Override for the home directory used to derive the default remote path.
    home_dir_override: Option<PathBuf>,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(workspace: &'a GitWorkspace) -> Self {
        Self {
            workspace,
            global_config_dir_override: None,
            home_dir_override: None,
        }
    }

    /// Create a resolver with a custom global config directory.
    pub fn with_global_config_dir(workspace: &'a GitWorkspace, global_config_dir: PathBuf) -> Self {
        Self {
            workspace,
            global_config_dir_override: Some(global_config_dir),
            home_dir_override: None,
        }
    }

    /// Use `home` instead of the user's home directory.
    pub fn home_dir(mut self, home: PathBuf) -> Self {
        self.home_dir_override = Some(home);
        self
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join("tether"))
    }

    /// Home directory resolved the same way as the tree root, so a
    /// symlinked `$HOME` still prefixes the root.
    fn canonical_home(&self) -> Option<PathBuf> {
        let home = self.home_dir_override.clone().or_else(dirs::home_dir)?;
        Some(dunce::canonicalize(&home).unwrap_or(home))
    }

    /// Merge all layers and validate the result.
    ///
    /// Missing layer files are skipped. Invalid TOML, an invalid git config
    /// value, a missing or malformed host and a negative delay are errors.
    pub fn resolve(&self) -> Result<SessionConfig> {
        let mut settings = Settings::default();

        // Layer 1 - Global (<config_dir>/tether/config.toml)
        if let Some(global_dir) = self.global_config_dir() {
            merge_file(&mut settings, &global_dir.join("config.toml"), "global")?;
        }

        // Layer 2 - Tree (.tether.toml)
        let tree_config = self.workspace.root().join(SessionPath::TreeConfig.as_str());
        merge_file(&mut settings, &tree_config, "tree")?;

        // Layer 3 - git config
        settings.merge(&self.git_layer()?);

        self.finish(settings)
    }

    fn git_layer(&self) -> Result<Settings> {
        let ws = self.workspace;
        let mut layer = Settings {
            host: ws.setting("tether.host")?,
            remote_path: ws.setting("tether.remotePath")?,
            // Kept as one comma-separated entry, split when sources are parsed
            ignore: ws.setting("tether.ignore")?.map(|list| vec![list]),
            delay: None,
            compress: ws.bool_setting("tether.compress")?,
            ..Default::default()
        };

        if let Some(raw) = ws.setting("tether.delay")? {
            let delay = raw.trim().parse::<f64>().map_err(|_| {
                Error::configuration(format!("tether.delay must be a number, got '{raw}'"))
            })?;
            layer.delay = Some(delay);
        }

        layer.binaries.lsyncd = ws.setting("tether.lsyncd")?;
        layer.binaries.rsync = ws.setting("tether.rsync")?;
        layer.binaries.ssh = ws.setting("tether.ssh")?;

        Ok(layer)
    }

    fn finish(&self, settings: Settings) -> Result<SessionConfig> {
        let root = self.workspace.root().to_path_buf();

        let host = settings.host.ok_or_else(|| {
            Error::configuration("no remote host configured (set tether.host in git config or host in .tether.toml)")
        })?;
        validate_host(&host)?;

        let remote_path = match settings.remote_path {
            Some(path) if path.trim().is_empty() => {
                return Err(Error::configuration("remote_path must not be empty"));
            }
            Some(path) => path,
            None => default_remote_path(&root, self.canonical_home().as_deref()),
        };

        let sources = match settings.ignore {
            Some(entries) => {
                let mut sources = Vec::new();
                for entry in &entries {
                    sources.extend(RuleSource::parse_list(entry)?);
                }
                sources
            }
            None => RuleSource::defaults(),
        };

        let delay = settings.delay.unwrap_or(DEFAULT_DELAY);
        if !delay.is_finite() || delay < 0.0 {
            return Err(Error::configuration(format!(
                "delay must be a non-negative number of seconds, got {delay}"
            )));
        }

        let config = SessionConfig {
            state_dir: self.workspace.state_dir(),
            root,
            host,
            remote_path,
            sources,
            delay,
            compress: settings.compress.unwrap_or(true),
            binaries: Binaries::from(&settings.binaries),
        };
        tracing::debug!(target = %config.target(), sources = config.sources.len(), "Resolved session config");
        Ok(config)
    }
}

fn merge_file(settings: &mut Settings, path: &Path, layer: &str) -> Result<()> {
    match io::read_optional_text(path)? {
        Some(content) => {
            tracing::debug!(?path, layer, "Loading settings layer");
            settings.merge(&Settings::parse(&content)?);
        }
        None => tracing::debug!(?path, layer, "No settings layer found, skipping"),
    }
    Ok(())
}

/// Check that `host` can be used as `host:path` for rsync and as an ssh
/// destination.
pub fn validate_host(host: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidHost {
        host: host.to_string(),
        reason: reason.to_string(),
    };

    if host.is_empty() {
        return Err(invalid("host is empty"));
    }
    if host.starts_with('-') {
        return Err(invalid("host must not start with '-'"));
    }
    if host.chars().any(char::is_whitespace) {
        return Err(invalid("host must not contain whitespace"));
    }
    if host.contains(':') || host.contains('/') {
        return Err(invalid("host must not contain ':' or '/'"));
    }
    if host.ends_with('@') {
        return Err(invalid("host is missing after '@'"));
    }
    Ok(())
}

/// Remote path mirroring the local one: relative to home when the tree is
/// under `home`, the absolute local path otherwise.
fn default_remote_path(root: &Path, home: Option<&Path>) -> String {
    match home.and_then(|home| root.strip_prefix(home).ok()) {
        Some(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Some(relative) => relative.to_string_lossy().replace('\\', "/"),
        None => root.to_string_lossy().into_owned(),
    }
}
