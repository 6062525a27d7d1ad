//! One layer of settings, as parsed from a TOML file or git config

use serde::{Deserialize, Serialize};

use crate::Result;

/// Executable overrides for the external programs a session runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BinarySettings {
    pub lsyncd: Option<String>,
    pub rsync: Option<String>,
    pub ssh: Option<String>,
}

/// A single settings layer.
///
/// Every field is optional so layers can be merged; defaults are applied
/// only once all layers are in.
///
/// ```toml
/// host = "builder.example.com"
/// remote_path = "src/project"
/// ignore = ["global", "root", "subdirs"]
/// delay = 0.1
///
/// [binaries]
/// lsyncd = "/usr/local/bin/lsyncd"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub host: Option<String>,
    pub remote_path: Option<String>,
    /// Rule sources in order; an entry may itself be a comma-separated list
    pub ignore: Option<Vec<String>>,
    pub delay: Option<f64>,
    pub compress: Option<bool>,
    #[serde(default)]
    pub binaries: BinarySettings,
}

impl Settings {
    /// Parse a settings layer from TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }

    /// Merge another layer into this one; values set in `other` win.
    ///
    /// `ignore` is replaced as a whole, never concatenated, since source
    /// order is significant.
    pub fn merge(&mut self, other: &Settings) {
        fn overlay<T: Clone>(base: &mut Option<T>, other: &Option<T>) {
            if other.is_some() {
                base.clone_from(other);
            }
        }

        overlay(&mut self.host, &other.host);
        overlay(&mut self.remote_path, &other.remote_path);
        overlay(&mut self.ignore, &other.ignore);
        overlay(&mut self.delay, &other.delay);
        overlay(&mut self.compress, &other.compress);
        overlay(&mut self.binaries.lsyncd, &other.binaries.lsyncd);
        overlay(&mut self.binaries.rsync, &other.binaries.rsync);
        overlay(&mut self.binaries.ssh, &other.binaries.ssh);
    }
}

/// Resolved executables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binaries {
    pub lsyncd: String,
    pub rsync: String,
    pub ssh: String,
}

impl Default for Binaries {
    fn default() -> Self {
        Self {
            lsyncd: "lsyncd".to_string(),
            rsync: "rsync".to_string(),
            ssh: "ssh".to_string(),
        }
    }
}

impl From<&BinarySettings> for Binaries {
    fn from(settings: &BinarySettings) -> Self {
        let defaults = Binaries::default();
        Self {
            lsyncd: settings.lsyncd.clone().unwrap_or(defaults.lsyncd),
            rsync: settings.rsync.clone().unwrap_or(defaults.rsync),
            ssh: settings.ssh.clone().unwrap_or(defaults.ssh),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_layer() {
        let settings = Settings::parse(
            r#"
host = "builder"
remote_path = "work/app"
ignore = ["root", "extra.ignore"]
delay = 0.5
compress = false

[binaries]
rsync = "/opt/rsync"
"#,
        )
        .unwrap();

        assert_eq!(settings.host.as_deref(), Some("builder"));
        assert_eq!(settings.remote_path.as_deref(), Some("work/app"));
        assert_eq!(
            settings.ignore,
            Some(vec!["root".to_string(), "extra.ignore".to_string()])
        );
        assert_eq!(settings.delay, Some(0.5));
        assert_eq!(settings.compress, Some(false));
        assert_eq!(settings.binaries.rsync.as_deref(), Some("/opt/rsync"));
        assert!(settings.binaries.lsyncd.is_none());
    }

    #[test]
    fn parse_empty_layer() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn parse_rejects_wrong_types() {
        assert!(Settings::parse("delay = \"soon\"").is_err());
    }

    #[test]
    fn merge_overrides_only_set_values() {
        let mut base = Settings::parse("host = \"a\"\ndelay = 1.0\nignore = [\"root\"]").unwrap();
        let overlay = Settings::parse("host = \"b\"\nignore = [\"subdirs\", \"root\"]").unwrap();

        base.merge(&overlay);

        assert_eq!(base.host.as_deref(), Some("b"));
        assert_eq!(base.delay, Some(1.0));
        assert_eq!(
            base.ignore,
            Some(vec!["subdirs".to_string(), "root".to_string()])
        );
    }

    #[test]
    fn binaries_fall_back_to_path_lookup() {
        let binaries = Binaries::from(&BinarySettings {
            ssh: Some("/usr/bin/ssh".to_string()),
            ..Default::default()
        });
        assert_eq!(binaries.ssh, "/usr/bin/ssh");
        assert_eq!(binaries.lsyncd, "lsyncd");
        assert_eq!(binaries.rsync, "rsync");
    }
}
