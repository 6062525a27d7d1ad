//! lsyncd configuration and transfer shim rendering
//!
//! The emitted configuration fixes the transfer policy:
//!
//! - `delete = "running"`: deletions propagate while the session runs, but
//!   the initial full transfer never removes remote-only files
//! - the filter list is the [`FilterSet`] verbatim, in order, first match wins
//! - rsync is invoked through the transfer shim so every round holds the
//!   shared transfer lock

use std::path::Path;

use tether_filter::FilterSet;
use tether_fs::io;

use crate::Result;
use crate::config::SessionConfig;

/// Renders session files from a resolved config and a compiled filter set.
pub struct ConfigEmitter<'a> {
    config: &'a SessionConfig,
    filters: &'a FilterSet,
}

impl<'a> ConfigEmitter<'a> {
    pub fn new(config: &'a SessionConfig, filters: &'a FilterSet) -> Self {
        Self { config, filters }
    }

    /// Render the lsyncd Lua configuration.
    pub fn render(&self) -> String {
        let config = self.config;
        let mut out = String::new();

        out.push_str("settings {\n");
        out.push_str(&format!("    logfile = {},\n", lua_string(&path_str(&config.log_path()))));
        out.push_str(&format!("    pidfile = {},\n", lua_string(&path_str(&config.pid_path()))));
        out.push_str("    nodaemon = false,\n");
        out.push_str("}\n\n");

        out.push_str("sync {\n");
        out.push_str("    default.rsync,\n");
        out.push_str(&format!(
            "    source = {},\n",
            lua_string(&with_trailing_slash(&path_str(&config.root)))
        ));
        out.push_str(&format!(
            "    target = {},\n",
            lua_string(&with_trailing_slash(&config.target()))
        ));
        out.push_str("    delete = \"running\",\n");
        out.push_str(&format!("    delay = {},\n", config.delay));

        out.push_str("    filter = {\n");
        for rule in self.filters {
            out.push_str(&format!("        {},\n", lua_string(&rule.to_string())));
        }
        out.push_str("    },\n");

        out.push_str("    rsync = {\n");
        out.push_str(&format!("        binary = {},\n", lua_string(&path_str(&config.shim_path()))));
        out.push_str("        archive = true,\n");
        out.push_str(&format!("        compress = {},\n", config.compress));
        out.push_str("    },\n");
        out.push_str("}\n");
        out
    }

    /// Render the shim lsyncd runs in place of rsync.
    ///
    /// It re-enters `tether transfer`, which takes the shared transfer lock
    /// for the duration of the real rsync call.
    pub fn render_shim(&self, tether_exe: &Path) -> String {
        let exe = path_str(tether_exe);
        let lock = path_str(&self.config.lock_path());
        format!(
            "#!/bin/sh\nexec {} transfer --lock {} --rsync {} -- \"$@\"\n",
            shell_words::quote(&exe),
            shell_words::quote(&lock),
            shell_words::quote(&self.config.binaries.rsync),
        )
    }

    /// Write the configuration and the shim into the session state directory.
    pub fn write(&self, tether_exe: &Path) -> Result<()> {
        let config_path = self.config.engine_config_path();
        io::write_atomic(&config_path, self.render().as_bytes())?;
        io::write_executable(&self.config.shim_path(), &self.render_shim(tether_exe))?;
        tracing::debug!(path = ?config_path, rules = self.filters.len(), "Wrote lsyncd configuration");
        Ok(())
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn with_trailing_slash(value: &str) -> String {
    format!("{}/", value.trim_end_matches('/'))
}

/// Quote `value` as a double-quoted Lua string literal.
fn lua_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
