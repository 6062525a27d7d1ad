//! Rule source identifiers

use std::path::PathBuf;
use std::str::FromStr;

use crate::{Error, Result};

/// Where ignore rules are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// The user's `core.excludesFile`
    Global,
    /// The `.gitignore` at the working tree root
    Root,
    /// Every tracked `.gitignore` below the root
    Subdirectories,
    /// A literal file; relative paths resolve against the working tree root
    File(PathBuf),
}

impl RuleSource {
    /// Source order used when none is configured.
    pub fn defaults() -> Vec<RuleSource> {
        vec![Self::Global, Self::Root, Self::Subdirectories]
    }

    /// Parse a comma-separated list such as `global, root, subdirs`.
    pub fn parse_list(list: &str) -> Result<Vec<RuleSource>> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for RuleSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" => Err(Error::EmptySource),
            "global" => Ok(Self::Global),
            "root" => Ok(Self::Root),
            "subdirs" | "subdirectories" => Ok(Self::Subdirectories),
            path => Ok(Self::File(PathBuf::from(path))),
        }
    }
}

impl std::fmt::Display for RuleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Root => write!(f, "root"),
            Self::Subdirectories => write!(f, "subdirs"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
