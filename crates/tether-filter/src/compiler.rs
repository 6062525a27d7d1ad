//! Compile a working tree's ignore files into one filter set

use std::path::{Path, PathBuf};

use tether_fs::{NormalizedPath, SessionPath, io};
use tether_git::GitWorkspace;

use crate::rule::FilterSet;
use crate::source::RuleSource;
use crate::translate::translate_line;
use crate::{Error, Result};

/// What the compiler needs to know about a working tree.
pub trait IgnoreIndex {
    /// Absolute working tree root.
    fn root(&self) -> &Path;

    /// The configured global excludes file, if any.
    fn global_excludes_file(&self) -> Result<Option<PathBuf>>;

    /// Tracked ignore files below the root, relative to it, in index order.
    fn tracked_ignore_files(&self) -> Result<Vec<NormalizedPath>>;
}

impl IgnoreIndex for GitWorkspace {
    fn root(&self) -> &Path {
        GitWorkspace::root(self)
    }

    fn global_excludes_file(&self) -> Result<Option<PathBuf>> {
        Ok(GitWorkspace::global_excludes_file(self)?)
    }

    fn tracked_ignore_files(&self) -> Result<Vec<NormalizedPath>> {
        Ok(GitWorkspace::tracked_ignore_files(self)?)
    }
}

/// One concrete file to translate.
#[derive(Debug)]
struct RuleFile {
    source: String,
    path: PathBuf,
    prefix: Option<String>,
    required: bool,
}

/// Builds a [`FilterSet`] from an ordered list of rule sources.
pub struct FilterCompiler<'a, I: IgnoreIndex + ?Sized> {
    index: &'a I,
}

impl<'a, I: IgnoreIndex + ?Sized> FilterCompiler<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }

    /// Compile `sources` in order.
    ///
    /// The result starts with the `.git` exclusion, followed by the rules of
    /// every file, line by line. Any unreadable required source fails the
    /// whole compilation.
    pub fn compile(&self, sources: &[RuleSource]) -> Result<FilterSet> {
        let mut set = FilterSet::new();

        for source in sources {
            for file in self.resolve(source)? {
                let Some(content) = self.read(&file)? else {
                    continue;
                };
                let before = set.len();
                for line in content.lines() {
                    set.extend(translate_line(line, file.prefix.as_deref()));
                }
                tracing::debug!(
                    source = %file.source,
                    path = %file.path.display(),
                    rules = set.len() - before,
                    "Translated ignore file"
                );
            }
        }

        Ok(set)
    }

    fn resolve(&self, source: &RuleSource) -> Result<Vec<RuleFile>> {
        let root = self.index.root();
        let files = match source {
            RuleSource::Global => match self.index.global_excludes_file()? {
                Some(path) => vec![RuleFile {
                    source: source.to_string(),
                    path,
                    prefix: None,
                    required: true,
                }],
                None => {
                    tracing::debug!("No global excludes file configured");
                    Vec::new()
                }
            },
            RuleSource::Root => vec![RuleFile {
                source: source.to_string(),
                path: root.join(SessionPath::IgnoreFile.as_str()),
                prefix: None,
                required: false,
            }],
            RuleSource::Subdirectories => self
                .index
                .tracked_ignore_files()?
                .into_iter()
                .map(|relative| RuleFile {
                    source: source.to_string(),
                    path: root.join(relative.to_native()),
                    prefix: relative.parent().map(|dir| dir.to_anchored()),
                    // The index can lag behind a deleted file
                    required: false,
                })
                .collect(),
            RuleSource::File(path) => vec![RuleFile {
                source: "literal".to_string(),
                path: root.join(path),
                prefix: None,
                required: true,
            }],
        };
        Ok(files)
    }

    fn read(&self, file: &RuleFile) -> Result<Option<String>> {
        let result = if file.required {
            io::read_text(&file.path).map(Some)
        } else {
            io::read_optional_text(&file.path)
        };

        match result {
            Ok(None) => {
                tracing::debug!(path = %file.path.display(), "Ignore file absent, skipping");
                Ok(None)
            }
            Ok(content) => Ok(content),
            Err(cause) => Err(Error::SourceUnreadable {
                rule_source: file.source.clone(),
                path: file.path.clone(),
                cause,
            }),
        }
    }
}
