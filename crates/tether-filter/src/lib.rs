//! gitignore to rsync filter rule compiler
//!
//! Translates gitignore patterns into rsync filter rules and compiles the
//! ignore files of a working tree into one ordered [`FilterSet`].
//!
//! The emitted rules differ from gitignore in two ways: rsync's `**/` token
//! requires at least one path segment, and bracket character classes are
//! kept out of the emitted rules. Both are expanded away:
//!
//! ```
//! use tether_filter::translate_line;
//!
//! let rules: Vec<String> = translate_line("**/*.o", None)
//!     .iter()
//!     .map(|r| r.to_string())
//!     .collect();
//! assert_eq!(rules, vec!["- **/*.o", "- *.o"]);
//! ```

pub mod compiler;
pub mod error;
pub mod expand;
pub mod rule;
pub mod source;
pub mod translate;

pub use compiler::{FilterCompiler, IgnoreIndex};
pub use error::{Error, Result};
pub use rule::{FilterRule, FilterSet, IgnoreRule, Sense};
pub use source::RuleSource;
pub use translate::translate_line;
