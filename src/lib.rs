//! A configurable parser for conventional commit logs.
//!
//! `cclog` takes the raw `(hash, message)` pairs of a history, classifies each
//! message against a set of `LogOptions` and returns a `GitLog`: the parsed
//! `Commit`s in input order, grouped and sorted, ready to be rendered as a
//! changelog or used to decide a version bump.
//!
//! ```
//! use cclog::{LogOptions, LogParser, RawCommit};
//!
//! let parser = LogParser::new(LogOptions::default());
//! let log = parser.parse_log(&[
//!     RawCommit::new("c3", "fix(core): patch leak\n\nCloses #42"),
//!     RawCommit::new("b2", "feat(api): paging\n\nBREAKING CHANGE: list is paged"),
//!     RawCommit::new("a1", "Merge branch 'main'"),
//! ]);
//!
//! assert_eq!(2, log.len());
//! assert!(log.is_breaking());
//! assert_eq!("42", log.group("fix").unwrap()[0].references[0].token);
//! ```

#[macro_use]
mod macros;
pub mod config;
pub mod error;
mod field;
pub mod git;
mod gitlog;
mod message;
mod options;
mod parser;

pub use error::Error;
pub use field::{CommitField, HeaderField, RevertField};
pub use git::{Commit, Commits, Mention, Note, RawCommit, Reference};
pub use gitlog::GitLog;
pub use message::CommitMessage;
pub use options::{LogOptions, LogOptionsBuilder};
pub use parser::LogParser;

// The default config file
const DEFAULT_CONFIG_FILE: &str = ".cclog.toml";
