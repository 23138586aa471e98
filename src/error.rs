use std::{path::PathBuf, result::Result as StdResult};

use thiserror::Error;

pub type Result<T> = StdResult<T, Error>;

/// An enum for describing and handling the errors encountered while building
/// `LogOptions`. Parsing and grouping commits never fail once the options
/// exist.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse config file: {0}")]
    ConfigParse(PathBuf),

    #[error("invalid config: {0}")]
    ConfigToml(#[from] toml::de::Error),

    #[error("cannot get current directory")]
    CurrentDir,

    #[error("fatal I/O error with config file")]
    Io(#[from] std::io::Error),

    #[error("invalid {name}: {source}")]
    Pattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("{name} names {fields} field(s) but the pattern has {groups} capture group(s)")]
    Correspondence {
        name: &'static str,
        fields: usize,
        groups: usize,
    },

    #[error("{name} lists the field `{field}` more than once")]
    DuplicateCorrespondence { name: &'static str, field: String },

    #[error("unrecognized commit field: {0}")]
    UnknownField(String),
}
