use indexmap::IndexMap;
use serde::Serialize;

/// One unparsed entry of the history as handed over by whatever retrieved
/// the log: a hash and the full commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    /// The commit hash, treated as an opaque identifier
    pub hash: String,
    /// The full commit message, header first
    pub message: String,
}

impl RawCommit {
    pub fn new<H: Into<String>, M: Into<String>>(hash: H, message: M) -> Self {
        RawCommit {
            hash: hash.into(),
            message: message.into(),
        }
    }
}

impl<H: Into<String>, M: Into<String>> From<(H, M)> for RawCommit {
    fn from((hash, message): (H, M)) -> Self {
        RawCommit::new(hash, message)
    }
}

/// A labeled footer section, such as a breaking change description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub title: String,
    pub text: String,
}

/// A token pointing at an issue, e.g. `#42`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// The matched reference prefix (e.g. `#`)
    pub prefix: String,
    /// The issue identifier without its prefix
    pub token: String,
    /// The action keyword directly before the reference (e.g. `Closes`), if any
    pub action: Option<String>,
}

/// A token naming a person, e.g. `@alice`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mention {
    pub prefix: String,
    pub token: String,
}

/// The struct representation of a parsed `Commit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// The commit hash
    pub hash: String,
    /// The commit type (e.g. `feat`)
    #[serde(rename = "type")]
    pub commit_type: Option<String>,
    /// The scope (if any)
    pub scope: Option<String>,
    /// The commit subject, or the full header of an invalid commit
    pub subject: Option<String>,
    /// All text after the header that isn't part of a note or field section
    pub body: Option<String>,
    /// Notes in the order they appear in the footer
    pub notes: Vec<Note>,
    /// Sections introduced by a field marker line, keyed by field name
    pub fields: IndexMap<String, String>,
    /// Issue references in the order they appear
    pub references: Vec<Reference>,
    /// Person mentions in the order they appear
    pub mentions: Vec<Mention>,
    pub is_revert: bool,
    /// The hash of the reverted commit
    pub reverted_hash: Option<String>,
    /// The header of the reverted commit
    pub reverted_header: Option<String>,
    /// The unmodified commit message
    pub raw: String,
}

impl Commit {
    /// Whether this commit carries any note, i.e. announces a breaking change
    pub fn is_breaking(&self) -> bool {
        !self.notes.is_empty()
    }

    /// The references tagged with an action keyword, i.e. issues this commit
    /// closes
    pub fn closes(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().filter(|r| r.action.is_some())
    }
}

/// A convienience type for multiple commits
pub type Commits = Vec<Commit>;
