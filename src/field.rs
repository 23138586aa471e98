use strum::{Display, EnumString};

use crate::git::Commit;

/// The commit fields a `GitLog` can be grouped or sorted by.
///
/// Names parse ASCII case-insensitively, and the two-word fields accept
/// `reverted-hash`, `reverted_hash` or `revertedHash`.
///
/// # Example
///
/// ```
/// # use cclog::CommitField;
/// let field: CommitField = "Scope".parse().unwrap();
/// assert_eq!(CommitField::Scope, field);
/// assert_eq!("scope", field.to_string());
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
pub enum CommitField {
    Hash,
    Type,
    Scope,
    Subject,
    Body,
    #[strum(
        to_string = "reverted-hash",
        serialize = "reverted_hash",
        serialize = "revertedhash"
    )]
    RevertedHash,
    #[strum(
        to_string = "reverted-header",
        serialize = "reverted_header",
        serialize = "revertedheader"
    )]
    RevertedHeader,
}

impl CommitField {
    /// Gets the string value of this field for a commit. Unset fields read as
    /// the empty string.
    ///
    /// # Example
    ///
    /// ```
    /// # use cclog::{CommitField, LogOptions, LogParser, RawCommit};
    /// let parser = LogParser::new(LogOptions::default());
    /// let commit = parser
    ///     .parse_commit(&RawCommit::new("abc", "fix: handle EOF"))
    ///     .unwrap();
    ///
    /// assert_eq!("fix", CommitField::Type.value_of(&commit));
    /// assert_eq!("", CommitField::Scope.value_of(&commit));
    /// ```
    pub fn value_of<'a>(&self, commit: &'a Commit) -> &'a str {
        let value = match *self {
            CommitField::Hash => return &commit.hash,
            CommitField::Type => &commit.commit_type,
            CommitField::Scope => &commit.scope,
            CommitField::Subject => &commit.subject,
            CommitField::Body => &commit.body,
            CommitField::RevertedHash => &commit.reverted_hash,
            CommitField::RevertedHeader => &commit.reverted_header,
        };
        value.as_deref().unwrap_or("")
    }
}

/// The semantic meaning of a capture group in the header pattern.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
pub enum HeaderField {
    Type,
    Scope,
    Subject,
}

/// The semantic meaning of a capture group in the revert pattern.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
pub enum RevertField {
    Header,
    Hash,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_names() {
        assert_eq!("type".parse::<CommitField>(), Ok(CommitField::Type));
        assert_eq!("TYPE".parse::<CommitField>(), Ok(CommitField::Type));
        assert_eq!(
            "revertedHash".parse::<CommitField>(),
            Ok(CommitField::RevertedHash)
        );
        assert_eq!(
            "reverted_header".parse::<CommitField>(),
            Ok(CommitField::RevertedHeader)
        );
        assert!("author".parse::<CommitField>().is_err());
    }

    #[test]
    fn displays_kebab_case() {
        assert_eq!(CommitField::RevertedHash.to_string(), "reverted-hash");
        assert_eq!(HeaderField::Subject.to_string(), "subject");
        assert_eq!(RevertField::Hash.to_string(), "hash");
    }

    #[test]
    fn correspondence_names() {
        assert_eq!("Scope".parse::<HeaderField>(), Ok(HeaderField::Scope));
        assert_eq!("header".parse::<RevertField>(), Ok(RevertField::Header));
        assert!("scope".parse::<RevertField>().is_err());
    }
}
