use std::fmt;

/// Builds a conventional commit message from its parts.
///
/// Empty parts are left out along with their separators, so a message with
/// only a subject renders as just that subject.
///
/// # Example
///
/// ```
/// # use cclog::CommitMessage;
/// let msg = CommitMessage::new("add paging")
///     .commit_type("feat")
///     .scope("api")
///     .body("Pages are 50 items long.")
///     .notes("BREAKING CHANGE: `list` no longer returns everything");
///
/// assert_eq!(
///     "feat(api): add paging\n\nPages are 50 items long.\n\nBREAKING CHANGE: `list` no longer returns everything",
///     msg.to_string()
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitMessage {
    commit_type: Option<String>,
    scope: Option<String>,
    subject: Option<String>,
    body: Option<String>,
    notes: Option<String>,
}

impl CommitMessage {
    pub fn new<S: Into<String>>(subject: S) -> Self {
        CommitMessage {
            subject: non_empty(subject),
            ..CommitMessage::default()
        }
    }

    pub fn commit_type<S: Into<String>>(mut self, t: S) -> Self {
        self.commit_type = non_empty(t);
        self
    }

    pub fn scope<S: Into<String>>(mut self, s: S) -> Self {
        self.scope = non_empty(s);
        self
    }

    pub fn body<S: Into<String>>(mut self, b: S) -> Self {
        self.body = non_empty(b);
        self
    }

    /// Sets the footer, e.g. `BREAKING CHANGE: ...` or `Closes #12`
    pub fn notes<S: Into<String>>(mut self, n: S) -> Self {
        self.notes = non_empty(n);
        self
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut written = false;
        if let Some(ref t) = self.commit_type {
            write!(f, "{}", t)?;
            written = true;
        }
        if let Some(ref s) = self.scope {
            write!(f, "({})", s)?;
            written = true;
        }
        if let Some(ref s) = self.subject {
            if written {
                write!(f, ": ")?;
            }
            write!(f, "{}", s)?;
            written = true;
        }
        for part in [&self.body, &self.notes].iter().filter_map(|p| p.as_ref()) {
            if written {
                write!(f, "\n\n")?;
            }
            write!(f, "{}", part)?;
            written = true;
        }
        Ok(())
    }
}

fn non_empty<S: Into<String>>(s: S) -> Option<String> {
    let s = s.into();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LogOptions, LogParser, RawCommit};

    #[test]
    fn subject_only() {
        assert_eq!(CommitMessage::new("initial import").to_string(), "initial import");
    }

    #[test]
    fn type_without_scope() {
        let msg = CommitMessage::new("handle EOF").commit_type("fix");
        assert_eq!(msg.to_string(), "fix: handle EOF");
    }

    #[test]
    fn empty_parts_are_skipped() {
        let msg = CommitMessage::new("tidy up")
            .commit_type("chore")
            .scope("")
            .body("")
            .notes("Closes #3");
        assert_eq!(msg.to_string(), "chore: tidy up\n\nCloses #3");
    }

    #[test]
    fn empty_message() {
        assert_eq!(CommitMessage::default().to_string(), "");
    }

    #[test]
    fn composed_message_parses_back() {
        let msg = CommitMessage::new("add paging")
            .commit_type("feat")
            .scope("api")
            .body("Fixes #12, thanks @bob")
            .notes("BREAKING CHANGE: list is paged");
        let parser = LogParser::new(LogOptions::default());
        let commit = parser
            .parse_commit(&RawCommit::new("abc", msg.to_string()))
            .unwrap();

        assert_eq!(commit.commit_type.as_deref(), Some("feat"));
        assert_eq!(commit.scope.as_deref(), Some("api"));
        assert_eq!(commit.subject.as_deref(), Some("add paging"));
        assert_eq!(commit.body.as_deref(), Some("Fixes #12, thanks @bob"));
        assert_eq!(commit.notes[0].text, "list is paged");
        assert_eq!(commit.references[0].action.as_deref(), Some("Fixes"));
        assert_eq!(commit.mentions[0].token, "bob");
    }
}
