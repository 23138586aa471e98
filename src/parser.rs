use std::mem;

use log::{debug, trace};
use rayon::prelude::*;
use regex::Captures;

use crate::{
    field::{HeaderField, RevertField},
    git::{Commit, Mention, Note, RawCommit, Reference},
    gitlog::GitLog,
    options::LogOptions,
};

// Characters which may open a token in front of a reference or mention,
// e.g. `(#12)`
const OPENERS: &[char] = &['(', '[', '{', '<', '"', '\''];

/// Turns raw commits into `Commit`s and whole histories into a `GitLog`.
///
/// A parser holds nothing but its `LogOptions`, so parsing the same input
/// twice always gives the same result and one parser can be used from many
/// threads at once.
///
/// # Example
///
/// ```
/// # use cclog::{LogOptions, LogParser, RawCommit};
/// let parser = LogParser::new(LogOptions::default());
/// let log = parser.parse_log(&[
///     RawCommit::new("a1", "feat(api): add paging"),
///     RawCommit::new("b2", "fix(cli): exit code on error\n\nCloses #7"),
///     RawCommit::new("c3", "just some work"),
/// ]);
///
/// assert_eq!(2, log.len());
/// assert_eq!(1, log.excluded);
/// assert_eq!(vec!["feat", "fix"], log.groups.keys().map(|k| k.as_str()).collect::<Vec<_>>());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogParser {
    options: LogOptions,
}

impl LogParser {
    pub fn new(options: LogOptions) -> Self {
        LogParser { options }
    }

    pub fn options(&self) -> &LogOptions {
        &self.options
    }

    /// Parses a single commit. Returns `None` only when the header matches
    /// neither the revert nor the header pattern and invalid commits are not
    /// included.
    ///
    /// # Example
    ///
    /// ```
    /// # use cclog::{LogOptions, LogParser, RawCommit};
    /// let parser = LogParser::new(LogOptions::default());
    /// let commit = parser
    ///     .parse_commit(&RawCommit::new(
    ///         "abc123",
    ///         "feat(parser): support notes\n\nBREAKING CHANGE: drops the old API",
    ///     ))
    ///     .unwrap();
    ///
    /// assert_eq!(Some("feat"), commit.commit_type.as_deref());
    /// assert_eq!(Some("parser"), commit.scope.as_deref());
    /// assert!(commit.is_breaking());
    /// ```
    pub fn parse_commit(&self, raw: &RawCommit) -> Option<Commit> {
        let message = raw.message.replace("\r\n", "\n");
        let (header, remainder) = match message.split_once('\n') {
            Some((header, remainder)) => (header.trim_end(), remainder),
            None => (message.trim_end(), ""),
        };

        let mut commit = Commit {
            hash: raw.hash.clone(),
            commit_type: None,
            scope: None,
            subject: None,
            body: None,
            notes: Vec::new(),
            fields: Default::default(),
            references: Vec::new(),
            mentions: Vec::new(),
            is_revert: false,
            reverted_hash: None,
            reverted_header: None,
            raw: raw.message.clone(),
        };

        // Git's own revert message names the hash in the body, so the whole
        // message is tried when the header alone doesn't match
        let revert = self.options.revert_pattern();
        if let Some(caps) = revert.captures(header).or_else(|| revert.captures(&message)) {
            trace!("Commit {} is a revert", raw.hash);
            commit.is_revert = true;
            for (i, field) in self.options.revert_correspondence().iter().enumerate() {
                let value = capture(&caps, i + 1);
                match *field {
                    RevertField::Header => commit.reverted_header = value,
                    RevertField::Hash => commit.reverted_hash = value,
                }
            }
        } else if let Some(caps) = self.options.header_pattern().captures(header) {
            for (i, field) in self.options.header_correspondence().iter().enumerate() {
                let value = capture(&caps, i + 1);
                match *field {
                    HeaderField::Type => commit.commit_type = value,
                    HeaderField::Scope => commit.scope = value,
                    HeaderField::Subject => commit.subject = value,
                }
            }
        } else if self.options.include_invalid_commits() {
            trace!("Keeping commit {} with invalid header {:?}", raw.hash, header);
            commit.subject = Some(header.to_owned());
        } else {
            debug!("Skipping commit {} with invalid header {:?}", raw.hash, header);
            return None;
        }

        self.parse_remainder(remainder, &mut commit);

        trace!("Parsed commit:\n{:?}", commit);
        Some(commit)
    }

    /// Parses every commit in order and groups the results.
    pub fn parse_log<'a, I>(&self, raw: I) -> GitLog
    where
        I: IntoIterator<Item = &'a RawCommit>,
    {
        GitLog::from_parsed(
            &self.options,
            raw.into_iter().map(|commit| self.parse_commit(commit)),
        )
    }

    /// Same as `parse_log()`, but the commits are parsed on the rayon
    /// thread pool. Results are collected in input order, so the log is
    /// identical to the one `parse_log()` returns.
    ///
    /// # Example
    ///
    /// ```
    /// # use cclog::{LogOptions, LogParser, RawCommit};
    /// let parser = LogParser::new(LogOptions::default());
    /// let raw: Vec<_> = (0..100)
    ///     .map(|i| RawCommit::new(format!("{i:04}"), format!("fix(mod{}): patch {i}", i % 7)))
    ///     .collect();
    ///
    /// assert_eq!(parser.parse_log(&raw), parser.parse_log_parallel(&raw));
    /// ```
    pub fn parse_log_parallel(&self, raw: &[RawCommit]) -> GitLog {
        debug!(
            "Parsing {} commits on {} threads",
            raw.len(),
            rayon::current_num_threads()
        );
        let parsed = raw
            .par_iter()
            .map(|commit| self.parse_commit(commit))
            .collect::<Vec<_>>();

        GitLog::from_parsed(&self.options, parsed)
    }

    fn parse_remainder(&self, remainder: &str, commit: &mut Commit) {
        let mut body = Vec::new();
        let mut scanner = TokenScanner::new(&self.options);

        for block in blocks(remainder) {
            let mut section = None;
            let mut leading = Vec::new();

            for line in block {
                if let Some(name) = self.field_name(line) {
                    trace!("Found field {:?}", name);
                    commit.fields.insert(name.clone(), String::new());
                    section = Some(Section::Field(name));
                    continue;
                }
                if let Some((title, text)) = self.note_start(line) {
                    trace!("Found note {:?}", title);
                    commit.notes.push(Note {
                        title: title.to_owned(),
                        text: text.trim().to_owned(),
                    });
                    section = Some(Section::Note(commit.notes.len() - 1));
                    scanner.scan(text);
                    continue;
                }

                match section {
                    Some(Section::Note(i)) => push_line(&mut commit.notes[i].text, line),
                    Some(Section::Field(ref name)) => {
                        if let Some(value) = commit.fields.get_mut(name) {
                            push_line(value, line);
                        }
                    }
                    None => leading.push(line.trim_end()),
                }
                scanner.scan(line);
            }

            if !leading.is_empty() {
                body.push(leading.join("\n"));
            }
            scanner.end_block();
        }

        if !body.is_empty() {
            commit.body = Some(body.join("\n\n"));
        }
        commit.references = scanner.references;
        commit.mentions = scanner.mentions;
    }

    fn field_name(&self, line: &str) -> Option<String> {
        self.options.field_pattern().captures(line).map(|caps| {
            caps.get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default()
        })
    }

    // A note keyword directly followed by a colon
    fn note_start<'o, 'l>(&'o self, line: &'l str) -> Option<(&'o str, &'l str)> {
        self.options.note_keywords().iter().find_map(|keyword| {
            line.strip_prefix(keyword.as_str())
                .and_then(|rest| rest.strip_prefix(':'))
                .map(|text| (keyword.as_str(), text))
        })
    }
}

enum Section {
    Note(usize),
    Field(String),
}

/// Collects references and mentions from the words of a message, keeping
/// track of the word before each one to find action keywords.
struct TokenScanner<'o, 't> {
    options: &'o LogOptions,
    previous: Option<&'t str>,
    references: Vec<Reference>,
    mentions: Vec<Mention>,
}

impl<'o, 't> TokenScanner<'o, 't> {
    fn new(options: &'o LogOptions) -> Self {
        TokenScanner {
            options,
            previous: None,
            references: Vec::new(),
            mentions: Vec::new(),
        }
    }

    fn scan(&mut self, text: &'t str) {
        for word in text.split_whitespace() {
            let word = word.trim_start_matches(OPENERS);

            if let Some((prefix, token)) = split_prefixed(word, self.options.reference_prefixes()) {
                let action = self
                    .previous
                    .filter(|prev| self.options.is_action_keyword(prev))
                    .map(str::to_owned);
                self.references.push(Reference {
                    prefix: prefix.to_owned(),
                    token: token.to_owned(),
                    action,
                });
            } else if let Some((prefix, token)) =
                split_prefixed(word, self.options.mention_prefixes())
            {
                self.mentions.push(Mention {
                    prefix: prefix.to_owned(),
                    token: token.to_owned(),
                });
            }

            self.previous = Some(word.trim_end_matches(':'));
        }
    }

    fn end_block(&mut self) {
        self.previous = None;
    }
}

// Splits `word` into a matching prefix and the identifier following it
fn split_prefixed<'p, 'w>(word: &'w str, prefixes: &'p [String]) -> Option<(&'p str, &'w str)> {
    prefixes.iter().find_map(|prefix| {
        let after = word.strip_prefix(prefix.as_str())?;
        let end = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(after.len());
        let token = after[..end].trim_end_matches('-');
        if token.is_empty() {
            None
        } else {
            Some((prefix.as_str(), token))
        }
    })
}

// Groups the non-blank lines of `text` into blank line separated blocks
fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn push_line(text: &mut String, line: &str) {
    if !text.is_empty() {
        text.push('\n');
    }
    text.push_str(line.trim());
}

fn capture(caps: &Captures, i: usize) -> Option<String> {
    caps.get(i)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
