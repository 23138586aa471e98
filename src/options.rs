use std::{env, fs::File, io::Read, path::Path};

use indexmap::IndexSet;
use log::debug;
use regex::Regex;

use crate::{
    config::{RawCfg, RawLogCfg},
    error::{Error, Result},
    field::{CommitField, HeaderField, RevertField},
    DEFAULT_CONFIG_FILE,
};

const DEFAULT_HEADER_PATTERN: &str = r"^(\w*)(?:\(([\w\$\.\-\* ]*)\))?: (.*)$";
const DEFAULT_REVERT_PATTERN: &str = r#"^Revert\s"([\s\S]*)"\s*This reverts commit (\w*)\."#;
const DEFAULT_FIELD_PATTERN: &str = r"^-(.*?)-$";
const DEFAULT_ACTION_KEYWORDS: [&str; 9] = [
    "Close", "Closes", "Closed", "Fix", "Fixes", "Fixed", "Resolve", "Resolves", "Resolved",
];
const DEFAULT_NOTE_KEYWORDS: [&str; 2] = ["BREAKING CHANGE", "BREAKING CHANGES"];

/// The compiled, validated set of options describing how commit messages are
/// recognized and taken apart, and how the resulting `GitLog` is grouped and
/// sorted.
///
/// `LogOptions` can't be changed once built, so a single instance can be
/// shared by any number of parsers and threads.
#[derive(Debug, Clone)]
pub struct LogOptions {
    header_pattern: Regex,
    header_correspondence: Vec<HeaderField>,
    revert_pattern: Regex,
    revert_correspondence: Vec<RevertField>,
    field_pattern: Regex,
    include_invalid_commits: bool,
    group_by: CommitField,
    sort_by: CommitField,
    // Prefixes and note keywords are kept longest first so the most specific
    // one wins
    reference_prefixes: Vec<String>,
    mention_prefixes: Vec<String>,
    action_keywords: IndexSet<String>,
    note_keywords: Vec<String>,
}

impl Default for LogOptions {
    /// The conventional commit preset: `type(scope): subject` headers,
    /// `-field-` footer markers, `BREAKING CHANGE` notes, `#` references and
    /// `@` mentions.
    fn default() -> Self {
        debug!("Creating default options with LogOptions::default()");
        let b = LogOptionsBuilder::default();
        LogOptions {
            header_pattern: regex!(DEFAULT_HEADER_PATTERN),
            header_correspondence: b.header_correspondence,
            revert_pattern: regex!(DEFAULT_REVERT_PATTERN),
            revert_correspondence: b.revert_correspondence,
            field_pattern: regex!(DEFAULT_FIELD_PATTERN),
            include_invalid_commits: b.include_invalid_commits,
            group_by: b.group_by,
            sort_by: b.sort_by,
            reference_prefixes: longest_first(b.reference_prefixes),
            mention_prefixes: longest_first(b.mention_prefixes),
            action_keywords: b.action_keywords.into_iter().collect(),
            note_keywords: longest_first(b.note_keywords),
        }
    }
}

impl LogOptions {
    /// Reads the default `.cclog.toml` configuration file from the current
    /// working directory.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use cclog::LogOptions;
    /// let options = LogOptions::new().unwrap();
    /// ```
    pub fn new() -> Result<Self> {
        debug!("Trying default config file");
        LogOptions::from_file(DEFAULT_CONFIG_FILE)
    }

    /// Starts building options from the conventional preset.
    ///
    /// # Example
    ///
    /// ```
    /// # use cclog::{CommitField, LogOptions};
    /// let options = LogOptions::builder()
    ///     .include_invalid_commits(true)
    ///     .sort_by(CommitField::Subject)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(options.include_invalid_commits());
    /// ```
    pub fn builder() -> LogOptionsBuilder {
        LogOptionsBuilder::default()
    }

    /// Reads options from a TOML configuration file. Relative paths are
    /// resolved against the current working directory.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use cclog::LogOptions;
    /// let options = LogOptions::from_file("/myproject/cclog.toml").unwrap();
    /// ```
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        debug!("Creating options with \n\tfile: {:?}", file.as_ref());
        let cfg_file = if file.as_ref().is_relative() {
            debug!("file is relative");
            let cwd = env::current_dir().map_err(|_| Error::CurrentDir)?;
            cwd.join(file.as_ref())
        } else {
            debug!("file is absolute");
            file.as_ref().to_path_buf()
        };

        let mut toml_f = File::open(&cfg_file)?;
        let mut toml_s = String::with_capacity(256);
        toml_f.read_to_string(&mut toml_s)?;

        let raw: RawCfg = toml::from_str(&toml_s).map_err(|e| {
            debug!("Failed to parse {:?}: {}", cfg_file, e);
            Error::ConfigParse(cfg_file.clone())
        })?;

        LogOptionsBuilder::try_from(raw.log)?.build()
    }

    /// Reads options from the text of a TOML configuration.
    ///
    /// # Example
    ///
    /// ```
    /// # use cclog::{CommitField, LogOptions};
    /// let options = LogOptions::from_toml("[log]\ngroup-by = \"scope\"").unwrap();
    /// assert_eq!(CommitField::Scope, options.group_by());
    /// ```
    pub fn from_toml(s: &str) -> Result<Self> {
        let raw: RawCfg = toml::from_str(s)?;
        LogOptionsBuilder::try_from(raw.log)?.build()
    }

    pub fn header_pattern(&self) -> &Regex {
        &self.header_pattern
    }

    pub fn header_correspondence(&self) -> &[HeaderField] {
        &self.header_correspondence
    }

    pub fn revert_pattern(&self) -> &Regex {
        &self.revert_pattern
    }

    pub fn revert_correspondence(&self) -> &[RevertField] {
        &self.revert_correspondence
    }

    pub fn field_pattern(&self) -> &Regex {
        &self.field_pattern
    }

    pub fn include_invalid_commits(&self) -> bool {
        self.include_invalid_commits
    }

    pub fn group_by(&self) -> CommitField {
        self.group_by
    }

    pub fn sort_by(&self) -> CommitField {
        self.sort_by
    }

    pub fn reference_prefixes(&self) -> &[String] {
        &self.reference_prefixes
    }

    pub fn mention_prefixes(&self) -> &[String] {
        &self.mention_prefixes
    }

    pub fn note_keywords(&self) -> &[String] {
        &self.note_keywords
    }

    /// Whether `word` is one of the (case-sensitive) action keywords
    pub fn is_action_keyword(&self, word: &str) -> bool {
        self.action_keywords.contains(word)
    }
}

/// Collects the raw settings for a `LogOptions` and validates them all at
/// once in `build()`.
#[derive(Debug, Clone)]
pub struct LogOptionsBuilder {
    header_pattern: String,
    header_correspondence: Vec<HeaderField>,
    revert_pattern: String,
    revert_correspondence: Vec<RevertField>,
    field_pattern: String,
    include_invalid_commits: bool,
    group_by: CommitField,
    sort_by: CommitField,
    reference_prefixes: Vec<String>,
    mention_prefixes: Vec<String>,
    action_keywords: Vec<String>,
    note_keywords: Vec<String>,
}

impl Default for LogOptionsBuilder {
    fn default() -> Self {
        LogOptionsBuilder {
            header_pattern: DEFAULT_HEADER_PATTERN.to_owned(),
            header_correspondence: vec![HeaderField::Type, HeaderField::Scope, HeaderField::Subject],
            revert_pattern: DEFAULT_REVERT_PATTERN.to_owned(),
            revert_correspondence: vec![RevertField::Header, RevertField::Hash],
            field_pattern: DEFAULT_FIELD_PATTERN.to_owned(),
            include_invalid_commits: false,
            group_by: CommitField::Type,
            sort_by: CommitField::Scope,
            reference_prefixes: vec!["#".to_owned()],
            mention_prefixes: vec!["@".to_owned()],
            action_keywords: DEFAULT_ACTION_KEYWORDS.iter().map(|&s| s.to_owned()).collect(),
            note_keywords: DEFAULT_NOTE_KEYWORDS.iter().map(|&s| s.to_owned()).collect(),
        }
    }
}

impl LogOptionsBuilder {
    /// Sets the pattern a header must match. Its capture groups are mapped to
    /// commit fields by `header_correspondence()`.
    ///
    /// # Example
    ///
    /// ```
    /// # use cclog::{HeaderField, LogOptions};
    /// let options = LogOptions::builder()
    ///     .header_pattern(r"^\[(\w+)\] (.*)$")
    ///     .header_correspondence(vec![HeaderField::Type, HeaderField::Subject])
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn header_pattern<S: Into<String>>(mut self, p: S) -> Self {
        self.header_pattern = p.into();
        self
    }

    /// Sets which commit field each header capture group fills, in group
    /// order
    pub fn header_correspondence<I: IntoIterator<Item = HeaderField>>(mut self, fields: I) -> Self {
        self.header_correspondence = fields.into_iter().collect();
        self
    }

    /// Sets the pattern recognizing a revert commit. It is matched against
    /// the whole message, not just the header.
    pub fn revert_pattern<S: Into<String>>(mut self, p: S) -> Self {
        self.revert_pattern = p.into();
        self
    }

    pub fn revert_correspondence<I: IntoIterator<Item = RevertField>>(mut self, fields: I) -> Self {
        self.revert_correspondence = fields.into_iter().collect();
        self
    }

    /// Sets the pattern of a footer line introducing a named field section.
    /// The first capture group (or the whole match without one) is the
    /// field name.
    pub fn field_pattern<S: Into<String>>(mut self, p: S) -> Self {
        self.field_pattern = p.into();
        self
    }

    /// Whether commits with a header not matching the header pattern are
    /// kept (with the whole header as subject) or dropped (the default)
    pub fn include_invalid_commits(mut self, include: bool) -> Self {
        self.include_invalid_commits = include;
        self
    }

    pub fn group_by(mut self, field: CommitField) -> Self {
        self.group_by = field;
        self
    }

    pub fn sort_by(mut self, field: CommitField) -> Self {
        self.sort_by = field;
        self
    }

    pub fn reference_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn mention_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mention_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the words which turn a directly following reference into an
    /// action reference (e.g. `Closes #12`)
    pub fn action_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.action_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the words which, followed by a colon at the start of a footer
    /// line, begin a note
    pub fn note_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.note_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Compiles the patterns and checks the correspondences against them.
    ///
    /// # Example
    ///
    /// ```
    /// # use cclog::{LogOptions, Error};
    /// let res = LogOptions::builder().header_pattern("(unclosed").build();
    /// assert!(matches!(res, Err(Error::Pattern { name: "header-pattern", .. })));
    /// ```
    pub fn build(self) -> Result<LogOptions> {
        let header_pattern = compile("header-pattern", &self.header_pattern)?;
        let revert_pattern = compile("revert-pattern", &self.revert_pattern)?;
        let field_pattern = compile("field-pattern", &self.field_pattern)?;

        check_correspondence(
            "header-correspondence",
            &self.header_correspondence,
            &header_pattern,
        )?;
        check_correspondence(
            "revert-correspondence",
            &self.revert_correspondence,
            &revert_pattern,
        )?;

        let options = LogOptions {
            header_pattern,
            header_correspondence: self.header_correspondence,
            revert_pattern,
            revert_correspondence: self.revert_correspondence,
            field_pattern,
            include_invalid_commits: self.include_invalid_commits,
            group_by: self.group_by,
            sort_by: self.sort_by,
            reference_prefixes: longest_first(self.reference_prefixes),
            mention_prefixes: longest_first(self.mention_prefixes),
            action_keywords: self
                .action_keywords
                .into_iter()
                .filter(|k| !k.is_empty())
                .collect(),
            note_keywords: longest_first(self.note_keywords),
        };

        debug!("Returning options:\n{:?}", options);
        Ok(options)
    }
}

impl TryFrom<RawLogCfg> for LogOptionsBuilder {
    type Error = Error;

    fn try_from(raw: RawLogCfg) -> Result<Self> {
        let mut b = LogOptionsBuilder::default();
        if let Some(p) = raw.header_pattern {
            b.header_pattern = p;
        }
        if let Some(fields) = raw.header_correspondence {
            b.header_correspondence = parse_fields(&fields)?;
        }
        if let Some(p) = raw.revert_pattern {
            b.revert_pattern = p;
        }
        if let Some(fields) = raw.revert_correspondence {
            b.revert_correspondence = parse_fields(&fields)?;
        }
        if let Some(p) = raw.field_pattern {
            b.field_pattern = p;
        }
        if let Some(include) = raw.include_invalid_commits {
            b.include_invalid_commits = include;
        }
        if let Some(ref field) = raw.group_by {
            b.group_by = parse_field(field)?;
        }
        if let Some(ref field) = raw.sort_by {
            b.sort_by = parse_field(field)?;
        }
        if let Some(prefixes) = raw.reference_prefixes {
            b.reference_prefixes = prefixes;
        }
        if let Some(prefixes) = raw.mention_prefixes {
            b.mention_prefixes = prefixes;
        }
        if let Some(keywords) = raw.action_keywords {
            b.action_keywords = keywords;
        }
        if let Some(keywords) = raw.note_keywords {
            b.note_keywords = keywords;
        }
        Ok(b)
    }
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::Pattern { name, source })
}

fn check_correspondence<T>(name: &'static str, fields: &[T], pattern: &Regex) -> Result<()>
where
    T: PartialEq + ToString,
{
    // captures_len() counts the implicit whole-match group
    let groups = pattern.captures_len() - 1;
    if fields.len() > groups {
        return Err(Error::Correspondence {
            name,
            fields: fields.len(),
            groups,
        });
    }
    for (i, field) in fields.iter().enumerate() {
        if fields[..i].contains(field) {
            return Err(Error::DuplicateCorrespondence {
                name,
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

fn parse_field<T: std::str::FromStr>(name: &str) -> Result<T> {
    name.parse().map_err(|_| Error::UnknownField(name.to_owned()))
}

fn parse_fields<T: std::str::FromStr>(names: &[String]) -> Result<Vec<T>> {
    names.iter().map(|n| parse_field(n)).collect()
}

// Drops empty entries, which would match every token or line
fn longest_first(mut v: Vec<String>) -> Vec<String> {
    v.retain(|s| !s.is_empty());
    v.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    v.dedup();
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_builder() {
        let default = LogOptions::default();
        let built = LogOptions::builder().build().unwrap();

        assert_eq!(default.header_pattern().as_str(), built.header_pattern().as_str());
        assert_eq!(default.revert_pattern().as_str(), built.revert_pattern().as_str());
        assert_eq!(default.field_pattern().as_str(), built.field_pattern().as_str());
        assert_eq!(default.header_correspondence(), built.header_correspondence());
        assert_eq!(default.revert_correspondence(), built.revert_correspondence());
        assert_eq!(default.group_by(), CommitField::Type);
        assert_eq!(default.sort_by(), CommitField::Scope);
        assert!(!default.include_invalid_commits());
        assert_eq!(default.reference_prefixes(), ["#"]);
        assert_eq!(default.mention_prefixes(), ["@"]);
        assert_eq!(default.note_keywords(), ["BREAKING CHANGES", "BREAKING CHANGE"]);
        assert!(default.is_action_keyword("Closes"));
        assert!(default.is_action_keyword("Resolved"));
        assert!(!default.is_action_keyword("closes"));
    }

    #[test]
    fn invalid_patterns() {
        let res = LogOptions::builder().revert_pattern("[").build();
        assert!(matches!(res, Err(Error::Pattern { name: "revert-pattern", .. })));

        let res = LogOptions::builder().field_pattern("(?P<").build();
        assert!(matches!(res, Err(Error::Pattern { name: "field-pattern", .. })));
    }

    #[test]
    fn correspondence_longer_than_groups() {
        let res = LogOptions::builder()
            .header_pattern(r"^(\w+): (.*)$")
            .build();
        assert!(matches!(
            res,
            Err(Error::Correspondence {
                name: "header-correspondence",
                fields: 3,
                groups: 2,
            })
        ));
    }

    #[test]
    fn correspondence_shorter_than_groups() {
        let res = LogOptions::builder()
            .header_pattern(r"^(\w+): (.*)$")
            .header_correspondence(vec![HeaderField::Type, HeaderField::Subject])
            .build();
        assert!(res.is_ok());
    }

    #[test]
    fn duplicate_correspondence() {
        let res = LogOptions::builder()
            .revert_correspondence(vec![RevertField::Hash, RevertField::Hash])
            .build();
        assert!(matches!(
            res,
            Err(Error::DuplicateCorrespondence { name: "revert-correspondence", .. })
        ));
    }

    #[test]
    fn prefixes_longest_first() {
        let options = LogOptions::builder()
            .reference_prefixes(vec!["#", "", "GH-", "#"])
            .build()
            .unwrap();
        assert_eq!(options.reference_prefixes(), ["GH-", "#"]);
    }

    #[test]
    fn from_toml_overrides() {
        let options = LogOptions::from_toml(
            r#"
            [log]
            include-invalid-commits = true
            group-by = "Scope"
            sort-by = "reverted-hash"
            mention-prefixes = ["@", "cc:"]
            "#,
        )
        .unwrap();

        assert!(options.include_invalid_commits());
        assert_eq!(options.group_by(), CommitField::Scope);
        assert_eq!(options.sort_by(), CommitField::RevertedHash);
        assert_eq!(options.mention_prefixes(), ["cc:", "@"]);
        // untouched keys keep the preset
        assert_eq!(options.reference_prefixes(), ["#"]);
    }

    #[test]
    fn from_toml_unknown_field() {
        let res = LogOptions::from_toml("[log]\ngroup-by = \"author\"");
        assert!(matches!(res, Err(Error::UnknownField(ref f)) if f == "author"));

        let res = LogOptions::from_toml("[log]\nheader-correspondence = [\"type\", \"body\"]");
        assert!(matches!(res, Err(Error::UnknownField(ref f)) if f == "body"));
    }

    #[test]
    fn from_toml_invalid_text() {
        let res = LogOptions::from_toml("[log");
        assert!(matches!(res, Err(Error::ConfigToml(_))));
    }

    #[test]
    fn from_missing_file() {
        let res = LogOptions::from_file("/this/path/does/not/exist/.cclog.toml");
        assert!(matches!(res, Err(Error::Io(_))));
    }

    #[test]
    fn from_dogfood_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_FILE);
        let options = LogOptions::from_file(path).unwrap();
        let default = LogOptions::default();

        assert_eq!(options.header_pattern().as_str(), default.header_pattern().as_str());
        assert_eq!(options.revert_pattern().as_str(), default.revert_pattern().as_str());
        assert_eq!(options.note_keywords(), default.note_keywords());
    }
}
