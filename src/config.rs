use serde::Deserialize;

/// The on-disk shape of a `.cclog.toml` file. Every key is optional and
/// falls back to the conventional preset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCfg {
    #[serde(default)]
    pub log: RawLogCfg,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawLogCfg {
    pub header_pattern: Option<String>,
    pub header_correspondence: Option<Vec<String>>,
    pub revert_pattern: Option<String>,
    pub revert_correspondence: Option<Vec<String>>,
    pub field_pattern: Option<String>,
    pub include_invalid_commits: Option<bool>,
    pub group_by: Option<String>,
    pub sort_by: Option<String>,
    pub reference_prefixes: Option<Vec<String>>,
    pub mention_prefixes: Option<Vec<String>>,
    pub action_keywords: Option<Vec<String>>,
    pub note_keywords: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config() {
        let cfg = r##"
            [log]
            header-pattern = '^(\w+)/(\w+): (.*)$'
            header-correspondence = ["scope", "type", "subject"]
            include-invalid-commits = true
            group-by = "scope"
            sort-by = "subject"
            reference-prefixes = ["#", "GH-"]
            note-keywords = ["BREAKING"]
        "##;
        let res = toml::from_str(cfg);
        assert!(res.is_ok(), "{res:?}");
        let cfg: RawCfg = res.unwrap();

        assert_eq!(cfg.log.header_pattern, Some(r"^(\w+)/(\w+): (.*)$".into()));
        assert_eq!(
            cfg.log.header_correspondence,
            Some(vec!["scope".into(), "type".into(), "subject".into()])
        );
        assert_eq!(cfg.log.include_invalid_commits, Some(true));
        assert_eq!(cfg.log.group_by, Some("scope".into()));
        assert_eq!(cfg.log.sort_by, Some("subject".into()));
        assert_eq!(
            cfg.log.reference_prefixes,
            Some(vec!["#".into(), "GH-".into()])
        );
        assert_eq!(cfg.log.note_keywords, Some(vec!["BREAKING".into()]));
        assert_eq!(cfg.log.revert_pattern, None);
        assert_eq!(cfg.log.mention_prefixes, None);
    }

    #[test]
    fn empty_config() {
        let cfg: RawCfg = toml::from_str("").unwrap();
        assert!(cfg.log.header_pattern.is_none());
        assert!(cfg.log.group_by.is_none());
    }

    #[test]
    fn dogfood_config() {
        let cfg = include_str!("../.cclog.toml");
        let res = toml::from_str(cfg);
        assert!(res.is_ok(), "{res:?}");
        let cfg: RawCfg = res.unwrap();

        assert_eq!(cfg.log.group_by, Some("type".into()));
        assert_eq!(cfg.log.sort_by, Some("scope".into()));
        assert_eq!(cfg.log.include_invalid_commits, Some(false));
    }

    #[test]
    fn rejects_wrong_types() {
        let res = toml::from_str::<RawCfg>("[log]\ninclude-invalid-commits = \"yes\"");
        assert!(res.is_err());
    }
}
