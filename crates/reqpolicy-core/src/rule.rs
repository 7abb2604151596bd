//! Rule compilation and matching.
//!
//! A rule is a path pattern plus an optional query pattern. Both are plain
//! regular expressions searched anywhere in their input (no implicit anchors),
//! so `/test` matches `/test/more` and an empty pattern matches everything.
//! Patterns use RE2 syntax and are normalized by [`crate::dialect`] first.

use std::fmt;

use regex::Regex;
use serde::Deserialize;

use crate::dialect;
use crate::error::{ReqPolicyError, Result};

/// One rule as it appears in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RuleSpec {
    pub path_regex: String,
    #[serde(default)]
    pub query_param_regex: String,
}

impl RuleSpec {
    pub fn new(path_regex: impl Into<String>, query_param_regex: impl Into<String>) -> Self {
        Self {
            path_regex: path_regex.into(),
            query_param_regex: query_param_regex.into(),
        }
    }

    /// Rule with a path pattern only (matches any query).
    pub fn path(path_regex: impl Into<String>) -> Self {
        Self::new(path_regex, "")
    }
}

/// Whitelist and blacklist rule lists as they appear in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RulesConfig {
    #[serde(default)]
    pub whitelist_paths: Vec<RuleSpec>,
    #[serde(default)]
    pub blacklist_paths: Vec<RuleSpec>,
}

/// Which list a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleList {
    Whitelist,
    Blacklist,
}

impl RuleList {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleList::Whitelist => "whitelistPaths",
            RuleList::Blacklist => "blacklistPaths",
        }
    }
}

impl fmt::Display for RuleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which pattern of a rule failed to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternField {
    Path,
    Query,
}

impl fmt::Display for PatternField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternField::Path => f.write_str("path"),
            PatternField::Query => f.write_str("query param"),
        }
    }
}

/// Compiled rule. Immutable once built.
#[derive(Debug, Clone)]
pub struct Rule {
    spec: RuleSpec,
    path: Regex,
    query: Option<Regex>, // None => any query
}

impl Rule {
    /// Compile a configured rule. `list`/`index` only feed the error.
    pub fn compile(spec: &RuleSpec, list: RuleList, index: usize) -> Result<Self> {
        let path = compile_pattern(&spec.path_regex, list, index, PatternField::Path)?;
        let query = if spec.query_param_regex.is_empty() {
            None
        } else {
            Some(compile_pattern(
                &spec.query_param_regex,
                list,
                index,
                PatternField::Query,
            )?)
        };
        Ok(Self {
            spec: spec.clone(),
            path,
            query,
        })
    }

    /// Path pattern as configured (before normalization).
    pub fn path_pattern(&self) -> &str {
        &self.spec.path_regex
    }

    /// Empty string when the rule has no query pattern.
    pub fn query_pattern(&self) -> &str {
        &self.spec.query_param_regex
    }

    pub fn matches_path(&self, path: &str) -> bool {
        self.path.is_match(path)
    }

    /// Searches the raw, unparsed query text (separators included).
    pub fn matches_query(&self, raw_query: &str) -> bool {
        match &self.query {
            None => true,
            Some(re) => re.is_match(raw_query),
        }
    }

    pub fn matches(&self, path: &str, raw_query: &str) -> bool {
        self.matches_path(path) && self.matches_query(raw_query)
    }
}

fn compile_pattern(
    pattern: &str,
    list: RuleList,
    index: usize,
    field: PatternField,
) -> Result<Regex> {
    let normalized = dialect::normalize(pattern);
    Regex::new(&normalized).map_err(|source| ReqPolicyError::InvalidPattern {
        list,
        index,
        field,
        pattern: pattern.to_string(),
        source,
    })
}

/// Both compiled rule lists, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    whitelist: Vec<Rule>,
    blacklist: Vec<Rule>,
}

impl RuleSet {
    /// Compile every rule of both lists. Any invalid pattern fails the whole set.
    pub fn compile(cfg: &RulesConfig) -> Result<Self> {
        Ok(Self {
            whitelist: compile_list(&cfg.whitelist_paths, RuleList::Whitelist)?,
            blacklist: compile_list(&cfg.blacklist_paths, RuleList::Blacklist)?,
        })
    }

    pub fn whitelist(&self) -> &[Rule] {
        &self.whitelist
    }

    pub fn blacklist(&self) -> &[Rule] {
        &self.blacklist
    }

    pub fn len(&self) -> usize {
        self.whitelist.len() + self.blacklist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn compile_list(raw: &[RuleSpec], list: RuleList) -> Result<Vec<Rule>> {
    let mut out = Vec::with_capacity(raw.len());
    for (index, spec) in raw.iter().enumerate() {
        out.push(Rule::compile(spec, list, index)?);
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn rule(spec: RuleSpec) -> Rule {
        Rule::compile(&spec, RuleList::Blacklist, 0).unwrap()
    }

    #[test]
    fn unanchored_path_search() {
        let rule = rule(RuleSpec::path("/test"));
        assert!(rule.matches_path("/test"));
        assert!(rule.matches_path("/test/more"));
        assert!(rule.matches_path("/api/test"));
        assert!(!rule.matches_path("/other"));
    }

    #[test]
    fn empty_query_pattern_matches_any_query() {
        let rule = rule(RuleSpec::path("^/$"));
        assert!(rule.matches_query(""));
        assert!(rule.matches_query("anything=1&x"));
        assert_eq!(rule.query_pattern(), "");
    }

    #[test]
    fn query_search_sees_separators() {
        let rule = rule(RuleSpec::new("", "&sort="));
        assert!(rule.matches("/", "page=1&sort=latest"));
        assert!(!rule.matches("/", "sort=latest"));
    }

    #[test]
    fn query_is_not_decoded() {
        let rule = rule(RuleSpec::new("", "q=a b"));
        assert!(!rule.matches_query("q=a%20b"));
    }

    #[test]
    fn digit_class_is_ascii_only() {
        let rule = rule(RuleSpec::path(r"^/v\d+/"));
        assert!(rule.matches_path("/v2/admin"));
        assert!(!rule.matches_path("/v\u{0663}/admin"));
    }

    #[test]
    fn word_and_space_classes_are_ascii_only() {
        assert!(!rule(RuleSpec::path(r"^/\w+$")).matches_path("/caf\u{e9}"));
        assert!(rule(RuleSpec::path(r"^/\w+$")).matches_path("/cafe_1"));
        assert!(!rule(RuleSpec::new("", r"a\sb")).matches_query("a\u{a0}b"));
        assert!(rule(RuleSpec::new("", r"a\Sb")).matches_query("a\u{a0}b"));
    }

    #[test]
    fn word_boundary_is_ascii() {
        // `é` is not a word character in RE2, so there is a boundary before `x`
        let rule = rule(RuleSpec::path(r"\bx"));
        assert!(rule.matches_path("/\u{e9}x"));
        assert!(!rule.matches_path("/ax"));
    }

    #[test]
    fn dot_still_matches_whole_characters() {
        let rule = rule(RuleSpec::path("^/.$"));
        assert!(rule.matches_path("/\u{0663}"));
    }

    #[test]
    fn quoted_literal_compiles() {
        let rule = rule(RuleSpec::path(r"\Q/a.b\E"));
        assert!(rule.matches_path("/a.b/c"));
        assert!(!rule.matches_path("/aXb"));
        assert_eq!(rule.path_pattern(), r"\Q/a.b\E");
    }

    #[test]
    fn invalid_query_pattern_reports_location() {
        let cfg = RulesConfig {
            whitelist_paths: vec![RuleSpec::path("^/ok$")],
            blacklist_paths: vec![RuleSpec::path("^/a$"), RuleSpec::new("^/b$", "(")],
        };
        let err = RuleSet::compile(&cfg).expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);
        match err {
            ReqPolicyError::InvalidPattern {
                list,
                index,
                field,
                pattern,
                ..
            } => {
                assert_eq!(list, RuleList::Blacklist);
                assert_eq!(index, 1);
                assert_eq!(field, PatternField::Query);
                assert_eq!(pattern, "(");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn error_message_names_field_and_list() {
        let err = Rule::compile(&RuleSpec::path("*"), RuleList::Whitelist, 3).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("invalid path regex in whitelistPaths[3]"), "{msg}");
    }
}
