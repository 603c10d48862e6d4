//! Inline suppression directive parsing.
//!
//! A directive lives in a comment of the analyzed language and silences rule
//! matches on the same line:
//!
//! - `skimguard: ignore <rule_id>` - suppresses one rule
//! - `skimguard: ignore <id1>, <id2>` - suppresses several rules
//! - `skimguard: ignore all` (or `*`, or no ids at all) - suppresses every rule
//! - `... until 2031-01-31` - the directive stops applying after that date
//!
//! The directive must follow one of the language's comment markers (inline
//! marker or block prefix). Keywords are case-insensitive; rule ids are not.
//!
//! # Example
//!
//! ```text
//! var h = MD5.Create(); // skimguard: ignore SG0001 until 2031-01-31
//! ```

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::evaluate::Match;
use crate::language::CommentSyntax;

/// The suppression directive prefix.
const DIRECTIVE_PREFIX: &str = "skimguard:";
const IGNORE_KEYWORD: &str = "ignore";
const UNTIL_KEYWORD: &str = "until";

/// A parsed suppression directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suppression {
    /// The rule IDs to suppress, or None for wildcard (suppress all).
    pub rule_ids: Option<HashSet<String>>,
    /// Last day on which the directive applies.
    pub expires: Option<NaiveDate>,
}

impl Suppression {
    /// Returns true if this suppression applies to the given rule ID.
    pub fn suppresses(&self, rule_id: &str) -> bool {
        match &self.rule_ids {
            None => true,
            Some(ids) => ids.contains(rule_id),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.rule_ids.is_none()
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires.is_some_and(|until| until < today)
    }
}

/// Parse a line for a suppression directive written in `syntax`'s comments.
///
/// The inline comment marker is tried first, then the block prefix. Returns
/// None when the line carries no well-formed directive.
pub fn parse_suppression(line: &str, syntax: CommentSyntax<'_>) -> Option<Suppression> {
    [syntax.inline, syntax.prefix]
        .into_iter()
        .filter(|marker| !marker.is_empty())
        .find_map(|marker| parse_after_marker(line, marker, syntax.suffix))
}

fn parse_after_marker(line: &str, marker: &str, suffix: &str) -> Option<Suppression> {
    let comment_start = line.find(marker)? + marker.len();
    let comment = &line[comment_start..];

    // ASCII lowercasing keeps byte offsets aligned with `comment`.
    let lower = comment.to_ascii_lowercase();
    let prefix_start = lower.find(DIRECTIVE_PREFIX)?;
    let after_prefix = comment[prefix_start + DIRECTIVE_PREFIX.len()..].trim_start();

    let rest = strip_prefix_ci(after_prefix, IGNORE_KEYWORD)?;
    // "ignorexyz" is not a directive.
    if rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
        return None;
    }

    let rest = rest.trim();
    let rest = if suffix.is_empty() {
        rest
    } else {
        rest.strip_suffix(suffix).unwrap_or(rest).trim_end()
    };

    let mut ids_text = Vec::new();
    let mut expires = None;
    let mut tokens = rest.split_whitespace();
    while let Some(token) = tokens.next() {
        if token.eq_ignore_ascii_case(UNTIL_KEYWORD) {
            let date = tokens.next()?;
            match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                Ok(d) => expires = Some(d),
                Err(e) => {
                    debug!("ignoring suppression with bad expiry '{}': {}", date, e);
                    return None;
                }
            }
            break;
        }
        ids_text.push(token);
    }

    Some(Suppression {
        rule_ids: parse_rule_ids(&ids_text.join(" ")),
        expires,
    })
}

/// Strip a prefix case-insensitively and return the remainder.
fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// Returns None for wildcard (`*`, `all`, or nothing), or the listed rule IDs.
fn parse_rule_ids(rest: &str) -> Option<HashSet<String>> {
    let mut ids = HashSet::new();
    for part in rest.split(|c: char| c == ',' || c.is_whitespace()) {
        let id = part.trim();
        if id.is_empty() {
            continue;
        }
        if id == "*" || id.eq_ignore_ascii_case("all") {
            return None;
        }
        ids.insert(id.to_string());
    }

    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

/// The effective suppressions for one analyzed line (or block).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionRecord {
    /// If true, all rules are suppressed (wildcard).
    pub suppress_all: bool,
    /// Set of specific rule IDs that are suppressed.
    pub suppressed_rules: HashSet<String>,
}

impl SuppressionRecord {
    /// Collect the unexpired directives in `text`.
    ///
    /// A directive on any line of a multi-line block applies to the whole block.
    pub fn scan(text: &str, syntax: Option<CommentSyntax<'_>>, today: NaiveDate) -> Self {
        let mut record = Self::default();
        let Some(syntax) = syntax else {
            return record;
        };

        for line in text.lines() {
            let Some(s) = parse_suppression(line, syntax) else {
                continue;
            };
            if s.is_expired(today) {
                debug!("suppression expired on {:?}", s.expires);
                continue;
            }
            match s.rule_ids {
                None => record.suppress_all = true,
                Some(ids) => record.suppressed_rules.extend(ids),
            }
        }

        record
    }

    pub fn is_suppressed(&self, rule_id: &str) -> bool {
        self.suppress_all || self.suppressed_rules.contains(rule_id)
    }

    pub fn is_empty(&self) -> bool {
        !self.suppress_all && self.suppressed_rules.is_empty()
    }
}

/// Drop matches the record suppresses. Inert unless `allow` is set.
pub fn filter_suppressed(matches: Vec<Match>, record: &SuppressionRecord, allow: bool) -> Vec<Match> {
    if !allow || record.is_empty() {
        return matches;
    }

    matches
        .into_iter()
        .filter(|m| !record.is_suppressed(m.rule_id()))
        .collect()
}
