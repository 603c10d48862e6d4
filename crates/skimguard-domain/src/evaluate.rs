use std::fmt;
use std::sync::Arc;

use tracing::trace;

use skimguard_types::SeverityMask;

use crate::rules::{CompiledPattern, CompiledRule};

/// An occurrence of a rule's winning pattern in the analyzed text.
#[derive(Clone)]
pub struct Match {
    /// Byte offset into the analyzed text.
    pub start: usize,
    /// Length in bytes.
    pub len: usize,
    pub rule: Arc<CompiledRule>,
}

impl Match {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn rule_id(&self) -> &str {
        &self.rule.id
    }

    /// The matched slice of `text`, which must be the text this match came from.
    pub fn text<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.start..self.end()).unwrap_or("")
    }
}

impl PartialEq for Match {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.len == other.len && self.rule.id == other.rule.id
    }
}

impl Eq for Match {}

impl fmt::Debug for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("rule", &self.rule.id)
            .field("start", &self.start)
            .field("len", &self.len)
            .finish()
    }
}

/// Run every eligible rule against `text`.
///
/// Output follows rule order, then occurrence order within each rule's winning
/// pattern.
pub fn evaluate_rules(
    text: &str,
    rules: &[Arc<CompiledRule>],
    severities: SeverityMask,
) -> Vec<Match> {
    let mut matches = Vec::new();

    for rule in rules {
        if rule.disabled || !severities.contains(rule.severity) {
            continue;
        }

        trace!("evaluating rule {}", rule.id);
        if let Some(spans) = first_matching_pattern(&rule.patterns, text) {
            matches.extend(spans.into_iter().map(|(start, end)| Match {
                start,
                len: end - start,
                rule: Arc::clone(rule),
            }));
        }
    }

    matches
}

/// Spans of the first pattern with at least one occurrence. Later patterns are
/// not run once one has matched.
fn first_matching_pattern(patterns: &[CompiledPattern], text: &str) -> Option<Vec<(usize, usize)>> {
    for p in patterns {
        let spans: Vec<_> = p.regex.find_iter(text).map(|m| (m.start(), m.end())).collect();
        if !spans.is_empty() {
            return Some(spans);
        }
    }
    None
}
