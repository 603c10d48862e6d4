use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::debug;

use skimguard_types::{Finding, ProcessorConfig, SeverityMask};

use crate::cache::RuleCache;
use crate::evaluate::{evaluate_rules, Match};
use crate::language::LanguageTable;
use crate::overrides::resolve_overrides;
use crate::store::RuleStore;
use crate::suppression::{filter_suppressed, SuppressionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorOptions {
    /// Only rules whose severity is in this mask are evaluated.
    pub severities: SeverityMask,
    /// Honor inline suppression directives. Off by default.
    pub allow_suppressions: bool,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            severities: SeverityMask::ALL,
            allow_suppressions: false,
        }
    }
}

impl From<&ProcessorConfig> for ProcessorOptions {
    fn from(cfg: &ProcessorConfig) -> Self {
        Self {
            severities: cfg.severity_mask(),
            allow_suppressions: cfg.suppressions_allowed(),
        }
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Runs the analysis pipeline: rule cache, pattern matching, suppression,
/// overrides.
#[derive(Debug)]
pub struct Processor {
    cache: RuleCache,
    languages: Arc<LanguageTable>,
    options: ProcessorOptions,
    today: fn() -> NaiveDate,
}

impl Processor {
    pub fn new(store: Arc<dyn RuleStore>, languages: Arc<LanguageTable>) -> Self {
        Self {
            cache: RuleCache::new(store),
            languages,
            options: ProcessorOptions::default(),
            today: local_today,
        }
    }

    pub fn with_options(mut self, options: ProcessorOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the clock used to expire dated suppressions.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn options(&self) -> ProcessorOptions {
        self.options
    }

    pub fn set_options(&mut self, options: ProcessorOptions) {
        self.options = options;
    }

    pub fn languages(&self) -> &LanguageTable {
        &self.languages
    }

    /// Swap the rule store. Every cached rule lookup is discarded.
    pub fn set_rule_store(&self, store: Arc<dyn RuleStore>) {
        self.cache.replace_store(store);
    }

    /// Analyze `text` against the rules applicable to `languages`.
    ///
    /// Suppression directives are read with the comment syntax of the first
    /// language only.
    pub fn analyze(&self, text: &str, languages: &[&str]) -> Vec<Match> {
        let rules = self.cache.resolve(languages);
        let matches = evaluate_rules(text, &rules, self.options.severities);
        if matches.is_empty() {
            return matches;
        }

        let syntax = languages
            .first()
            .and_then(|lang| self.languages.comment_syntax(lang));
        let record = SuppressionRecord::scan(text, syntax, (self.today)());
        let matches = filter_suppressed(matches, &record, self.options.allow_suppressions);

        resolve_overrides(matches)
    }

    /// Analyze a whole file line by line, using the language its name maps to.
    ///
    /// Files whose language is unknown yield no findings.
    pub fn analyze_file(&self, file_name: &str, contents: &str) -> Vec<Finding> {
        let Some(language) = self.languages.language_for_file_name(file_name) else {
            debug!("no language for '{}'; skipping", file_name);
            return vec![];
        };

        let mut findings = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            for m in self.analyze(line, &[language]) {
                findings.push(Finding {
                    rule_id: m.rule.id.clone(),
                    severity: m.rule.severity,
                    message: m.rule.message.clone(),
                    line: u32::try_from(idx + 1).unwrap_or(u32::MAX),
                    column: byte_to_column(line, m.start),
                    match_text: m.text(line).to_string(),
                });
            }
        }

        debug!("{}: {} findings", file_name, findings.len());
        findings
    }
}

fn byte_to_column(s: &str, byte_idx: usize) -> u32 {
    let prefix = s.get(..byte_idx).unwrap_or(s);
    u32::try_from(prefix.chars().count() + 1).unwrap_or(u32::MAX)
}
