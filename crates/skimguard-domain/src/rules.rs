use std::collections::{BTreeSet, HashSet};

use regex::{Regex, RegexBuilder};
use tracing::debug;

use skimguard_types::{FixConfig, Modifier, PatternConfig, RuleConfig, Severity};

#[derive(Debug, thiserror::Error)]
pub enum RuleCompileError {
    #[error("rule '{rule_id}' has no patterns")]
    MissingPatterns { rule_id: String },

    #[error("rule id '{rule_id}' is defined more than once")]
    DuplicateId { rule_id: String },

    #[error("rule '{rule_id}' has invalid regex '{pattern}': {source}")]
    InvalidRegex {
        rule_id: String,
        pattern: String,
        source: regex::Error,
    },
}

/// A pattern whose regex has been built once, at load time.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub source: String,
    pub modifiers: Vec<Modifier>,
    pub regex: Regex,
}

#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub id: String,
    pub name: String,
    pub message: String,
    pub severity: Severity,
    pub disabled: bool,
    pub languages: BTreeSet<String>,
    pub patterns: Vec<CompiledPattern>,
    pub overrides: Vec<String>,
    pub fixes: Vec<FixConfig>,
}

impl CompiledRule {
    /// True when the rule declares no languages, or shares one with `languages`.
    pub fn applies_to_any(&self, languages: &[&str]) -> bool {
        self.languages.is_empty() || languages.iter().any(|l| self.languages.contains(*l))
    }
}

pub fn compile_rules(configs: &[RuleConfig]) -> Result<Vec<CompiledRule>, RuleCompileError> {
    let mut out = Vec::with_capacity(configs.len());
    let mut seen: HashSet<&str> = HashSet::with_capacity(configs.len());

    for cfg in configs {
        if !seen.insert(cfg.id.as_str()) {
            return Err(RuleCompileError::DuplicateId {
                rule_id: cfg.id.clone(),
            });
        }

        if cfg.patterns.is_empty() {
            return Err(RuleCompileError::MissingPatterns {
                rule_id: cfg.id.clone(),
            });
        }

        let mut patterns = Vec::with_capacity(cfg.patterns.len());
        for p in &cfg.patterns {
            patterns.push(compile_pattern(&cfg.id, p)?);
        }

        out.push(CompiledRule {
            id: cfg.id.clone(),
            name: cfg.name.clone(),
            message: cfg.message.clone(),
            severity: cfg.severity,
            disabled: cfg.disabled,
            languages: cfg.languages.iter().cloned().collect(),
            patterns,
            overrides: cfg.overrides.clone(),
            fixes: cfg.fixes.clone(),
        });
    }

    debug!("compiled {} rules", out.len());
    Ok(out)
}

fn compile_pattern(rule_id: &str, p: &PatternConfig) -> Result<CompiledPattern, RuleCompileError> {
    let regex = RegexBuilder::new(&p.pattern)
        .case_insensitive(p.modifiers.contains(&Modifier::IgnoreCase))
        .multi_line(p.modifiers.contains(&Modifier::Multiline))
        .build()
        .map_err(|e| RuleCompileError::InvalidRegex {
            rule_id: rule_id.to_string(),
            pattern: p.pattern.clone(),
            source: e,
        })?;

    Ok(CompiledPattern {
        source: p.pattern.clone(),
        modifiers: p.modifiers.clone(),
        regex,
    })
}
