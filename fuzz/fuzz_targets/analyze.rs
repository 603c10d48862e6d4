//! Fuzz target for the full analysis pipeline.
//!
//! Random rules and text go through rule compilation, the rule cache,
//! evaluation, suppression filtering and override resolution.

#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use skimguard_domain::{LanguageTable, MemoryRuleStore, Processor, ProcessorOptions};
use skimguard_types::{Modifier, PatternConfig, RuleConfig, Severity, SeverityMask};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    rules: Vec<FuzzRule>,
    text: String,
    languages: Vec<u8>,
    /// Bit set over `Severity::ALL`.
    severities: u8,
    allow_suppressions: bool,
    suppression: Option<FuzzSuppression>,
}

#[derive(Arbitrary, Debug)]
struct FuzzRule {
    severity: u8,
    disabled: bool,
    languages: Vec<u8>,
    patterns: Vec<(String, bool, bool)>,
    overrides: Vec<u8>,
}

#[derive(Arbitrary, Debug)]
struct FuzzSuppression {
    wildcard: bool,
    rule_ids: Vec<u8>,
    until: Option<(u16, u8, u8)>,
}

const LANGUAGES: &[&str] = &["rust", "python", "csharp", "sql", "xml", "powershell", "unknown"];

fn language(v: u8) -> &'static str {
    LANGUAGES[usize::from(v) % LANGUAGES.len()]
}

fn rule_id(v: u8, count: usize) -> String {
    format!("R{}", usize::from(v) % count.max(1))
}

impl FuzzSuppression {
    fn to_directive(&self, count: usize) -> String {
        let ids = if self.wildcard {
            "*".to_string()
        } else {
            self.rule_ids
                .iter()
                .map(|v| rule_id(*v, count))
                .collect::<Vec<_>>()
                .join(",")
        };
        match self.until {
            Some((y, m, d)) => format!("// skimguard: ignore {ids} until {y:04}-{m:02}-{d:02}"),
            None => format!("// skimguard: ignore {ids}"),
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    let count = input.rules.len().min(16);
    let configs: Vec<RuleConfig> = input
        .rules
        .iter()
        .take(count)
        .enumerate()
        .filter(|(_, r)| !r.patterns.is_empty())
        // Skip very long patterns to avoid regex compilation timeout
        .filter(|(_, r)| r.patterns.iter().all(|(p, _, _)| p.len() <= 200))
        .map(|(i, r)| RuleConfig {
            id: format!("R{i}"),
            name: String::new(),
            severity: Severity::ALL[usize::from(r.severity) % Severity::ALL.len()],
            message: String::new(),
            disabled: r.disabled,
            languages: r.languages.iter().map(|v| language(*v).to_string()).collect(),
            patterns: r
                .patterns
                .iter()
                .map(|(pattern, ignore_case, multiline)| {
                    let mut modifiers = Vec::new();
                    if *ignore_case {
                        modifiers.push(Modifier::IgnoreCase);
                    }
                    if *multiline {
                        modifiers.push(Modifier::Multiline);
                    }
                    PatternConfig {
                        pattern: pattern.clone(),
                        modifiers,
                    }
                })
                .collect(),
            overrides: r.overrides.iter().map(|v| rule_id(*v, count)).collect(),
            fixes: vec![],
        })
        .collect();

    // Invalid regexes are expected with random input.
    let Ok(store) = MemoryRuleStore::from_configs(&configs) else {
        return;
    };

    let severities: SeverityMask = Severity::ALL
        .iter()
        .copied()
        .filter(|s| input.severities & s.bit() != 0)
        .collect();
    let options = ProcessorOptions {
        severities,
        allow_suppressions: input.allow_suppressions,
    };
    let processor =
        Processor::new(Arc::new(store), Arc::new(LanguageTable::built_in())).with_options(options);

    let text = match &input.suppression {
        Some(s) => format!("{} {}", input.text, s.to_directive(count)),
        None => input.text.clone(),
    };
    let languages: Vec<&str> = input.languages.iter().take(4).map(|v| language(*v)).collect();

    let first = processor.analyze(&text, &languages);
    for m in &first {
        assert!(m.end() <= text.len(), "match past end of text");
        assert!(text.is_char_boundary(m.start) && text.is_char_boundary(m.end()));
        assert!(!m.rule.disabled);
        assert!(severities.contains(m.rule.severity));
    }

    // Second call goes through the cache and must agree.
    let second = processor.analyze(&text, &languages);
    assert_eq!(first, second);
});
