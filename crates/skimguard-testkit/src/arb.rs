//! Proptest strategies for generating valid test inputs.
//!
//! Strategies are constructive: every generated pattern compiles, and rule sets
//! have unique ids, so tests never need to filter.
//!
//! # Bounds
//!
//! - Max rules per set: 8
//! - Max patterns per rule: 4
//! - Max line length: 120 bytes

use proptest::prelude::*;

use skimguard_types::{Modifier, PatternConfig, RuleConfig, Severity};

/// Maximum number of rules in a generated rule set
pub const MAX_RULES: usize = 8;

/// Maximum number of patterns per rule
pub const MAX_PATTERNS_PER_RULE: usize = 4;

/// Maximum line length in bytes
pub const MAX_LINE_LENGTH: usize = 120;

/// Words both patterns and generated text draw from, so matches actually occur.
pub const VOCABULARY: &[&str] = &[
    "md5", "sha1", "eval", "exec", "http", "password", "random", "strcpy", "des", "rc4",
];

pub fn arb_severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

pub fn arb_modifiers() -> impl Strategy<Value = Vec<Modifier>> {
    prop_oneof![
        Just(vec![]),
        Just(vec![Modifier::IgnoreCase]),
        Just(vec![Modifier::Multiline]),
        Just(vec![Modifier::IgnoreCase, Modifier::Multiline]),
    ]
}

pub fn arb_word() -> impl Strategy<Value = String> {
    prop::sample::select(VOCABULARY.to_vec()).prop_map(|s| s.to_string())
}

/// Strategy for generating valid regex patterns built from the vocabulary.
pub fn arb_regex_pattern() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_word(),
        arb_word().prop_map(|w| format!(r"\b{w}\b")),
        arb_word().prop_map(|w| format!(r"{w}\s*\(")),
        (arb_word(), arb_word()).prop_map(|(a, b)| format!("({a}|{b})")),
        Just("[0-9]+".to_string()),
        Just(r"https?://".to_string()),
    ]
}

pub fn arb_pattern_config() -> impl Strategy<Value = PatternConfig> {
    (arb_regex_pattern(), arb_modifiers())
        .prop_map(|(pattern, modifiers)| PatternConfig { pattern, modifiers })
}

pub fn arb_language() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["rust", "python", "javascript", "csharp", "java", "go"])
        .prop_map(|s| s.to_string())
}

/// Strategy for generating a single valid rule with the given id.
///
/// Overrides are left empty; [`arb_rule_set`] wires them between rules.
pub fn arb_rule_config(id: String) -> impl Strategy<Value = RuleConfig> {
    (
        arb_severity(),
        any::<bool>(),                                                          // disabled
        prop::collection::vec(arb_language(), 0..3),                            // languages
        prop::collection::vec(arb_pattern_config(), 1..=MAX_PATTERNS_PER_RULE), // patterns
    )
        .prop_map(move |(severity, disabled, languages, patterns)| RuleConfig {
            id: id.clone(),
            name: String::new(),
            severity,
            message: format!("{id} matched"),
            disabled,
            languages,
            patterns,
            overrides: vec![],
            fixes: vec![],
        })
}

/// Strategy for a rule set with ids `SG0000..` and random override edges.
pub fn arb_rule_set() -> impl Strategy<Value = Vec<RuleConfig>> {
    (1..=MAX_RULES).prop_flat_map(|n| {
        let rules: Vec<_> = (0..n)
            .map(|i| arb_rule_config(format!("SG{i:04}")))
            .collect();
        let edges = prop::collection::vec((0..n, 0..n), 0..n);
        (rules, edges).prop_map(|(mut rules, edges)| {
            for (from, to) in edges {
                let target = rules[to].id.clone();
                if from != to && !rules[from].overrides.contains(&target) {
                    rules[from].overrides.push(target);
                }
            }
            rules
        })
    })
}

/// Strategy for a line of source text sprinkled with vocabulary words.
pub fn arb_line() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        3 => arb_word(),
        1 => arb_word().prop_map(|w| w.to_uppercase()),
        2 => prop::string::string_regex("[a-z_]{1,8}").expect("valid regex"),
        1 => Just("(".to_string()),
        1 => Just("123".to_string()),
    ];
    prop::collection::vec(token, 0..12).prop_map(|tokens| {
        let mut line = tokens.join(" ");
        line.truncate(MAX_LINE_LENGTH);
        line
    })
}
