//! Common test fixtures for skimguard.

use skimguard_types::{FixConfig, FixKind, Modifier, PatternConfig, RuleConfig, Severity};

/// Collection of sample rule configurations for testing.
pub mod sample_rules {
    use super::*;

    /// Build a rule with the common fields filled in.
    pub fn rule(id: &str, severity: Severity, languages: &[&str], patterns: &[&str]) -> RuleConfig {
        RuleConfig {
            id: id.to_string(),
            name: String::new(),
            severity,
            message: format!("{id} matched"),
            disabled: false,
            languages: languages.iter().map(|s| s.to_string()).collect(),
            patterns: patterns.iter().map(|p| PatternConfig::new(*p)).collect(),
            overrides: vec![],
            fixes: vec![],
        }
    }

    /// Weak-hash rules for C#: a generic rule and a more specific one that
    /// overrides it.
    pub fn weak_hashes() -> Vec<RuleConfig> {
        vec![
            RuleConfig {
                name: "Weak hash algorithm".to_string(),
                message: "MD5 is not collision resistant.".to_string(),
                patterns: vec![PatternConfig::with_modifiers(
                    r"\bmd5\b",
                    &[Modifier::IgnoreCase],
                )],
                fixes: vec![FixConfig {
                    kind: FixKind::RegexReplace,
                    name: "Use SHA-256".to_string(),
                    search: r"(?i)\bmd5\b".to_string(),
                    replace: "SHA256".to_string(),
                }],
                ..rule("SG0001", Severity::Important, &["csharp"], &[])
            },
            RuleConfig {
                name: "Weak hash object creation".to_string(),
                message: "MD5.Create() returns a weak hash implementation.".to_string(),
                overrides: vec!["SG0001".to_string()],
                ..rule("SG0002", Severity::Critical, &["csharp"], &[r"MD5\.Create\("])
            },
        ]
    }

    /// A rule with several patterns where only the later ones match typical text.
    pub fn multi_pattern() -> RuleConfig {
        rule(
            "SG0100",
            Severity::Moderate,
            &[],
            &["never_present_token", "bar", "qux"],
        )
    }
}
