//! Data types (rules, languages, findings) for skimguard.
//!
//! This crate is intentionally "dumb": pure DTOs with serde + schemars, plus the
//! small `SeverityMask` flag set the engine filters with.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Severity ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Important,
    Moderate,
    Low,
    Informational,
    DefenseInDepth,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Critical,
        Severity::Important,
        Severity::Moderate,
        Severity::Low,
        Severity::Informational,
        Severity::DefenseInDepth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Important => "important",
            Severity::Moderate => "moderate",
            Severity::Low => "low",
            Severity::Informational => "informational",
            Severity::DefenseInDepth => "defense_in_depth",
        }
    }

    /// The single bit this severity occupies in a [`SeverityMask`].
    pub fn bit(self) -> u8 {
        match self {
            Severity::Critical => 1 << 0,
            Severity::Important => 1 << 1,
            Severity::Moderate => 1 << 2,
            Severity::Low => 1 << 3,
            Severity::Informational => 1 << 4,
            Severity::DefenseInDepth => 1 << 5,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bitwise-OR combination of severities.
///
/// A rule is eligible when its severity bit intersects the mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SeverityMask(u8);

impl SeverityMask {
    pub const NONE: SeverityMask = SeverityMask(0);
    pub const ALL: SeverityMask = SeverityMask(0b0011_1111);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, severity: Severity) -> bool {
        self.0 & severity.bit() != 0
    }

    pub fn intersects(self, other: SeverityMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, severity: Severity) {
        self.0 |= severity.bit();
    }

    pub fn remove(&mut self, severity: Severity) {
        self.0 &= !severity.bit();
    }

    /// Severities present in the mask, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Severity> {
        Severity::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl fmt::Debug for SeverityMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl From<Severity> for SeverityMask {
    fn from(severity: Severity) -> Self {
        SeverityMask(severity.bit())
    }
}

impl FromIterator<Severity> for SeverityMask {
    fn from_iter<I: IntoIterator<Item = Severity>>(iter: I) -> Self {
        let mut mask = SeverityMask::NONE;
        for s in iter {
            mask.insert(s);
        }
        mask
    }
}

impl BitOr for SeverityMask {
    type Output = SeverityMask;

    fn bitor(self, rhs: SeverityMask) -> SeverityMask {
        SeverityMask(self.0 | rhs.0)
    }
}

impl BitOr<Severity> for SeverityMask {
    type Output = SeverityMask;

    fn bitor(self, rhs: Severity) -> SeverityMask {
        SeverityMask(self.0 | rhs.bit())
    }
}

impl BitOr for Severity {
    type Output = SeverityMask;

    fn bitor(self, rhs: Severity) -> SeverityMask {
        SeverityMask(self.bit() | rhs.bit())
    }
}

impl BitOrAssign<Severity> for SeverityMask {
    fn bitor_assign(&mut self, rhs: Severity) {
        self.insert(rhs);
    }
}

impl BitAnd for SeverityMask {
    type Output = SeverityMask;

    fn bitand(self, rhs: SeverityMask) -> SeverityMask {
        SeverityMask(self.0 & rhs.0)
    }
}

// ── Rules ──────────────────────────────────────────────────────

/// Regex modifiers a pattern may carry.
///
/// The legacy upper-case spellings (`IGNORECASE`, `MULTILINE`) are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    #[serde(alias = "IGNORECASE", alias = "ignore_case")]
    IgnoreCase,
    #[serde(alias = "MULTILINE")]
    Multiline,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::IgnoreCase => "ignorecase",
            Modifier::Multiline => "multiline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PatternConfig {
    /// Regular expression source.
    pub pattern: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

impl PatternConfig {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            modifiers: vec![],
        }
    }

    pub fn with_modifiers(pattern: impl Into<String>, modifiers: &[Modifier]) -> Self {
        Self {
            pattern: pattern.into(),
            modifiers: modifiers.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FixKind {
    RegexReplace,
    /// Any fix type this version does not know how to apply.
    #[serde(other)]
    Unsupported,
}

impl FixKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FixKind::RegexReplace => "regex_replace",
            FixKind::Unsupported => "unsupported",
        }
    }
}

/// A textual substitution recipe attached to a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FixConfig {
    #[serde(rename = "type")]
    pub kind: FixKind,

    /// Human-readable label, e.g. "Use SHA-256 instead".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Regex locating the text to replace.
    pub search: String,

    /// Replacement template; may reference capture groups (`$1`, `${name}`).
    #[serde(default)]
    pub replace: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    pub severity: Severity,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,

    /// Language identifiers this rule applies to. Empty means "all".
    #[serde(default)]
    pub languages: Vec<String>,

    /// Patterns, tried in declared order.
    pub patterns: Vec<PatternConfig>,

    /// Ids of rules whose matches at the same offset this rule supersedes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<FixConfig>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

// ── Configuration ──────────────────────────────────────────────

/// Processor settings. Unset fields fall back to the defaults (all
/// severities, suppressions off) and are inherited through `includes`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ProcessorConfig {
    /// Severities whose rules are evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severities: Option<Vec<Severity>>,

    /// Honor inline `skimguard: ignore` directives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_suppressions: Option<bool>,
}

impl ProcessorConfig {
    pub fn severity_mask(&self) -> SeverityMask {
        match &self.severities {
            Some(list) => list.iter().copied().collect(),
            None => SeverityMask::ALL,
        }
    }

    pub fn suppressions_allowed(&self) -> bool {
        self.allow_suppressions.unwrap_or(false)
    }

    /// Layer `over` on top of `self`, field by field. Fields set in `over`
    /// win, even when set to their default value.
    pub fn overlay(self, over: ProcessorConfig) -> ProcessorConfig {
        ProcessorConfig {
            severities: over.severities.or(self.severities),
            allow_suppressions: over.allow_suppressions.or(self.allow_suppressions),
        }
    }
}

/// The on-disk configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ConfigFile {
    /// Include other config files. Paths are relative to this config file's directory.
    /// Rules are merged: later definitions override earlier ones by rule ID.
    /// `[processor]` fields set in the including file override the included
    /// ones; fields it leaves out are inherited.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,

    #[serde(default)]
    pub processor: ProcessorConfig,

    #[serde(default)]
    pub rule: Vec<RuleConfig>,
}

// ── Languages ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LanguageDefinition {
    pub name: String,

    /// File extensions including the leading dot, e.g. `.rs`.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Exact file names, e.g. `Dockerfile`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CommentDefinition {
    /// Language identifiers sharing this comment syntax.
    pub languages: Vec<String>,

    #[serde(default)]
    pub inline: String,

    #[serde(default)]
    pub prefix: String,

    #[serde(default)]
    pub suffix: String,
}

/// Language and comment tables, as persisted on disk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct LanguagesFile {
    #[serde(default)]
    pub language: Vec<LanguageDefinition>,

    #[serde(default)]
    pub comment: Vec<CommentDefinition>,
}

impl LanguagesFile {
    pub fn built_in() -> Self {
        fn lang(name: &str, extensions: &[&str], file_names: &[&str]) -> LanguageDefinition {
            LanguageDefinition {
                name: name.to_string(),
                extensions: extensions.iter().map(|s| s.to_string()).collect(),
                file_names: file_names.iter().map(|s| s.to_string()).collect(),
            }
        }

        fn comment(languages: &[&str], inline: &str, prefix: &str, suffix: &str) -> CommentDefinition {
            CommentDefinition {
                languages: languages.iter().map(|s| s.to_string()).collect(),
                inline: inline.to_string(),
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            }
        }

        Self {
            language: vec![
                lang("rust", &[".rs"], &[]),
                lang("python", &[".py", ".pyw"], &[]),
                lang("javascript", &[".js", ".jsx", ".mjs", ".cjs"], &[]),
                lang("typescript", &[".ts", ".tsx", ".mts", ".cts"], &[]),
                lang("go", &[".go"], &[]),
                lang("java", &[".java"], &[]),
                lang("kotlin", &[".kt", ".kts"], &[]),
                lang("ruby", &[".rb", ".rake"], &["Rakefile", "Gemfile"]),
                lang("c", &[".c", ".h"], &[]),
                lang("cpp", &[".cpp", ".cc", ".cxx", ".hpp", ".hxx", ".hh"], &[]),
                lang("csharp", &[".cs"], &[]),
                lang("php", &[".php"], &[]),
                lang("powershell", &[".ps1", ".psm1", ".psd1"], &[]),
                lang("shellscript", &[".sh", ".bash"], &[]),
                lang("sql", &[".sql"], &[]),
                lang("yaml", &[".yml", ".yaml"], &[]),
                lang("xml", &[".xml", ".config", ".csproj"], &[]),
                lang("html", &[".html", ".htm"], &[]),
                lang("dockerfile", &[], &["Dockerfile"]),
            ],
            comment: vec![
                comment(
                    &[
                        "rust",
                        "javascript",
                        "typescript",
                        "go",
                        "java",
                        "kotlin",
                        "c",
                        "cpp",
                        "csharp",
                        "php",
                    ],
                    "//",
                    "/*",
                    "*/",
                ),
                comment(
                    &["python", "ruby", "shellscript", "yaml", "dockerfile"],
                    "#",
                    "",
                    "",
                ),
                comment(&["powershell"], "#", "<#", "#>"),
                comment(&["sql"], "--", "/*", "*/"),
                comment(&["xml", "html"], "", "<!--", "-->"),
            ],
        }
    }
}

// ── Findings ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub rule_id: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column, in characters.
    pub column: u32,
    pub match_text: String,
}
