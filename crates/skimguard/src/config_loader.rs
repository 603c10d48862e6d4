//! Configuration loading with include resolution.
//!
//! This module handles loading configuration files with support for:
//! - `includes` directive to compose rule libraries from multiple files
//! - Circular include detection along the current include chain (a library
//!   included from two branches is not a cycle)
//! - Merge semantics (later definitions override earlier ones by rule id)

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

use skimguard_types::{ConfigFile, LanguagesFile, RuleConfig};

/// Maximum depth for include resolution to prevent excessive nesting.
const MAX_INCLUDE_DEPTH: usize = 10;

/// Load a configuration file with include resolution.
///
/// Included files are merged first, in listed order; the including file is
/// merged last and wins.
pub fn load_config_with_includes(path: &Path) -> Result<ConfigFile> {
    let mut chain = Vec::new();
    load_config_recursive(path, &mut chain, 0)
}

/// `chain` holds the canonical paths of the files currently being loaded,
/// outermost first.
fn load_config_recursive(
    path: &Path,
    chain: &mut Vec<PathBuf>,
    depth: usize,
) -> Result<ConfigFile> {
    if depth > MAX_INCLUDE_DEPTH {
        bail!(
            "Include depth exceeded maximum of {} levels at '{}'",
            MAX_INCLUDE_DEPTH,
            path.display()
        );
    }

    // Canonicalize path for consistent comparison
    let canonical = path
        .canonicalize()
        .with_context(|| format!("canonicalize path '{}'", path.display()))?;

    if chain.contains(&canonical) {
        bail!("Circular include detected: '{}'", path.display());
    }

    chain.push(canonical);
    let loaded = load_config_file(path, chain, depth);
    chain.pop();
    loaded
}

fn load_config_file(path: &Path, chain: &mut Vec<PathBuf>, depth: usize) -> Result<ConfigFile> {
    debug!("Loading config from '{}' (depth {})", path.display(), depth);

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;

    let config: ConfigFile =
        toml::from_str(&text).with_context(|| format!("parse config '{}'", path.display()))?;

    if config.includes.is_empty() {
        return Ok(config);
    }

    let base_dir = path.parent().unwrap_or(Path::new("."));

    let mut merged = ConfigFile::default();
    for include_path in &config.includes {
        let full_path = base_dir.join(include_path);
        debug!(
            "Resolving include '{}' relative to '{}'",
            include_path,
            base_dir.display()
        );

        if !full_path.exists() {
            bail!(
                "Included config file not found: '{}' (resolved from '{}')",
                full_path.display(),
                include_path
            );
        }

        let included = load_config_recursive(&full_path, chain, depth + 1)?;
        merged = merge_configs(merged, included);
    }

    let main_without_includes = ConfigFile {
        includes: vec![],
        processor: config.processor,
        rule: config.rule,
    };
    Ok(merge_configs(merged, main_without_includes))
}

/// Merge two configs. Rules from `other` replace rules from `base` with the
/// same id in place; new ids are appended in their declared order. Processor
/// fields set in `other` win one by one.
fn merge_configs(base: ConfigFile, other: ConfigFile) -> ConfigFile {
    let processor = base.processor.overlay(other.processor);

    let mut rules: Vec<RuleConfig> = base.rule;
    for rule in other.rule {
        match rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => *existing = rule,
            None => rules.push(rule),
        }
    }

    ConfigFile {
        includes: vec![],
        processor,
        rule: rules,
    }
}

/// Load a language/comment table. `.json` files are read as JSON, anything
/// else as TOML.
pub fn load_languages(path: &Path) -> Result<LanguagesFile> {
    debug!("Loading languages from '{}'", path.display());

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read languages '{}'", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&text).with_context(|| format!("parse languages '{}'", path.display()))
    } else {
        toml::from_str(&text).with_context(|| format!("parse languages '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skimguard_types::{ProcessorConfig, Severity};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_simple_config_no_includes() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[[rule]]
id = "SG0001"
severity = "critical"
patterns = [{ pattern = "md5" }]
"#,
        )
        .unwrap();

        let result = load_config_with_includes(&config_path).unwrap();
        assert_eq!(result.rule.len(), 1);
        assert_eq!(result.rule[0].id, "SG0001");
        assert_eq!(result.processor, ProcessorConfig::default());
    }

    #[test]
    fn test_include_single_file() {
        let temp = TempDir::new().unwrap();

        fs::write(
            temp.path().join("base.toml"),
            r#"
[[rule]]
id = "base.rule"
severity = "low"
patterns = [{ pattern = "base" }]
"#,
        )
        .unwrap();

        let main_path = temp.path().join("main.toml");
        fs::write(
            &main_path,
            r#"
includes = ["base.toml"]

[[rule]]
id = "main.rule"
severity = "important"
patterns = [{ pattern = "main" }]
"#,
        )
        .unwrap();

        let result = load_config_with_includes(&main_path).unwrap();
        let ids: Vec<_> = result.rule.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["base.rule", "main.rule"]);
    }

    #[test]
    fn test_include_override_by_id_keeps_position() {
        let temp = TempDir::new().unwrap();

        fs::write(
            temp.path().join("base.toml"),
            r#"
[[rule]]
id = "shared.rule"
severity = "low"
message = "From base"
patterns = [{ pattern = "base" }]

[[rule]]
id = "other.rule"
severity = "low"
patterns = [{ pattern = "other" }]
"#,
        )
        .unwrap();

        let main_path = temp.path().join("main.toml");
        fs::write(
            &main_path,
            r#"
includes = ["base.toml"]

[[rule]]
id = "shared.rule"
severity = "critical"
message = "From main"
patterns = [{ pattern = "main" }]
"#,
        )
        .unwrap();

        let result = load_config_with_includes(&main_path).unwrap();
        assert_eq!(result.rule.len(), 2);
        assert_eq!(result.rule[0].id, "shared.rule");
        assert_eq!(result.rule[0].message, "From main");
        assert_eq!(result.rule[0].severity, Severity::Critical);
        assert_eq!(result.rule[1].id, "other.rule");
    }

    #[test]
    fn test_processor_section_of_including_file_wins() {
        let temp = TempDir::new().unwrap();

        fs::write(
            temp.path().join("base.toml"),
            "[processor]\nseverities = [\"low\"]\n",
        )
        .unwrap();

        let main_path = temp.path().join("main.toml");
        fs::write(
            &main_path,
            "includes = [\"base.toml\"]\n\n[processor]\nallow_suppressions = true\n",
        )
        .unwrap();

        let result = load_config_with_includes(&main_path).unwrap();
        assert!(result.processor.suppressions_allowed());
        // Not set in main.toml, so the included value is inherited.
        assert_eq!(result.processor.severities, Some(vec![Severity::Low]));
    }

    #[test]
    fn test_including_file_can_switch_suppressions_back_off() {
        let temp = TempDir::new().unwrap();

        fs::write(
            temp.path().join("base.toml"),
            "[processor]\nallow_suppressions = true\n",
        )
        .unwrap();

        let main_path = temp.path().join("main.toml");
        fs::write(
            &main_path,
            "includes = [\"base.toml\"]\n\n[processor]\nallow_suppressions = false\n",
        )
        .unwrap();

        let result = load_config_with_includes(&main_path).unwrap();
        assert_eq!(result.processor.allow_suppressions, Some(false));
        assert!(!result.processor.suppressions_allowed());
    }

    #[test]
    fn test_default_processor_section_keeps_included_one() {
        let temp = TempDir::new().unwrap();

        fs::write(
            temp.path().join("base.toml"),
            "[processor]\nseverities = [\"low\"]\n",
        )
        .unwrap();

        let main_path = temp.path().join("main.toml");
        fs::write(&main_path, "includes = [\"base.toml\"]\n").unwrap();

        let result = load_config_with_includes(&main_path).unwrap();
        assert_eq!(result.processor.severities, Some(vec![Severity::Low]));
    }

    #[test]
    fn test_circular_include_detected() {
        let temp = TempDir::new().unwrap();
        let a_path = temp.path().join("a.toml");
        let b_path = temp.path().join("b.toml");

        fs::write(&a_path, "includes = [\"b.toml\"]\n").unwrap();
        fs::write(&b_path, "includes = [\"a.toml\"]\n").unwrap();

        let result = load_config_with_includes(&a_path);
        assert!(result.unwrap_err().to_string().contains("Circular include"));
    }

    #[test]
    fn test_diamond_include_is_not_circular() {
        let temp = TempDir::new().unwrap();

        fs::write(
            temp.path().join("common.toml"),
            r#"
[[rule]]
id = "common.rule"
severity = "low"
patterns = [{ pattern = "common" }]
"#,
        )
        .unwrap();
        fs::write(
            temp.path().join("b.toml"),
            r#"
includes = ["common.toml"]

[[rule]]
id = "b.rule"
severity = "low"
patterns = [{ pattern = "b" }]
"#,
        )
        .unwrap();
        fs::write(
            temp.path().join("c.toml"),
            r#"
includes = ["common.toml"]

[[rule]]
id = "c.rule"
severity = "low"
patterns = [{ pattern = "c" }]
"#,
        )
        .unwrap();

        let main_path = temp.path().join("main.toml");
        fs::write(&main_path, "includes = [\"b.toml\", \"c.toml\"]\n").unwrap();

        let result = load_config_with_includes(&main_path).unwrap();
        let ids: Vec<_> = result.rule.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["common.rule", "b.rule", "c.rule"]);
    }

    #[test]
    fn test_self_include_is_circular() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("self.toml");
        fs::write(&path, "includes = [\"self.toml\"]\n").unwrap();

        let result = load_config_with_includes(&path);
        assert!(result.unwrap_err().to_string().contains("Circular include"));
    }

    #[test]
    fn test_missing_include_errors() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "includes = [\"nonexistent.toml\"]\n").unwrap();

        let result = load_config_with_includes(&config_path);
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_include_depth_limit_exceeded() {
        let temp = TempDir::new().unwrap();

        for i in 0..=MAX_INCLUDE_DEPTH + 1 {
            let path = temp.path().join(format!("level{}.toml", i));
            if i < MAX_INCLUDE_DEPTH + 1 {
                fs::write(&path, format!("includes = [\"level{}.toml\"]\n", i + 1)).unwrap();
            } else {
                fs::write(&path, "").unwrap();
            }
        }

        let result = load_config_with_includes(&temp.path().join("level0.toml"));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Include depth exceeded"));
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("bad.toml");
        fs::write(&config_path, "invalid = [").unwrap();

        let err = load_config_with_includes(&config_path).unwrap_err();
        assert!(err.to_string().contains("parse config"));
    }

    #[test]
    fn test_unknown_modifier_is_rejected_at_load() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[[rule]]
id = "SG0001"
severity = "critical"
patterns = [{ pattern = "md5", modifiers = ["dotall"] }]
"#,
        )
        .unwrap();

        assert!(load_config_with_includes(&config_path).is_err());
    }

    #[test]
    fn test_load_languages_json_and_toml() {
        let temp = TempDir::new().unwrap();

        let json_path = temp.path().join("languages.json");
        fs::write(
            &json_path,
            r#"{
  "language": [{ "name": "lua", "extensions": [".lua"] }],
  "comment": [{ "languages": ["lua"], "inline": "--" }]
}"#,
        )
        .unwrap();
        let json = load_languages(&json_path).unwrap();
        assert_eq!(json.language[0].name, "lua");
        assert_eq!(json.comment[0].inline, "--");
        assert_eq!(json.comment[0].suffix, "");

        let toml_path = temp.path().join("languages.toml");
        fs::write(
            &toml_path,
            r#"
[[language]]
name = "lua"
extensions = [".lua"]

[[comment]]
languages = ["lua"]
inline = "--"
"#,
        )
        .unwrap();
        assert_eq!(load_languages(&toml_path).unwrap(), json);
    }
}
