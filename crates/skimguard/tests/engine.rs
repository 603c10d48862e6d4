//! End-to-end tests: configuration on disk through to findings and fixes.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use skimguard::{apply_fix, Engine, Severity};

const RULES: &str = r#"
[[rule]]
id = "SG0001"
name = "Weak hash algorithm"
severity = "important"
message = "MD5 is not collision resistant."
languages = ["python", "csharp"]
patterns = [{ pattern = '\bmd5\b', modifiers = ["ignorecase"] }]

[[rule.fixes]]
type = "regex_replace"
name = "Use SHA-256"
search = '(?i)\bmd5\b'
replace = "sha256"

[[rule]]
id = "SG0002"
name = "Weak hash object creation"
severity = "critical"
languages = ["csharp"]
patterns = [{ pattern = 'MD5\.Create\(' }]
overrides = ["SG0001"]

[[rule]]
id = "SG0003"
name = "Insecure transport"
severity = "moderate"
patterns = [{ pattern = 'http://' }]
"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn findings_from_config_on_disk() {
    let temp = TempDir::new().unwrap();
    let config = write(temp.path(), "skimguard.toml", RULES);

    let processor = Engine::from_config_path(&config).unwrap();
    let findings = processor.analyze_file(
        "src/hash.py",
        "import hashlib\nh = hashlib.md5(data)\nurl = \"http://example.com\"\n",
    );

    let got: Vec<_> = findings
        .iter()
        .map(|f| (f.rule_id.as_str(), f.line, f.column, f.match_text.as_str()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("SG0001", 2, 13, "md5"),
            ("SG0003", 3, 8, "http://"),
        ]
    );
    assert_eq!(findings[0].severity, Severity::Important);
    assert_eq!(findings[0].message, "MD5 is not collision resistant.");
}

#[test]
fn override_applies_only_where_the_overrider_is_in_scope() {
    let temp = TempDir::new().unwrap();
    let config = write(temp.path(), "skimguard.toml", RULES);
    let processor = Engine::from_config_path(&config).unwrap();

    let line = "var h = MD5.Create();";
    let csharp: Vec<_> = processor
        .analyze(line, &["csharp"])
        .iter()
        .map(|m| m.rule_id().to_string())
        .collect();
    assert_eq!(csharp, vec!["SG0002"]);

    // SG0002 is C#-only, so Python keeps the generic hit.
    let python: Vec<_> = processor
        .analyze(line, &["python"])
        .iter()
        .map(|m| m.rule_id().to_string())
        .collect();
    assert_eq!(python, vec!["SG0001"]);
}

#[test]
fn suppressions_need_to_be_enabled_in_config() {
    let temp = TempDir::new().unwrap();
    let line = "h = hashlib.md5(data)  # skimguard: ignore SG0001";

    let off = write(temp.path(), "off.toml", RULES);
    let processor = Engine::from_config_path(&off).unwrap();
    assert_eq!(processor.analyze(line, &["python"]).len(), 1);

    let on = write(
        temp.path(),
        "on.toml",
        &format!("[processor]\nallow_suppressions = true\n{RULES}"),
    );
    let processor = Engine::from_config_path(&on).unwrap();
    assert!(processor.analyze(line, &["python"]).is_empty());
}

#[test]
fn severity_selection_from_config() {
    let temp = TempDir::new().unwrap();
    let config = write(
        temp.path(),
        "skimguard.toml",
        &format!("[processor]\nseverities = [\"moderate\"]\n{RULES}"),
    );
    let processor = Engine::from_config_path(&config).unwrap();

    let ids: Vec<_> = processor
        .analyze("md5 http://x", &["python"])
        .iter()
        .map(|m| m.rule_id().to_string())
        .collect();
    assert_eq!(ids, vec!["SG0003"]);
}

#[test]
fn fix_rewrites_the_matched_line() {
    let temp = TempDir::new().unwrap();
    let config = write(temp.path(), "skimguard.toml", RULES);
    let processor = Engine::from_config_path(&config).unwrap();

    let line = "h = hashlib.md5(data)";
    let matches = processor.analyze(line, &["python"]);
    assert_eq!(matches.len(), 1);

    let fix = &matches[0].rule.fixes[0];
    let fixed = apply_fix(line, fix).unwrap();
    assert_eq!(fixed, "h = hashlib.sha256(data)");
    assert!(processor.analyze(&fixed, &["python"]).is_empty());
}

#[test]
fn includes_compose_a_rule_library() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "base.toml", RULES);
    let main = write(
        temp.path(),
        "main.toml",
        r#"
includes = ["base.toml"]

[[rule]]
id = "SG0003"
severity = "moderate"
disabled = true
patterns = [{ pattern = 'http://' }]
"#,
    );

    let processor = Engine::from_config_path(&main).unwrap();
    assert!(processor.analyze("http://example.com", &["python"]).is_empty());
    assert_eq!(processor.analyze("md5", &["python"]).len(), 1);
}

#[test]
fn custom_language_table() {
    let temp = TempDir::new().unwrap();
    let config = write(
        temp.path(),
        "skimguard.toml",
        r#"
[processor]
allow_suppressions = true

[[rule]]
id = "LUA1"
severity = "low"
languages = ["lua"]
patterns = [{ pattern = 'loadstring' }]
"#,
    );
    let languages = write(
        temp.path(),
        "languages.json",
        r#"{
  "language": [{ "name": "lua", "extensions": [".lua"] }],
  "comment": [{ "languages": ["lua"], "inline": "--" }]
}"#,
    );

    let processor = Engine::load(&config, Some(&languages))
        .unwrap()
        .build()
        .unwrap();

    let findings = processor.analyze_file(
        "init.lua",
        "f = loadstring(s)\ng = loadstring(t) -- skimguard: ignore LUA1\n",
    );
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].line, 1);

    // The custom table replaces the built-in one entirely.
    assert!(processor.analyze_file("main.rs", "loadstring").is_empty());
}

#[test]
fn reload_swaps_rules_in_place() {
    let temp = TempDir::new().unwrap();
    let config = write(temp.path(), "skimguard.toml", RULES);
    let processor = Engine::from_config_path(&config).unwrap();
    assert_eq!(processor.analyze("md5", &["python"]).len(), 1);

    let replacement = write(
        temp.path(),
        "replacement.toml",
        r#"
[[rule]]
id = "SG0100"
severity = "low"
patterns = [{ pattern = 'eval\(' }]
"#,
    );
    let count = Engine::reload_rules(&processor, &replacement).unwrap();
    assert_eq!(count, 1);

    assert!(processor.analyze("md5", &["python"]).is_empty());
    assert_eq!(processor.analyze("eval(x)", &["python"]).len(), 1);
}

#[test]
fn invalid_regex_is_reported_at_load() {
    let temp = TempDir::new().unwrap();
    let config = write(
        temp.path(),
        "bad.toml",
        r#"
[[rule]]
id = "SG0001"
severity = "low"
patterns = [{ pattern = '(unclosed' }]
"#,
    );

    let err = Engine::from_config_path(&config).unwrap_err();
    assert!(format!("{err:#}").contains("compile rules"));
}

#[test]
fn findings_serialize_for_reporting() {
    let temp = TempDir::new().unwrap();
    let config = write(temp.path(), "skimguard.toml", RULES);
    let processor = Engine::from_config_path(&config).unwrap();

    let findings = processor.analyze_file("hash.py", "h = hashlib.md5(data)\n");
    let json = serde_json::to_string_pretty(&findings).unwrap();

    insta::assert_snapshot!(json, @r#"
    [
      {
        "rule_id": "SG0001",
        "severity": "important",
        "message": "MD5 is not collision resistant.",
        "line": 1,
        "column": 13,
        "match_text": "md5"
      }
    ]
    "#);
}
