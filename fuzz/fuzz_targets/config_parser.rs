//! Fuzz target for TOML rule-file parsing and rule compilation.

#![no_main]

use libfuzzer_sys::fuzz_target;

use skimguard_domain::{compile_rules, find_override_cycles};
use skimguard_types::{ConfigFile, LanguagesFile};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(config) = toml::from_str::<ConfigFile>(text) {
        // Skip very long patterns to avoid regex compilation timeout
        if config
            .rule
            .iter()
            .flat_map(|r| &r.patterns)
            .any(|p| p.pattern.len() > 500)
        {
            return;
        }
        if let Ok(rules) = compile_rules(&config.rule) {
            assert_eq!(rules.len(), config.rule.len());
            for cycle in find_override_cycles(&rules) {
                assert!(cycle.len() >= 2);
                assert_eq!(cycle.first(), cycle.last());
            }
        }
    }

    let _ = toml::from_str::<LanguagesFile>(text);
});
