use std::sync::Arc;

use tracing::{debug, warn};

use skimguard_types::RuleConfig;

use crate::overrides::find_override_cycles;
use crate::rules::{compile_rules, CompiledRule, RuleCompileError};

/// Source of rules for the engine.
///
/// Returned order is store-defined; the cache and matcher preserve it.
pub trait RuleStore: Send + Sync {
    /// Rules whose declared languages intersect `languages`.
    fn rules_applicable_to(&self, languages: &[&str]) -> Vec<Arc<CompiledRule>>;
}

/// A rule store holding compiled rules in declaration order.
#[derive(Debug, Clone, Default)]
pub struct MemoryRuleStore {
    rules: Vec<Arc<CompiledRule>>,
}

impl MemoryRuleStore {
    pub fn new(rules: Vec<CompiledRule>) -> Self {
        for cycle in find_override_cycles(&rules) {
            warn!(
                "override cycle between rules {}: matches at a shared offset will remove each other",
                cycle.join(" -> ")
            );
        }

        debug!("rule store holds {} rules", rules.len());
        Self {
            rules: rules.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn from_configs(configs: &[RuleConfig]) -> Result<Self, RuleCompileError> {
        Ok(Self::new(compile_rules(configs)?))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, rule_id: &str) -> Option<&Arc<CompiledRule>> {
        self.rules.iter().find(|r| r.id == rule_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CompiledRule>> {
        self.rules.iter()
    }
}

impl RuleStore for MemoryRuleStore {
    fn rules_applicable_to(&self, languages: &[&str]) -> Vec<Arc<CompiledRule>> {
        self.rules
            .iter()
            .filter(|r| r.applies_to_any(languages))
            .cloned()
            .collect()
    }
}
