//! Domain logic: rule compilation, caching and evaluation.
//!
//! This crate is designed to be I/O-free and highly testable.

pub mod cache;
pub mod evaluate;
pub mod fix;
pub mod language;
pub mod overrides;
pub mod processor;
pub mod rules;
pub mod store;
pub mod suppression;

pub use cache::{RuleCache, RuleSet};
pub use evaluate::{evaluate_rules, Match};
pub use fix::{apply_fix, FixError};
pub use language::{CommentSyntax, LanguageTable};
pub use overrides::{find_override_cycles, resolve_overrides};
pub use processor::{Processor, ProcessorOptions};
pub use rules::{compile_rules, CompiledPattern, CompiledRule, RuleCompileError};
pub use store::{MemoryRuleStore, RuleStore};
pub use suppression::{filter_suppressed, parse_suppression, Suppression, SuppressionRecord};
