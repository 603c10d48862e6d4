//! Shared test utilities for the skimguard workspace.
//!
//! This crate provides:
//! - **arb**: Proptest strategies for generating valid rules and text
//! - **fixtures**: Common sample rules
//!
//! # Example
//!
//! ```rust,ignore
//! use skimguard_testkit::arb;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     fn rules_compile(rules in arb::arb_rule_set()) {
//!         assert!(!rules.is_empty());
//!     }
//! }
//! ```

pub mod arb;
pub mod fixtures;

pub use arb::{arb_line, arb_regex_pattern, arb_rule_config, arb_rule_set, arb_severity};
pub use fixtures::sample_rules;
