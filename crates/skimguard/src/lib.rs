//! Pattern-rule security analyzer.
//!
//! Loads rule libraries from TOML (with `includes`), optional language tables
//! from JSON or TOML, and wires them into a [`Processor`].
//!
//! ```rust,ignore
//! let processor = skimguard::Engine::from_config_path(Path::new("skimguard.toml"))?;
//! for m in processor.analyze("h = md5(x)", &["python"]) {
//!     println!("{} at {}", m.rule_id(), m.start);
//! }
//! ```

mod config_loader;
mod logging;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

pub use config_loader::{load_config_with_includes, load_languages};
pub use logging::init_logging;
pub use skimguard_domain::{
    apply_fix, CompiledRule, FixError, LanguageTable, Match, MemoryRuleStore, Processor,
    ProcessorOptions, RuleStore,
};
pub use skimguard_types::{ConfigFile, Finding, LanguagesFile, Severity, SeverityMask};

/// Resolved configuration ready to be turned into a [`Processor`].
#[derive(Debug, Clone, Default)]
pub struct Engine {
    pub config: ConfigFile,
    pub languages: Option<LanguagesFile>,
}

impl Engine {
    /// Load a rule configuration (with includes) and an optional languages file.
    pub fn load(config_path: &Path, languages_path: Option<&Path>) -> Result<Self> {
        let config = load_config_with_includes(config_path)?;
        let languages = languages_path.map(load_languages).transpose()?;
        Ok(Self { config, languages })
    }

    /// Load `path` and build a processor using the built-in language table.
    pub fn from_config_path(path: &Path) -> Result<Processor> {
        Self::load(path, None)?.build()
    }

    /// Compile the rules and assemble the processor.
    pub fn build(self) -> Result<Processor> {
        let store = MemoryRuleStore::from_configs(&self.config.rule).context("compile rules")?;
        info!("Loaded {} rules", store.len());

        let languages = match self.languages {
            Some(file) => LanguageTable::new(file),
            None => LanguageTable::built_in(),
        };
        let options = ProcessorOptions::from(&self.config.processor);

        Ok(Processor::new(Arc::new(store), Arc::new(languages)).with_options(options))
    }

    /// Reload rules from `path` into a running processor. Processor options
    /// and the language table are left untouched.
    pub fn reload_rules(processor: &Processor, path: &Path) -> Result<usize> {
        let config = load_config_with_includes(path)?;
        let store = MemoryRuleStore::from_configs(&config.rule).context("compile rules")?;
        let count = store.len();
        processor.set_rule_store(Arc::new(store));
        info!("Reloaded {} rules from '{}'", count, path.display());
        Ok(count)
    }
}
