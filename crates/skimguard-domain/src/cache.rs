//! Memoization of rule-store lookups.
//!
//! Entries are keyed by the exact ordered language sequence a caller asked for.
//! `["a", "b"]` and `["b", "a"]` are distinct keys, and no case folding is done.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::rules::CompiledRule;
use crate::store::RuleStore;

pub type RuleSet = Arc<[Arc<CompiledRule>]>;

struct CacheState {
    store: Arc<dyn RuleStore>,
    entries: HashMap<LanguageKey, RuleSet>,
}

/// An ordered language sequence, hashed and compared element by element so
/// owned keys can be found with a borrowed `&[&str]`.
trait LanguageSeq {
    fn count(&self) -> usize;
    fn at(&self, i: usize) -> &str;
}

impl Hash for dyn LanguageSeq + '_ {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.count());
        for i in 0..self.count() {
            self.at(i).hash(state);
        }
    }
}

impl PartialEq for dyn LanguageSeq + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.count() == other.count() && (0..self.count()).all(|i| self.at(i) == other.at(i))
    }
}

impl Eq for dyn LanguageSeq + '_ {}

/// Owned cache key.
#[derive(PartialEq, Eq)]
struct LanguageKey(Vec<String>);

impl LanguageSeq for LanguageKey {
    fn count(&self) -> usize {
        self.0.len()
    }

    fn at(&self, i: usize) -> &str {
        &self.0[i]
    }
}

impl Hash for LanguageKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self as &dyn LanguageSeq).hash(state);
    }
}

impl<'a> Borrow<dyn LanguageSeq + 'a> for LanguageKey {
    fn borrow(&self) -> &(dyn LanguageSeq + 'a) {
        self
    }
}

/// Lookup key borrowed from the caller.
struct LanguageSlice<'a>(&'a [&'a str]);

impl LanguageSeq for LanguageSlice<'_> {
    fn count(&self) -> usize {
        self.0.len()
    }

    fn at(&self, i: usize) -> &str {
        self.0[i]
    }
}

/// Thread-safe cache in front of a [`RuleStore`].
///
/// The store lives under the same lock as the entries, so a miss is always
/// filled from the store that is current at insertion time.
pub struct RuleCache {
    state: RwLock<CacheState>,
}

impl RuleCache {
    pub fn new(store: Arc<dyn RuleStore>) -> Self {
        Self {
            state: RwLock::new(CacheState {
                store,
                entries: HashMap::new(),
            }),
        }
    }

    /// Rules applicable to `languages`, querying the store only on a miss.
    pub fn resolve(&self, languages: &[&str]) -> RuleSet {
        {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(hit) = lookup(&state.entries, languages) {
                return hit;
            }
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have filled the entry between the two locks.
        if let Some(hit) = lookup(&state.entries, languages) {
            return hit;
        }

        let rules: RuleSet = state.store.rules_applicable_to(languages).into();
        debug!(
            "rule cache miss for {:?}: {} rules resolved",
            languages,
            rules.len()
        );
        state.entries.insert(
            LanguageKey(languages.iter().map(|l| l.to_string()).collect()),
            Arc::clone(&rules),
        );
        rules
    }

    /// Swap the backing store and drop every cached entry.
    pub fn replace_store(&self, store: Arc<dyn RuleStore>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        debug!(
            "rule store replaced; dropping {} cached entries",
            state.entries.len()
        );
        state.store = store;
        state.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for RuleCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

fn lookup(entries: &HashMap<LanguageKey, RuleSet>, languages: &[&str]) -> Option<RuleSet> {
    let key = LanguageSlice(languages);
    entries.get(&key as &dyn LanguageSeq).cloned()
}
