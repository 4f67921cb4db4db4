//! Process-wide compiled rule cache.
//!
//! Pattern compilation is the expensive part of highlighting, so it happens once per
//! language for the process lifetime, never on a keystroke path. The registry is
//! populated on first request, read-only per entry afterwards, and safe for concurrent
//! reads from any number of documents.
//!
//! A language whose table fails to compile is recorded once and degrades to an empty
//! rule set: editing continues, that language just gets no highlighting.

use crate::rules::{RuleSet, builtin_rules};
use forge_lang::Language;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

/// Shared cache of compiled [`RuleSet`]s, one per [`Language`].
pub struct RuleRegistry {
    cache: RwLock<HashMap<Language, Arc<RuleSet>>>,
    errors: RwLock<HashMap<Language, String>>,
}

impl RuleRegistry {
    /// Create an empty registry (useful for tests; most callers want
    /// [`global`](Self::global)).
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            errors: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry instance.
    pub fn global() -> &'static RuleRegistry {
        static REGISTRY: OnceLock<RuleRegistry> = OnceLock::new();
        REGISTRY.get_or_init(RuleRegistry::new)
    }

    /// Compiled rules for `language`, compiling and caching on first request.
    ///
    /// Never fails: a compile error is recorded (see [`load_error`](Self::load_error))
    /// and the language falls back to an empty rule set.
    pub fn rules(&self, language: Language) -> Arc<RuleSet> {
        if let Some(rules) = self.cache.read().expect("rule cache poisoned").get(&language) {
            return Arc::clone(rules);
        }

        let rules = match builtin_rules(language) {
            Ok(rules) => Arc::new(rules),
            Err(err) => {
                self.errors
                    .write()
                    .expect("rule errors poisoned")
                    .entry(language)
                    .or_insert_with(|| err.to_string());
                Arc::new(RuleSet::empty(language.name()))
            }
        };

        let mut cache = self.cache.write().expect("rule cache poisoned");
        Arc::clone(cache.entry(language).or_insert(rules))
    }

    /// The compile error recorded for `language` at load time, if any.
    pub fn load_error(&self, language: Language) -> Option<String> {
        self.errors
            .read()
            .expect("rule errors poisoned")
            .get(&language)
            .cloned()
    }

    /// Install a custom rule set for `language`, replacing the built-in table.
    pub fn install(&self, language: Language, rules: RuleSet) {
        self.cache
            .write()
            .expect("rule cache poisoned")
            .insert(language, Arc::new(rules));
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_are_compiled_once_and_shared() {
        let registry = RuleRegistry::new();
        let first = registry.rules(Language::Python);
        let second = registry.rules(Language::Python);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_no_error_recorded_for_builtin_tables() {
        let registry = RuleRegistry::new();
        registry.rules(Language::JavaScript);
        assert!(registry.load_error(Language::JavaScript).is_none());
    }

    #[test]
    fn test_install_overrides_builtin() {
        let registry = RuleRegistry::new();
        registry.install(Language::Html, RuleSet::empty("custom"));
        assert_eq!(registry.rules(Language::Html).name(), "custom");
    }
}
