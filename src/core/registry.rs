//! Name-indexed collection of loggers
//!
//! A registry always holds a synchronous console logger named
//! [`ROOT_LOGGER_NAME`]. Other loggers are added once and looked up by name
//! from any thread. There is no process-wide instance; create one and share
//! it the way you share any other value.

use super::{
    error::{LoggerError, Result},
    logger::Logger,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub const ROOT_LOGGER_NAME: &str = "root";

pub struct LoggerRegistry {
    root: Arc<Logger>,
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    /// Create a registry whose root logger is sync, at Debug, writing to
    /// the console with the default pattern.
    pub fn new() -> Result<Self> {
        Ok(Self::with_root(Logger::builder(ROOT_LOGGER_NAME).build()?))
    }

    /// Create a registry around a custom root logger.
    ///
    /// The root is registered under its own name.
    pub fn with_root(root: Logger) -> Self {
        let root = Arc::new(root);
        let mut loggers = HashMap::new();
        loggers.insert(root.name().to_string(), Arc::clone(&root));
        Self {
            root,
            loggers: RwLock::new(loggers),
        }
    }

    /// Add `logger` under its name.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] if the name is taken;
    /// the existing logger is left untouched.
    pub fn register(&self, logger: Logger) -> Result<Arc<Logger>> {
        let mut loggers = self.loggers.write();
        if loggers.contains_key(logger.name()) {
            return Err(LoggerError::config(
                "LoggerRegistry",
                format!("a logger named '{}' is already registered", logger.name()),
            ));
        }
        let logger = Arc::new(logger);
        loggers.insert(logger.name().to_string(), Arc::clone(&logger));
        Ok(logger)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loggers.read().contains_key(name)
    }

    pub fn root(&self) -> Arc<Logger> {
        Arc::clone(&self.root)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("root", &self.root.name())
            .field("loggers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use crate::core::logger::LoggerKind;
    use std::thread;

    #[test]
    fn test_root_exists_up_front() {
        let registry = LoggerRegistry::new().unwrap();
        let root = registry.root();

        assert_eq!(root.name(), ROOT_LOGGER_NAME);
        assert_eq!(root.kind(), LoggerKind::Sync);
        assert_eq!(root.level(), LogLevel::Debug);
        assert!(registry.contains(ROOT_LOGGER_NAME));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_and_get() {
        let registry = LoggerRegistry::new().unwrap();
        let logger = Logger::builder("db").build().unwrap();
        let registered = registry.register(logger).unwrap();

        let found = registry.get("db").unwrap();
        assert!(Arc::ptr_eq(&registered, &found));
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.names(), vec!["db".to_string(), "root".to_string()]);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let registry = LoggerRegistry::new().unwrap();
        registry
            .register(Logger::builder("net").level(LogLevel::Info).build().unwrap())
            .unwrap();

        let err = registry
            .register(Logger::builder("net").level(LogLevel::Error).build().unwrap())
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert_eq!(registry.get("net").unwrap().level(), LogLevel::Info);
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = Arc::new(LoggerRegistry::new().unwrap());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    Logger::builder(format!("worker-{}", i))
                        .build_into(&registry)
                        .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(), 9);
    }
}
