//! Process-wide lookup of loggers by name.
use crate::logger::Logger;
use crate::types::Severity;
use crate::Result;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// A table of named loggers.
///
/// Asking twice for the same name yields the same logger. Most programs use
/// the [`global`](#method.global) registry; tests and embedded setups can
/// keep their own.
#[derive(Debug, Default)]
pub struct Registry {
    loggers: Mutex<HashMap<String, Logger>>,
}
impl Registry {
    /// Makes an empty registry.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Returns the registry shared by the whole process.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Returns the logger registered under `name`, creating it (at `DEBUG`,
    /// without handlers) if needed.
    pub fn get_or_create(&self, name: &str) -> Result<Logger> {
        let mut loggers = self.lock();
        if let Some(logger) = loggers.get(name) {
            return Ok(logger.clone());
        }
        let logger = track!(Logger::new(name, Severity::Debug))?;
        loggers.insert(name.to_owned(), logger.clone());
        Ok(logger)
    }

    /// Returns the logger registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<Logger> {
        self.lock().get(name).cloned()
    }

    /// Registers `logger` under its own name, replacing any previous one.
    pub fn register(&self, logger: Logger) {
        self.lock().insert(logger.name().to_owned(), logger);
    }

    fn lock(&self) -> MutexGuard<HashMap<String, Logger>> {
        self.loggers.lock().unwrap_or_else(|e| e.into_inner())
    }
}
