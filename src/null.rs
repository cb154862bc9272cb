//! Null handler.
use crate::build::BuilderCommon;
use crate::format::LineFormat;
use crate::handler::{Handler, Sink};
use crate::types::{LevelSpec, Severity};
use crate::{Build, Config, Result};
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;

/// A handler builder which builds handlers that discard every log record.
#[derive(Debug)]
pub struct NullHandlerBuilder {
    common: BuilderCommon,
}
impl NullHandlerBuilder {
    /// Makes a new `NullHandlerBuilder` instance.
    pub fn new() -> Self {
        NullHandlerBuilder {
            common: BuilderCommon::new("null", "DEBUG"),
        }
    }

    /// Sets the name of the handler.
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.common.name = name.to_owned();
        self
    }

    /// Sets the severity threshold of the handler.
    pub fn level<L: Into<LevelSpec>>(&mut self, level: L) -> &mut Self {
        self.common.level = level.into();
        self
    }

    /// Sets the line format of the handler.
    ///
    /// Records are still formatted, so formatting errors are reported.
    pub fn format(&mut self, format: impl LineFormat + 'static) -> &mut Self {
        self.common.format = Arc::new(format);
        self
    }
}
impl Default for NullHandlerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
impl Build for NullHandlerBuilder {
    fn build(&self) -> Result<Handler> {
        self.common.build_with_sink(|| Ok(NullSink))
    }
}

/// A sink that discards its input.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;
impl Sink for NullSink {
    fn emit(&self, _severity: Severity, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

/// The configuration of `NullHandlerBuilder`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct NullHandlerConfig {
    /// Handler name.
    #[serde(default)]
    pub name: Option<String>,
}
impl NullHandlerConfig {
    /// Creates a new `NullHandlerConfig` with default settings.
    pub fn new() -> Self {
        Default::default()
    }
}
impl Config for NullHandlerConfig {
    type Builder = NullHandlerBuilder;
    fn try_to_builder(&self) -> Result<Self::Builder> {
        let mut builder = NullHandlerBuilder::new();
        if let Some(ref name) = self.name {
            builder.name(name);
        }
        Ok(builder)
    }
}
