use crate::file::RotatingFileHandlerBuilder;
use crate::format::{DefaultLineFormat, LineFormat};
use crate::handler::{Handler, Sink};
use crate::null::NullHandlerBuilder;
use crate::syslog::SyslogHandlerBuilder;
use crate::terminal::TerminalHandlerBuilder;
use crate::types::LevelSpec;
use crate::Result;
use std::sync::Arc;

/// This trait allows to build a log handler instance.
pub trait Build {
    /// Builds a log handler.
    fn build(&self) -> Result<Handler>;
}

/// Handler builder.
#[derive(Debug)]
#[allow(missing_docs)]
#[non_exhaustive]
pub enum HandlerBuilder {
    File(RotatingFileHandlerBuilder),
    Null(NullHandlerBuilder),
    Syslog(SyslogHandlerBuilder),
    Terminal(TerminalHandlerBuilder),
}
impl Build for HandlerBuilder {
    fn build(&self) -> Result<Handler> {
        match *self {
            HandlerBuilder::File(ref b) => track!(b.build()),
            HandlerBuilder::Null(ref b) => track!(b.build()),
            HandlerBuilder::Syslog(ref b) => track!(b.build()),
            HandlerBuilder::Terminal(ref b) => track!(b.build()),
        }
    }
}

/// Settings shared by every handler builder.
#[derive(Debug, Clone)]
pub(crate) struct BuilderCommon {
    pub name: String,
    pub level: LevelSpec,
    pub format: Arc<dyn LineFormat>,
}
impl BuilderCommon {
    pub fn new(name: &str, level: &str) -> Self {
        BuilderCommon {
            name: name.to_owned(),
            level: LevelSpec::from(level),
            format: Arc::new(DefaultLineFormat::default()),
        }
    }

    /// Resolves the level, then opens the sink and wraps it into a `Handler`.
    pub fn build_with_sink<S, F>(&self, open_sink: F) -> Result<Handler>
    where
        S: Sink + 'static,
        F: FnOnce() -> Result<S>,
    {
        let level = track!(self.level.resolve())?;
        let sink = track!(open_sink())?;
        Ok(Handler::new(
            self.name.clone(),
            level,
            self.format.clone(),
            Box::new(sink),
        ))
    }
}
