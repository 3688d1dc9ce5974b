use common::symbol::Symbol;
use source::{SourceLocation, SourceMap};
use std::fmt::{self, Display};

/// Point-in-time summary of one call frame. Holds no live references
/// into the stack or the scope arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSnapshot {
    pub name: Option<Symbol>,
    pub locals: usize,
    pub has_receiver: bool,
    pub location: SourceLocation,
}

impl FrameSnapshot {
    /// The frame description used in rendered traces.
    pub fn description(&self) -> String {
        match self.name {
            Some(name) => name.to_string(),
            None => "<anonymous>".into(),
        }
    }
}

/// An immutable copy of the call stack, outermost frame first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackTrace {
    frames: Vec<FrameSnapshot>,
}

impl StackTrace {
    pub(crate) fn new(frames: Vec<FrameSnapshot>) -> StackTrace {
        StackTrace { frames }
    }

    pub fn frames(&self) -> &[FrameSnapshot] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// One `<path>:<line>:<column> in <description>` line per frame,
    /// outermost first. This is the shape `runtime_diagnostic` expects
    /// for its notes.
    pub fn render(&self, sources: &SourceMap) -> Vec<String> {
        self.frames
            .iter()
            .map(|frame| format!("{} in {}", frame.location.display(sources), frame.description()))
            .collect()
    }

    pub fn display<'a>(&'a self, sources: &'a SourceMap) -> StackTraceDisplay<'a> {
        StackTraceDisplay {
            trace: self,
            sources,
        }
    }
}

pub struct StackTraceDisplay<'a> {
    trace: &'a StackTrace,
    sources: &'a SourceMap,
}

impl Display for StackTraceDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, frame) in self.trace.frames().iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{} in {}",
                frame.location.display(self.sources),
                frame.description()
            )?;
        }
        Ok(())
    }
}
