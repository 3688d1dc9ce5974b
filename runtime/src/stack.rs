use crate::scope::{ScopeArena, ScopeId};
use crate::trace::{FrameSnapshot, StackTrace};
use crate::value::Value;
use common::symbol::Symbol;
use diagnostics::error::Error;
use diagnostics::result::Result;
use log::trace;
use source::SourceLocation;

/// Default bound on call nesting. Embedders that need deeper recursion
/// override it with `CallStack::with_max_depth`.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// One activation record: the scope active during the call and the
/// location of the call expression that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub scope: ScopeId,
    pub location: SourceLocation,
}

/// The ordered sequence of active call frames; the last element is the
/// innermost frame. Empty at program start and again after the
/// outermost call returns.
#[derive(Debug)]
pub struct CallStack {
    frames: Vec<CallSite>,
    max_depth: usize,
}

impl Default for CallStack {
    fn default() -> Self {
        CallStack::new()
    }
}

impl CallStack {
    pub fn new() -> CallStack {
        CallStack::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> CallStack {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Current call nesting depth.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Begins a call: appends a frame for `scope` at `location`. Fails
    /// without mutating the stack once `max_depth` frames are live; the
    /// caller can still snapshot the stack for a diagnostic trace before
    /// tearing down.
    pub fn push(&mut self, scope: ScopeId, location: SourceLocation) -> Result<CallSite> {
        if self.frames.len() >= self.max_depth {
            return Err(Error::StackOverflow {
                max_depth: self.max_depth,
            });
        }
        let site = CallSite { scope, location };
        self.frames.push(site);
        trace!("push frame, depth now {}", self.frames.len());
        Ok(site)
    }

    /// Ends the innermost call, removing and returning its frame.
    /// `EmptyStack` means call/return pairing is broken in the host
    /// interpreter.
    pub fn pop(&mut self) -> Result<CallSite> {
        match self.frames.pop() {
            Some(site) => {
                trace!("pop frame, depth now {}", self.frames.len());
                Ok(site)
            }
            None => Err(Error::EmptyStack),
        }
    }

    /// The innermost frame, read-only. `None` when the stack is empty.
    pub fn current(&self) -> Option<&CallSite> {
        self.frames.last()
    }

    /// Copies the live frames into an immutable trace, outermost frame
    /// first. Later mutation of the stack or the scopes does not affect
    /// a taken snapshot.
    pub fn snapshot(&self, scopes: &ScopeArena) -> StackTrace {
        let frames = self
            .frames
            .iter()
            .map(|site| {
                let scope = scopes.get(site.scope);
                FrameSnapshot {
                    name: scope.name(),
                    locals: scope.local_count(),
                    has_receiver: scopes.receiver(site.scope).is_some(),
                    location: site.location,
                }
            })
            .collect();
        StackTrace::new(frames)
    }

    /// Resolves `name` against the current frame's scope chain: local
    /// slots first, then outward through the parents. `None` when the
    /// stack is empty or no binding exists anywhere in the chain.
    pub fn resolve(&self, scopes: &ScopeArena, name: Symbol) -> Option<Value> {
        let site = self.current()?;
        scopes.resolve(site.scope, name)
    }

    /// The receiver bound for the current frame, if any.
    pub fn receiver(&self, scopes: &ScopeArena) -> Option<Value> {
        let site = self.current()?;
        scopes.receiver(site.scope)
    }
}
