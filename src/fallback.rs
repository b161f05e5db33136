//! Explicit fallback results for collaborator calls.
//!
//! Every call to the text-generation collaborator goes through the same three
//! steps: call, parse, and fall back to a local answer. Each step returns a
//! [`Resolution`] and the caller settles it exactly once with
//! [`Resolution::resolve_with`], which is the only place a fallback is taken.

use crate::error::{NicheForgeError, Result};
use crate::types::PipelineMetrics;
use std::fmt;

/// Why a collaborator answer could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Collaborator unreachable, timed out or answered with a non-success status
    Transport(String),
    /// No JSON value could be extracted from the response text
    Malformed(String),
    /// JSON parsed but had the wrong shape or element types
    SchemaMismatch(String),
    /// Well-formed but empty answer
    Empty,
    /// A value outside the accepted domain, such as a score of 0 or 250
    OutOfRange(String),
    /// Collaborator not configured at all
    Unavailable,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Transport(msg) => write!(f, "transport error: {}", msg),
            FallbackReason::Malformed(msg) => write!(f, "malformed response: {}", msg),
            FallbackReason::SchemaMismatch(msg) => write!(f, "unexpected response shape: {}", msg),
            FallbackReason::Empty => write!(f, "empty response"),
            FallbackReason::OutOfRange(msg) => write!(f, "value out of range: {}", msg),
            FallbackReason::Unavailable => write!(f, "collaborator not configured"),
        }
    }
}

impl From<&NicheForgeError> for FallbackReason {
    fn from(err: &NicheForgeError) -> Self {
        match err {
            NicheForgeError::Parse { message, .. } => FallbackReason::Malformed(message.clone()),
            other => FallbackReason::Transport(other.to_string()),
        }
    }
}

/// Outcome of a collaborator step
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Ok(T),
    NeedsFallback(FallbackReason),
}

impl<T> Resolution<T> {
    pub fn fallback(reason: FallbackReason) -> Self {
        Resolution::NeedsFallback(reason)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Resolution::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Resolution::Ok(value) => Some(value),
            Resolution::NeedsFallback(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&FallbackReason> {
        match self {
            Resolution::Ok(_) => None,
            Resolution::NeedsFallback(reason) => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Ok(value) => Resolution::Ok(f(value)),
            Resolution::NeedsFallback(reason) => Resolution::NeedsFallback(reason),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Resolution<U>) -> Resolution<U> {
        match self {
            Resolution::Ok(value) => f(value),
            Resolution::NeedsFallback(reason) => Resolution::NeedsFallback(reason),
        }
    }

    /// Settle the step, taking `fallback` when needed and logging why.
    pub fn resolve_with(self, context: &str, fallback: impl FnOnce() -> T) -> T {
        match self {
            Resolution::Ok(value) => value,
            Resolution::NeedsFallback(reason) => {
                tracing::warn!(context = %context, reason = %reason, "Falling back to local result");
                fallback()
            }
        }
    }

    /// [`resolve_with`](Self::resolve_with) that also counts the fallback
    pub fn resolve_counted(
        self,
        context: &str,
        metrics: &PipelineMetrics,
        fallback: impl FnOnce() -> T,
    ) -> T {
        if !self.is_ok() {
            metrics.increment_fallbacks();
        }
        self.resolve_with(context, fallback)
    }
}

impl<T> From<Result<T>> for Resolution<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Resolution::Ok(value),
            Err(err) => Resolution::NeedsFallback(FallbackReason::from(&err)),
        }
    }
}
