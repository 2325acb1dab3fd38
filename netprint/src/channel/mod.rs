//! Channel layer: the session capability interface and its building blocks.
//!
//! This module defines the [`Session`]/[`Connector`] traits the
//! fingerprinting protocol talks to, the prompt grammar and error patterns
//! used to interpret device output, and two session implementations: an
//! SSH-backed [`PtySession`] and the scripted [`mock::MockSession`].

mod buffer;
pub mod mock;
mod patterns;
mod pty;
mod session;

pub use buffer::SessionBuffer;
pub use patterns::{DEFAULT_ERROR_PATTERNS, DEFAULT_PROMPT_PATTERN, ErrorPatterns, PromptGrammar};
pub use pty::{PtyConfig, PtySession};
pub use session::{Connector, Session, SessionCloser, Target};
