//! PyOut Core - Live inline output for Python buffers
//!
//! This crate provides the data structures and pipeline logic for PyOut:
//! debounced classification of the active line, prefix execution through an
//! external interpreter, and single-slot inline annotations. It is consumed
//! by the terminal frontend in `pyout-cli`.

pub mod app;
pub mod buffer;
pub mod classify;
pub mod debounce;
pub mod exec;
pub mod explain;
pub mod format;
pub mod model;
pub mod theme;

pub use app::{App, Mode, SideEffect, BREAK_URL};
pub use buffer::EditBuffer;
pub use classify::{classify, Classification};
pub use debounce::{Debouncer, EVAL_DEBOUNCE};
pub use exec::{EvaluationRequest, ExecutionResult, Evaluator, Executor, EXEC_TIMEOUT};
pub use explain::{ExplainClient, ExplainHandle};
pub use format::annotate;
pub use model::{Annotation, AnnotationSlot, Document};
pub use theme::{Rgb, Theme};
