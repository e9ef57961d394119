//! Include expansion engine for inliner
//!
//! Flattens a root source file and the library headers it includes into a
//! single compilation unit. Each header is inlined at most once; include
//! guards, `#pragma once`, comments and standard headers are dropped; and
//! position bindings can be recorded so diagnostics on the flattened file
//! map back to the original sources.
//!
//! ```no_run
//! use inliner_core::{ExpandOptions, Expander};
//!
//! let expander = Expander::with_options(["."], ExpandOptions::new().with_annotations(true))?;
//! let flattened = expander.expand("contest/a/a.cpp")?;
//! std::fs::write("contest/out.cpp", flattened.render())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classify;
pub mod diagnostics;
pub mod error;
pub mod expander;
pub mod options;
pub mod output;
pub mod resolve;

pub use classify::{Classifier, LineKind, SkipReason};
pub use diagnostics::{Diagnostics, ExpansionEvent, RecordingDiagnostics, TracingDiagnostics};
pub use error::{ExpandError, ExpandResult};
pub use expander::Expander;
pub use options::{DebugMarker, ExpandOptions, IncludeSyntax, ResolutionPolicy};
pub use output::{FlattenedText, LineBinding, SourceLocation};
pub use resolve::SearchPaths;
