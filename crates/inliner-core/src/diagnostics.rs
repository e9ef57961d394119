//! Diagnostics emitted while expanding
//!
//! The expander reports every resolution and skip decision to a
//! [`Diagnostics`] sink. [`TracingDiagnostics`] forwards them to `tracing`;
//! [`RecordingDiagnostics`] keeps them for inspection.

use crate::classify::SkipReason;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, error, info, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "event")]
pub enum ExpansionEvent {
    /// A source unit is being inlined for the first time
    Entered { path: PathBuf },
    /// A source unit was referenced again and contributed nothing
    AlreadyInlined { path: PathBuf },
    Skipped {
        path: PathBuf,
        line: usize,
        reason: SkipReason,
    },
    DebugMarkerRewritten { path: PathBuf, line: usize },
    Unresolved {
        reference: String,
        path: PathBuf,
        line: usize,
        searched: Vec<PathBuf>,
    },
    /// Lenient policy kept an unresolved directive as plain text
    PassedThrough {
        reference: String,
        path: PathBuf,
        line: usize,
    },
}

pub trait Diagnostics {
    fn record(&mut self, event: ExpansionEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&mut self, event: ExpansionEvent) {
        match event {
            ExpansionEvent::Entered { path } => info!("include: {}", path.display()),
            ExpansionEvent::AlreadyInlined { path } => {
                debug!("already inlined: {}", path.display())
            }
            ExpansionEvent::Skipped {
                path,
                line,
                reason: SkipReason::External(name),
            } => info!("ignoring: <{}> at {}:{}", name, path.display(), line),
            ExpansionEvent::Skipped { path, line, reason } => {
                trace!("dropped {:?} at {}:{}", reason, path.display(), line)
            }
            ExpansionEvent::DebugMarkerRewritten { path, line } => {
                debug!("rewrote debug header at {}:{}", path.display(), line)
            }
            ExpansionEvent::Unresolved {
                reference,
                path,
                line,
                ..
            } => error!("cannot find: {} ({}:{})", reference, path.display(), line),
            ExpansionEvent::PassedThrough {
                reference,
                path,
                line,
            } => warn!(
                "keeping unresolved include {} at {}:{}",
                reference,
                path.display(),
                line
            ),
        }
    }
}

/// Keeps every event in order
#[derive(Debug, Default, Clone)]
pub struct RecordingDiagnostics {
    pub events: Vec<ExpansionEvent>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths of units entered, in order
    pub fn entered(&self) -> Vec<&PathBuf> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ExpansionEvent::Entered { path } => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn skip_reasons(&self) -> Vec<&SkipReason> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ExpansionEvent::Skipped { reason, .. } => Some(reason),
                _ => None,
            })
            .collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn record(&mut self, event: ExpansionEvent) {
        self.events.push(event);
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn record(&mut self, event: ExpansionEvent) {
        (**self).record(event);
    }
}
