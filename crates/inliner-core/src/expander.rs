//! Recursive include expansion

use crate::classify::{Classifier, LineKind, SkipReason};
use crate::diagnostics::{Diagnostics, ExpansionEvent, TracingDiagnostics};
use crate::error::{ExpandError, ExpandResult};
use crate::options::{ExpandOptions, ResolutionPolicy};
use crate::output::{Entry, FlattenedText, SourceLocation};
use crate::resolve::{identity, SearchPaths};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Flattens a root source file and everything it includes into one unit.
///
/// The expander holds configuration only. Each call to [`Expander::expand`]
/// starts from an empty visited set, so calls are independent and one
/// expander can be shared between threads.
pub struct Expander {
    search_paths: SearchPaths,
    options: ExpandOptions,
    classifier: Classifier,
}

impl Expander {
    /// Expander with default options
    pub fn new<P: AsRef<Path>>(search_paths: impl IntoIterator<Item = P>) -> ExpandResult<Self> {
        Self::with_options(search_paths, ExpandOptions::default())
    }

    pub fn with_options<P: AsRef<Path>>(
        search_paths: impl IntoIterator<Item = P>,
        options: ExpandOptions,
    ) -> ExpandResult<Self> {
        let classifier = Classifier::new(&options)?;

        Ok(Self {
            search_paths: SearchPaths::new(search_paths),
            options,
            classifier,
        })
    }

    pub fn search_paths(&self) -> &SearchPaths {
        &self.search_paths
    }

    pub fn options(&self) -> &ExpandOptions {
        &self.options
    }

    /// Expand `root`, logging decisions through `tracing`
    pub fn expand(&self, root: impl AsRef<Path>) -> ExpandResult<FlattenedText> {
        self.expand_with(root, &mut TracingDiagnostics)
    }

    /// Expand `root`, reporting decisions to `diagnostics`
    pub fn expand_with(
        &self,
        root: impl AsRef<Path>,
        diagnostics: &mut dyn Diagnostics,
    ) -> ExpandResult<FlattenedText> {
        self.run(root.as_ref(), diagnostics)
    }

    #[instrument(skip_all, fields(root = %root.display()), level = "debug")]
    fn run(&self, root: &Path, diagnostics: &mut dyn Diagnostics) -> ExpandResult<FlattenedText> {
        let mut run = ExpansionRun {
            expander: self,
            diagnostics,
            visited: HashSet::new(),
            units: Vec::new(),
            entries: self
                .options
                .prelude
                .iter()
                .map(|line| Entry::Line(line.clone()))
                .collect(),
        };

        run.expand_unit(root)?;

        let ExpansionRun { entries, units, .. } = run;
        Ok(FlattenedText::from_entries(entries, units))
    }
}

/// Per-call state: visited identities and the output buffer
struct ExpansionRun<'a> {
    expander: &'a Expander,
    diagnostics: &'a mut dyn Diagnostics,
    visited: HashSet<PathBuf>,
    units: Vec<PathBuf>,
    entries: Vec<Entry>,
}

impl ExpansionRun<'_> {
    fn expand_unit(&mut self, path: &Path) -> ExpandResult<()> {
        if !self.visited.insert(identity(path)?) {
            self.diagnostics.record(ExpansionEvent::AlreadyInlined {
                path: path.to_path_buf(),
            });
            return Ok(());
        }

        let source = fs::read_to_string(path).map_err(|e| ExpandError::unreadable(path, e))?;

        self.diagnostics.record(ExpansionEvent::Entered {
            path: path.to_path_buf(),
        });
        self.units.push(path.to_path_buf());
        self.bind(path, 1);

        let expander = self.expander;
        for (index, line) in source.lines().enumerate() {
            let lineno = index + 1;

            match expander.classifier.classify(line) {
                LineKind::Ignored(reason) => {
                    self.diagnostics.record(ExpansionEvent::Skipped {
                        path: path.to_path_buf(),
                        line: lineno,
                        reason,
                    });
                }
                LineKind::DebugMarker => {
                    self.diagnostics.record(ExpansionEvent::DebugMarkerRewritten {
                        path: path.to_path_buf(),
                        line: lineno,
                    });
                    self.entries.extend(
                        expander
                            .options
                            .debug_marker
                            .replacement()
                            .into_iter()
                            .map(Entry::Line),
                    );
                    self.bind(path, lineno + 1);
                }
                LineKind::Internal(reference) => {
                    self.include(path, lineno, line, reference)?;
                }
                LineKind::External(name) => {
                    self.diagnostics.record(ExpansionEvent::Skipped {
                        path: path.to_path_buf(),
                        line: lineno,
                        reason: SkipReason::External(name.to_string()),
                    });
                }
                LineKind::Text => self.entries.push(Entry::Line(line.to_string())),
            }
        }

        Ok(())
    }

    fn include(
        &mut self,
        from: &Path,
        lineno: usize,
        line: &str,
        reference: &str,
    ) -> ExpandResult<()> {
        let expander = self.expander;
        let search_paths = &expander.search_paths;

        let Some(resolved) = search_paths.resolve(reference) else {
            let searched = search_paths.candidates(reference);
            self.diagnostics.record(ExpansionEvent::Unresolved {
                reference: reference.to_string(),
                path: from.to_path_buf(),
                line: lineno,
                searched: searched.clone(),
            });

            return match expander.options.policy {
                ResolutionPolicy::Strict => Err(ExpandError::NotFound {
                    reference: reference.to_string(),
                    included_from: from.to_path_buf(),
                    line: lineno,
                    searched,
                }),
                ResolutionPolicy::Lenient => {
                    self.diagnostics.record(ExpansionEvent::PassedThrough {
                        reference: reference.to_string(),
                        path: from.to_path_buf(),
                        line: lineno,
                    });
                    self.entries.push(Entry::Line(line.to_string()));
                    Ok(())
                }
            };
        };

        self.expand_unit(&resolved)?;
        self.bind(from, lineno + 1);
        Ok(())
    }

    fn bind(&mut self, path: &Path, line: usize) {
        if self.expander.options.annotate {
            self.entries
                .push(Entry::Bind(SourceLocation::new(path, line)));
        }
    }
}
