//! Flattened output with optional position bindings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A position in an original source unit (1-based line)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub path: PathBuf,
    pub line: usize,
}

impl SourceLocation {
    pub fn new(path: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    /// `#line` directive understood by C and C++ compilers
    pub fn line_directive(&self) -> String {
        let path = self
            .path
            .display()
            .to_string()
            .replace('\\', "\\\\")
            .replace('"', "\\\"");
        format!("#line {} \"{}\"", self.line, path)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.line)
    }
}

/// Binds `lines[index..]` to consecutive lines starting at `location`,
/// until the next binding takes over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBinding {
    pub index: usize,
    pub location: SourceLocation,
}

/// Raw expansion output before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Entry {
    Line(String),
    Bind(SourceLocation),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedText {
    lines: Vec<String>,
    bindings: Vec<LineBinding>,
    units: Vec<PathBuf>,
}

impl FlattenedText {
    /// Collapse blank runs and split bindings out of the entry stream.
    ///
    /// Bindings do not interrupt a blank run, so `lines()` is the same with
    /// or without annotation. When annotated, dropping a blank line rebinds
    /// the next kept line to its real source position.
    pub(crate) fn from_entries(entries: Vec<Entry>, units: Vec<PathBuf>) -> Self {
        let mut lines = Vec::with_capacity(entries.len());
        let mut bindings: Vec<LineBinding> = Vec::new();
        let mut in_blank_run = false;

        for entry in entries {
            match entry {
                Entry::Bind(location) => bindings.push(LineBinding {
                    index: lines.len(),
                    location,
                }),
                Entry::Line(text) if text.trim().is_empty() => {
                    if !in_blank_run {
                        lines.push(String::new());
                        in_blank_run = true;
                    } else if let Some(last) = bindings.last_mut() {
                        let index = lines.len();
                        if last.index == index {
                            last.location.line += 1;
                        } else {
                            let line = last.location.line + (index - last.index) + 1;
                            let location = SourceLocation::new(last.location.path.clone(), line);
                            bindings.push(LineBinding { index, location });
                        }
                    }
                }
                Entry::Line(text) => {
                    lines.push(text);
                    in_blank_run = false;
                }
            }
        }

        Self {
            lines,
            bindings,
            units,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Empty unless annotation was enabled
    pub fn bindings(&self) -> &[LineBinding] {
        &self.bindings
    }

    /// Inlined source units in first-inclusion order, root first
    pub fn units(&self) -> &[PathBuf] {
        &self.units
    }

    pub fn is_annotated(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Original position of `lines()[index]`, following `#line` semantics
    pub fn locate(&self, index: usize) -> Option<SourceLocation> {
        if index >= self.lines.len() {
            return None;
        }

        let binding = self.bindings.iter().rev().find(|b| b.index <= index)?;
        Some(SourceLocation {
            path: binding.location.path.clone(),
            line: binding.location.line + (index - binding.index),
        })
    }

    /// Text with a `#line` directive in front of every binding
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut bindings = self.bindings.iter().peekable();

        for (index, line) in self.lines.iter().enumerate() {
            while let Some(binding) = bindings.next_if(|b| b.index <= index) {
                out.push_str(&binding.location.line_directive());
                out.push('\n');
            }
            out.push_str(line);
            out.push('\n');
        }

        for binding in bindings {
            out.push_str(&binding.location.line_directive());
            out.push('\n');
        }

        out
    }

    /// Text without `#line` directives; line `n` of the result is `lines()[n - 1]`
    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for FlattenedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Collapse every run of blank or whitespace-only lines to one empty line
pub fn collapse_blank_runs<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Vec<String> {
    let entries = lines.into_iter().map(|l| Entry::Line(l.into())).collect();
    FlattenedText::from_entries(entries, Vec::new()).lines
}
