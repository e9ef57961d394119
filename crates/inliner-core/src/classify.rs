//! Line classification
//!
//! Each source line is tested against an ordered list of predicates and the
//! first match decides what the expander does with it:
//!
//! 1. ignorable markers (include guards, `#pragma once`, comments,
//!    allow-listed headers)
//! 2. the debug header directive
//! 3. internal references such as `#include <lib/graph.hpp>`
//! 4. any other `#include`
//! 5. plain text

use crate::error::{ExpandError, ExpandResult};
use crate::options::ExpandOptions;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Why a line was dropped from the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "name")]
pub enum SkipReason {
    IncludeGuard,
    PragmaOnce,
    Comment,
    /// Header satisfied by the allow-list
    AllowListed(String),
    /// Include that is neither internal nor allow-listed
    External(String),
}

/// Outcome of classifying a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Ignored(SkipReason),
    DebugMarker,
    /// Internal reference to resolve against the search paths
    Internal(&'a str),
    External(&'a str),
    Text,
}

pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with("//")
}

pub fn is_pragma_once(line: &str) -> bool {
    let Some(directive) = line.trim().strip_prefix('#') else {
        return false;
    };

    let mut tokens = directive.split_whitespace();
    matches!(
        (tokens.next(), tokens.next()),
        (Some("pragma"), Some("once"))
    ) && tokens.next().map_or(true, |rest| rest.starts_with("//"))
}

pub struct Classifier {
    internal: Regex,
    include: Regex,
    guard: Regex,
    allow_list: BTreeSet<String>,
    debug_directive: Option<String>,
}

impl Classifier {
    pub fn new(options: &ExpandOptions) -> ExpandResult<Self> {
        let syntax = &options.syntax;
        if syntax.namespace.is_empty() || syntax.suffix.is_empty() {
            return Err(ExpandError::InvalidSyntax(
                "namespace and suffix must not be empty".to_string(),
            ));
        }

        let internal = compile(&format!(
            r"^#\s*include\s*<({}/[a-z0-9_/]*{})>",
            regex::escape(&syntax.namespace),
            regex::escape(&syntax.suffix),
        ))?;
        let include = compile(r#"^#\s*include\s*(?:<([^<>]*)>|"([^"]*)")"#)?;
        let guard = compile(&format!(
            r"^#\s*(?:ifndef|define|endif)\b.*\b{}[A-Z0-9_]*{}\b",
            regex::escape(&syntax.guard_prefix()),
            regex::escape(&syntax.guard_suffix()),
        ))?;

        let marker = &options.debug_marker;
        let debug_directive = marker
            .enabled
            .then(|| marker.directive.trim().to_string());

        Ok(Self {
            internal,
            include,
            guard,
            allow_list: options.allow_list.clone(),
            debug_directive,
        })
    }

    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        if let Some(reason) = self.ignore_reason(line) {
            return LineKind::Ignored(reason);
        }

        if self.is_debug_marker(line) {
            return LineKind::DebugMarker;
        }

        if let Some(reference) = self.internal_reference(line) {
            return LineKind::Internal(reference);
        }

        if let Some(target) = self.include_target(line) {
            return LineKind::External(target);
        }

        LineKind::Text
    }

    fn ignore_reason(&self, line: &str) -> Option<SkipReason> {
        if self.is_include_guard(line) {
            Some(SkipReason::IncludeGuard)
        } else if is_pragma_once(line) {
            Some(SkipReason::PragmaOnce)
        } else if is_comment(line) {
            Some(SkipReason::Comment)
        } else {
            self.allow_listed(line)
                .map(|name| SkipReason::AllowListed(name.to_string()))
        }
    }

    pub fn is_include_guard(&self, line: &str) -> bool {
        self.guard.is_match(line.trim())
    }

    /// Name of an allow-listed header included by `line`
    pub fn allow_listed<'a>(&self, line: &'a str) -> Option<&'a str> {
        let captures = self.include.captures(line.trim())?;
        let name = captures.get(1)?.as_str();
        self.allow_list.contains(name).then_some(name)
    }

    pub fn is_debug_marker(&self, line: &str) -> bool {
        self.debug_directive
            .as_deref()
            .is_some_and(|directive| line.trim() == directive)
    }

    pub fn internal_reference<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.internal
            .captures(line.trim())
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// Target of any `#include <...>` or `#include "..."` directive
    pub fn include_target<'a>(&self, line: &'a str) -> Option<&'a str> {
        let captures = self.include.captures(line.trim())?;
        captures
            .get(1)
            .or_else(|| captures.get(2))
            .map(|m| m.as_str())
    }
}

fn compile(pattern: &str) -> ExpandResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| ExpandError::InvalidSyntax(format!("invalid pattern {}: {}", pattern, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{DebugMarker, IncludeSyntax};

    fn classifier() -> Classifier {
        Classifier::new(&ExpandOptions::default()).unwrap()
    }

    #[test]
    fn test_include_guards() {
        let c = classifier();
        assert!(c.is_include_guard("#ifndef LIB_SEGMENT_TREE_HPP"));
        assert!(c.is_include_guard("#define LIB_SEGMENT_TREE_HPP 1"));
        assert!(c.is_include_guard("#endif // LIB_SEGMENT_TREE_HPP"));
        assert!(c.is_include_guard("  #  ifndef LIB_CONVOLUTION_2_64_HPP"));

        assert!(!c.is_include_guard("#define MOD 998244353"));
        assert!(!c.is_include_guard("#ifdef NANDHAGK_LOCAL"));
        assert!(!c.is_include_guard("#endif"));
        assert!(!c.is_include_guard("int LIB_A_HPP = 0;"));
    }

    #[test]
    fn test_guard_follows_custom_syntax() {
        let options = ExpandOptions::default().with_syntax(IncludeSyntax {
            namespace: "ds".to_string(),
            suffix: ".h".to_string(),
        });
        let c = Classifier::new(&options).unwrap();

        assert!(c.is_include_guard("#ifndef DS_FENWICK_H"));
        assert!(!c.is_include_guard("#ifndef LIB_FENWICK_HPP"));
        assert_eq!(c.internal_reference("#include <ds/fenwick.h>"), Some("ds/fenwick.h"));
        assert_eq!(c.internal_reference("#include <lib/fenwick.hpp>"), None);
    }

    #[test]
    fn test_pragma_once() {
        assert!(is_pragma_once("#pragma once"));
        assert!(is_pragma_once("  # pragma   once  "));
        assert!(is_pragma_once("#pragma once // keep"));
        assert!(!is_pragma_once("#pragma GCC optimize(\"O3\")"));
        assert!(!is_pragma_once("#pragma once_more"));
        assert!(!is_pragma_once("pragma once"));
    }

    #[test]
    fn test_comments() {
        assert!(is_comment("// note"));
        assert!(is_comment("    //indented"));
        assert!(!is_comment("int x; // trailing"));
        assert!(!is_comment("/* block */"));
    }

    #[test]
    fn test_internal_references() {
        let c = classifier();
        assert_eq!(
            c.classify("#include <lib/monoids/add.hpp>"),
            LineKind::Internal("lib/monoids/add.hpp")
        );
        assert_eq!(
            c.classify("#include<lib/convolution_2_64.hpp>"),
            LineKind::Internal("lib/convolution_2_64.hpp")
        );
        assert_eq!(
            c.classify("  #include <lib/dsu.hpp>  // union find"),
            LineKind::Internal("lib/dsu.hpp")
        );
        assert_eq!(
            c.classify("#include <lib/Upper.hpp>"),
            LineKind::External("lib/Upper.hpp")
        );
    }

    #[test]
    fn test_allow_listed_and_external() {
        let c = classifier();
        assert_eq!(
            c.classify("#include <vector>"),
            LineKind::Ignored(SkipReason::AllowListed("vector".to_string()))
        );
        assert_eq!(
            c.classify("#include <bits/stdc++.h>"),
            LineKind::External("bits/stdc++.h")
        );
        assert_eq!(c.classify("#include \"util.h\""), LineKind::External("util.h"));
        assert_eq!(c.classify("#include \"vector\""), LineKind::External("vector"));
    }

    #[test]
    fn test_debug_marker() {
        let c = classifier();
        assert_eq!(c.classify("#include <contest/debug.hpp>"), LineKind::DebugMarker);
        assert_eq!(c.classify("  #include <contest/debug.hpp> "), LineKind::DebugMarker);

        let disabled = ExpandOptions::default().with_debug_marker(DebugMarker {
            enabled: false,
            ..DebugMarker::default()
        });
        let c = Classifier::new(&disabled).unwrap();
        assert_eq!(
            c.classify("#include <contest/debug.hpp>"),
            LineKind::External("contest/debug.hpp")
        );
    }

    #[test]
    fn test_priority_order() {
        let c = classifier();
        // a commented-out include is a comment, not an include
        assert_eq!(
            c.classify("// #include <lib/a.hpp>"),
            LineKind::Ignored(SkipReason::Comment)
        );
        assert_eq!(c.classify("#pragma once"), LineKind::Ignored(SkipReason::PragmaOnce));
        assert_eq!(
            c.classify("#endif // LIB_A_HPP"),
            LineKind::Ignored(SkipReason::IncludeGuard)
        );
    }

    #[test]
    fn test_text_lines() {
        let c = classifier();
        assert_eq!(c.classify(""), LineKind::Text);
        assert_eq!(c.classify("int main() {"), LineKind::Text);
        assert_eq!(c.classify("#define MOD 998244353"), LineKind::Text);
        assert_eq!(c.classify("#line 4 \"main.cpp\""), LineKind::Text);
    }

    #[test]
    fn test_empty_syntax_rejected() {
        let options = ExpandOptions::default().with_syntax(IncludeSyntax {
            namespace: String::new(),
            suffix: ".hpp".to_string(),
        });
        assert!(matches!(
            Classifier::new(&options),
            Err(ExpandError::InvalidSyntax(_))
        ));
    }
}
