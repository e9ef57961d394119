//! Expansion options
//!
//! Every field carries a default so options can be deserialized from a
//! partially specified configuration file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What to do when an internal reference cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionPolicy {
    /// Abort the whole expansion with [`crate::ExpandError::NotFound`]
    #[default]
    Strict,
    /// Emit the directive line unchanged and keep going
    Lenient,
}

/// Naming convention for internal references: `<namespace>/<path><suffix>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IncludeSyntax {
    pub namespace: String,
    pub suffix: String,
}

impl Default for IncludeSyntax {
    fn default() -> Self {
        Self {
            namespace: "lib".to_string(),
            suffix: ".hpp".to_string(),
        }
    }
}

impl IncludeSyntax {
    /// Leading part of include guard tokens, e.g. `LIB_`
    pub fn guard_prefix(&self) -> String {
        format!("{}_", guard_case(&self.namespace))
    }

    /// Trailing part of include guard tokens, e.g. `_HPP`
    pub fn guard_suffix(&self) -> String {
        format!("_{}", guard_case(self.suffix.trim_start_matches('.')))
    }
}

fn guard_case(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Rewrite rule for the environment-conditional debug header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DebugMarker {
    pub enabled: bool,
    /// Exact directive line (compared after trimming)
    pub directive: String,
    /// Build flag under which the real header is included
    pub flag: String,
    /// Macro defined as a no-op when the flag is absent
    pub macro_name: String,
}

impl Default for DebugMarker {
    fn default() -> Self {
        Self {
            enabled: true,
            directive: "#include <contest/debug.hpp>".to_string(),
            flag: "NANDHAGK_LOCAL".to_string(),
            macro_name: "debug".to_string(),
        }
    }
}

impl DebugMarker {
    /// Replacement block emitted in place of the directive
    pub fn replacement(&self) -> Vec<String> {
        vec![
            format!("#ifdef {}", self.flag),
            self.directive.trim().to_string(),
            "#else".to_string(),
            format!("#define {}(...) static_cast<void>(0)", self.macro_name),
            "#endif".to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExpandOptions {
    /// Record position bindings for `#line` markers
    pub annotate: bool,
    pub policy: ResolutionPolicy,
    /// Lines placed before the root content
    pub prelude: Vec<String>,
    pub syntax: IncludeSyntax,
    /// Header names treated as already satisfied
    pub allow_list: BTreeSet<String>,
    pub debug_marker: DebugMarker,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            annotate: false,
            policy: ResolutionPolicy::default(),
            prelude: vec!["#include <bits/stdc++.h>".to_string()],
            syntax: IncludeSyntax::default(),
            allow_list: default_allow_list(),
            debug_marker: DebugMarker::default(),
        }
    }
}

impl ExpandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_annotations(mut self, enabled: bool) -> Self {
        self.annotate = enabled;
        self
    }

    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_prelude(mut self, prelude: Vec<String>) -> Self {
        self.prelude = prelude;
        self
    }

    pub fn without_prelude(self) -> Self {
        self.with_prelude(Vec::new())
    }

    pub fn with_syntax(mut self, syntax: IncludeSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn with_debug_marker(mut self, marker: DebugMarker) -> Self {
        self.debug_marker = marker;
        self
    }

    pub fn allow(mut self, name: impl Into<String>) -> Self {
        self.allow_list.insert(name.into());
        self
    }
}

const STANDARD_HEADERS: &[&str] = &[
    "algorithm",
    "array",
    "atomic",
    "bit",
    "bitset",
    "cassert",
    "cctype",
    "chrono",
    "climits",
    "cmath",
    "compare",
    "complex",
    "concepts",
    "cstddef",
    "cstdint",
    "cstdio",
    "cstdlib",
    "cstring",
    "deque",
    "functional",
    "initializer_list",
    "iomanip",
    "iostream",
    "istream",
    "iterator",
    "limits",
    "list",
    "map",
    "memory",
    "numeric",
    "optional",
    "ostream",
    "queue",
    "random",
    "ranges",
    "set",
    "span",
    "sstream",
    "stack",
    "string",
    "string_view",
    "tuple",
    "type_traits",
    "unordered_map",
    "unordered_set",
    "utility",
    "variant",
    "vector",
];

/// The C++ standard library headers
pub fn default_allow_list() -> BTreeSet<String> {
    STANDARD_HEADERS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_affixes_follow_syntax() {
        let syntax = IncludeSyntax::default();
        assert_eq!(syntax.guard_prefix(), "LIB_");
        assert_eq!(syntax.guard_suffix(), "_HPP");

        let custom = IncludeSyntax {
            namespace: "my-lib".to_string(),
            suffix: ".h".to_string(),
        };
        assert_eq!(custom.guard_prefix(), "MY_LIB_");
        assert_eq!(custom.guard_suffix(), "_H");
    }

    #[test]
    fn test_debug_replacement_block() {
        let block = DebugMarker::default().replacement();
        assert_eq!(
            block,
            vec![
                "#ifdef NANDHAGK_LOCAL",
                "#include <contest/debug.hpp>",
                "#else",
                "#define debug(...) static_cast<void>(0)",
                "#endif",
            ]
        );
    }

    #[test]
    fn test_builder() {
        let options = ExpandOptions::new()
            .with_annotations(true)
            .with_policy(ResolutionPolicy::Lenient)
            .without_prelude()
            .allow("atcoder/all");

        assert!(options.annotate);
        assert_eq!(options.policy, ResolutionPolicy::Lenient);
        assert!(options.prelude.is_empty());
        assert!(options.allow_list.contains("atcoder/all"));
        assert!(options.allow_list.contains("vector"));
    }

    #[test]
    fn test_partial_options_fill_defaults() {
        let options: ExpandOptions =
            serde_json::from_str(r#"{ "annotate": true, "policy": "lenient" }"#).unwrap();

        assert!(options.annotate);
        assert_eq!(options.policy, ResolutionPolicy::Lenient);
        assert_eq!(options.syntax, IncludeSyntax::default());
        assert!(options.allow_list.contains("vector"));
        assert_eq!(options.prelude, vec!["#include <bits/stdc++.h>"]);
    }
}
