//! Test fixtures for inliner expansion testing
//!
//! Provides small, representative source trees on disk without storing
//! expected outputs

use std::fs;
use std::path::{Path, PathBuf};

/// Fixture categories
pub enum FixtureType {
    /// Root includes one guarded header at line 3
    SingleHeader,
    /// Root includes `a` directly and again through `b`
    Diamond,
    /// `a` and `b` include each other
    Cycle,
    /// Standard and foreign includes mixed with a library header
    ExternalIncludes,
    /// A contest solution layout with prelude, debug marker and nested headers
    Contest,
}

/// An on-disk source tree rooted in a temporary directory
pub struct SourceTree {
    dir: tempfile::TempDir,
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    /// Builder form of [`SourceTree::write`]
    pub fn with_file(self, relative: &str, contents: &str) -> Self {
        self.write(relative, contents);
        self
    }

    /// Write a file relative to the tree root, creating parent directories
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create fixture dirs");
        }
        fs::write(&path, contents).expect("failed to write fixture file");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

/// Main test fixtures provider
pub struct TestFixtures {
    tree: Option<SourceTree>,
}

impl Default for TestFixtures {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixtures {
    pub fn new() -> Self {
        Self { tree: None }
    }

    /// Lay out a fixture tree and return the root source file
    pub fn setup(&mut self, fixture_type: FixtureType) -> PathBuf {
        let tree = SourceTree::new();

        let root = match fixture_type {
            FixtureType::SingleHeader => Self::setup_single_header(&tree),
            FixtureType::Diamond => Self::setup_diamond(&tree),
            FixtureType::Cycle => Self::setup_cycle(&tree),
            FixtureType::ExternalIncludes => Self::setup_external_includes(&tree),
            FixtureType::Contest => Self::setup_contest(&tree),
        };

        self.tree = Some(tree);
        root
    }

    /// Directory to use as the single search path
    pub fn base(&self) -> &Path {
        self.tree
            .as_ref()
            .map(SourceTree::path)
            .expect("setup() must be called first")
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.base().join(relative)
    }

    fn setup_single_header(tree: &SourceTree) -> PathBuf {
        tree.write(
            "lib/a.hpp",
            "#ifndef LIB_A_HPP\n#define LIB_A_HPP 1\nint x;\n#endif // LIB_A_HPP\n",
        );
        tree.write("main.cpp", "int before;\n\n#include <lib/a.hpp>\nint after;\n")
    }

    fn setup_diamond(tree: &SourceTree) -> PathBuf {
        tree.write("lib/a.hpp", "#pragma once\nstruct a {};\n");
        tree.write("lib/b.hpp", "#pragma once\n#include <lib/a.hpp>\nstruct b : a {};\n");
        tree.write("main.cpp", "#include <lib/b.hpp>\n#include <lib/a.hpp>\nint main() {}\n")
    }

    fn setup_cycle(tree: &SourceTree) -> PathBuf {
        tree.write("lib/a.hpp", "#include <lib/b.hpp>\nint from_a;\n");
        tree.write("lib/b.hpp", "#include <lib/a.hpp>\nint from_b;\n");
        tree.write("main.cpp", "#include <lib/a.hpp>\nint main() {}\n")
    }

    fn setup_external_includes(tree: &SourceTree) -> PathBuf {
        tree.write(
            "lib/util.hpp",
            "#include <vector>\n#include \"local.h\"\nusing vi = std::vector<int>;\n",
        );
        tree.write(
            "main.cpp",
            "#include <bits/stdc++.h>\n#include <vector>\n#include <lib/util.hpp>\nint main() {}\n",
        )
    }

    fn setup_contest(tree: &SourceTree) -> PathBuf {
        tree.write(
            "lib/prelude.hpp",
            r#"#ifndef LIB_PRELUDE_HPP
#define LIB_PRELUDE_HPP 1

#include <cstdint>

using i32 = std::int32_t;
using i64 = std::int64_t;

#endif // LIB_PRELUDE_HPP
"#,
        );
        tree.write(
            "lib/csr_graph.hpp",
            r#"#ifndef LIB_CSR_GRAPH_HPP
#define LIB_CSR_GRAPH_HPP 1

#include <vector>

#include <lib/prelude.hpp>

// compressed adjacency
struct csr_graph {
    std::vector<i32> start, elist;
};

#endif // LIB_CSR_GRAPH_HPP
"#,
        );
        tree.write(
            "contest/a/a.cpp",
            r#"#include <bits/stdc++.h>
#include <contest/debug.hpp>

#include <lib/prelude.hpp>
#include <lib/csr_graph.hpp>

i32 main() {
    csr_graph g;
}
"#,
        )
    }
}
