//! Tests for `inliner.toml` loading

use inliner::config::{ConfigError, InlinerConfig, CONFIG_FILE_NAME};
use inliner_core::{ExpandOptions, ResolutionPolicy};
use inliner_test_fixtures::SourceTree;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

#[test]
fn test_full_config() -> Result<(), Box<dyn std::error::Error>> {
    let tree = SourceTree::new().with_file(
        CONFIG_FILE_NAME,
        r#"
search-paths = ["libs", "/opt/shared"]
annotate = true
policy = "lenient"
prelude = []
allow-list = ["vector", "atcoder/all"]

[syntax]
namespace = "ds"
suffix = ".h"

[debug-marker]
enabled = false
flag = "LOCAL"
"#,
    );

    let config = InlinerConfig::from_file(&tree.join(CONFIG_FILE_NAME))?;

    assert_eq!(
        config.search_paths,
        vec![tree.join("libs"), PathBuf::from("/opt/shared")]
    );
    assert!(config.expand.annotate);
    assert_eq!(config.expand.policy, ResolutionPolicy::Lenient);
    assert!(config.expand.prelude.is_empty());
    assert_eq!(config.expand.allow_list.len(), 2);
    assert!(config.expand.allow_list.contains("atcoder/all"));
    assert_eq!(config.expand.syntax.namespace, "ds");
    assert_eq!(config.expand.syntax.suffix, ".h");
    assert!(!config.expand.debug_marker.enabled);
    assert_eq!(config.expand.debug_marker.flag, "LOCAL");
    assert_eq!(config.expand.debug_marker.macro_name, "debug");
    Ok(())
}

#[test]
fn test_empty_config_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let tree = SourceTree::new().with_file(CONFIG_FILE_NAME, "");

    let config = InlinerConfig::from_file(&tree.join(CONFIG_FILE_NAME))?;

    assert!(config.search_paths.is_empty());
    assert_eq!(config.expand, ExpandOptions::default());
    Ok(())
}

#[test]
fn test_discover() -> Result<(), Box<dyn std::error::Error>> {
    let empty = SourceTree::new();
    assert_eq!(InlinerConfig::discover(empty.path())?, None);

    let tree = SourceTree::new().with_file(CONFIG_FILE_NAME, "search-paths = [\".\"]\n");
    let found = InlinerConfig::discover(tree.path())?.ok_or("config not discovered")?;
    assert_eq!(found.search_paths, vec![tree.path().join(".")]);
    Ok(())
}

#[test]
fn test_load_prefers_explicit_file() -> Result<(), Box<dyn std::error::Error>> {
    let tree = SourceTree::new()
        .with_file(CONFIG_FILE_NAME, "annotate = false\n")
        .with_file("other.toml", "annotate = true\n");

    let config = InlinerConfig::load(Some(&tree.join("other.toml")), tree.path())?;
    assert!(config.expand.annotate);

    let config = InlinerConfig::load(None, tree.path())?;
    assert!(!config.expand.annotate);
    Ok(())
}

#[test]
fn test_invalid_config() {
    let tree = SourceTree::new().with_file(CONFIG_FILE_NAME, "policy = \"sometimes\"\n");

    let err = InlinerConfig::from_file(&tree.join(CONFIG_FILE_NAME)).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains(CONFIG_FILE_NAME));
}

#[test]
fn test_missing_explicit_config() {
    let tree = SourceTree::new();

    let err = InlinerConfig::load(Some(&tree.join("absent.toml")), tree.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
