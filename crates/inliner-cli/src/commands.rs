//! Command handlers for the `inliner` binary

use crate::config::InlinerConfig;
use anyhow::{Context, Result};
use clap::Args;
use inliner_core::{ExpandOptions, Expander, FlattenedText, LineBinding, ResolutionPolicy};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments shared by every command that expands a root file
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Root source file
    pub root: PathBuf,

    /// Library search directory, searched in the order given
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    pub include: Vec<PathBuf>,

    /// Config file (defaults to ./inliner.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keep unresolved library includes instead of failing
    #[arg(long)]
    pub lenient: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExpandArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Emit #line directives pointing back at the original files
    #[arg(long)]
    pub line_directives: bool,

    /// Do not prepend the prelude lines
    #[arg(long)]
    pub no_prelude: bool,

    /// Write the structured line map as JSON
    #[arg(long, value_name = "FILE")]
    pub line_map: Option<PathBuf>,
}

/// JSON form of the position bindings, indexed by line of the plain output
#[derive(Debug, Serialize)]
pub struct LineMap<'a> {
    pub lines: usize,
    pub bindings: &'a [LineBinding],
    pub units: &'a [PathBuf],
}

impl<'a> From<&'a FlattenedText> for LineMap<'a> {
    fn from(text: &'a FlattenedText) -> Self {
        Self {
            lines: text.lines().len(),
            bindings: text.bindings(),
            units: text.units(),
        }
    }
}

impl SourceArgs {
    /// Merge command-line flags over the config file
    pub fn settings(&self, cwd: &Path) -> Result<(Vec<PathBuf>, ExpandOptions)> {
        let config = InlinerConfig::load(self.config.as_deref(), cwd)?;

        let mut search_paths = self.include.clone();
        search_paths.extend(config.search_paths);
        if search_paths.is_empty() {
            search_paths.push(cwd.to_path_buf());
        }

        let mut options = config.expand;
        if self.lenient {
            options.policy = ResolutionPolicy::Lenient;
        }

        Ok((search_paths, options))
    }

    fn expand(&self, search_paths: Vec<PathBuf>, options: ExpandOptions) -> Result<FlattenedText> {
        let expander = Expander::with_options(search_paths, options)
            .context("Failed to configure expander")?;

        expander
            .expand(&self.root)
            .with_context(|| format!("Failed to expand {}", self.root.display()))
    }
}

pub fn handle_expand(args: &ExpandArgs, cwd: &Path, stdout: &mut dyn Write) -> Result<()> {
    let (search_paths, mut options) = args.source.settings(cwd)?;
    if args.line_directives || args.line_map.is_some() {
        options.annotate = true;
    }
    if args.no_prelude {
        options.prelude.clear();
    }

    let text = args.source.expand(search_paths, options)?;

    // the line map indexes plain lines, so markers are only rendered on request
    let rendered = if args.line_directives {
        text.render()
    } else {
        text.render_plain()
    };

    match &args.output {
        Some(path) => {
            write_file(path, &rendered)?;
            info!("expanded: {} -> {}", args.source.root.display(), path.display());
        }
        None => stdout
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?,
    }

    if let Some(path) = &args.line_map {
        let json = serde_json::to_string_pretty(&LineMap::from(&text))?;
        write_file(path, &json)?;
        info!("line map: {}", path.display());
    }

    Ok(())
}

pub fn handle_deps(args: &SourceArgs, cwd: &Path, stdout: &mut dyn Write) -> Result<()> {
    let (search_paths, options) = args.settings(cwd)?;
    let text = args.expand(search_paths, options)?;

    for unit in text.units() {
        writeln!(stdout, "{}", unit.display()).context("Failed to write to stdout")?;
    }

    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
