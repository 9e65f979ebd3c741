//! The `anonymize` command.
//!
//! Option parsing is separate from running so both can be tested without a
//! process.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use masq_names::StrategyKind;
use masq_rewrite::OverlayScope;

use crate::config::{AnonymizeConfig, ConfigError};
use crate::discovery::{discover_sources_in, SourceFile};
use crate::error::AnonymizeError;
use crate::pipeline::{Anonymizer, BatchOutput};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUT_DIR: &str = "masq-out";
/// Mapping state file name inside the output directory.
pub const STATE_FILE_NAME: &str = "masq.state";

/// Options of `masq anonymize`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnonymizeOptions {
    /// Source file or directory.
    pub input: PathBuf,
    pub out_dir: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    /// Mapping state to continue from and write back.
    pub state_file: Option<PathBuf>,
    pub strategy: Option<StrategyKind>,
    pub preview: bool,
    pub retry_ceiling: Option<u32>,
    pub overlay_scope: Option<OverlayScope>,
    pub warning_limit: Option<usize>,
    pub never_rename: Vec<String>,
}

/// Parse the arguments following `anonymize`.
pub fn parse_anonymize_options(args: &[String]) -> Result<AnonymizeOptions, String> {
    let mut options = AnonymizeOptions::default();
    let mut input = None;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "-o" {
            let dir = args.get(i + 1).ok_or("-o needs a directory")?;
            options.out_dir = Some(PathBuf::from(dir));
            i += 2;
            continue;
        }

        if arg == "--preview" || arg == "-n" {
            options.preview = true;
        } else if let Some(dir) = arg.strip_prefix("--out=") {
            options.out_dir = Some(PathBuf::from(dir));
        } else if let Some(path) = arg.strip_prefix("--config=") {
            options.config_file = Some(PathBuf::from(path));
        } else if let Some(path) = arg.strip_prefix("--state=") {
            options.state_file = Some(PathBuf::from(path));
        } else if let Some(name) = arg.strip_prefix("--strategy=") {
            options.strategy = Some(name.parse().map_err(|e| format!("{e}"))?);
        } else if let Some(n) = arg.strip_prefix("--retries=") {
            let n = n
                .parse()
                .map_err(|_| format!("invalid retry count '{n}'"))?;
            options.retry_ceiling = Some(n);
        } else if let Some(n) = arg.strip_prefix("--max-warnings=") {
            let n = n
                .parse()
                .map_err(|_| format!("invalid warning limit '{n}'"))?;
            options.warning_limit = Some(n);
        } else if let Some(scope) = arg.strip_prefix("--overlay-scope=") {
            options.overlay_scope = Some(match scope {
                "batch" => OverlayScope::Batch,
                "file" => OverlayScope::File,
                _ => {
                    return Err(format!(
                        "unknown overlay scope '{scope}' (expected 'batch' or 'file')"
                    ))
                }
            });
        } else if let Some(names) = arg.strip_prefix("--never-rename=") {
            options.never_rename.extend(
                names
                    .split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string),
            );
        } else if arg.starts_with('-') {
            return Err(format!("unknown option '{arg}'"));
        } else if input.is_none() {
            input = Some(PathBuf::from(arg));
        } else {
            return Err(format!("unexpected argument '{arg}'"));
        }
        i += 1;
    }

    options.input = input.ok_or("missing input file or directory")?;
    Ok(options)
}

impl AnonymizeOptions {
    /// The configuration file, if given, with command-line flags on top.
    pub fn config(&self) -> Result<AnonymizeConfig, ConfigError> {
        let mut config = match &self.config_file {
            Some(path) => AnonymizeConfig::load(path)?,
            None => AnonymizeConfig::default(),
        };
        if let Some(strategy) = self.strategy {
            config = config.with_strategy(strategy);
        }
        if let Some(retry_ceiling) = self.retry_ceiling {
            config = config.with_retry_ceiling(retry_ceiling);
        }
        if let Some(scope) = self.overlay_scope {
            config = config.with_overlay_scope(scope);
        }
        if let Some(limit) = self.warning_limit {
            config = config.with_warning_limit(limit);
        }
        if self.preview {
            config = config.with_preview(true);
        }
        Ok(config.with_never_rename(self.never_rename.iter().cloned()))
    }

    pub fn out_dir(&self) -> PathBuf {
        self.out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR))
    }

    pub fn state_file(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| self.out_dir().join(STATE_FILE_NAME))
    }
}

/// Run `masq anonymize`: discover and read the sources, continue from the
/// mapping state when one exists, run the batch, then write the rewritten
/// files under the output directory and the mapping state beside them.
///
/// Nothing is written in preview mode.
pub fn run_anonymize(options: &AnonymizeOptions) -> Result<BatchOutput, AnonymizeError> {
    let config = options.config()?;
    let preview = config.preview;

    let mut sources = Vec::new();
    for path in discover_sources_in(&options.input) {
        let source = SourceFile::read(&path).map_err(|source| AnonymizeError::Io {
            action: "read",
            path: path.clone(),
            source,
        })?;
        sources.push(source);
    }
    debug!(input = %options.input.display(), files = sources.len(), "sources discovered");

    let mut anonymizer = Anonymizer::new(config);
    let state_file = options.state_file();
    if state_file.is_file() {
        let bytes = fs::read(&state_file).map_err(|source| AnonymizeError::Io {
            action: "read",
            path: state_file.clone(),
            source,
        })?;
        anonymizer
            .load_mapping_state(&bytes)
            .map_err(AnonymizeError::State)?;
    }

    let output = anonymizer.run(&sources)?;
    if preview {
        return Ok(output);
    }

    let out_dir = options.out_dir();
    let root = input_root(&options.input);
    for file in &output.files {
        let relative = file
            .output_path
            .strip_prefix(root)
            .ok()
            .or_else(|| file.output_path.file_name().map(Path::new))
            .unwrap_or(&file.output_path);
        write_file(&out_dir.join(relative), file.text().as_bytes())?;
    }

    let state = anonymizer
        .export_mapping_state()
        .map_err(AnonymizeError::State)?;
    write_file(&state_file, &state)?;
    debug!(out_dir = %out_dir.display(), files = output.files.len(), "output written");
    Ok(output)
}

/// Directory output paths are made relative to.
fn input_root(input: &Path) -> &Path {
    if input.is_dir() {
        input
    } else {
        input.parent().unwrap_or(Path::new(""))
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), AnonymizeError> {
    let io_error = |source| AnonymizeError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, bytes).map_err(io_error)
}
