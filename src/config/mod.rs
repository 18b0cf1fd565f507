use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "cascade-tokens.json";
const DEFAULT_TOKENS_DIR: &str = "src/tokens/data";
const DEFAULT_OUTPUT_DIR: &str = "src/tokens/css-vars";
const DEFAULT_MANIFEST_FILE: &str = "themes.mjs";
const DEFAULT_RESOLVED_FILE: &str = "tokens.resolved.json";
const DEFAULT_TYPES_FILE: &str = "token-paths.d.ts";

/// Generate mode-scoped CSS custom properties from layered design tokens.
///
/// Configuration priority: CLI args > environment > config file > defaults.
/// Mode filtering and layout generation are deliberately not flags.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cascade-tokens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Design token to CSS variable generator", long_about = None)]
pub struct CliArgs {
    /// Log every write instead of touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Resolve every token and report problems without writing any file
    #[arg(long, conflicts_with = "dry_run")]
    pub check: bool,

    /// Raise log volume to debug
    #[arg(long)]
    pub verbose: bool,

    /// Only generate this theme (default: every theme in brand-theme/)
    #[arg(long)]
    pub theme: Option<String>,

    /// Directory receiving the generated CSS
    #[arg(long, env = "CASCADE_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory holding brand-theme/, color-modes/, components/, layouts/
    #[arg(long, env = "CASCADE_TOKENS_DIR")]
    pub tokens_dir: Option<PathBuf>,

    /// JSON config file (default: ./cascade-tokens.json when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write TypeScript declarations for component token paths
    #[arg(long)]
    pub emit_types: bool,
}

/// Project-level settings from `cascade-tokens.json`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub tokens_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Prefix used for `css` entries in the theme manifest.
    #[serde(default)]
    pub css_base: Option<String>,
    #[serde(default)]
    pub manifest_file: Option<String>,
    #[serde(default)]
    pub resolved_file: Option<String>,
    #[serde(default)]
    pub emit_types: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub dry_run: bool,
    pub check: bool,
    pub theme: Option<String>,
    pub output_dir: PathBuf,
    pub css_base: String,
    pub manifest_file: String,
    pub resolved_file: String,
    /// `Some(file name)` when type declarations should be written.
    pub types_file: Option<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            check: false,
            theme: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            css_base: DEFAULT_OUTPUT_DIR.to_string(),
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            resolved_file: DEFAULT_RESOLVED_FILE.to_string(),
            types_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tokens_dir: PathBuf,
    pub verbose: bool,
    pub generate: GenerateOptions,
}

impl Settings {
    pub fn resolve(args: &CliArgs, file: &FileConfig) -> Self {
        let output_dir = args
            .output_dir
            .clone()
            .or_else(|| file.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let emit_types = args.emit_types || file.emit_types.unwrap_or(false);

        Self {
            tokens_dir: args
                .tokens_dir
                .clone()
                .or_else(|| file.tokens_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKENS_DIR)),
            verbose: args.verbose,
            generate: GenerateOptions {
                dry_run: args.dry_run,
                check: args.check,
                theme: args.theme.clone(),
                css_base: file
                    .css_base
                    .clone()
                    .unwrap_or_else(|| output_dir.to_string_lossy().into_owned()),
                output_dir,
                manifest_file: file
                    .manifest_file
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MANIFEST_FILE.to_string()),
                resolved_file: file
                    .resolved_file
                    .clone()
                    .unwrap_or_else(|| DEFAULT_RESOLVED_FILE.to_string()),
                types_file: emit_types.then(|| DEFAULT_TYPES_FILE.to_string()),
            },
        }
    }
}

/// Load `explicit`, or `./cascade-tokens.json` when no path is given.
/// Missing or unreadable files fall back to defaults.
pub fn load_file_config(explicit: Option<&Path>) -> FileConfig {
    match explicit {
        Some(path) => {
            if !path.exists() {
                tracing::warn!(path = %path.display(), "config file not found; using defaults");
                return FileConfig::default();
            }
            load_file_config_from(path)
        }
        None => load_file_config_from(Path::new(DEFAULT_CONFIG_FILE)),
    }
}

fn load_file_config_from(path: &Path) -> FileConfig {
    if !path.exists() {
        return FileConfig::default();
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, path = %path.display(), "failed to parse config file; using defaults");
            FileConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, path = %path.display(), "failed to read config file; using defaults");
            FileConfig::default()
        }
    }
}
