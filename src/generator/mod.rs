//! Run orchestration: every theme × enabled token set × mode, strictly in
//! sequence, followed by index files, the resolved-token artifact and, when
//! the run is clean, the theme manifest.

use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;

use crate::config::GenerateOptions;
use crate::css::{emit_mode_block, EmitStats, ModeBlock};
use crate::inject::ResolvedTokens;
use crate::resolver::TokenResolver;
use crate::storage::{OutputError, OutputWriter, StoreError, StoreResult, TokenSource};
use crate::theme::{render_manifest, theme_index_href, ThemeEntry, ThemeError};
use crate::tokens::{TokenSet, TokenTree, ENABLED_TOKEN_SETS};
use crate::typegen::{render_type_declarations, token_paths};

mod report;

pub use report::{ManifestStatus, RunReport, TokenIssue, WrittenFile};

const INDEX_FILE: &str = "index.css";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to discover token sources")]
    Discover(#[source] StoreError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error(transparent)]
    Manifest(#[from] ThemeError),
    #[error("failed to serialize resolved tokens")]
    ResolvedTokens(#[from] serde_json::Error),
}

pub type GenerateResult<T> = std::result::Result<T, GenerateError>;

/// CSS for one (theme, token set) pair plus its resolved declarations.
#[derive(Debug, Clone)]
pub struct TokenSetOutput {
    pub token_set: TokenSet,
    pub blocks: Vec<ModeBlock>,
    pub stats: EmitStats,
}

impl TokenSetOutput {
    pub fn render(&self, theme: &str) -> String {
        let blocks: Vec<String> = self.blocks.iter().map(ModeBlock::to_css).collect();
        format!(
            "/* {theme}/{}.css */\n\n{}\n",
            self.token_set.name(),
            blocks.join("\n\n")
        )
    }
}

pub fn generate<S: TokenSource>(source: &S, options: &GenerateOptions) -> GenerateResult<RunReport> {
    Generator::new(source, options).run()
}

pub struct Generator<'a, S: TokenSource> {
    source: &'a S,
    options: &'a GenerateOptions,
    writer: OutputWriter,
}

impl<'a, S: TokenSource> Generator<'a, S> {
    pub fn new(source: &'a S, options: &'a GenerateOptions) -> Self {
        Self {
            source,
            options,
            writer: OutputWriter::new(options.dry_run),
        }
    }

    pub fn run(mut self) -> GenerateResult<RunReport> {
        let started = Instant::now();

        // Snapshot both lists before resolving anything.
        let themes = match &self.options.theme {
            Some(theme) => vec![theme.clone()],
            None => self.source.themes().map_err(GenerateError::Discover)?,
        };
        let modes = self.source.modes().map_err(GenerateError::Discover)?;

        let mut report = RunReport::new(
            themes.clone(),
            modes.clone(),
            ENABLED_TOKEN_SETS.to_vec(),
            self.options.dry_run,
        );
        report.check = self.options.check;
        let mut resolved = ResolvedTokens::new();
        let mut generated_themes = Vec::new();

        for theme in &themes {
            tracing::info!(theme = %theme, "processing theme");
            let theme_tree = match self.source.theme(theme) {
                Ok(tree) => tree,
                Err(err) => {
                    tracing::error!(theme = %theme, "{err}");
                    report.failures.push(format!("theme `{theme}`: {err}"));
                    continue;
                }
            };

            let mut generated_sets = Vec::new();
            for &token_set in ENABLED_TOKEN_SETS {
                tracing::info!(theme = %theme, token_set = token_set.name(), "processing token set");
                let output = match self.token_set_output(token_set, &theme_tree, &modes) {
                    Ok(output) => output,
                    Err(err) => {
                        tracing::error!(theme = %theme, token_set = token_set.name(), "{err}");
                        report
                            .failures
                            .push(format!("theme `{theme}` token set `{}`: {err}", token_set.name()));
                        continue;
                    }
                };

                let path = self.theme_dir(theme).join(format!("{}.css", token_set.name()));
                self.write_file(
                    &mut report,
                    path,
                    &output.render(theme),
                    Some(output.stats.variables),
                )?;
                report.stats += output.stats;
                for block in &output.blocks {
                    resolved.insert_mode(theme, &block.mode, block.resolved());
                    report.issues.extend(block.errors.iter().map(|error| TokenIssue {
                        theme: theme.clone(),
                        token_set,
                        error: error.clone(),
                    }));
                }
                generated_sets.push(token_set);
            }

            let index = self.theme_dir(theme).join(INDEX_FILE);
            self.write_file(&mut report, index, &theme_index(&generated_sets), None)?;
            generated_themes.push(theme.clone());
        }

        let global_index = self.options.output_dir.join(INDEX_FILE);
        self.write_file(
            &mut report,
            global_index,
            &global_index_contents(&generated_themes),
            None,
        )?;

        let resolved_path = self.options.output_dir.join(&self.options.resolved_file);
        self.write_file(
            &mut report,
            resolved_path,
            &serde_json::to_string_pretty(&resolved)?,
            None,
        )?;

        if let Some(types_file) = &self.options.types_file {
            self.write_type_declarations(types_file, &mut report)?;
        }

        report.sample_import = generated_themes
            .first()
            .map(|theme| theme_index_href(&self.options.css_base, theme));
        report.elapsed = started.elapsed();

        if !report.is_publishable() {
            report.manifest = ManifestStatus::Withheld;
        } else if self.options.check {
            report.manifest = ManifestStatus::NotRequested;
        } else {
            let entries: Vec<ThemeEntry> = generated_themes
                .iter()
                .map(|theme| ThemeEntry::new(theme, &modes, &self.options.css_base))
                .collect();
            let manifest_path = self.options.output_dir.join(&self.options.manifest_file);
            self.writer
                .write(&manifest_path, &render_manifest(&entries)?)?;
            report.manifest = ManifestStatus::Written(manifest_path);
        }

        Ok(report)
    }

    /// Write through the backup/dry-run writer. Check runs write nothing.
    fn write_file(
        &mut self,
        report: &mut RunReport,
        path: PathBuf,
        contents: &str,
        variables: Option<usize>,
    ) -> GenerateResult<()> {
        if self.options.check {
            return Ok(());
        }
        self.writer.write(&path, contents)?;
        report.record_file(path, variables);
        Ok(())
    }

    fn theme_dir(&self, theme: &str) -> PathBuf {
        self.options.output_dir.join(theme)
    }

    /// Resolve one token set for every mode. Each mode gets a fresh resolver.
    fn token_set_output(
        &self,
        token_set: TokenSet,
        theme_tree: &TokenTree,
        modes: &[String],
    ) -> StoreResult<TokenSetOutput> {
        let tree = self.source.token_set(token_set)?;
        let mut blocks = Vec::with_capacity(modes.len());
        let mut stats = EmitStats::default();

        for mode in modes {
            let mode_tree = self.source.mode(mode)?;
            let mut resolver =
                TokenResolver::for_token_set(token_set, &tree, mode, &mode_tree, theme_tree);
            let block = emit_mode_block(&tree, &mut resolver);
            tracing::debug!(
                mode = %mode,
                variables = block.stats.variables,
                unresolved = block.stats.unresolved,
                duplicates = block.stats.duplicates,
                "mode block emitted"
            );
            stats += block.stats;
            blocks.push(block);
        }

        Ok(TokenSetOutput {
            token_set,
            blocks,
            stats,
        })
    }

    fn write_type_declarations(
        &mut self,
        types_file: &str,
        report: &mut RunReport,
    ) -> GenerateResult<()> {
        let tree = match self.source.token_set(TokenSet::Component) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::error!("{err}");
                report.failures.push(format!("type declarations: {err}"));
                return Ok(());
            }
        };
        let path = self.options.output_dir.join(types_file);
        self.write_file(report, path, &render_type_declarations(&token_paths(&tree)), None)
    }
}

fn theme_index(token_sets: &[TokenSet]) -> String {
    token_sets
        .iter()
        .map(|set| format!("@import './{}.css';\n", set.name()))
        .collect()
}

fn global_index_contents(themes: &[String]) -> String {
    themes
        .iter()
        .map(|theme| format!("@import './{theme}/{INDEX_FILE}';\n"))
        .collect()
}
