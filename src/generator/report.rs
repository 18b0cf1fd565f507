use std::path::PathBuf;
use std::time::Duration;

use crate::css::EmitStats;
use crate::resolver::ResolveError;
use crate::tokens::TokenSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    /// Resolved variables in the file; `None` for index and manifest files.
    pub variables: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestStatus {
    Written(PathBuf),
    Withheld,
    /// Check runs never write a manifest, even when the run is clean.
    NotRequested,
}

/// One token that failed to resolve, with where it was emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIssue {
    pub theme: String,
    pub token_set: TokenSet,
    pub error: ResolveError,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub themes: Vec<String>,
    pub modes: Vec<String>,
    pub token_sets: Vec<TokenSet>,
    pub files: Vec<WrittenFile>,
    pub stats: EmitStats,
    /// Theme or token-set iterations skipped because a source file failed to load.
    pub failures: Vec<String>,
    pub issues: Vec<TokenIssue>,
    pub elapsed: Duration,
    pub manifest: ManifestStatus,
    pub dry_run: bool,
    pub check: bool,
    pub sample_import: Option<String>,
}

impl RunReport {
    pub(super) fn new(
        themes: Vec<String>,
        modes: Vec<String>,
        token_sets: Vec<TokenSet>,
        dry_run: bool,
    ) -> Self {
        Self {
            themes,
            modes,
            token_sets,
            files: Vec::new(),
            stats: EmitStats::default(),
            failures: Vec::new(),
            issues: Vec::new(),
            elapsed: Duration::ZERO,
            manifest: ManifestStatus::Withheld,
            dry_run,
            check: false,
            sample_import: None,
        }
    }

    pub(super) fn record_file(&mut self, path: PathBuf, variables: Option<usize>) {
        self.files.push(WrittenFile { path, variables });
    }

    /// Zero unresolved tokens, zero duplicates, and no skipped source files.
    pub fn is_publishable(&self) -> bool {
        self.stats.unresolved == 0 && self.stats.duplicates == 0 && self.failures.is_empty()
    }

    pub fn manifest_written(&self) -> bool {
        matches!(self.manifest, ManifestStatus::Written(_))
    }

    pub fn log_summary(&self) {
        let token_sets: Vec<&str> = self.token_sets.iter().map(|set| set.name()).collect();

        tracing::info!("--- CSS variable generation complete ---");
        tracing::info!(
            "themes processed: {} ({})",
            self.themes.len(),
            self.themes.join(", ")
        );
        tracing::info!("modes processed: {}", self.modes.join(", "));
        tracing::info!("token sets: {}", token_sets.join(", "));
        if !self.check {
            tracing::info!(
                "files {}: {}",
                if self.dry_run { "planned" } else { "written" },
                self.files.len()
            );
        }
        for file in &self.files {
            match file.variables {
                Some(count) => tracing::info!("  - {} ({count} variables)", file.path.display()),
                None => tracing::info!("  - {}", file.path.display()),
            }
        }
        tracing::info!("total css variables generated: {}", self.stats.variables);
        tracing::info!("unresolved tokens: {}", self.stats.unresolved);
        tracing::info!("duplicate variables: {}", self.stats.duplicates);
        for failure in &self.failures {
            tracing::warn!("skipped: {failure}");
        }
        if self.check {
            for issue in &self.issues {
                tracing::warn!("{}/{}: {}", issue.theme, issue.token_set.name(), issue.error);
            }
        }
        if let Some(sample) = &self.sample_import {
            tracing::info!("sample usage: @import '{sample}';");
            tracing::info!("  .my-class {{ background: var(--Color-Primary-Background-default); }}");
        }
        if !self.token_sets.contains(&TokenSet::Layout) {
            tracing::info!("layout css variable generation is currently disabled");
        }
        tracing::info!("total time: {:.2}s", self.elapsed.as_secs_f64());

        match &self.manifest {
            ManifestStatus::Written(path) if self.dry_run => {
                tracing::info!("[dry run] theme manifest would be written: {}", path.display());
            }
            ManifestStatus::Written(path) => {
                tracing::info!("theme manifest written: {}", path.display());
            }
            ManifestStatus::NotRequested => {
                tracing::info!("[check] all tokens resolved; no files written");
            }
            ManifestStatus::Withheld => {
                tracing::error!(
                    "theme manifest not generated due to unresolved or duplicate tokens or skipped files; fix errors and re-run"
                );
            }
        }
    }
}
