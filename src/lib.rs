pub mod config;
pub mod css;
pub mod error;
pub mod generator;
pub mod inject;
pub mod logging;
pub mod resolver;
pub mod storage;
pub mod theme;
pub mod tokens;
pub mod typegen;
pub use error::{AppError, AppResult};

use config::{load_file_config, CliArgs, Settings};
use generator::RunReport;
use storage::FsTokenStore;

/// Entrypoint used by the CLI binary and by build scripts embedding the generator.
pub fn run(args: CliArgs) -> AppResult<RunReport> {
    logging::init(args.verbose);

    let file_config = load_file_config(args.config.as_deref());
    let settings = Settings::resolve(&args, &file_config);
    tracing::info!(
        tokens_dir = %settings.tokens_dir.display(),
        output_dir = %settings.generate.output_dir.display(),
        dry_run = settings.generate.dry_run,
        "starting cascade-tokens"
    );

    let store = FsTokenStore::new(&settings.tokens_dir);
    let report = generator::generate(&store, &settings.generate)?;
    report.log_summary();
    Ok(report)
}
