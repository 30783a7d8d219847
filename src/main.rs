/*!
 * Command-line interface for ctxdump
 */

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ctxdump::config::{Args, Config};
use ctxdump::renderer::Renderer;
use ctxdump::report::{ReportFormat, Reporter, ScanReport};

fn main() -> io::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut command = Args::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        return Ok(());
    }

    // RUST_LOG takes precedence; --verbose falls back to DEBUG
    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init();

    let config = Config::from_args(args);
    config.validate()?;

    // The report itself goes to stdout when no output file is given
    let progress = if config.output_file.is_some() {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos} files  ⏱️  {elapsed_precise}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.enable_steady_tick(Duration::from_millis(100));
        progress.set_prefix("📊 Rendering");
        progress
    } else {
        ProgressBar::hidden()
    };
    let progress = Arc::new(progress);

    let renderer = Renderer::new(config.clone(), Arc::clone(&progress))?;

    let start_time = Instant::now();
    let summary = renderer.render_to_sink()?;
    let duration = start_time.elapsed();

    progress.finish_and_clear();

    if let Some(output) = &config.output_file {
        let report = ScanReport {
            output: output.display().to_string(),
            duration,
            tokenizer: config.token_count_tree.then(|| renderer.tokenizer_name()),
            summary,
        };
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    Ok(())
}
