/*!
 * Command-line interface for DumpDoc
 */

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use crossbeam_channel::bounded;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use dumpdoc::config::{Args, Config};
use dumpdoc::error::{DumpDocError, Result};
use dumpdoc::logging;
use dumpdoc::pipeline;
use dumpdoc::report::{ReportFormat, Reporter};
use dumpdoc::watcher::Watcher;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut command = Args::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    logging::init(logging::level_for(args.verbose, args.quiet));
    let quiet = args.quiet;

    match run(args, quiet) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args, quiet: bool) -> Result<()> {
    let config = Config::load(args)?;
    config.validate()?;

    if let Some(path) = &config.config_file {
        info!("Using configuration file {}", path.display());
    }

    let progress = spinner(quiet);
    let report = pipeline::generate(&config, Arc::clone(&progress))?;
    progress.finish_and_clear();

    if !quiet {
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    if config.watch {
        watch(config)?;
    }

    Ok(())
}

/// Regenerate on every debounced batch of changes until interrupted
fn watch(config: Config) -> Result<()> {
    let (interrupt_tx, interrupt_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.try_send(());
    })
    .map_err(|e| DumpDocError::Watch(e.to_string()))?;

    let root = config.target_dir.clone();
    let options = config.watch_options();
    let hidden = Arc::new(ProgressBar::hidden());

    let mut watcher = Watcher::new();
    watcher.start(
        &root,
        move |changed: Vec<PathBuf>| {
            info!("{} file(s) changed, regenerating", changed.len());
            match pipeline::generate(&config, Arc::clone(&hidden)) {
                Ok(report) => info!(
                    "[{}] Updated {} ({} files)",
                    chrono::Local::now().format("%H:%M:%S"),
                    report.output_file,
                    report.files_processed
                ),
                Err(e) => error!("Regeneration failed: {}", e),
            }
        },
        options,
    )?;

    info!("Press Ctrl+C to stop");
    let _ = interrupt_rx.recv();

    watcher.stop();
    Ok(())
}

fn spinner(quiet: bool) -> Arc<ProgressBar> {
    if quiet {
        return Arc::new(ProgressBar::hidden());
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} ⏱️  {elapsed_precise}")
    {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📊 Scanning");
    Arc::new(progress)
}
