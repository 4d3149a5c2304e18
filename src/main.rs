// main.rs - CLI entry point

use hgtscan::cli::Config;
use hgtscan::error::{HgtError, Result};
use hgtscan::pipeline;
use hgtscan::prelude::*;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();
}

fn run_main() -> Result<()> {
    let args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    let config_path = args.config.clone();
    let merged = match &config_path {
        Some(path) => args.with_config_file(path)?,
        None => args.without_config(),
    };

    init_logging(merged.args.verbose);
    log::info!("🚀 {}", hgtscan::get_info());
    if let Some(path) = &config_path {
        log::info!("📄 Loaded configuration from: {}", path);
    }

    match validate_args(&merged)? {
        ValidationResult::Filter(settings) => {
            configure_threads(settings.threads)?;
            pipeline::run_filter(&settings, &command_line)?;
        }
        ValidationResult::Select(settings) => {
            let selected = pipeline::run_select(&settings)?;
            let total: usize = selected.iter().map(|s| s.records).sum();
            log::info!(
                "✅ {} sequences selected into {} files under {}",
                total,
                selected.len(),
                settings.output_dir.display()
            );
        }
        ValidationResult::Compare(settings) => {
            pipeline::run_compare(&settings, &command_line)?;
        }
        ValidationResult::Extract(settings) => {
            pipeline::run_extract(&settings)?;
        }
        ValidationResult::Housekeeping(settings) => {
            pipeline::run_housekeeping(&settings)?;
        }
    }
    Ok(())
}

/// Configure the global thread pool used by the filter stage
fn configure_threads(threads: Option<usize>) -> Result<()> {
    if let Some(n) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| HgtError::InvalidArgument(format!("Failed to configure thread pool: {}", e)))?;
        log::info!("🧵 Threads: {}", n);
    } else {
        log::info!("🧵 Threads: {} (auto-detected)", rayon::current_num_threads());
    }
    Ok(())
}
