//! # zdc_digi_cli
//!
//! Part of the zdc_digi crate family.
//!
//! Command line driver which runs a zdc_digi job from a YAML configuration.
//!
//! ## Use
//!
//! Make a template configuration with
//!
//! ```bash
//! zdc_digi_cli -p config.yml new
//! ```
//!
//! fill it out, then run the job with
//!
//! ```bash
//! zdc_digi_cli -p config.yml
//! ```
use clap::{Arg, Command};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use std::path::PathBuf;
use std::sync::mpsc;

use libzdc_digi::config::Config;
use libzdc_digi::process::process;
use libzdc_digi::worker_status::WorkerStatus;

const BAR_LENGTH: u64 = 1000;

fn main() {
    // Create a cli
    let matches = Command::new("zdc_digi_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .global(true)
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    LogWrapper::new(pb_manager.clone(), logger)
        .try_init()
        .expect("Could not create logging/progress!");

    // Parse the cli
    let config_path = match matches.get_one::<String>("path") {
        Some(p) => PathBuf::from(p),
        None => {
            log::error!("A configuration path is required (-p/--path)");
            return;
        }
    };

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        match Config::default().write_config_file(&config_path) {
            Ok(()) => log::info!("Done."),
            Err(e) => log::error!("{e}"),
        }
        return;
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("Digi tag: {}", config.digi_tag);
    log::info!("Input Path: {}", config.input_path.to_string_lossy());
    log::info!("Output Path: {}", config.output_path.to_string_lossy());
    if !config.input_exists() {
        log::error!(
            "Input file {} does not exist!",
            config.input_path.to_string_lossy()
        );
        return;
    }

    // Setup the progress bar
    let pb = pb_manager.add(ProgressBar::new(BAR_LENGTH));
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {percent}% {msg}") {
        pb.set_style(style);
    }
    let (tx, rx) = mpsc::channel::<WorkerStatus>();
    // Spawn the task!
    let handle = std::thread::spawn(move || process(&config, &tx));

    // The channel closes when the worker drops its sender, finished or not
    for status in rx.iter() {
        pb.set_position((status.progress() * BAR_LENGTH as f32) as u64);
        pb.set_message(format!("{} events", status.events_processed));
    }

    match handle.join() {
        Ok(result) => match result {
            Ok(summary) => log::info!("Successfully processed {} events!", summary.n_events),
            Err(e) => log::error!("Processing failed with error: {e}"),
        },
        Err(_) => log::error!("Failed to join processing task!"),
    }

    pb.finish();

    log::info!("Done.");
}
