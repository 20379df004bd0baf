use clap::{Arg, ArgAction, Command};
use indicatif::{MultiProgress, ProgressBar};
use indicatif_log_bridge::LogWrapper;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use libyield_study::config::StudyConfig;
use libyield_study::figure::render_svg;
use libyield_study::process::process;
use libyield_study::report::write_records_csv;
use libyield_study::style::SeriesStyle;
use libyield_study::summary::TableSummary;
use libyield_study::table::{MeasurementTable, RunSeries};

const FIGURE_SIZE: (u32, u32) = (1000, 450);

fn make_template_config(path: &Path) -> ExitCode {
    let mut config = StudyConfig::default();
    config.add_file(PathBuf::from("None"), SeriesStyle::default());
    match config.write_config_file(path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Could not create template config file: {e}");
            ExitCode::FAILURE
        }
    }
}

fn summarize_files(files: Vec<PathBuf>) -> ExitCode {
    let mut status = ExitCode::SUCCESS;
    for path in files {
        let summary = MeasurementTable::from_path(&path).and_then(|table| {
            let mut parameters: Vec<(&String, &f64)> = table.parameters().iter().collect();
            parameters.sort_by(|a, b| a.0.cmp(b.0));
            for (key, value) in parameters {
                log::info!("{} -- {key}: {value}", path.display());
            }
            RunSeries::from_table(&table)
        });
        match summary.map_err(|e| e.to_string()).and_then(|runs| {
            TableSummary::from_series(&runs).map_err(|e| e.to_string())
        }) {
            Ok(s) => log::info!("{} -- {s}", path.display()),
            Err(e) => {
                log::error!("Could not summarize {}: {e}", path.display());
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}

fn main() -> ExitCode {
    // Create a cli
    let matches = Command::new("yield_study_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .subcommand(
            Command::new("summary")
                .about("Log totals and weighted averages of summary tables")
                .arg(
                    Arg::new("files")
                        .required(true)
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .help("Summary table(s)"),
                ),
        )
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .default_value("comparison.svg")
                .help("Path to the SVG figure"),
        )
        .arg(
            Arg::new("records")
                .short('r')
                .long("records")
                .help("Path to a CSV file holding every plotted point"),
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

    if let Err(e) = LogWrapper::new(pb_manager.clone(), logger).try_init() {
        eprintln!("Could not create logging/progress: {e}");
        return ExitCode::FAILURE;
    }

    if let Some(("summary", sub_matches)) = matches.subcommand() {
        let files: Vec<PathBuf> = sub_matches
            .get_many::<String>("files")
            .unwrap_or_default()
            .map(PathBuf::from)
            .collect();
        return summarize_files(files);
    }

    // Parse the cli
    let Some(config_path) = matches.get_one::<String>("path").map(PathBuf::from) else {
        log::error!("A configuration file is required (-p/--path)");
        return ExitCode::FAILURE;
    };

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        let status = make_template_config(&config_path);
        log::info!("Done.");
        return status;
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match StudyConfig::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("Target: {}", config.target);
    for (path, style) in config.files.iter().zip(config.styles.iter()) {
        log::info!(
            "File: {} -- marker: {} color: {}",
            path.to_string_lossy(),
            style.marker,
            style.color
        );
    }
    log::info!("Metric: {}", config.metric);
    log::info!("Reference Index: {}", config.reference_index);

    // Setup the progress bar
    let pb = pb_manager.add(ProgressBar::new(config.files.len() as u64));
    let result = process(&config, |done, _| pb.set_position(done as u64));
    pb.finish();

    let figure = match result {
        Ok(f) => f,
        Err(e) => {
            log::error!("Comparison failed with error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(records_path) = matches.get_one::<String>("records") {
        if let Err(e) = write_records_csv(Path::new(records_path), &figure.records) {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    }

    if let Some(figure_path) = matches.get_one::<String>("output") {
        if let Err(e) = render_svg(&figure, Path::new(figure_path), FIGURE_SIZE) {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    }

    log::info!("Done.");
    ExitCode::SUCCESS
}
