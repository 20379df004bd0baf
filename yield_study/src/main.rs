//! # yield_study
//!
//! Part of the yield_study crate family.
//!
//! This is the application to compare rate dependence studies with a GUI using
//! [egui](https://github.com/emilk/egui).
//!
//! ## Install
//!
//! Use `cargo install --path ./yield_study`
//!
//! ## Use
//!
//! To launch the application simply invoke it after it is installed
//!
//! ```bash
//! yield_study
//! ```
//!
//! Set the target, add summary files (one per study phase) and click Compare. The left panel
//! shows the chosen metric against the average beam current, the right panel against the T2
//! scaler rate.
//!
//! ## Configuration
//!
//! - Target: name of the target nucleus, used in the figure title
//! - Metric: relative yield, relative T2 scalers per charge, live time, or absolute yield
//! - Reference Index: the run every file is normalized to, counted from the lowest current
//! - Last Runs: optionally keep only the highest current runs of every file
//! - Files: each summary file gets a marker, a color, and an optional legend label
//!
//! Configurations can be saved using File->Save and loaded using File->Open. They are
//! compatible with the CLI.

mod app;
use app::StudyApp;
use std::fs::File;
use std::process::ExitCode;

/// The program entry point
fn main() -> ExitCode {
    // Setup logging to a file
    match File::create("./yield_study.log") {
        Ok(log_file) => {
            if let Err(e) = simplelog::WriteLogger::init(
                simplelog::LevelFilter::Info,
                simplelog::Config::default(),
                log_file,
            ) {
                eprintln!("Could not create logger: {e}");
                return ExitCode::FAILURE;
            }
        }
        Err(e) => {
            eprintln!("Could not create log file: {e}");
            return ExitCode::FAILURE;
        }
    }
    log::info!("Starting Yield Study UI");

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Yield Study")
            .with_inner_size(eframe::epaint::vec2(1100.0, 750.0))
            .with_min_inner_size(eframe::epaint::vec2(700.0, 500.0)),
        ..Default::default()
    };
    match eframe::run_native(
        "yield_study",
        native_options,
        Box::new(|cc| Ok(Box::new(StudyApp::new(cc)))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Eframe error: {}", e);
            ExitCode::FAILURE
        }
    }
}
