//! # yield_study
//!
//! yield_study is a small toolkit for rate dependence studies of charge-normalized yields. It
//! takes the per-run summary tables (CSV) written by the replay/report stage of an experiment,
//! corrects the measured yield for charge, tracking efficiencies, live time, and multiplicity
//! efficiency, and compares the result across beam currents and across study phases. The same
//! is done for the T2 scaler counts per unit charge, which are independent of event
//! reconstruction and serve as a reference for rate effects.
//!
//! ## Installation
//!
//! Currently the only method of install is from source. If you have not used Rust before, see
//! the [Rust docs](https://www.rust-lang.org/tools/install) for installation instructions.
//!
//! To build and install the GUI viewer use `cargo install --path ./yield_study` from the top
//! level repository. To build and install the CLI use `cargo install --path ./yield_study_cli`.
//!
//! ## Summary tables
//!
//! A summary table is a comma separated file with a header row. Lines starting with `#` are
//! comments. Comments of the form `# key: value` with a numeric value are read as table
//! parameters. Column order does not matter; the following columns are required:
//!
//! ```text
//! avg_current, charge, real_Yield, real_Yield_err, hTrkEff, hTrkEff_err, pTrkEff,
//! pTrkEff_err, tLT, tLT_err_Bi, multi_track_eff, T2_scl_rate, beam_time
//! ```
//!
//! Rows are sorted by `avg_current` on load, so the default reference run (index 0) is the
//! lowest current run.
//!
//! ## Normalization
//!
//! For every run
//!
//! ```text
//! Y  = real_Yield / (charge * hTrkEff * pTrkEff * tLT * multi_track_eff)
//! T2 = T2_scl_rate[kHz] * 1000 * beam_time / charge
//! ```
//!
//! and both are divided by the value of the reference run. Uncertainties of `real_Yield`,
//! `hTrkEff`, `pTrkEff`, and `tLT` are propagated to first order, assuming they are
//! uncorrelated. `charge` and `multi_track_eff` have no uncertainty in the tables and are
//! treated as exact. Any zero denominator is an error.
//!
//! ## Configuration
//!
//! A comparison is described by a YAML file, shared by the GUI and the CLI:
//!
//! ```yml
//! target: Au197
//! files:
//! - phase3/cafe_prod_Au197_MF_report_summary.csv
//! - phase2/cafe_prod_Au197_MF_report_summary.csv
//! styles:
//! - marker: v
//!   color: g
//! - marker: ^
//!   color: b
//!   label: phase 2
//! metric: relative_yield
//! reference_index: 0
//! last_runs: null
//! ```
//!
//! There must be one style per file. `metric` is one of `relative_yield`, `relative_scaler`,
//! `live_time`, or `yield`. `last_runs` keeps only that many of the highest current runs of
//! each table; `reference_index` is counted within the kept runs.
pub mod comparator;
pub mod config;
pub mod constants;
pub mod error;
pub mod figure;
pub mod measured;
pub mod normalizer;
pub mod process;
pub mod report;
pub mod style;
pub mod summary;
pub mod table;
