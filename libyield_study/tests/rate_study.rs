use std::path::{Path, PathBuf};

use libyield_study::comparator::Metric;
use libyield_study::config::StudyConfig;
use libyield_study::error::{ComparatorError, NormalizerError};
use libyield_study::process::process;
use libyield_study::report::write_records_csv;
use libyield_study::style::{MarkerShape, SeriesStyle, StyleColor};
use libyield_study::summary::TableSummary;
use libyield_study::table::{MeasurementTable, RunSeries};

const HEADER: &str = "run,avg_current,charge,real_Yield,real_Yield_err,hTrkEff,hTrkEff_err,pTrkEff,pTrkEff_err,tLT,tLT_err_Bi,multi_track_eff,T2_scl_rate,beam_time";

fn write_phase(dir: &Path, phase: &str, rows: &[&str]) -> PathBuf {
    let phase_dir = dir.join(phase);
    std::fs::create_dir_all(&phase_dir).unwrap();
    let path = phase_dir.join("cafe_prod_Au197_MF_report_summary.csv");
    let mut contents = format!("# {phase} summary\n# transparency: 0.56\n{HEADER}\n");
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    std::fs::write(&path, contents).unwrap();
    path
}

fn two_phase_config(dir: &Path) -> StudyConfig {
    // Unsorted on purpose
    let phase0 = write_phase(
        dir,
        "phase0",
        &[
            "17096,40,4.0,100,1,1,0,1,0,1,0,1,400,100",
            "17094,10,1.0,100,1,1,0,1,0,1,0,1,100,100",
            "17095,20,2.0,100,1,1,0,1,0,1,0,1,200,100",
        ],
    );
    let phase1 = write_phase(
        dir,
        "phase1",
        &[
            "17201,15,1.0,0.9e3,30,0.98,0.01,0.99,0.01,0.95,0.02,1,150,200",
            "17202,30,1.0,0.8e3,30,0.96,0.01,0.99,0.01,0.90,0.02,1,300,200",
        ],
    );
    let mut config = StudyConfig {
        target: String::from("Au197"),
        ..Default::default()
    };
    config.add_file(
        phase0,
        SeriesStyle::new(MarkerShape::Circle, "k".parse::<StyleColor>().unwrap()),
    );
    config.add_file(
        phase1,
        SeriesStyle::new(MarkerShape::Square, "gray".parse::<StyleColor>().unwrap())
            .with_label("new replay"),
    );
    config
}

#[test]
fn compare_two_phases() {
    let dir = tempfile::tempdir().unwrap();
    let config = two_phase_config(dir.path());
    let mut calls = vec![];
    let figure = process(&config, |done, total| calls.push((done, total))).unwrap();

    assert_eq!(calls, vec![(1, 2), (2, 2)]);
    assert_eq!(figure.target, "Au197");
    assert_eq!(figure.records.len(), 2);

    let first = &figure.records[0];
    assert_eq!(first.source_label, "phase0");
    assert_eq!(first.avg_current, vec![10.0, 20.0, 40.0]);
    assert_eq!(first.scaler_rate, vec![100.0, 200.0, 400.0]);
    assert_eq!(first.metric_nominal, vec![1.0, 0.5, 0.25]);
    assert_eq!(first.metric_err[0], 0.0);

    let second = &figure.records[1];
    assert_eq!(second.source_label, "new replay");
    assert_eq!(second.style.marker, MarkerShape::Square);
    assert_eq!(second.metric_nominal[0], 1.0);
    let expected = (800.0 / (0.96 * 0.99 * 0.90)) / (900.0 / (0.98 * 0.99 * 0.95));
    assert!((second.metric_nominal[1] - expected).abs() < 1e-12);
    assert!(second.metric_err[1] > 0.0);
}

#[test]
fn compare_scalers_from_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = two_phase_config(dir.path());
    config.metric = Metric::RelativeScaler;
    config.last_runs = Some(2);

    let config_path = dir.path().join("study.yaml");
    config.write_config_file(&config_path).unwrap();
    let loaded = StudyConfig::read_config_file(&config_path).unwrap();
    assert_eq!(loaded, config);

    let figure = process(&loaded, |_, _| ()).unwrap();
    // phase0 keeps the 20 and 40 uA runs; counts per charge are constant
    assert_eq!(figure.records[0].avg_current, vec![20.0, 40.0]);
    assert_eq!(figure.records[0].metric_nominal, vec![1.0, 1.0]);
    assert_eq!(figure.records[0].metric_err, vec![0.0, 0.0]);
    assert_eq!(figure.records[1].metric_nominal, vec![1.0, 2.0]);

    let records_path = dir.path().join("records.csv");
    write_records_csv(&records_path, &figure.records).unwrap();
    let written = std::fs::read_to_string(&records_path).unwrap();
    assert_eq!(written.lines().count(), 5);
}

#[test]
fn zero_charge_stops_the_comparison() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = two_phase_config(dir.path());
    let broken = write_phase(
        dir.path(),
        "phase2",
        &["17300,10,0.0,100,1,1,0,1,0,1,0,1,100,100"],
    );
    config.add_file(broken.clone(), SeriesStyle::default());

    match process(&config, |_, _| ()) {
        Err(ComparatorError::FileFailed { path, source }) => {
            assert_eq!(path, broken);
            assert!(matches!(
                source,
                NormalizerError::DivisionByZero { ref quantity, row: 0 } if quantity == "charge"
            ));
        }
        other => panic!("expected FileFailed, got {other:?}"),
    }
}

#[test]
fn reference_index_beyond_window() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = two_phase_config(dir.path());
    config.reference_index = 2;
    config.last_runs = Some(2);
    assert!(matches!(
        process(&config, |_, _| ()),
        Err(ComparatorError::FileFailed {
            source: NormalizerError::InvalidReferenceIndex { index: 2, n_rows: 2 },
            ..
        })
    ));
}

#[test]
fn missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(StudyConfig::read_config_file(&dir.path().join("nope.yaml")).is_err());
}

#[test]
fn summarize_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_phase(
        dir.path(),
        "phase1",
        &[
            "17201,15,1.0,900,30,0.98,0.01,0.99,0.01,0.95,0.02,1,150,200",
            "17202,30,2.0,800,40,0.96,0.01,0.99,0.01,0.90,0.02,1,300,200",
        ],
    );
    let table = MeasurementTable::from_path(&path).unwrap();
    assert_eq!(table.parameter("transparency"), Some(0.56));
    let summary = TableSummary::from_series(&RunSeries::from_table(&table).unwrap()).unwrap();
    assert_eq!(summary.n_runs, 2);
    assert_eq!(summary.total_charge, 3.0);
    assert_eq!(summary.total_yield.value, 1700.0);
    assert!((summary.total_yield.error - 50.0).abs() < 1e-9);
    assert!((summary.hms_tracking.value - 0.97).abs() < 1e-12);
    assert!((summary.shms_tracking.value - 0.99).abs() < 1e-12);
}
