use super::comparator::{Comparator, ComparisonRecord, Metric};
use super::config::StudyConfig;
use super::error::ComparatorError;
use super::normalizer::YieldNormalizer;

/// Everything needed to draw one comparison figure.
///
/// The figure has two panels, both showing the metric: one against the average beam current,
/// one against the T2 scaler rate.
#[derive(Debug, Clone, Default)]
pub struct ComparisonFigure {
    pub target: String,
    pub metric: Metric,
    pub records: Vec<ComparisonRecord>,
}

impl ComparisonFigure {
    pub fn title(&self) -> String {
        format!("{} -- {}", self.target, self.metric.label())
    }
}

/// The entry point of a rate study comparison.
///
/// Every file in the config is normalized against its own reference run and the chosen metric
/// is collected per file. `progress` is called with (files done, total files).
pub fn process<F: FnMut(usize, usize)>(
    config: &StudyConfig,
    progress: F,
) -> Result<ComparisonFigure, ComparatorError> {
    let comparator = Comparator::new(&config.files, &config.styles)?;
    let normalizer = YieldNormalizer::new(config.reference_index);
    log::info!(
        "Comparing {} files for target {} -- metric: {} reference index: {} last runs: {}",
        comparator.n_files(),
        config.target,
        config.metric,
        normalizer.reference_index(),
        config
            .last_runs
            .map(|n| n.to_string())
            .unwrap_or_else(|| String::from("all"))
    );
    let records = comparator.compare(&normalizer, config.metric, config.last_runs, progress)?;
    Ok(ComparisonFigure {
        target: config.target.clone(),
        metric: config.metric,
        records,
    })
}
