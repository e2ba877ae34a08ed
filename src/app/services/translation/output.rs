//! Writing a dataset as DSSAT files

use crate::app::models::Dataset;
use crate::app::services::fixed_width::YearPivot;
use crate::app::services::grouping::{ExperimentGroup, WeatherCatalog, group_experiments, group_soils};
use crate::app::services::lookup::CropCodes;
use crate::app::services::scheduler::{TranslationReport, WriteScheduler};
use crate::app::services::writers::{
    RenderedFile, WriterContext, render_batch_file, render_cultivar_file, render_experiment_file,
    render_observed_file, render_run_file, render_soil_file, render_time_series_file,
    render_weather_file, write_rendered,
};
use crate::config::TranslatorConfig;
use crate::{Error, Result};
use indicatif::ProgressBar;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type GroupRenderer = fn(&ExperimentGroup, &WriterContext) -> Option<RenderedFile>;

/// Per-group writers with their task label suffixes
const GROUP_RENDERERS: [(&str, GroupRenderer); 3] = [
    ("X", render_experiment_file),
    ("A", render_observed_file),
    ("T", render_time_series_file),
];

/// Schedules every output file of a dataset and collects the results
#[derive(Debug, Clone)]
pub struct OutputController {
    config: TranslatorConfig,
    cancellation: CancellationToken,
    progress: Option<ProgressBar>,
}

impl OutputController {
    pub fn new(config: TranslatorConfig) -> Self {
        Self {
            config,
            cancellation: CancellationToken::new(),
            progress: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    /// Translate `dataset` into `out_dir`
    ///
    /// Fails only when the output directory cannot be created. Writer
    /// failures are logged and listed in the returned report.
    pub async fn write(&self, dataset: &Dataset, out_dir: &Path) -> Result<TranslationReport> {
        tokio::fs::create_dir_all(out_dir).await.map_err(|e| {
            Error::io(
                format!("Failed to create output directory {}", out_dir.display()),
                e,
            )
        })?;

        if dataset.is_empty() {
            warn!("Dataset is empty; only run files will be written");
        }

        let pivot = YearPivot::new(self.config.year_pivot);
        let crops = Arc::new(CropCodes::new());
        let catalog = Arc::new(WeatherCatalog::build(dataset, pivot));
        let context = Arc::new(WriterContext::new(Arc::clone(&crops), catalog, pivot));
        let groups = Arc::new(group_experiments(&dataset.experiments, &crops));
        let soil_groups = group_soils(dataset);
        let dir = Arc::new(out_dir.to_path_buf());

        info!(
            "Translating {} experiment groups, {} soil groups and {} weather stations into {}",
            groups.len(),
            soil_groups.len(),
            context.weather.len(),
            out_dir.display()
        );

        let mut scheduler =
            WriteScheduler::new(self.config.workers).with_cancellation(self.cancellation.clone());
        if let Some(bar) = &self.progress {
            scheduler = scheduler.with_progress(bar.clone());
        }

        // Experiment, observed and time series files per group
        for (index, group) in groups.iter().enumerate() {
            for (suffix, render) in GROUP_RENDERERS {
                let groups = Arc::clone(&groups);
                let context = Arc::clone(&context);
                submit_render(&mut scheduler, group.task_label(suffix), &dir, move || {
                    render(&groups[index], &context)
                });
            }
        }

        // Groups with generated stems share one cultivar file
        let mut cultivar_files: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (index, group) in groups.iter().enumerate() {
            cultivar_files
                .entry(group.cultivar_file_name())
                .or_default()
                .push(index);
        }
        for indices in cultivar_files.into_values() {
            let label = groups[indices[0]].task_label("Cul");
            let groups = Arc::clone(&groups);
            submit_render(&mut scheduler, label, &dir, move || {
                let members: Vec<&ExperimentGroup> = indices.iter().map(|&i| &groups[i]).collect();
                render_cultivar_file(&members)
            });
        }

        for soil_group in soil_groups {
            let context = Arc::clone(&context);
            let label = format!("Soil file {}", soil_group.file_name());
            submit_render(&mut scheduler, label, &dir, move || {
                render_soil_file(&soil_group, &context)
            });
        }

        for (index, (name, _)) in context.weather.stations().iter().enumerate() {
            let context = Arc::clone(&context);
            let label = format!("Weather file {}", name);
            submit_render(&mut scheduler, label, &dir, move || {
                let (name, station) = &context.weather.stations()[index];
                render_weather_file(name, station, &context)
            });
        }

        let experiments = Arc::new(dataset.experiments.clone());
        for &version in &self.config.dssat_versions {
            let experiments = Arc::clone(&experiments);
            let groups = Arc::clone(&groups);
            let context = Arc::clone(&context);
            submit_render(&mut scheduler, format!("DSSBatch.v{}", version), &dir, move || {
                render_batch_file(&experiments, &groups, version, &context)
            });
            submit_render(&mut scheduler, format!("Run{}.bat", version), &dir, move || {
                Some(render_run_file(version))
            });
        }

        let budget = self.config.soft_budget(dataset.daily_weather_count());
        debug!(
            "Awaiting {} tasks with a soft budget of {:?}",
            scheduler.pending(),
            budget
        );
        let report = scheduler.finish(budget).await;

        if report.cancelled {
            warn!("Translation into {} was cancelled", out_dir.display());
        }
        Ok(report)
    }
}

/// Submit a task that renders one file and writes it into `dir`
fn submit_render<R>(scheduler: &mut WriteScheduler, label: String, dir: &Arc<PathBuf>, render: R)
where
    R: FnOnce() -> Option<RenderedFile> + Send + 'static,
{
    let dir = Arc::clone(dir);
    scheduler.submit(label, move || match render() {
        Some(file) => write_rendered(&dir, &file).map(Some),
        None => Ok(None),
    });
}
