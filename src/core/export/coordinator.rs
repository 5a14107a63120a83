//! Export coordinator - main orchestrator for the export process
//!
//! The configured range is split into daily windows. Each window runs as its
//! own task (submit, paginate into a CSV file, upload, delete) with its own
//! HTTP client and file; a semaphore bounds how many run at once. A failing
//! window never cancels its siblings.

use super::paginator::export_all;
use super::sink::CsvSink;
use super::summary::{ExportSummary, WindowReport, WindowStatus};
use crate::adapters::storage::{ObjectStore, S3ObjectStore};
use crate::adapters::sumo::{SearchApi, SumoSearchApi};
use crate::config::{ExporterConfig, SearchConfig};
use crate::core::job::SearchJob;
use crate::core::upload::Uploader;
use crate::core::window::{parse_timestamp, split_by_day, TimeWindow};
use crate::domain::{ExportError, Result, SinkDestination};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Export coordinator
pub struct ExportCoordinator {
    config: ExporterConfig,
    uploader: Option<Uploader>,
    search_api: Option<Arc<dyn SearchApi>>,
}

impl ExportCoordinator {
    /// Creates a coordinator; uploads go to `store` when one is given
    pub fn new(config: ExporterConfig, store: Option<Arc<dyn ObjectStore>>) -> Self {
        let uploader = store.map(|store| Uploader::from_config(store, &config.s3));
        Self {
            config,
            uploader,
            search_api: None,
        }
    }

    /// Routes every window through `api` instead of a per-window HTTP client
    pub fn with_search_api(mut self, api: Arc<dyn SearchApi>) -> Self {
        self.search_api = Some(api);
        self
    }

    /// Creates a coordinator with an S3 store if `s3.enabled` is set
    pub async fn from_config(config: ExporterConfig) -> Result<Self> {
        let store: Option<Arc<dyn ObjectStore>> = if config.s3.enabled {
            Some(Arc::new(S3ObjectStore::from_config(&config.s3).await?))
        } else {
            None
        };
        Ok(Self::new(config, store))
    }

    /// Daily windows for the configured range
    pub fn windows(&self) -> Result<Vec<TimeWindow>> {
        let query = &self.config.search.query;
        split_by_day(
            parse_timestamp(&query.start_date)?,
            parse_timestamp(&query.end_date)?,
        )
    }

    /// Windows and their output files, without contacting the service
    pub fn plan(&self) -> Result<Vec<WindowReport>> {
        Ok(self
            .windows()?
            .into_iter()
            .map(|window| {
                let path = window.output_path(&self.config.export.output_dir, &self.config.export.filename);
                WindowReport::planned(window, path)
            })
            .collect())
    }

    /// Execute the export
    ///
    /// Runs every window to completion, logs the summary, and returns the
    /// first error in completion order if any window failed.
    pub async fn execute_export(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let windows = self.windows()?;
        let concurrency = self.config.application.concurrency.max(1);

        tracing::info!(
            windows = windows.len(),
            concurrency = concurrency,
            endpoint = %self.config.search.api_url,
            upload = self.uploader.is_some(),
            "Starting export"
        );

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut tasks = JoinSet::new();

        for window in windows {
            let task = WindowTask {
                search: self.config.search.clone(),
                search_api: self.search_api.clone(),
                output_dir: PathBuf::from(&self.config.export.output_dir),
                filename: self.config.export.filename.clone(),
                uploader: self.uploader.clone(),
                destination: SinkDestination::new(&self.config.s3.bucket, &self.config.s3.region)
                    .with_delete_on_upload(self.config.s3.delete_on_upload),
            };
            let semaphore = semaphore.clone();
            let span = tracing::info_span!("window", from = %window.start_str());

            tasks.spawn(
                async move {
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => {
                            let err = ExportError::Other(format!("Export scheduler closed: {e}"));
                            return task.failed_before_start(window, err);
                        }
                    };
                    task.run(window).await
                }
                .instrument(span),
            );
        }

        let mut summary = ExportSummary::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((report, error)) => {
                    summary.add_report(report);
                    if let Some(error) = error {
                        summary.add_error(error);
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Export task panicked");
                    summary.add_error(ExportError::Other(format!("Export task panicked: {e}")));
                }
            }
        }

        summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        summary.into_result()
    }
}

/// Everything one window needs, owned by its task
struct WindowTask {
    search: SearchConfig,
    search_api: Option<Arc<dyn SearchApi>>,
    output_dir: PathBuf,
    filename: String,
    uploader: Option<Uploader>,
    destination: SinkDestination,
}

impl WindowTask {
    async fn run(self, window: TimeWindow) -> (WindowReport, Option<ExportError>) {
        let started = Instant::now();
        let path = window.output_path(&self.output_dir, &self.filename);

        let api: Arc<dyn SearchApi> = match &self.search_api {
            Some(api) => api.clone(),
            None => match SumoSearchApi::from_config(&self.search) {
                Ok(api) => Arc::new(api),
                Err(e) => return self.failed_before_start(window, e.into()),
            },
        };
        let request = window.request(&self.search.query.statement, &self.search.query.time_zone);
        let mut job = SearchJob::new(api, request);

        let mut report = WindowReport {
            status: WindowStatus::Exported,
            ..WindowReport::planned(window, path.clone())
        };
        let result = self.drive(&mut job, &path, &mut report).await;

        if result.is_err() && job.needs_cleanup() {
            if let Err(e) = job.delete().await {
                tracing::warn!(
                    job_id = ?report.job_id,
                    error = %e,
                    "Failed to delete search job after error"
                );
            }
        }

        report.duration = started.elapsed();
        match result {
            Ok(()) => {
                crate::log_window_complete!(report.window, report.rows, report.duration);
                (report, None)
            }
            Err(e) => {
                tracing::error!(job_id = ?report.job_id, error = %e, "Window export failed");
                report.status = WindowStatus::Failed(e.to_string());
                (report, Some(e))
            }
        }
    }

    async fn drive<A: SearchApi>(
        &self,
        job: &mut SearchJob<A>,
        path: &Path,
        report: &mut WindowReport,
    ) -> Result<()> {
        let handle = job.submit().await?;
        report.job_id = Some(handle.id.to_string());

        tracing::info!(
            job_id = %handle.id,
            file = %path.display(),
            "Exporting window"
        );

        let mut sink = CsvSink::create(path)?;
        let exported = export_all(
            job,
            &mut sink,
            self.search.page_size,
            Duration::from_millis(self.search.poll_interval_ms),
        )
        .await;
        // Flush whatever was written even if paging failed.
        let flushed = sink.finish();
        report.rows = exported?;
        flushed?;

        tracing::debug!(rows = report.rows, file = %path.display(), "CSV file written");

        if let Some(uploader) = &self.uploader {
            let outcome = uploader.upload(path, &self.destination).await?;
            report.location = Some(outcome.location);
            report.cleanup_error = outcome.cleanup_error;
        }

        job.delete().await?;
        Ok(())
    }

    fn failed_before_start(
        &self,
        window: TimeWindow,
        error: ExportError,
    ) -> (WindowReport, Option<ExportError>) {
        let path = window.output_path(&self.output_dir, &self.filename);
        let report = WindowReport {
            status: WindowStatus::Failed(error.to_string()),
            ..WindowReport::planned(window, path)
        };
        (report, Some(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    fn config(output_dir: &Path, start: &str, end: &str) -> ExporterConfig {
        let toml = format!(
            r#"
[search]
api_url = "http://127.0.0.1:1/api/v1/search/jobs"
access_id = "id"
access_key = "key"
poll_interval_ms = 0

[search.query]
statement = "error"
start_date = "{start}"
end_date = "{end}"

[export]
filename = "export"
output_dir = "{}"
"#,
            output_dir.display()
        );
        parse_config(&toml).unwrap()
    }

    #[test]
    fn test_plan_lists_daily_files() {
        let dir = TempDir::new().unwrap();
        let coordinator = ExportCoordinator::new(
            config(dir.path(), "2021-01-01T00:00:00", "2021-01-03T00:00:00"),
            None,
        );

        let plan = coordinator.plan().unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(
            plan[0].path,
            dir.path().join("export_2021-01-01T00:00:00.csv")
        );
        assert_eq!(
            plan[1].path,
            dir.path().join("export_2021-01-02T00:00:00.csv")
        );
        assert!(plan.iter().all(|r| r.status == WindowStatus::Planned));
    }

    #[tokio::test]
    async fn test_unreachable_service_fails_every_window() {
        let dir = TempDir::new().unwrap();
        let coordinator = ExportCoordinator::new(
            config(dir.path(), "2021-01-01T00:00:00", "2021-01-03T00:00:00"),
            None,
        );

        let err = coordinator.execute_export().await.unwrap_err();

        assert!(matches!(err, ExportError::Search(_)));
        assert!(!dir.path().join("export_2021-01-01T00:00:00.csv").exists());
    }
}
