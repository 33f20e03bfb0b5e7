mod bootstrap;

use anyhow::Result;
use claims_core::settings::Settings;
use claims_data::analysis::analyze_batch;
use claims_runtime::orchestrator::{DashboardData, DashboardOrchestrator};
use claims_ui::app::{App, ViewMode};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Claimsight v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Refresh: {}s",
        settings.view,
        settings.theme,
        settings.refresh_rate
    );

    let data_path = settings
        .data_path
        .clone()
        .or_else(bootstrap::discover_data_path);
    let data_path_str = data_path.map(|p| p.to_string_lossy().to_string());
    let data_path_label = data_path_str
        .clone()
        .unwrap_or_else(|| "~/.claimsight/batches".to_string());

    match settings.view.as_str() {
        "dashboard" => {
            tracing::info!("Starting live dashboard...");

            let orchestrator = DashboardOrchestrator::new(
                u64::from(settings.refresh_rate),
                data_path_str,
            );

            let (rx, handle) = orchestrator.start();

            let app = App::new(&settings.theme, ViewMode::Dashboard, data_path_label);

            // Run the TUI event loop. The loop exits on 'q' / Ctrl+C inside the TUI.
            // We also listen for Ctrl+C at the OS level so that signals received
            // while the terminal is in raw mode are handled cleanly.
            tokio::select! {
                result = app.run_dashboard(rx) => {
                    handle.abort();
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down dashboard task");
                    handle.abort();
                }
            }
        }

        "report" => {
            tracing::info!("Running one-shot report...");

            // Single analysis pass over the newest batch file.
            let analysis = analyze_batch(data_path_str.as_deref());
            let ingest_error = analysis.error.clone();
            let batches_seen = usize::from(analysis.batch.is_some());

            let snapshot = DashboardData {
                analysis,
                batches_seen,
                ingest_error,
            };

            let app = App::new(&settings.theme, ViewMode::Report, data_path_label);
            app.run_report(snapshot).await?;
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}
