use anyhow::Context;
use std::sync::Arc;
use tatame_core::{AcademyState, Config, JsonFileStorage, reports, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载 .env 和配置
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. 设置环境 (工作目录, 日志)
    setup_environment(&config)?;
    tracing::info!(environment = %config.environment, "Tatame starting...");

    // 3. 初始化学院状态
    let storage = Arc::new(JsonFileStorage::new(&config.work_dir));
    let state = AcademyState::initialize(config, storage)
        .await
        .context("failed to initialize academy state")?;

    let stats = reports::dashboard_stats(&state.students());
    tracing::info!(
        students = stats.total_students,
        open_payments = stats.students_with_open_payments,
        estimated_monthly_revenue = %stats.estimated_monthly_revenue,
        "Dashboard"
    );
    tracing::info!(tip = %state.daily_tip().await, "Daily tip");

    // 4. 等待退出信号，落盘后关闭
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    tracing::info!("Shutdown signal received");
    state.shutdown().await;

    let status = state.sync_status();
    if let Some(error) = status.last_error {
        tracing::error!(%error, "Last save failed; some changes may not be on disk");
    }
    Ok(())
}
