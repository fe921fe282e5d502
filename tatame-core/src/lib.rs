//! Tatame Core - 柔术道馆学员管理核心
//!
//! # 架构概述
//!
//! 学员、晋级和缴费数据全部保存在内存中，由 [`AcademyState`] 统一持有；
//! 变更经防抖后写入存储，读取时总是先修复 (reconcile)。
//!
//! - **晋级规则** (`graduation`): 腰带目录、晋级计算、出勤进度
//! - **数据层** (`db`): 学员、毕业规则、应用设置仓库
//! - **修复** (`reconcile`): 任意 JSON → 合法模型
//! - **存储** (`storage`): JSON 文件 / 内存
//! - **持久化** (`persistence`): 防抖写入 worker
//! - **备份** (`data_transfer`): 全量导入导出
//! - **报表** (`reports`): 仪表盘、收入统计
//!
//! # 模块结构
//!
//! ```text
//! tatame-core/src/
//! ├── core/          # 配置、状态、后台任务
//! ├── graduation/    # 腰带目录与晋级规则
//! ├── db/            # 内存仓库
//! ├── reconcile/     # 数据修复
//! ├── storage/       # 存储实现
//! ├── persistence/   # 防抖持久化
//! ├── data_transfer/ # 备份编解码
//! ├── services/      # 每日提示
//! ├── reports/       # 报表
//! └── utils/         # 日志、校验
//! ```

pub mod core;
pub mod data_transfer;
pub mod db;
pub mod graduation;
pub mod persistence;
pub mod reconcile;
pub mod reports;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export 公共类型
pub use core::{AcademyState, Config};
pub use graduation::{PromotionKind, PromotionOutcome, PromotionRejection};
pub use persistence::SyncStatus;
pub use storage::{JsonFileStorage, MemoryStorage, Storage, StorageSection};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, prepare the work directory and initialize logging
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.work_dir)?;
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        config.log_dir.as_deref(),
    );
    Ok(())
}
