//! 核心模块 - 配置、状态和后台任务
//!
//! # 模块结构
//!
//! - [`Config`] - 应用配置
//! - [`AcademyState`] - 学院状态 (数据集 + 服务)
//! - [`BackgroundTasks`] - 后台任务管理

pub mod config;
pub mod seed;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use state::{AcademyData, AcademyState};
pub use tasks::BackgroundTasks;
