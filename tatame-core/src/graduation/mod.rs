//! 晋级规则 - belt catalog, promotion transition and attendance progress

pub mod catalog;
pub mod progress;
pub mod promotion;

pub use progress::{AttendanceProgress, attendance_progress};
pub use promotion::{
    PromotionKind, PromotionOutcome, PromotionRejection, RankStep, next_rank,
};
