//! External services

pub mod tip;

pub use tip::{GeminiTipClient, TipError, TipService, TipSource};
