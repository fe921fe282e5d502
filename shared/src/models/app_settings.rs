//! App Settings Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// UI theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Membership plan (会员套餐)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: Theme,
    pub plans: Vec<Plan>,
    /// Instant-payment key shown on invoices
    pub pix_key: String,
}

/// Plans offered before the academy configures its own
pub fn default_plans() -> Vec<Plan> {
    [
        ("1", "Monthly", 150),
        ("2", "Quarterly", 400),
        ("3", "Yearly", 1500),
        ("4", "Drop-in Class", 50),
    ]
    .into_iter()
    .map(|(id, name, price)| Plan {
        id: id.to_string(),
        name: name.to_string(),
        price: Decimal::from(price),
    })
    .collect()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            plans: default_plans(),
            pix_key: String::new(),
        }
    }
}

/// Partial settings update; plans are replaced through their own operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettingsUpdate {
    pub theme: Option<Theme>,
    pub pix_key: Option<String>,
}
