//! Payment Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
    /// Bank slip issued, not yet paid
    Invoiced,
}

impl PaymentStatus {
    /// Pending and overdue payments count as open on the dashboard
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Overdue)
    }

    /// Parse a stored status, including the legacy Portuguese labels
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Paid" | "Pago" => Some(Self::Paid),
            "Pending" | "Pendente" => Some(Self::Pending),
            "Overdue" | "Atrasado" => Some(Self::Overdue),
            "Invoiced" | "Boleto Gerado" => Some(Self::Invoiced),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
            Self::Overdue => "Overdue",
            Self::Invoiced => "Invoiced",
        };
        f.write_str(s)
    }
}

/// Payment entity (缴费记录)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    /// Registration date
    pub date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: PaymentStatus,
    /// Plan name, e.g. "Monthly"
    pub plan: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Record payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreate {
    /// Defaults to now
    pub date: Option<DateTime<Utc>>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub plan: String,
    pub due_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_accepts_legacy_labels() {
        assert_eq!(PaymentStatus::parse("Pago"), Some(PaymentStatus::Paid));
        assert_eq!(PaymentStatus::parse("Pendente"), Some(PaymentStatus::Pending));
        assert_eq!(PaymentStatus::parse("Atrasado"), Some(PaymentStatus::Overdue));
        assert_eq!(PaymentStatus::parse("Boleto Gerado"), Some(PaymentStatus::Invoiced));
        assert_eq!(PaymentStatus::parse("Invoiced"), Some(PaymentStatus::Invoiced));
        assert_eq!(PaymentStatus::parse("paid"), None);
    }
}
