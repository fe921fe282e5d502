//! App Settings Store

use shared::error::{AppError, AppResult};
use shared::models::{AppSettings, AppSettingsUpdate, Plan};

use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_optional_text,
    validate_required_text,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSettingsStore {
    settings: AppSettings,
}

impl AppSettingsStore {
    pub fn new(settings: AppSettings) -> Self {
        Self { settings }
    }

    pub fn snapshot(&self) -> AppSettings {
        self.settings.clone()
    }

    pub fn update(&mut self, data: AppSettingsUpdate) -> AppResult<AppSettings> {
        validate_optional_text(data.pix_key.as_deref(), "pixKey", MAX_SHORT_TEXT_LEN)?;

        if let Some(theme) = data.theme {
            self.settings.theme = theme;
        }
        if let Some(pix_key) = data.pix_key {
            self.settings.pix_key = pix_key.trim().to_string();
        }
        Ok(self.settings.clone())
    }

    /// Replace the plan list. Ids must be present and unique.
    pub fn set_plans(&mut self, plans: Vec<Plan>) -> AppResult<Vec<Plan>> {
        for plan in &plans {
            validate_required_text(&plan.id, "plan.id", MAX_SHORT_TEXT_LEN)?;
            validate_required_text(&plan.name, "plan.name", MAX_NAME_LEN)?;
            validate_amount(plan.price, "plan.price")?;
        }
        if let Some(dup) = plans
            .iter()
            .enumerate()
            .find(|(i, p)| plans[..*i].iter().any(|q| q.id == p.id))
            .map(|(_, p)| p)
        {
            return Err(AppError::validation(format!("duplicate plan id {}", dup.id))
                .with_detail("id", dup.id.as_str()));
        }

        tracing::info!(count = plans.len(), "Plans replaced");
        self.settings.plans = plans;
        Ok(self.settings.plans.clone())
    }

    pub fn replace_all(&mut self, settings: AppSettings) {
        self.settings = settings;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::error::ErrorCode;
    use shared::models::Theme;

    fn plan(id: &str, name: &str, price: i64) -> Plan {
        Plan {
            id: id.to_string(),
            name: name.to_string(),
            price: Decimal::from(price),
        }
    }

    #[test]
    fn test_update_merges() {
        let mut store = AppSettingsStore::default();
        let updated = store
            .update(AppSettingsUpdate {
                theme: Some(Theme::Light),
                pix_key: None,
            })
            .unwrap();
        assert_eq!(updated.theme, Theme::Light);
        assert_eq!(updated.plans.len(), 4);

        let updated = store
            .update(AppSettingsUpdate {
                theme: None,
                pix_key: Some(" academy@pix ".to_string()),
            })
            .unwrap();
        assert_eq!(updated.theme, Theme::Light);
        assert_eq!(updated.pix_key, "academy@pix");
    }

    #[test]
    fn test_set_plans() {
        let mut store = AppSettingsStore::default();
        let plans = store.set_plans(vec![plan("a", "Kids", 120)]).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(store.snapshot().plans[0].name, "Kids");
    }

    #[test]
    fn test_set_plans_rejects_invalid_without_mutation() {
        let mut store = AppSettingsStore::default();
        let before = store.snapshot();

        let err = store.set_plans(vec![plan("", "Kids", 1)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let err = store.set_plans(vec![plan("a", "Kids", -1)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentInvalidAmount);

        let err = store
            .set_plans(vec![plan("a", "Kids", 1), plan("a", "Adults", 2)])
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let mut fractional = plan("a", "Kids", 0);
        fractional.price = Decimal::new(149_995, 3);
        let err = store.set_plans(vec![fractional]).unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentInvalidAmount);

        assert_eq!(store.snapshot(), before);
    }
}
