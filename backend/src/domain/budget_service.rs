//! Month budget input handling and the budget summary shown beside the
//! progress bar.

use super::budget_progress::BudgetProgressCalculator;
use super::calendar::{validate_month_index, CalendarService};
use super::money::clean_and_parse_amount;
use crate::error::{CalendarError, CalendarResult, ValidationError};
use crate::storage::traits::{BudgetStorage, FinanceStorage};
use shared::BudgetSummary;
use std::sync::Arc;
use tracing::{error, info};

/// Whether a budget save created a new entry or replaced one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetChange {
    Created,
    Updated,
    Deleted,
}

impl BudgetChange {
    pub fn success_message(&self) -> &'static str {
        match self {
            BudgetChange::Created => "Budget added successfully.",
            BudgetChange::Updated => "Budget updated successfully.",
            BudgetChange::Deleted => "Budget deleted. There is no budget for this month.",
        }
    }
}

#[derive(Clone)]
pub struct BudgetService {
    budgets: Arc<dyn BudgetStorage>,
    finances: Arc<dyn FinanceStorage>,
    calculator: BudgetProgressCalculator,
    calendar: CalendarService,
    currency_symbol: String,
}

impl BudgetService {
    pub fn new(
        budgets: Arc<dyn BudgetStorage>,
        finances: Arc<dyn FinanceStorage>,
        currency_symbol: &str,
    ) -> Self {
        Self {
            budgets,
            finances,
            calculator: BudgetProgressCalculator::new(),
            calendar: CalendarService::new(),
            currency_symbol: currency_symbol.to_string(),
        }
    }

    /// Parse a budget typed by the user
    pub fn parse_budget_input(&self, input: &str) -> Result<f64, ValidationError> {
        let amount = clean_and_parse_amount(input, &self.currency_symbol)
            .map_err(ValidationError::InvalidBudget)?;
        if amount < 0.0 {
            return Err(ValidationError::NegativeBudget);
        }
        Ok(amount)
    }

    /// Validate and store the budget of a month, creating or replacing it
    pub async fn set_monthly_budget(&self, month_index: u32, input: &str) -> CalendarResult<BudgetChange> {
        validate_month_index(month_index)?;
        let amount = self.parse_budget_input(input)?;

        let existing = self
            .budgets
            .get_budget(month_index)
            .await
            .map_err(CalendarError::collaborator)?;

        self.budgets
            .set_budget(month_index, amount)
            .await
            .map_err(|err| {
                error!("Failed to store budget for month {}: {:#}", month_index, err);
                CalendarError::collaborator(err)
            })?;

        let change = if existing.is_some() {
            BudgetChange::Updated
        } else {
            BudgetChange::Created
        };
        info!("{:?} budget {:.2} for {}", change, amount, self.calendar.month_name(month_index));
        Ok(change)
    }

    /// Clear the budget of a month by storing zero
    pub async fn delete_monthly_budget(&self, month_index: u32) -> CalendarResult<BudgetChange> {
        validate_month_index(month_index)?;
        self.budgets
            .set_budget(month_index, 0.0)
            .await
            .map_err(CalendarError::collaborator)?;
        info!("Deleted budget for {}", self.calendar.month_name(month_index));
        Ok(BudgetChange::Deleted)
    }

    /// Spend-vs-budget figures for a month
    pub async fn summary(&self, month_index: u32, year: i32) -> CalendarResult<BudgetSummary> {
        validate_month_index(month_index)?;

        let budget = self
            .budgets
            .get_budget(month_index)
            .await
            .map_err(CalendarError::collaborator)?;
        let income = self.finances.list_income().await.map_err(CalendarError::collaborator)?;
        let expenses = self.finances.list_expenses().await.map_err(CalendarError::collaborator)?;

        Ok(self.calculator.summarize(
            &income,
            &expenses,
            budget,
            month_index,
            year,
            self.calendar.month_name(month_index),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::InMemoryStorage;
    use chrono::NaiveDate;
    use shared::{ExpenseCategory, ExpenseItem};

    fn service_with(storage: Arc<InMemoryStorage>) -> BudgetService {
        BudgetService::new(storage.clone(), storage, "$")
    }

    #[tokio::test]
    async fn test_create_then_update() {
        let storage = Arc::new(InMemoryStorage::new());
        let service = service_with(storage.clone());

        assert_eq!(service.set_monthly_budget(2, "500").await.unwrap(), BudgetChange::Created);
        assert_eq!(service.set_monthly_budget(2, "$1,250.50").await.unwrap(), BudgetChange::Updated);
        assert_eq!(storage.get_budget(2).await.unwrap(), Some(1250.5));
    }

    #[tokio::test]
    async fn test_rejects_bad_input() {
        let storage = Arc::new(InMemoryStorage::new());
        let service = service_with(storage.clone());

        assert!(matches!(
            service.set_monthly_budget(2, "abc").await,
            Err(CalendarError::Validation(ValidationError::InvalidBudget(_)))
        ));
        assert!(matches!(
            service.set_monthly_budget(2, "-10").await,
            Err(CalendarError::Validation(ValidationError::NegativeBudget))
        ));
        assert!(matches!(
            service.set_monthly_budget(12, "10").await,
            Err(CalendarError::Validation(ValidationError::InvalidMonthIndex(12)))
        ));
        assert_eq!(storage.get_budget(2).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_stores_zero() {
        let storage = Arc::new(InMemoryStorage::new());
        let service = service_with(storage.clone());

        service.set_monthly_budget(4, "300").await.unwrap();
        service.delete_monthly_budget(4).await.unwrap();
        assert_eq!(storage.get_budget(4).await.unwrap(), Some(0.0));

        let summary = service.summary(4, 2024).await.unwrap();
        assert!(!summary.has_budget());
    }

    #[tokio::test]
    async fn test_summary_uses_collaborators() {
        let created_at = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let storage = Arc::new(InMemoryStorage::with_finances(
            Vec::new(),
            vec![ExpenseCategory {
                id: "fun".to_string(),
                title: "Fun".to_string(),
                color: "#00ff00".to_string(),
                items: vec![ExpenseItem { id: "x".to_string(), amount: 500.0, created_at }],
            }],
        ));
        let service = service_with(storage.clone());
        service.set_monthly_budget(2, "100").await.unwrap();

        let summary = service.summary(2, 2024).await.unwrap();
        assert_eq!(summary.total_expenses, 500.0);
        assert_eq!(summary.percent, 100.0);
        assert_eq!(summary.month_name, "March");
    }
}
