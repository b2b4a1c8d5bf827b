//! Stable finances domain service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{ExpenseRepository, ExpenseRepositoryError, ExpenseService};
use crate::domain::{
    Error, Expense, ExpenseDraft, ExpenseEntry, ExpenseFilter, ExpenseId, ExpenseSummary,
};

fn map_repository_error(error: ExpenseRepositoryError) -> Error {
    match error {
        ExpenseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("expense repository unavailable: {message}"))
        }
        ExpenseRepositoryError::Query { message } => {
            Error::internal(format!("expense repository error: {message}"))
        }
    }
}

fn not_found(id: ExpenseId) -> Error {
    Error::not_found(format!("expense {id} not found"))
}

fn validate(draft: ExpenseDraft) -> Result<ExpenseEntry, Error> {
    ExpenseEntry::new(draft).map_err(|err| Error::invalid_field(err.field(), err.to_string()))
}

/// Expense service implementing the [`ExpenseService`] driving port.
#[derive(Clone)]
pub struct ExpenseServiceImpl<R> {
    expense_repo: Arc<R>,
}

impl<R> ExpenseServiceImpl<R> {
    /// Create a new service with the expense repository.
    pub fn new(expense_repo: Arc<R>) -> Self {
        Self { expense_repo }
    }
}

#[async_trait]
impl<R> ExpenseService for ExpenseServiceImpl<R>
where
    R: ExpenseRepository,
{
    async fn list(&self, filter: ExpenseFilter) -> Result<Vec<Expense>, Error> {
        self.expense_repo
            .list(&filter)
            .await
            .map_err(map_repository_error)
    }

    async fn summary(&self, filter: ExpenseFilter) -> Result<ExpenseSummary, Error> {
        let entries = self.list(filter).await?;
        Ok(ExpenseSummary::from_entries(&entries))
    }

    async fn get(&self, id: ExpenseId) -> Result<Expense, Error> {
        self.expense_repo
            .find(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, draft: ExpenseDraft) -> Result<Expense, Error> {
        let entry = validate(draft)?;
        self.expense_repo
            .create(&entry)
            .await
            .map_err(map_repository_error)
    }

    async fn update(&self, id: ExpenseId, draft: ExpenseDraft) -> Result<Expense, Error> {
        let entry = validate(draft)?;
        self.expense_repo
            .update(id, &entry)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: ExpenseId) -> Result<Expense, Error> {
        self.expense_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::{NaiveDate, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::MockExpenseRepository;
    use crate::domain::{ErrorCode, ExpenseKind};

    fn expense(kind: ExpenseKind, amount: f64, settled: bool) -> Expense {
        let now = Utc::now();
        Expense {
            id: ExpenseId::random(),
            entry: ExpenseEntry::new(ExpenseDraft {
                date: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
                kind,
                category: "rent".into(),
                related: None,
                amount,
                settled,
                description: None,
            })
            .expect("valid entry"),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn summary_aggregates_filtered_entries() {
        let mut repo = MockExpenseRepository::new();
        repo.expect_list()
            .withf(|filter| filter.settled == Some(false))
            .returning(|_| {
                Ok(vec![
                    expense(ExpenseKind::Expense, 100.0, false),
                    expense(ExpenseKind::Income, 40.5, false),
                ])
            });

        let summary = ExpenseServiceImpl::new(Arc::new(repo))
            .summary(ExpenseFilter {
                settled: Some(false),
                ..ExpenseFilter::default()
            })
            .await
            .expect("summary succeeds");
        assert_eq!(summary.expense.cents(), 10_000);
        assert_eq!(summary.income.cents(), 4_050);
        assert_eq!(summary.balance_cents(), -5_950);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_missing_expense_is_not_found() {
        let mut repo = MockExpenseRepository::new();
        repo.expect_delete().returning(|_| Ok(None));

        let err = ExpenseServiceImpl::new(Arc::new(repo))
            .delete(ExpenseId::random())
            .await
            .expect_err("missing expense");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
