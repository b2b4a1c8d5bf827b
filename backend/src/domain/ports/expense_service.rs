//! Driving port for stable finances.

use async_trait::async_trait;

use crate::domain::{Error, Expense, ExpenseDraft, ExpenseFilter, ExpenseId, ExpenseSummary};

/// Domain use-case port for expense and income entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpenseService: Send + Sync {
    async fn list(&self, filter: ExpenseFilter) -> Result<Vec<Expense>, Error>;

    /// Totals over the entries matching `filter`.
    async fn summary(&self, filter: ExpenseFilter) -> Result<ExpenseSummary, Error>;

    async fn get(&self, id: ExpenseId) -> Result<Expense, Error>;

    async fn create(&self, draft: ExpenseDraft) -> Result<Expense, Error>;

    async fn update(&self, id: ExpenseId, draft: ExpenseDraft) -> Result<Expense, Error>;

    async fn delete(&self, id: ExpenseId) -> Result<Expense, Error>;
}
