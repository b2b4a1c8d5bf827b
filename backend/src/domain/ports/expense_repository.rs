//! Port for expense and income persistence.

use async_trait::async_trait;

use crate::domain::{Expense, ExpenseEntry, ExpenseFilter, ExpenseId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by expense repository adapters.
    pub enum ExpenseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "expense repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "expense repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Entries matching `filter`, most recent first.
    async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, ExpenseRepositoryError>;

    async fn find(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseRepositoryError>;

    async fn create(&self, entry: &ExpenseEntry) -> Result<Expense, ExpenseRepositoryError>;

    async fn update(
        &self,
        id: ExpenseId,
        entry: &ExpenseEntry,
    ) -> Result<Option<Expense>, ExpenseRepositoryError>;

    async fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseRepositoryError>;
}
