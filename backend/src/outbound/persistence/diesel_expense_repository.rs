//! PostgreSQL-backed `ExpenseRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ExpenseRepository, ExpenseRepositoryError};
use crate::domain::{
    Expense, ExpenseDraft, ExpenseEntry, ExpenseFilter, ExpenseId, ExpenseKind, RelatedEntity,
    RelatedModel,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ExpenseRow, ExpenseWrite};
use super::pool::{DbPool, PoolError};
use super::schema::expenses;

/// Diesel-backed implementation of the expense repository port.
#[derive(Clone)]
pub struct DieselExpenseRepository {
    pool: DbPool,
}

impl DieselExpenseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExpenseRepositoryError {
    map_basic_pool_error(error, |message| ExpenseRepositoryError::connection(message))
}

fn map_diesel_error(error: DieselError) -> ExpenseRepositoryError {
    map_basic_diesel_error(
        error,
        ExpenseRepositoryError::query,
        ExpenseRepositoryError::connection,
    )
}

fn write_row(entry: &ExpenseEntry) -> ExpenseWrite<'_> {
    let related = entry.related();
    ExpenseWrite {
        date: entry.date(),
        kind: entry.kind().as_str(),
        category: entry.category(),
        related_model: related.map(|related| related.model().as_str()),
        related_id: related.map(RelatedEntity::id),
        amount_cents: entry.amount().cents(),
        settled: entry.settled(),
        description: entry.description(),
    }
}

fn corrupt(err: impl std::fmt::Display) -> ExpenseRepositoryError {
    ExpenseRepositoryError::query(format!("invalid stored expense: {err}"))
}

fn row_to_expense(row: ExpenseRow) -> Result<Expense, ExpenseRepositoryError> {
    let kind = ExpenseKind::from_str(&row.kind).map_err(corrupt)?;
    let related = match (row.related_model, row.related_id) {
        (Some(model), Some(id)) => Some(RelatedEntity::from_parts(
            RelatedModel::from_str(&model).map_err(corrupt)?,
            id,
        )),
        _ => None,
    };
    let entry = ExpenseEntry::new(ExpenseDraft {
        date: row.date,
        kind,
        category: row.category,
        related,
        amount: row.amount_cents as f64 / 100.0,
        settled: row.settled,
        description: row.description,
    })
    .map_err(corrupt)?;
    Ok(Expense {
        id: ExpenseId::from_uuid(row.id),
        entry,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl ExpenseRepository for DieselExpenseRepository {
    async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = expenses::table
            .select(ExpenseRow::as_select())
            .order_by((expenses::date.desc(), expenses::created_at.desc()))
            .into_boxed();
        if let Some(kind) = filter.kind {
            query = query.filter(expenses::kind.eq(kind.as_str()));
        }
        if let Some(settled) = filter.settled {
            query = query.filter(expenses::settled.eq(settled));
        }
        if let Some(model) = filter.related_model {
            query = query.filter(expenses::related_model.eq(model.as_str()));
        }
        if let Some(from) = filter.from {
            query = query.filter(expenses::date.ge(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(expenses::date.le(to));
        }
        let rows: Vec<ExpenseRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_expense).collect()
    }

    async fn find(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ExpenseRow> = expenses::table
            .find(*id.as_uuid())
            .select(ExpenseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_expense).transpose()
    }

    async fn create(&self, entry: &ExpenseEntry) -> Result<Expense, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ExpenseRow = diesel::insert_into(expenses::table)
            .values(&write_row(entry))
            .returning(ExpenseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_expense(row)
    }

    async fn update(
        &self,
        id: ExpenseId,
        entry: &ExpenseEntry,
    ) -> Result<Option<Expense>, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ExpenseRow> = diesel::update(expenses::table.find(*id.as_uuid()))
            .set((&write_row(entry), expenses::updated_at.eq(Utc::now())))
            .returning(ExpenseRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_expense).transpose()
    }

    async fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ExpenseRow> = diesel::delete(expenses::table.find(*id.as_uuid()))
            .returning(ExpenseRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_expense).transpose()
    }
}
