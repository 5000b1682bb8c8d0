//! Data gateway - typed request wrappers over the expense store's REST API
//!
//! The gateway is stateless apart from its HTTP client: no caching, no retries.
//! Every failure is surfaced to the caller as a [`GatewayError`].

pub mod client;
pub mod error;

#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;

use chrono::NaiveDate;

use crate::models::{Category, Expense, ExpenseCreate, ExpenseId, ExpenseUpdate, TotalsResponse};

pub use client::HttpGateway;
pub use error::{GatewayError, GatewayResult, RequestFailure};

/// One operation per store interaction
pub trait ExpenseGateway: Send + Sync {
    /// Every expense currently in the store, in store order
    fn list_all(&self) -> impl Future<Output = GatewayResult<Vec<Expense>>> + Send;

    fn create(&self, data: &ExpenseCreate) -> impl Future<Output = GatewayResult<Expense>> + Send;

    fn update(
        &self,
        id: ExpenseId,
        data: &ExpenseUpdate,
    ) -> impl Future<Output = GatewayResult<Expense>> + Send;

    /// Not idempotent: a second delete of the same id is `NotFound`
    fn delete(&self, id: ExpenseId) -> impl Future<Output = GatewayResult<()>> + Send;

    fn list_by_category(
        &self,
        category: Category,
    ) -> impl Future<Output = GatewayResult<Vec<Expense>>> + Send;

    /// Inclusive bounds. `start > end` is a validation error.
    fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = GatewayResult<Vec<Expense>>> + Send;

    fn get_totals(&self) -> impl Future<Output = GatewayResult<TotalsResponse>> + Send;
}

/// Shared date-range check so every gateway rejects inverted ranges the same way
pub fn check_date_range(start: NaiveDate, end: NaiveDate) -> GatewayResult<()> {
    if start > end {
        return Err(GatewayError::Validation(format!(
            "start date {} is after end date {}",
            start, end
        )));
    }
    Ok(())
}
