//! View controller - owns the expense view state and drives the gateway
//!
//! Every operation awaits its gateway calls in order, so an action and its
//! refresh chain finish before the caller can issue the next one. State is
//! published to the UI after each change, including the loading flag.

use chrono::NaiveDate;
use tokio::sync::mpsc;

use crate::app::state::{ExpenseFilter, ViewState};
use crate::gateway::{ExpenseGateway, GatewayError};
use crate::messages::RenderUpdate;
use crate::models::{Category, Expense, ExpenseCreate, ExpenseId, ExpenseUpdate};

pub struct ViewController<G> {
    gateway: G,
    state: ViewState,
    publisher: Option<mpsc::UnboundedSender<RenderUpdate>>,
}

impl<G: ExpenseGateway> ViewController<G> {
    /// Controller that republishes its state on `publisher` after every change
    pub fn with_publisher(gateway: G, publisher: mpsc::UnboundedSender<RenderUpdate>) -> Self {
        ViewController {
            gateway,
            state: ViewState::default(),
            publisher: Some(publisher),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    fn publish(&self) {
        if let Some(tx) = &self.publisher {
            let _ = tx.send(RenderUpdate::View(self.state.clone()));
        }
    }

    fn set_loading(&mut self, loading: bool) {
        self.state.is_loading = loading;
        self.publish();
    }

    /// Start of a user action: loading on, previous error gone
    fn begin(&mut self) {
        self.state.error = None;
        self.set_loading(true);
    }

    /// Replace the active error and stop loading
    fn fail(&mut self, action: &str, err: GatewayError) {
        tracing::error!(error = %err, "Failed to {}", action);
        self.state.error = Some(format!("Failed to {}: {}", action, err));
        self.set_loading(false);
    }

    /// Initial fetch: expenses, then totals
    pub async fn load(&mut self) {
        if self.refresh_expenses().await {
            self.refresh_totals().await;
        }
    }

    /// Reload the full list. A successful refresh also resets the filtered
    /// view to show everything. Returns whether the fetch succeeded.
    pub async fn refresh_expenses(&mut self) -> bool {
        self.begin();
        match self.gateway.list_all().await {
            Ok(expenses) => {
                tracing::info!(count = expenses.len(), "Expenses refreshed");
                self.state.filtered_expenses = expenses.clone();
                self.state.expenses = expenses;
                self.state.active_filter = None;
                self.set_loading(false);
                true
            }
            Err(err) => {
                self.fail("fetch expenses", err);
                false
            }
        }
    }

    /// Best effort: failures keep the previous totals and are only logged
    pub async fn refresh_totals(&mut self) {
        match self.gateway.get_totals().await {
            Ok(totals) => {
                if !totals.is_consistent() {
                    tracing::warn!(total = totals.total, "Totals breakdown does not add up to total");
                }
                self.state.totals = Some(totals);
                self.publish();
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to fetch totals");
            }
        }
    }

    /// Refresh list then totals after a successful mutation
    async fn resync(&mut self) {
        if self.refresh_expenses().await {
            self.refresh_totals().await;
        }
    }

    /// Create an expense; returns the stored record on success
    pub async fn create_expense(&mut self, data: ExpenseCreate) -> Option<Expense> {
        self.begin();
        match self.gateway.create(&data).await {
            Ok(created) => {
                tracing::info!(id = created.id, amount = created.amount, category = %created.category, "Expense created");
                self.resync().await;
                Some(created)
            }
            Err(err) => {
                self.fail("create expense", err);
                None
            }
        }
    }

    /// Replace an existing expense; same refresh chain as create
    pub async fn update_expense(&mut self, id: ExpenseId, data: ExpenseUpdate) -> Option<Expense> {
        self.begin();
        match self.gateway.update(id, &data).await {
            Ok(updated) => {
                tracing::info!(id, "Expense updated");
                self.resync().await;
                Some(updated)
            }
            Err(err) => {
                self.fail("update expense", err);
                None
            }
        }
    }

    pub async fn delete_expense(&mut self, id: ExpenseId) -> bool {
        self.begin();
        match self.gateway.delete(id).await {
            Ok(()) => {
                tracing::info!(id, "Expense deleted");
                self.resync().await;
                true
            }
            Err(err) => {
                self.fail("delete expense", err);
                false
            }
        }
    }

    /// Server-side category filter. Only the filtered view changes.
    pub async fn filter_by_category(&mut self, category: Category) -> bool {
        self.set_loading(true);
        match self.gateway.list_by_category(category).await {
            Ok(expenses) => {
                tracing::info!(%category, count = expenses.len(), "Filtered by category");
                self.state.filtered_expenses = expenses;
                self.state.active_filter = Some(ExpenseFilter::Category(category));
                self.set_loading(false);
                true
            }
            Err(err) => {
                self.fail("filter expenses", err);
                false
            }
        }
    }

    /// Server-side date filter, inclusive. Only the filtered view changes.
    pub async fn filter_by_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> bool {
        self.set_loading(true);
        match self.gateway.list_by_date_range(start, end).await {
            Ok(expenses) => {
                tracing::info!(%start, %end, count = expenses.len(), "Filtered by date range");
                self.state.filtered_expenses = expenses;
                self.state.active_filter = Some(ExpenseFilter::DateRange { start, end });
                self.set_loading(false);
                true
            }
            Err(err) => {
                self.fail("filter expenses by date range", err);
                false
            }
        }
    }

    /// Local only: show the full list again
    pub fn clear_filters(&mut self) {
        self.state.filtered_expenses = self.state.expenses.clone();
        self.state.active_filter = None;
        self.publish();
    }

    pub fn dismiss_error(&mut self) {
        if self.state.error.take().is_some() {
            self.publish();
        }
    }
}

#[cfg(test)]
impl<G: ExpenseGateway> ViewController<G> {
    /// Controller nobody listens to
    pub fn new(gateway: G) -> Self {
        ViewController {
            gateway,
            state: ViewState::default(),
            publisher: None,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}
