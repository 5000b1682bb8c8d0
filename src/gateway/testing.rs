//! In-memory gateway used by the controller and actor tests

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::NaiveDate;

use crate::gateway::{check_date_range, ExpenseGateway, GatewayError, GatewayResult, RequestFailure};
use crate::models::{Category, Expense, ExpenseCreate, ExpenseId, ExpenseUpdate, TotalsResponse};

#[derive(Default)]
struct Store {
    expenses: Vec<Expense>,
    next_id: ExpenseId,
}

/// Behaves like the store: assigns ids and dates, validates amounts,
/// reports unknown ids. Can be switched offline or made to hang.
pub struct FakeGateway {
    store: Mutex<Store>,
    today: NaiveDate,
    offline: AtomicBool,
    totals_offline: AtomicBool,
    hang: AtomicBool,
    calls: Mutex<Vec<&'static str>>,
    list_calls: AtomicUsize,
}

impl FakeGateway {
    pub fn new() -> Self {
        FakeGateway {
            store: Mutex::new(Store {
                expenses: Vec::new(),
                next_id: 1,
            }),
            today: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            offline: AtomicBool::new(false),
            totals_offline: AtomicBool::new(false),
            hang: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Insert a record directly, bypassing validation
    pub fn seed(&self, amount: f64, category: Category, description: Option<&str>, date: NaiveDate) -> ExpenseId {
        let mut store = self.store.lock().unwrap();
        let id = store.next_id;
        store.next_id += 1;
        store.expenses.push(Expense {
            id,
            amount,
            description: description.map(String::from),
            category,
            date,
        });
        id
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_totals_offline(&self, offline: bool) {
        self.totals_offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_hang(&self, hang: bool) {
        self.hang.store(hang, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<Expense> {
        self.store.lock().unwrap().expenses.clone()
    }

    /// Names of the gateway operations invoked, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, op: &'static str) -> GatewayResult<()> {
        self.calls.lock().unwrap().push(op);
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(offline_error());
        }
        Ok(())
    }
}

/// Totals the way the store computes them, rounded to cents
pub fn totals_of(expenses: &[Expense]) -> TotalsResponse {
    let mut total = 0.0;
    let mut breakdown: BTreeMap<String, f64> = BTreeMap::new();
    for expense in expenses {
        total += expense.amount;
        *breakdown.entry(expense.category.as_str().to_string()).or_insert(0.0) += expense.amount;
    }
    for value in breakdown.values_mut() {
        *value = round_cents(*value);
    }
    TotalsResponse {
        total: round_cents(total),
        breakdown,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn offline_error() -> GatewayError {
    GatewayError::Request(RequestFailure::Status {
        status: 503,
        body: "store unavailable".into(),
    })
}

fn validate(amount: f64) -> GatewayResult<()> {
    if !(amount > 0.0) {
        return Err(GatewayError::Validation("amount: Input should be greater than 0".into()));
    }
    Ok(())
}

impl ExpenseGateway for FakeGateway {
    async fn list_all(&self) -> GatewayResult<Vec<Expense>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.enter("list_all").await?;
        Ok(self.snapshot())
    }

    async fn create(&self, data: &ExpenseCreate) -> GatewayResult<Expense> {
        self.enter("create").await?;
        validate(data.amount)?;
        let id = self.seed(data.amount, data.category, data.description.as_deref(), self.today);
        let store = self.store.lock().unwrap();
        Ok(store.expenses.iter().find(|e| e.id == id).cloned().unwrap())
    }

    async fn update(&self, id: ExpenseId, data: &ExpenseUpdate) -> GatewayResult<Expense> {
        self.enter("update").await?;
        validate(data.amount)?;
        let mut store = self.store.lock().unwrap();
        let expense = store
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(GatewayError::NotFound(id))?;
        expense.amount = data.amount;
        expense.description = data.description.clone();
        expense.category = data.category;
        Ok(expense.clone())
    }

    async fn delete(&self, id: ExpenseId) -> GatewayResult<()> {
        self.enter("delete").await?;
        let mut store = self.store.lock().unwrap();
        let before = store.expenses.len();
        store.expenses.retain(|e| e.id != id);
        if store.expenses.len() == before {
            return Err(GatewayError::NotFound(id));
        }
        Ok(())
    }

    async fn list_by_category(&self, category: Category) -> GatewayResult<Vec<Expense>> {
        self.enter("list_by_category").await?;
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|e| e.category == category)
            .collect())
    }

    async fn list_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> GatewayResult<Vec<Expense>> {
        self.enter("list_by_date_range").await?;
        check_date_range(start, end)?;
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|e| e.date >= start && e.date <= end)
            .collect())
    }

    async fn get_totals(&self) -> GatewayResult<TotalsResponse> {
        self.enter("get_totals").await?;
        if self.totals_offline.load(Ordering::SeqCst) {
            return Err(offline_error());
        }
        Ok(totals_of(&self.snapshot()))
    }
}
