//! # Expense TUI
//!
//! A terminal expense tracker backed by a remote REST store.
//!
//! ## Features
//! - Record expenses with amount, category and optional description
//! - Edit and delete existing expenses
//! - Filter by category or by date range (server-side)
//! - Totals with a per-category breakdown
//!
//! ## Architecture
//! - UI Layer (Ratatui) - synchronous draw loop, pure renderers
//! - App Layer - actor owning the view controller and UI state
//! - Gateway - typed async wrappers over the store's REST API

pub mod app;
pub mod config;
pub mod constants;
pub mod gateway;
pub mod messages;
pub mod models;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, ViewController, ViewState};
pub use config::Config;
pub use gateway::{ExpenseGateway, GatewayError, HttpGateway};
pub use messages::{RenderState, RenderUpdate, UiEvent};
pub use models::{Category, Expense, ExpenseCreate, ExpenseUpdate, TotalsResponse};
