//! App state - pure data structures with no I/O logic

use chrono::NaiveDate;

use crate::messages::ui_events::{FilterField, FormField, InputMode, Panel};
use crate::models::{Category, Expense, ExpenseId, TotalsResponse};

/// Which server-side query produced the filtered view
#[derive(Clone, Debug, PartialEq)]
pub enum ExpenseFilter {
    Category(Category),
    DateRange { start: NaiveDate, end: NaiveDate },
}

impl ExpenseFilter {
    pub fn describe(&self) -> String {
        match self {
            ExpenseFilter::Category(c) => format!("category = {}", c),
            ExpenseFilter::DateRange { start, end } => format!("{} .. {}", start, end),
        }
    }
}

/// State owned by the view controller and published to the UI
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    /// Authoritative list, replaced wholesale on refresh
    pub expenses: Vec<Expense>,
    /// What the list widget shows
    pub filtered_expenses: Vec<Expense>,
    pub active_filter: Option<ExpenseFilter>,
    /// None until the first successful totals fetch
    pub totals: Option<TotalsResponse>,
    pub is_loading: bool,
    /// At most one user-visible error
    pub error: Option<String>,
}

/// Expense form inputs
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseForm {
    pub amount: String,
    pub description: String,
    pub category: Option<Category>,
    pub active_field: FormField,
    /// Set while editing an existing row instead of creating one
    pub editing_id: Option<ExpenseId>,
}

impl Default for ExpenseForm {
    fn default() -> Self {
        ExpenseForm {
            amount: String::new(),
            description: String::new(),
            category: Some(Category::Other),
            active_field: FormField::Amount,
            editing_id: None,
        }
    }
}

/// Filter panel inputs
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterForm {
    /// None means "All categories"
    pub category: Option<Category>,
    pub start_date: String,
    pub end_date: String,
    pub active_field: FilterField,
}

/// UI-side state owned by the app actor
#[derive(Clone, Debug, PartialEq)]
pub struct UiState {
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub form: ExpenseForm,
    pub filter: FilterForm,
    pub selected_row: usize,
    /// Local validation message from the form or filter inputs
    pub form_error: Option<String>,
    pub show_help: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        UiState {
            active_panel: Panel::Form,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            form: ExpenseForm::default(),
            filter: FilterForm::default(),
            selected_row: 0,
            form_error: None,
            show_help: false,
        }
    }

    /// Get the current text input content, if the focused field is text
    pub fn current_input(&self) -> Option<&str> {
        match self.active_panel {
            Panel::Form => match self.form.active_field {
                FormField::Amount => Some(&self.form.amount),
                FormField::Description => Some(&self.form.description),
                FormField::Category => None,
            },
            Panel::Filter => match self.filter.active_field {
                FilterField::StartDate => Some(&self.filter.start_date),
                FilterField::EndDate => Some(&self.filter.end_date),
                FilterField::Category => None,
            },
            Panel::List | Panel::Summary => None,
        }
    }

    /// Get mutable reference to the current text input
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        match self.active_panel {
            Panel::Form => match self.form.active_field {
                FormField::Amount => Some(&mut self.form.amount),
                FormField::Description => Some(&mut self.form.description),
                FormField::Category => None,
            },
            Panel::Filter => match self.filter.active_field {
                FilterField::StartDate => Some(&mut self.filter.start_date),
                FilterField::EndDate => Some(&mut self.filter.end_date),
                FilterField::Category => None,
            },
            Panel::List | Panel::Summary => None,
        }
    }
}
