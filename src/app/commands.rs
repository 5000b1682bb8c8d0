//! Command handlers - UI-side logic for processing events
//!
//! Everything here is local: focus, text editing, and turning form input into
//! validated payloads. Network work goes through the view controller.

use chrono::NaiveDate;

use crate::app::state::{ExpenseForm, FilterForm, UiState};
use crate::constants::DATE_FORMAT;
use crate::messages::ui_events::{FormField, InputMode, Panel};
use crate::models::{Category, Expense, ExpenseCreate};

impl UiState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.stop_editing();
        self.active_panel = self.active_panel.next();
    }

    pub fn prev_panel(&mut self) {
        self.stop_editing();
        self.active_panel = self.active_panel.prev();
    }

    pub fn next_field(&mut self) {
        match self.active_panel {
            Panel::Form => self.form.active_field = self.form.active_field.next(),
            Panel::Filter => self.filter.active_field = self.filter.active_field.next(),
            Panel::List | Panel::Summary => return,
        }
        self.after_field_change();
    }

    pub fn prev_field(&mut self) {
        match self.active_panel {
            Panel::Form => self.form.active_field = self.form.active_field.prev(),
            Panel::Filter => self.filter.active_field = self.filter.active_field.prev(),
            Panel::List | Panel::Summary => return,
        }
        self.after_field_change();
    }

    /// Keep editing across text fields, drop out of edit mode on pickers
    fn after_field_change(&mut self) {
        match self.current_input().map(str::len) {
            Some(len) => self.cursor_position = len,
            None => self.input_mode = InputMode::Normal,
        }
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if let Some(len) = self.current_input().map(str::len) {
            self.input_mode = InputMode::Editing;
            self.cursor_position = len;
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let Some(input) = self.current_input() else { return };
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let Some(input) = self.current_input() else { return };
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        let Some(input) = self.current_input_mut() else { return };
        if cursor_pos <= input.len() {
            input.insert(cursor_pos, c);
            self.cursor_position = cursor_pos + c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        let Some(input) = self.current_input_mut() else { return };
        let prev_pos = input[..cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        input.remove(prev_pos);
        self.cursor_position = prev_pos;
    }

    // ========================
    // Category pickers
    // ========================

    pub fn next_category(&mut self) {
        match self.active_panel {
            Panel::Form => {
                self.form.category = Some(self.form.category.map_or(Category::Food, |c| c.next()));
            }
            // The filter picker has an extra "All categories" slot
            Panel::Filter => {
                self.filter.category = match self.filter.category {
                    None => Some(Category::ALL[0]),
                    Some(Category::Other) => None,
                    Some(c) => Some(c.next()),
                };
            }
            Panel::List | Panel::Summary => {}
        }
    }

    pub fn prev_category(&mut self) {
        match self.active_panel {
            Panel::Form => {
                self.form.category = Some(self.form.category.map_or(Category::Other, |c| c.prev()));
            }
            Panel::Filter => {
                self.filter.category = match self.filter.category {
                    None => Some(Category::Other),
                    Some(Category::Food) => None,
                    Some(c) => Some(c.prev()),
                };
            }
            Panel::List | Panel::Summary => {}
        }
    }

    // ========================
    // Form
    // ========================

    /// Validate the form. On failure the message is kept for display.
    pub fn take_submission(&mut self) -> Option<ExpenseCreate> {
        self.stop_editing();
        match self.form.to_create() {
            Ok(data) => {
                self.form_error = None;
                Some(data)
            }
            Err(msg) => {
                self.form_error = Some(msg);
                None
            }
        }
    }

    pub fn reset_form(&mut self) {
        self.stop_editing();
        self.form = ExpenseForm::default();
        self.form_error = None;
        self.cursor_position = 0;
    }

    /// Load an existing row into the form for editing
    pub fn edit_expense(&mut self, expense: &Expense) {
        self.form = ExpenseForm {
            amount: format!("{:.2}", expense.amount),
            description: expense.description.clone().unwrap_or_default(),
            category: Some(expense.category),
            active_field: FormField::Amount,
            editing_id: Some(expense.id),
        };
        self.form_error = None;
        self.active_panel = Panel::Form;
        self.start_editing();
    }

    // ========================
    // Filters
    // ========================

    /// Both dates parsed, or a message saying what is wrong
    pub fn take_date_range(&mut self) -> Option<(NaiveDate, NaiveDate)> {
        self.stop_editing();
        match self.filter.date_range() {
            Ok(range) => {
                self.form_error = None;
                Some(range)
            }
            Err(msg) => {
                self.form_error = Some(msg);
                None
            }
        }
    }

    pub fn reset_filter(&mut self) {
        self.stop_editing();
        self.filter = FilterForm::default();
        self.form_error = None;
    }

    // ========================
    // List selection
    // ========================

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected_row = (self.selected_row + 1) % len;
        }
    }

    pub fn select_prev(&mut self, len: usize) {
        if len > 0 {
            self.selected_row = self.selected_row.checked_sub(1).unwrap_or(len - 1);
        }
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected_row = 0;
        } else if self.selected_row >= len {
            self.selected_row = len - 1;
        }
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

impl ExpenseForm {
    /// Form-boundary validation: positive amount, category selected
    pub fn to_create(&self) -> Result<ExpenseCreate, String> {
        let amount: f64 = self
            .amount
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse()
            .map_err(|_| String::from("Amount must be a number"))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(String::from("Amount must be positive"));
        }
        let category = self.category.ok_or_else(|| String::from("Category is required"))?;
        let description = self.description.trim();
        Ok(ExpenseCreate {
            amount,
            description: (!description.is_empty()).then(|| description.to_string()),
            category,
        })
    }
}

impl FilterForm {
    /// Order is not checked here; the gateway rejects inverted ranges
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate), String> {
        if self.start_date.trim().is_empty() || self.end_date.trim().is_empty() {
            return Err(String::from("Both start and end dates are required"));
        }
        let parse = |label: &str, raw: &str| {
            NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .map_err(|_| format!("{} date must be YYYY-MM-DD", label))
        };
        Ok((parse("Start", &self.start_date)?, parse("End", &self.end_date)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(state: &mut UiState, text: &str) {
        for c in text.chars() {
            state.enter_char(c);
        }
    }

    #[test]
    fn test_form_defaults_to_other() {
        let state = UiState::new();
        assert_eq!(state.form.category, Some(Category::Other));
    }

    #[test]
    fn test_valid_submission() {
        let mut state = UiState::new();
        state.start_editing();
        typed(&mut state, "42.50");
        state.next_field();
        typed(&mut state, "  Lunch ");
        state.next_field();
        state.prev_category();

        let data = state.take_submission().unwrap();
        assert_eq!(data.amount, 42.5);
        assert_eq!(data.description.as_deref(), Some("Lunch"));
        assert_eq!(data.category, Category::Travel);
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let mut state = UiState::new();
        state.form.amount = "-3".into();
        assert!(state.take_submission().is_none());
        assert_eq!(state.form_error.as_deref(), Some("Amount must be positive"));

        state.form.amount = "abc".into();
        assert!(state.take_submission().is_none());
        assert_eq!(state.form_error.as_deref(), Some("Amount must be a number"));
    }

    #[test]
    fn test_requires_category() {
        let mut state = UiState::new();
        state.form.amount = "$1,200".into();
        state.form.category = None;
        assert!(state.take_submission().is_none());
        assert_eq!(state.form_error.as_deref(), Some("Category is required"));

        state.next_category();
        assert_eq!(state.take_submission().unwrap().amount, 1200.0);
        assert!(state.form_error.is_none());
    }

    #[test]
    fn test_blank_description_is_none() {
        let form = ExpenseForm {
            amount: "5".into(),
            description: "   ".into(),
            ..ExpenseForm::default()
        };
        assert_eq!(form.to_create().unwrap().description, None);
    }

    #[test]
    fn test_cursor_editing_handles_multibyte() {
        let mut state = UiState::new();
        state.form.active_field = FormField::Description;
        state.start_editing();
        typed(&mut state, "café");
        state.move_cursor_left();
        state.delete_char();
        assert_eq!(state.form.description, "caé");
        state.move_cursor_right();
        state.enter_char('!');
        assert_eq!(state.form.description, "caé!");
    }

    #[test]
    fn test_picker_fields_do_not_enter_edit_mode() {
        let mut state = UiState::new();
        state.form.active_field = FormField::Category;
        state.start_editing();
        assert_eq!(state.input_mode, InputMode::Normal);

        state.active_panel = Panel::List;
        state.start_editing();
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_filter_category_has_all_slot() {
        let mut state = UiState::new();
        state.active_panel = Panel::Filter;
        assert_eq!(state.filter.category, None);
        state.next_category();
        assert_eq!(state.filter.category, Some(Category::Food));
        state.prev_category();
        assert_eq!(state.filter.category, None);
        state.prev_category();
        assert_eq!(state.filter.category, Some(Category::Other));
        state.next_category();
        assert_eq!(state.filter.category, None);
    }

    #[test]
    fn test_date_range_requires_both_dates() {
        let mut state = UiState::new();
        state.filter.start_date = "2024-01-01".into();
        assert!(state.take_date_range().is_none());
        assert_eq!(state.form_error.as_deref(), Some("Both start and end dates are required"));

        state.filter.end_date = "01/31/2024".into();
        assert!(state.take_date_range().is_none());
        assert_eq!(state.form_error.as_deref(), Some("End date must be YYYY-MM-DD"));
    }

    #[test]
    fn test_inverted_range_passes_through() {
        let mut state = UiState::new();
        state.filter.start_date = "2024-03-01".into();
        state.filter.end_date = "2024-01-01".into();
        let (start, end) = state.take_date_range().unwrap();
        assert!(start > end);
    }

    #[test]
    fn test_edit_expense_loads_form() {
        let mut state = UiState::new();
        state.active_panel = Panel::List;
        let expense = Expense {
            id: 12,
            amount: 7.5,
            description: None,
            category: Category::HealthCare,
            date: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
        };
        state.edit_expense(&expense);
        assert_eq!(state.active_panel, Panel::Form);
        assert_eq!(state.form.amount, "7.50");
        assert_eq!(state.form.editing_id, Some(12));
        assert_eq!(state.input_mode, InputMode::Editing);
        assert_eq!(state.cursor_position, 4);

        state.reset_form();
        assert_eq!(state.form.editing_id, None);
    }

    #[test]
    fn test_selection_wraps_and_clamps() {
        let mut state = UiState::new();
        state.select_prev(3);
        assert_eq!(state.selected_row, 2);
        state.select_next(3);
        assert_eq!(state.selected_row, 0);
        state.selected_row = 5;
        state.clamp_selection(2);
        assert_eq!(state.selected_row, 1);
        state.clamp_selection(0);
        assert_eq!(state.selected_row, 0);
    }
}
