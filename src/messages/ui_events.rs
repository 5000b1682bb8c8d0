//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,
    NextField,
    PrevField,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Category pickers (form or filter, by focus)
    NextCategory,
    PrevCategory,

    // Form
    SubmitForm,
    ResetForm,

    // List
    SelectNext,
    SelectPrev,
    DeleteSelected,
    EditSelected,

    // Filters
    ApplyCategoryFilter,
    ApplyDateFilter,
    ClearFilters,

    // Data
    Refresh,
    DismissError,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Focusable panels, one per presentation widget
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Panel {
    Form,
    Filter,
    List,
    Summary,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Form => Panel::Filter,
            Panel::Filter => Panel::List,
            Panel::List => Panel::Summary,
            Panel::Summary => Panel::Form,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Form => Panel::Summary,
            Panel::Filter => Panel::Form,
            Panel::List => Panel::Filter,
            Panel::Summary => Panel::List,
        }
    }
}

/// Expense form fields
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FormField {
    #[default]
    Amount,
    Description,
    Category,
}

impl FormField {
    pub fn next(&self) -> FormField {
        match self {
            FormField::Amount => FormField::Description,
            FormField::Description => FormField::Category,
            FormField::Category => FormField::Amount,
        }
    }

    pub fn prev(&self) -> FormField {
        match self {
            FormField::Amount => FormField::Category,
            FormField::Description => FormField::Amount,
            FormField::Category => FormField::Description,
        }
    }
}

/// Filter panel fields
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FilterField {
    #[default]
    Category,
    StartDate,
    EndDate,
}

impl FilterField {
    pub fn next(&self) -> FilterField {
        match self {
            FilterField::Category => FilterField::StartDate,
            FilterField::StartDate => FilterField::EndDate,
            FilterField::EndDate => FilterField::Category,
        }
    }

    pub fn prev(&self) -> FilterField {
        match self {
            FilterField::Category => FilterField::EndDate,
            FilterField::StartDate => FilterField::Category,
            FilterField::EndDate => FilterField::StartDate,
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Convert a key event to a UI event based on current context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Editing => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopEditing),
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::BackTab => Some(UiEvent::PrevField),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
        InputMode::Normal => {
            // Global keys
            match key.code {
                KeyCode::Char('q') => return Some(UiEvent::Quit),
                KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
                KeyCode::Tab => return Some(UiEvent::NextPanel),
                KeyCode::BackTab => return Some(UiEvent::PrevPanel),
                KeyCode::Char('r') => return Some(UiEvent::Refresh),
                KeyCode::Char('x') => return Some(UiEvent::DismissError),
                _ => {}
            }

            match active_panel {
                Panel::Form => match key.code {
                    KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
                    KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::PrevField),
                    KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::NextField),
                    KeyCode::Left => Some(UiEvent::PrevCategory),
                    KeyCode::Right => Some(UiEvent::NextCategory),
                    KeyCode::Char('s') => Some(UiEvent::SubmitForm),
                    KeyCode::Char('n') | KeyCode::Esc => Some(UiEvent::ResetForm),
                    _ => None,
                },
                Panel::Filter => match key.code {
                    KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
                    KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::PrevField),
                    KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::NextField),
                    KeyCode::Left => Some(UiEvent::PrevCategory),
                    KeyCode::Right => Some(UiEvent::NextCategory),
                    KeyCode::Char('c') => Some(UiEvent::ApplyCategoryFilter),
                    KeyCode::Char('f') => Some(UiEvent::ApplyDateFilter),
                    KeyCode::Char('a') | KeyCode::Esc => Some(UiEvent::ClearFilters),
                    _ => None,
                },
                Panel::List => match key.code {
                    KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
                    KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
                    KeyCode::Char('d') | KeyCode::Delete => Some(UiEvent::DeleteSelected),
                    KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::EditSelected),
                    _ => None,
                },
                Panel::Summary => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_ctrl_c_quits_while_editing() {
        let ev = key_to_ui_event(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Panel::Form,
            InputMode::Editing,
            false,
        );
        assert_eq!(ev, Some(UiEvent::Quit));
    }

    #[test]
    fn test_q_is_text_while_editing() {
        let ev = key_to_ui_event(key(KeyCode::Char('q')), Panel::Form, InputMode::Editing, false);
        assert_eq!(ev, Some(UiEvent::CharInput('q')));
    }

    #[test]
    fn test_panel_specific_keys() {
        assert_eq!(
            key_to_ui_event(key(KeyCode::Char('d')), Panel::List, InputMode::Normal, false),
            Some(UiEvent::DeleteSelected)
        );
        assert_eq!(
            key_to_ui_event(key(KeyCode::Char('d')), Panel::Form, InputMode::Normal, false),
            None
        );
        assert_eq!(
            key_to_ui_event(key(KeyCode::Char('f')), Panel::Filter, InputMode::Normal, false),
            Some(UiEvent::ApplyDateFilter)
        );
    }

    #[test]
    fn test_help_swallows_keys() {
        assert_eq!(
            key_to_ui_event(key(KeyCode::Char('s')), Panel::Form, InputMode::Normal, true),
            Some(UiEvent::CloseHelp)
        );
    }

    #[test]
    fn test_panel_cycle() {
        let mut panel = Panel::Form;
        for _ in 0..4 {
            panel = panel.next();
        }
        assert_eq!(panel, Panel::Form);
        assert_eq!(Panel::Form.prev(), Panel::Summary);
    }
}
