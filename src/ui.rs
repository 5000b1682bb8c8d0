//! Presentation widgets - pure renderers over [`RenderState`]

use ratatui::{prelude::*, widgets::*};

use crate::app::state::{UiState, ViewState};
use crate::constants::APP_NAME;
use crate::messages::ui_events::{FilterField, FormField, InputMode, Panel};
use crate::messages::RenderState;
use crate::models::{format_currency, Category, Expense};

const FORM_LABEL_WIDTH: u16 = 13;
const FILTER_LABEL_WIDTH: u16 = 10;

pub fn draw(f: &mut Frame, state: &RenderState) {
    let area = f.area();
    let banner_height = if state.view.error.is_some() || state.ui.form_error.is_some() { 3 } else { 0 };

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Title
            Constraint::Length(banner_height), // Error banner
            Constraint::Min(0),                // Content
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    draw_title(f, &state.view, main_chunks[0]);
    if banner_height > 0 {
        draw_error_banner(f, state, main_chunks[1]);
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_chunks[2]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(columns[1]);

    draw_form(f, &state.ui, left[0]);
    draw_summary(f, state, left[1]);
    draw_filter(f, state, right[0]);
    draw_list(f, state, right[1]);

    draw_status_bar(f, state, main_chunks[3]);

    if state.ui.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title(f: &mut Frame, view: &ViewState, area: Rect) {
    let mut spans = vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::raw(" "),
        Span::styled(
            format!("{} expenses", view.expenses.len()),
            Style::default().fg(Color::Gray),
        ),
    ];
    if view.is_loading {
        spans.push(Span::styled(" [...]", Style::default().fg(Color::Yellow)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_error_banner(f: &mut Frame, state: &RenderState, area: Rect) {
    let (title, message, color) = match (&state.view.error, &state.ui.form_error) {
        (Some(err), _) => (" Error (x:dismiss) ", err.as_str(), Color::Red),
        (None, Some(err)) => (" Check input ", err.as_str(), Color::Yellow),
        (None, None) => return,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title);
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(color))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn panel_border(ui: &UiState, panel: Panel) -> Style {
    let focused = ui.active_panel == panel;
    if focused && ui.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn field_line<'a>(label: &'a str, value: String, width: u16, active: bool) -> Line<'a> {
    let label_style = if active {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    Line::from(vec![
        Span::styled(format!("{:<width$}", label, width = width as usize), label_style),
        Span::raw(value),
    ])
}

fn picker(value: &str) -> String {
    format!("< {} >", value)
}

/// Expense form: amount, description, category
fn draw_form(f: &mut Frame, ui: &UiState, area: Rect) {
    let focused = ui.active_panel == Panel::Form;
    let active = |field: FormField| focused && ui.form.active_field == field;

    let category = ui.form.category.map(|c| c.as_str()).unwrap_or("Select a category");
    let lines = vec![
        field_line("Amount", ui.form.amount.clone(), FORM_LABEL_WIDTH, active(FormField::Amount)),
        field_line("Description", ui.form.description.clone(), FORM_LABEL_WIDTH, active(FormField::Description)),
        field_line("Category", picker(category), FORM_LABEL_WIDTH, active(FormField::Category)),
    ];

    let title = match ui.form.editing_id {
        Some(id) => format!(" Edit Expense #{} ", id),
        None => String::from(" Add Expense "),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(ui, Panel::Form))
        .title(title)
        .title_bottom(Line::from(" s:save n:new ").right_aligned());
    f.render_widget(Paragraph::new(lines).block(block), area);

    if focused && ui.input_mode == InputMode::Editing {
        let row = match ui.form.active_field {
            FormField::Amount => 0,
            FormField::Description => 1,
            FormField::Category => return,
        };
        set_cursor(f, ui, area, FORM_LABEL_WIDTH, row);
    }
}

/// Filter panel: category picker and date range
fn draw_filter(f: &mut Frame, state: &RenderState, area: Rect) {
    let ui = &state.ui;
    let focused = ui.active_panel == Panel::Filter;
    let active = |field: FilterField| focused && ui.filter.active_field == field;

    let category = ui.filter.category.map(|c| c.as_str()).unwrap_or("All categories");
    let lines = vec![
        field_line("Category", picker(category), FILTER_LABEL_WIDTH, active(FilterField::Category)),
        field_line("Start", ui.filter.start_date.clone(), FILTER_LABEL_WIDTH, active(FilterField::StartDate)),
        field_line("End", ui.filter.end_date.clone(), FILTER_LABEL_WIDTH, active(FilterField::EndDate)),
    ];

    let title = match &state.view.active_filter {
        Some(filter) => format!(" Filter Expenses [{}] ", filter.describe()),
        None => String::from(" Filter Expenses "),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(ui, Panel::Filter))
        .title(title)
        .title_bottom(Line::from(" c:category f:dates a:clear ").right_aligned());
    f.render_widget(Paragraph::new(lines).block(block), area);

    if focused && ui.input_mode == InputMode::Editing {
        let row = match ui.filter.active_field {
            FilterField::StartDate => 1,
            FilterField::EndDate => 2,
            FilterField::Category => return,
        };
        set_cursor(f, ui, area, FILTER_LABEL_WIDTH, row);
    }
}

fn set_cursor(f: &mut Frame, ui: &UiState, area: Rect, label_width: u16, row: u16) {
    let chars_before = ui
        .current_input()
        .and_then(|input| input.get(..ui.cursor_position))
        .map(|s| s.chars().count())
        .unwrap_or(0) as u16;
    let max_x = area.x + area.width.saturating_sub(2);
    let cursor_x = (area.x + 1 + label_width + chars_before).min(max_x);
    f.set_cursor_position(Position::new(cursor_x, area.y + 1 + row));
}

/// Expense table over the filtered view
fn draw_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let expenses = &state.view.filtered_expenses;
    let title = format!(" Expenses ({}) ", expenses.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(&state.ui, Panel::List))
        .title(title)
        .title_bottom(Line::from(" e:edit d:delete ").right_aligned());

    if expenses.is_empty() {
        let empty = Paragraph::new("No expenses found.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(["Date", "Description", "Category", "Amount"])
        .style(Style::default().fg(Color::Gray).bold());
    let rows: Vec<Row> = expenses.iter().map(expense_row).collect();
    let widths = [
        Constraint::Length(13),
        Constraint::Min(12),
        Constraint::Length(14),
        Constraint::Length(12),
    ];
    let highlight = if state.ui.active_panel == Panel::List {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default()
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(highlight);

    let mut table_state = TableState::default();
    table_state.select(Some(state.ui.selected_row));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn expense_row(expense: &Expense) -> Row<'static> {
    Row::new(vec![
        Cell::from(expense.date.format("%b %-d, %Y").to_string()),
        Cell::from(expense.description.clone().unwrap_or_else(|| String::from("-"))),
        Cell::from(expense.category.as_str()).style(Style::default().fg(category_color(expense.category))),
        Cell::from(Line::from(format_currency(expense.amount)).right_aligned()),
    ])
}

/// Totals and per-category breakdown
fn draw_summary(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(&state.ui, Panel::Summary))
        .title(" Expense Summary ");

    let Some(totals) = &state.view.totals else {
        let text = if state.view.is_loading { "Loading..." } else { "No expense data available." };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Total Expenses  ", Style::default().fg(Color::Gray)),
            Span::styled(format_currency(totals.total), Style::default().fg(Color::Cyan).bold()),
        ]),
        Line::from(""),
        Line::from(Span::styled("Breakdown by Category", Style::default().bold())),
    ];
    for category in Category::ALL {
        let amount = totals.amount_for(category);
        if amount == 0.0 {
            continue;
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{:<14}", category.as_str()), Style::default().fg(category_color(category))),
            Span::raw(format!("{:>12}", format_currency(amount))),
            Span::styled(
                format!("  {:>5.1}% of total", totals.share_of_total(amount)),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.view.is_loading {
        " Loading... "
    } else if state.ui.input_mode == InputMode::Editing {
        " ESC:stop editing | arrows:move | Tab:next field "
    } else {
        " Tab:panel | e:edit | arrows:field/category | r:refresh | ?:help | q:quit "
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 EXPENSE TRACKER - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch panels
   Up / Down          Move between fields / rows

 ADD EXPENSE
   e / Enter          Edit the focused field
   Left / Right       Change category
   s                  Save expense
   n / Esc            Start a new expense

 FILTER
   Left / Right       Choose category (or All)
   c                  Apply category filter
   f                  Apply date range filter
   a / Esc            Clear filters

 EXPENSES
   e / Enter          Edit selected expense
   d / Delete         Delete selected expense

 GENERAL
   r                  Refresh from the store
   x                  Dismiss error
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text).block(block).wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Category badge color
pub fn category_color(category: Category) -> Color {
    match category {
        Category::Food => Color::Green,
        Category::Housing => Color::Blue,
        Category::Utilities => Color::Cyan,
        Category::Entertainment => Color::Magenta,
        Category::Shopping => Color::Yellow,
        Category::HealthCare => Color::Red,
        Category::Travel => Color::LightBlue,
        Category::Other => Color::White,
    }
}
