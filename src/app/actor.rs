//! App actor - message loop turning UI events into controller operations

use std::collections::VecDeque;

use chrono::NaiveDate;
use tokio::sync::mpsc;

use crate::app::controller::ViewController;
use crate::app::state::UiState;
use crate::gateway::ExpenseGateway;
use crate::messages::{RenderUpdate, UiEvent};
use crate::models::{Category, Expense, ExpenseCreate, ExpenseId};

/// Controller work requested from the UI. Jobs run one at a time, in the
/// order they were requested.
#[derive(Debug, Clone, PartialEq)]
enum Job {
    Load,
    Submit {
        editing_id: Option<ExpenseId>,
        data: ExpenseCreate,
    },
    Delete(ExpenseId),
    FilterCategory(Category),
    FilterDates(NaiveDate, NaiveDate),
    ClearFilters,
    DismissError,
}

/// What a UI event turned into
enum Step {
    Ui,
    Job(Job),
    Quit,
}

enum Outcome {
    Done,
    /// The store accepted this form submission
    Submitted {
        editing_id: Option<ExpenseId>,
        data: ExpenseCreate,
    },
}

/// App actor that owns the view controller and the UI-side state.
///
/// UI-only events (navigation, typing, pickers, popups) are applied as soon
/// as they arrive, even while a controller job is awaiting the store.
/// Controller jobs queue up behind the running one.
pub struct AppActor<G> {
    controller: ViewController<G>,
    ui: UiState,
    /// Filtered list as of the last finished job; selection resolves against it
    rows: Vec<Expense>,
    render_tx: mpsc::UnboundedSender<RenderUpdate>,
}

impl<G: ExpenseGateway + 'static> AppActor<G> {
    pub fn new(gateway: G, render_tx: mpsc::UnboundedSender<RenderUpdate>) -> Self {
        AppActor {
            controller: ViewController::with_publisher(gateway, render_tx.clone()),
            ui: UiState::new(),
            rows: Vec::new(),
            render_tx,
        }
    }

    fn publish_ui(&self) {
        let _ = self.render_tx.send(RenderUpdate::Ui(self.ui.clone()));
    }

    /// Run the actor message loop
    pub async fn run(mut self, mut ui_rx: mpsc::UnboundedReceiver<UiEvent>) {
        self.publish_ui();
        let mut jobs = VecDeque::from([Job::Load]);

        loop {
            if let Some(job) = jobs.pop_front() {
                if !self.run_job(job, &mut jobs, &mut ui_rx).await {
                    break;
                }
                continue;
            }

            let Some(event) = ui_rx.recv().await else { break };
            match route(&mut self.ui, &self.rows, event) {
                Step::Quit => break,
                Step::Job(job) => jobs.push_back(job),
                Step::Ui => {}
            }
            self.publish_ui();
        }
    }

    /// Drive one job to completion while still applying UI events.
    /// Returns false once quit was requested or the UI side hung up.
    async fn run_job(
        &mut self,
        job: Job,
        jobs: &mut VecDeque<Job>,
        ui_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    ) -> bool {
        tracing::debug!(?job, queued = jobs.len(), "Running job");
        let outcome = {
            let AppActor { controller, ui, rows, render_tx } = &mut *self;
            let work = perform(controller, job);
            tokio::pin!(work);

            loop {
                tokio::select! {
                    biased;
                    outcome = &mut work => break outcome,
                    event = ui_rx.recv() => {
                        let Some(event) = event else { return false };
                        match route(ui, rows, event) {
                            Step::Quit => return false,
                            Step::Job(next) => jobs.push_back(next),
                            Step::Ui => {}
                        }
                        let _ = render_tx.send(RenderUpdate::Ui(ui.clone()));
                    }
                }
            }
        };
        self.settle(outcome);
        true
    }

    /// Fold a finished job back into the UI state
    fn settle(&mut self, outcome: Outcome) {
        if let Outcome::Submitted { editing_id, data } = outcome {
            // Keep anything typed into the form while the store was busy
            let untouched = self.ui.form.editing_id == editing_id
                && self.ui.form.to_create().ok().as_ref() == Some(&data);
            if untouched {
                self.ui.reset_form();
            }
        }
        self.rows = self.controller.state().filtered_expenses.clone();
        self.ui.clamp_selection(self.rows.len());
        self.publish_ui();
    }
}

/// Apply a UI event to the UI state, handing back controller work if any
fn route(ui: &mut UiState, rows: &[Expense], event: UiEvent) -> Step {
    match event {
        // Navigation
        UiEvent::NextPanel => ui.next_panel(),
        UiEvent::PrevPanel => ui.prev_panel(),
        UiEvent::NextField => ui.next_field(),
        UiEvent::PrevField => ui.prev_field(),

        // Input editing
        UiEvent::StartEditing => ui.start_editing(),
        UiEvent::StopEditing => ui.stop_editing(),
        UiEvent::CharInput(c) => ui.enter_char(c),
        UiEvent::Backspace => ui.delete_char(),
        UiEvent::CursorLeft => ui.move_cursor_left(),
        UiEvent::CursorRight => ui.move_cursor_right(),
        UiEvent::NextCategory => ui.next_category(),
        UiEvent::PrevCategory => ui.prev_category(),

        // Form
        UiEvent::SubmitForm => {
            if let Some(data) = ui.take_submission() {
                return Step::Job(Job::Submit {
                    editing_id: ui.form.editing_id,
                    data,
                });
            }
        }
        UiEvent::ResetForm => ui.reset_form(),

        // List
        UiEvent::SelectNext => ui.select_next(rows.len()),
        UiEvent::SelectPrev => ui.select_prev(rows.len()),
        UiEvent::DeleteSelected => {
            if let Some(expense) = rows.get(ui.selected_row) {
                return Step::Job(Job::Delete(expense.id));
            }
        }
        UiEvent::EditSelected => {
            if let Some(expense) = rows.get(ui.selected_row) {
                ui.edit_expense(expense);
            }
        }

        // Filters
        UiEvent::ApplyCategoryFilter => {
            ui.stop_editing();
            ui.form_error = None;
            return Step::Job(match ui.filter.category {
                Some(category) => Job::FilterCategory(category),
                None => Job::ClearFilters,
            });
        }
        UiEvent::ApplyDateFilter => {
            if let Some((start, end)) = ui.take_date_range() {
                return Step::Job(Job::FilterDates(start, end));
            }
        }
        UiEvent::ClearFilters => {
            ui.reset_filter();
            return Step::Job(Job::ClearFilters);
        }

        // Data
        UiEvent::Refresh => return Step::Job(Job::Load),
        UiEvent::DismissError => {
            ui.form_error = None;
            return Step::Job(Job::DismissError);
        }

        // Popups
        UiEvent::ToggleHelp => ui.toggle_help(),
        UiEvent::CloseHelp => ui.close_help(),

        // System
        UiEvent::Quit => {
            tracing::info!("Quit requested");
            return Step::Quit;
        }
    }

    Step::Ui
}

async fn perform<G: ExpenseGateway>(controller: &mut ViewController<G>, job: Job) -> Outcome {
    match job {
        Job::Load => controller.load().await,
        Job::Submit { editing_id, data } => {
            let accepted = match editing_id {
                Some(id) => controller.update_expense(id, data.clone().into()).await.is_some(),
                None => controller.create_expense(data.clone()).await.is_some(),
            };
            if accepted {
                return Outcome::Submitted { editing_id, data };
            }
        }
        Job::Delete(id) => {
            controller.delete_expense(id).await;
        }
        Job::FilterCategory(category) => {
            controller.filter_by_category(category).await;
        }
        Job::FilterDates(start, end) => {
            controller.filter_by_date_range(start, end).await;
        }
        Job::ClearFilters => controller.clear_filters(),
        Job::DismissError => controller.dismiss_error(),
    }
    Outcome::Done
}
