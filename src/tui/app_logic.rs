use super::app_state::{CommittedSelection, ExitMode};
use crate::selector::{ModalOutcome, ResourceSelector};
use crossterm::event::{KeyCode, KeyEvent};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Stand-in for a consuming form: one selector plus the committed selection it
/// writes into.
pub struct HostApp {
    pub(super) selector: Box<dyn ResourceSelector>,
    pub(super) committed: Rc<RefCell<CommittedSelection>>,
    pub(super) heading: String,
    pub(super) exit: ExitMode,
}

impl HostApp {
    pub fn new(
        selector: Box<dyn ResourceSelector>,
        committed: Rc<RefCell<CommittedSelection>>,
        heading: impl Into<String>,
    ) -> Self {
        HostApp {
            selector,
            committed,
            heading: heading.into(),
            exit: ExitMode::Running,
        }
    }

    pub(super) fn is_running(&self) -> bool {
        self.exit == ExitMode::Running
    }

    pub(super) fn accepted(&self) -> bool {
        self.exit == ExitMode::Accepted
    }

    pub(super) fn tick(&mut self) {
        self.selector.poll();
    }

    pub(super) fn handle_key(&mut self, key_event: KeyEvent) {
        if self.selector.is_open() {
            if self.selector.handle_key(key_event) == ModalOutcome::Confirmed {
                self.sync_seed();
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.exit = ExitMode::Aborted,
            KeyCode::Char('y') => self.exit = ExitMode::Accepted,
            KeyCode::Char('x') => {
                debug!("clearing committed selection");
                *self.committed.borrow_mut() = CommittedSelection::default();
                self.sync_seed();
            }
            _ => {
                self.selector.handle_key(key_event);
            }
        }
    }

    /// Committed ids become the seed for the next open.
    fn sync_seed(&mut self) {
        let ids = self.committed.borrow().ids.clone();
        self.selector.set_initial_selected_ids(ids);
    }
}
