//! Resource selectors: one generic modal, bound to a row source and a column
//! layout by thin per-resource wrappers.

mod images;
mod labels;
mod modal;
mod preview;
mod skills;
mod state;
mod table;
mod videos;

pub use images::ImageSelector;
pub use labels::LabelSelector;
pub use modal::{ConfirmCallback, ModalOutcome, SelectorConfig, SelectorModal};
pub use preview::{PreviewDialog, PreviewOutcome, PreviewTarget};
pub use skills::{SkillSelector, SkillSonSelector};
pub use table::{Column, id_name_columns};
pub use videos::VideoSelector;

/// Backend resource names bound by each wrapper.
pub mod resources {
    pub use super::images::RESOURCE as IMAGES;
    pub use super::labels::RESOURCE as LABELS;
    pub use super::skills::{SKILL_SONS_RESOURCE as SKILL_SONS, SKILLS_RESOURCE as SKILLS};
    pub use super::videos::RESOURCE as VIDEOS;
}

use crate::clipboard;
use crate::model::{Selectable, SelectionMode};
use crate::source::{LoadState, RowSource};
use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use tracing::{debug, warn};

/// Caller-facing knobs shared by every wrapper. Labels left as `None` fall back
/// to the wrapper's defaults; everything else is forwarded to the modal as is.
pub struct SelectorOptions<T> {
    pub mode: SelectionMode,
    pub button_label: Option<String>,
    pub title: Option<String>,
    pub initial_selected_ids: Vec<i64>,
    pub on_confirm: ConfirmCallback<T>,
    pub disabled: bool,
}

impl<T> SelectorOptions<T> {
    pub fn new(on_confirm: impl FnMut(Vec<i64>, Vec<T>) + 'static) -> Self {
        Self {
            mode: SelectionMode::default(),
            button_label: None,
            title: None,
            initial_selected_ids: Vec::new(),
            on_confirm: Box::new(on_confirm),
            disabled: false,
        }
    }

    pub fn mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn button_label(mut self, label: Option<String>) -> Self {
        self.button_label = label;
        self
    }

    pub fn title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn initial_selected_ids(mut self, ids: Vec<i64>) -> Self {
        self.initial_selected_ids = ids;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn into_parts(self, defaults: &LabelDefaults) -> (SelectorConfig, ConfirmCallback<T>) {
        let config = SelectorConfig {
            title: self.title.unwrap_or_else(|| defaults.title.to_string()),
            trigger_label: self
                .button_label
                .unwrap_or_else(|| defaults.button.to_string()),
            mode: self.mode,
            initial_selected_ids: self.initial_selected_ids,
            disabled: self.disabled,
        };
        (config, self.on_confirm)
    }
}

/// Localized default texts of a wrapper.
pub struct LabelDefaults {
    pub button: &'static str,
    pub title: &'static str,
}

pub type PreviewFn<T> = fn(&T) -> Option<PreviewTarget>;

/// A generic modal bound to one row source, plus the optional nested preview.
pub struct BoundSelector<T: Selectable, S: RowSource<T>> {
    modal: SelectorModal<T>,
    source: S,
    preview: PreviewDialog,
    preview_for: Option<PreviewFn<T>>,
}

impl<T: Selectable, S: RowSource<T>> BoundSelector<T, S> {
    pub fn bind(
        options: SelectorOptions<T>,
        defaults: &LabelDefaults,
        source: S,
        columns: Vec<Column<T>>,
    ) -> Self {
        let (config, on_confirm) = options.into_parts(defaults);
        Self {
            modal: SelectorModal::new(config, columns, on_confirm),
            source,
            preview: PreviewDialog::default(),
            preview_for: None,
        }
    }

    pub fn with_preview(mut self, preview_for: PreviewFn<T>) -> Self {
        self.preview_for = Some(preview_for);
        self.modal = self.modal.with_hint("v: Vista previa");
        self
    }

    pub fn modal(&self) -> &SelectorModal<T> {
        &self.modal
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn preview(&self) -> &PreviewDialog {
        &self.preview
    }

    fn open_preview(&mut self, index: usize) {
        let Some(preview_for) = self.preview_for else {
            return;
        };
        let view = self.source.view();
        let Some(row) = view.rows().get(index) else {
            return;
        };
        match preview_for(row) {
            Some(target) => {
                debug!(id = row.id(), url = %target.url, "opening preview");
                self.preview.show(target);
            }
            None => debug!(id = row.id(), "row has nothing to preview"),
        }
    }

    fn copy_preview_url(&mut self, url: String) {
        self.preview.notice = Some(match clipboard::copy_text_to_clipboard(url) {
            Ok(()) => "URL copiada al portapapeles".to_string(),
            Err(e) => {
                warn!(error = %e, "clipboard copy failed");
                format!("No se pudo copiar: {e}")
            }
        });
    }
}

/// Object-safe face of a wrapper, so the host screen can drive any resource.
pub trait ResourceSelector {
    /// Apply finished fetches. True when something visible changed.
    fn poll(&mut self) -> bool;

    fn handle_key(&mut self, key: KeyEvent) -> ModalOutcome;

    fn is_open(&self) -> bool;

    fn set_initial_selected_ids(&mut self, ids: Vec<i64>);

    fn render_trigger(&self, frame: &mut Frame, area: Rect, focused: bool);

    /// Selection dialog and, above it, the preview if one is showing.
    fn render_overlay(&self, frame: &mut Frame);

    /// Load failure text, if the row source is in a failed state.
    fn status(&self) -> Option<String>;
}

impl<T: Selectable, S: RowSource<T>> ResourceSelector for BoundSelector<T, S> {
    fn poll(&mut self) -> bool {
        self.source.poll()
    }

    fn handle_key(&mut self, key: KeyEvent) -> ModalOutcome {
        if self.preview.is_open() {
            if let PreviewOutcome::CopyRequested(url) = self.preview.handle_key(key) {
                self.copy_preview_url(url);
            }
            return ModalOutcome::Handled;
        }

        let view = self.source.view();
        let outcome = self.modal.handle_key(key, &view);
        match outcome {
            ModalOutcome::PageRequested(page) => self.source.request_page(page),
            ModalOutcome::RefetchRequested => self.source.refetch(),
            ModalOutcome::PreviewRequested(index) => self.open_preview(index),
            ModalOutcome::Confirmed | ModalOutcome::Cancelled => self.preview.close(),
            _ => {}
        }
        outcome
    }

    fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    fn set_initial_selected_ids(&mut self, ids: Vec<i64>) {
        self.modal.set_initial_selected_ids(ids);
    }

    fn render_trigger(&self, frame: &mut Frame, area: Rect, focused: bool) {
        self.modal.render_trigger(frame, area, focused);
    }

    fn render_overlay(&self, frame: &mut Frame) {
        self.modal.render_dialog(frame, &self.source.view());
        if self.modal.is_open() {
            self.preview.render(frame);
        }
    }

    fn status(&self) -> Option<String> {
        match self.source.load_state() {
            LoadState::Failed(message) => Some(format!("Error al cargar: {message}")),
            _ => None,
        }
    }
}

/// Centered popup area taking the given percentages of `area`.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    pub(crate) type Confirmed<T> = Rc<RefCell<Vec<(Vec<i64>, Vec<T>)>>>;

    /// Options whose confirm callback records into the returned sink.
    pub(crate) fn recording_options<T: 'static>() -> (SelectorOptions<T>, Confirmed<T>) {
        let sink: Confirmed<T> = Rc::default();
        let writer = Rc::clone(&sink);
        let options =
            SelectorOptions::new(move |ids, rows| writer.borrow_mut().push((ids, rows)));
        (options, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(80, 50, area);
        assert!(popup.width <= 80 && popup.height <= 20);
        assert!(popup.x >= 10 && popup.y >= 10);
    }

    #[test]
    fn options_fall_back_to_wrapper_defaults() {
        let defaults = LabelDefaults {
            button: "Seleccionar",
            title: "Elegir",
        };
        let (config, _) = SelectorOptions::<crate::model::Label>::new(|_, _| {})
            .mode(SelectionMode::Single)
            .title(Some("Mi título".into()))
            .initial_selected_ids(vec![4])
            .disabled(true)
            .into_parts(&defaults);
        assert_eq!(config.title, "Mi título");
        assert_eq!(config.trigger_label, "Seleccionar");
        assert_eq!(config.mode, SelectionMode::Single);
        assert_eq!(config.initial_selected_ids, vec![4]);
        assert!(config.disabled);
    }
}
