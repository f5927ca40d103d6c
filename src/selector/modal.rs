//! Generic selection dialog.
//!
//! The modal owns nothing but its open/closed state, the pending selection and
//! a cursor. Rows come in through a [`RowView`] on every call, so the same code
//! serves paginated listings and in-memory lists alike. It never performs I/O:
//! page changes, refetches and previews are reported back as [`ModalOutcome`]s
//! for the owning wrapper to act on.

use super::centered_rect;
use super::state::{SelectorState, count_label};
use super::table::{Column, RowCursor, toggle_event};
use crate::model::{Selectable, SelectionMode};
use crate::source::RowView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
};
use tracing::{debug, info};

pub type ConfirmCallback<T> = Box<dyn FnMut(Vec<i64>, Vec<T>)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorConfig {
    pub title: String,
    pub trigger_label: String,
    pub mode: SelectionMode,
    pub initial_selected_ids: Vec<i64>,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalOutcome {
    Ignored,
    Handled,
    Opened,
    Confirmed,
    Cancelled,
    PageRequested(usize),
    RefetchRequested,
    /// Index into the current rows.
    PreviewRequested(usize),
}

pub struct SelectorModal<T: Selectable> {
    config: SelectorConfig,
    columns: Vec<Column<T>>,
    on_confirm: ConfirmCallback<T>,
    state: SelectorState<T>,
    cursor: RowCursor,
    hints: Vec<&'static str>,
}

impl<T: Selectable> SelectorModal<T> {
    pub fn new(config: SelectorConfig, columns: Vec<Column<T>>, on_confirm: ConfirmCallback<T>) -> Self {
        Self {
            config,
            columns,
            on_confirm,
            state: SelectorState::Closed,
            cursor: RowCursor::default(),
            hints: Vec::new(),
        }
    }

    /// Extra footer hint for wrapper specific keys.
    pub fn with_hint(mut self, hint: &'static str) -> Self {
        self.hints.push(hint);
        self
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn state(&self) -> &SelectorState<T> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// The caller's committed ids, used as the seed on the next open.
    pub fn set_initial_selected_ids(&mut self, ids: Vec<i64>) {
        self.config.initial_selected_ids = ids;
    }

    /// Closed → Open. Inert when the selector is disabled.
    pub fn open(&mut self) -> bool {
        if self.config.disabled {
            debug!(title = %self.config.title, "selector disabled, not opening");
            return false;
        }
        self.state
            .open(self.config.mode, &self.config.initial_selected_ids);
        self.cursor = RowCursor::default();
        info!(
            title = %self.config.title,
            seeded = self.config.initial_selected_ids.len(),
            "selector opened"
        );
        true
    }

    /// Store a selection event as reported by the table control.
    pub fn apply_selection(&mut self, ids: Vec<i64>, rows: Vec<T>) {
        self.state.apply_change(self.config.mode, ids, rows);
    }

    /// Toggle the row at `index` of the current rows.
    pub fn toggle_row(&mut self, index: usize, view: &RowView<'_, T>) {
        let rows = view.rows();
        let Some(target) = rows.get(index) else {
            return;
        };
        let (ids, selected) = toggle_event(
            self.config.mode,
            target,
            rows,
            self.state.pending_ids(),
            self.state.pending_rows(),
        );
        self.apply_selection(ids, selected);
    }

    /// Invoke the callback with the pending payload and close. No-op while the
    /// pending selection is empty.
    pub fn confirm(&mut self) -> bool {
        let Some((ids, rows)) = self.state.confirm() else {
            return false;
        };
        info!(title = %self.config.title, ?ids, "selection confirmed");
        (self.on_confirm)(ids, rows);
        true
    }

    pub fn cancel(&mut self) {
        if self.state.is_open() {
            debug!(title = %self.config.title, "selection cancelled");
        }
        self.state.cancel();
    }

    /// Footer count, only meaningful while open.
    pub fn count_label(&self) -> Option<String> {
        self.state
            .is_open()
            .then(|| count_label(self.config.mode, self.state.pending_ids().len()))
    }

    pub fn handle_key(&mut self, key: KeyEvent, view: &RowView<'_, T>) -> ModalOutcome {
        if !self.state.is_open() {
            return match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if self.open() {
                        ModalOutcome::Opened
                    } else {
                        ModalOutcome::Ignored
                    }
                }
                _ => ModalOutcome::Ignored,
            };
        }

        let len = view.rows().len();
        self.cursor.clamp(len);
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.cancel();
                ModalOutcome::Cancelled
            }
            KeyCode::Enter => {
                if self.confirm() {
                    ModalOutcome::Confirmed
                } else {
                    ModalOutcome::Handled
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor.move_by(1, len);
                ModalOutcome::Handled
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor.move_by(-1, len);
                ModalOutcome::Handled
            }
            KeyCode::Char(' ') => {
                self.toggle_row(self.cursor.index, view);
                ModalOutcome::Handled
            }
            KeyCode::Right | KeyCode::PageDown => match view.pagination {
                Some(p) if p.has_next() && !view.loading => {
                    self.cursor = RowCursor::default();
                    ModalOutcome::PageRequested(p.current + 1)
                }
                _ => ModalOutcome::Handled,
            },
            KeyCode::Left | KeyCode::PageUp => match view.pagination {
                Some(p) if p.has_previous() && !view.loading => {
                    self.cursor = RowCursor::default();
                    ModalOutcome::PageRequested(p.current - 1)
                }
                _ => ModalOutcome::Handled,
            },
            KeyCode::Char('r') => ModalOutcome::RefetchRequested,
            KeyCode::Char('v') if len > 0 => ModalOutcome::PreviewRequested(self.cursor.index),
            _ => ModalOutcome::Handled,
        }
    }

    /// The opening control.
    pub fn render_trigger(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let style = if self.config.disabled {
            Style::default().fg(Color::DarkGray)
        } else if focused {
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let trigger = Paragraph::new(Line::from(Span::styled(
            format!("[ {} ]", self.config.trigger_label),
            style,
        )));
        frame.render_widget(trigger, area);
    }

    /// The dialog overlay, drawn on top of whatever is already in the frame.
    pub fn render_dialog(&self, frame: &mut Frame, view: &RowView<'_, T>) {
        if !self.state.is_open() {
            return;
        }
        let area = centered_rect(85, 75, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!(" {} ", self.config.title))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        self.render_table(frame, chunks[0], view);
        frame.render_widget(Paragraph::new(status_line(view)), chunks[1]);
        frame.render_widget(Paragraph::new(self.footer_line()), chunks[2]);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, view: &RowView<'_, T>) {
        let control = self.config.mode.row_control();
        let pending = self.state.pending_ids();

        let header = Row::new(
            std::iter::once(Cell::from(""))
                .chain(self.columns.iter().map(|c| Cell::from(c.header.clone()))),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = view
            .rows()
            .iter()
            .map(|row| {
                let marker = control.marker(pending.contains(&row.id()));
                Row::new(
                    std::iter::once(Cell::from(marker))
                        .chain(self.columns.iter().map(|c| Cell::from(c.cell_text(row)))),
                )
            })
            .collect();

        let widths = std::iter::once(Constraint::Length(3))
            .chain(self.columns.iter().map(|_| Constraint::Fill(1)))
            .collect::<Vec<_>>();

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .bg(Color::DarkGray),
            )
            .highlight_symbol("❯ ");

        let mut table_state = TableState::default();
        if !view.rows().is_empty() {
            table_state.select(Some(self.cursor.index.min(view.rows().len() - 1)));
        }
        frame.render_stateful_widget(table, area, &mut table_state);
    }

    fn footer_line(&self) -> Line<'static> {
        let confirm_style = if self.state.can_confirm() {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut spans = vec![
            Span::styled(
                self.count_label().unwrap_or_default(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::styled("Enter: Confirmar", confirm_style),
            Span::raw(" | Esc: Cancelar | Espacio: Marcar"),
        ];
        for hint in &self.hints {
            spans.push(Span::raw(format!(" | {hint}")));
        }
        Line::from(spans)
    }
}

fn status_line<T>(view: &RowView<'_, T>) -> Line<'static> {
    if view.loading {
        return Line::from(Span::styled(
            "Cargando...",
            Style::default().fg(Color::Yellow),
        ));
    }
    match view.pagination {
        Some(p) => Line::from(format!(
            "Página {}/{} · {} registros · ←/→ cambiar página · r recargar",
            p.current,
            p.page_count().max(1),
            p.total
        )),
        None => Line::from(format!("{} registros · r recargar", view.rows().len())),
    }
}
