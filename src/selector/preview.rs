use super::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTarget {
    pub kind: PreviewKind,
    pub title: String,
    /// Full-size image, or the embedded player URL for videos.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    Ignored,
    Handled,
    Closed,
    CopyRequested(String),
}

/// Nested preview dialog. Holds at most one target and is independent of the
/// selection dialog it sits on top of.
#[derive(Debug, Default)]
pub struct PreviewDialog {
    target: Option<PreviewTarget>,
    pub(crate) notice: Option<String>,
}

impl PreviewDialog {
    pub fn show(&mut self, target: PreviewTarget) {
        self.target = Some(target);
        self.notice = None;
    }

    pub fn close(&mut self) {
        self.target = None;
        self.notice = None;
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&PreviewTarget> {
        self.target.as_ref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PreviewOutcome {
        let Some(target) = &self.target else {
            return PreviewOutcome::Ignored;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                self.close();
                PreviewOutcome::Closed
            }
            KeyCode::Char('c') => PreviewOutcome::CopyRequested(target.url.clone()),
            _ => PreviewOutcome::Handled,
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let Some(target) = &self.target else {
            return;
        };
        let area = centered_rect(70, 40, frame.area());
        frame.render_widget(Clear, area);

        let heading = match target.kind {
            PreviewKind::Image => "Imagen",
            PreviewKind::Video => "Video (reproducción automática)",
        };
        let mut lines = vec![
            Line::from(Span::styled(
                target.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(heading),
            Line::from(Span::styled(
                target.url.clone(),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(""),
            Line::from("c: Copiar URL | Esc: Cerrar"),
        ];
        if let Some(notice) = &self.notice {
            lines.push(Line::from(Span::styled(
                notice.clone(),
                Style::default().fg(Color::Yellow),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" Vista previa ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}
