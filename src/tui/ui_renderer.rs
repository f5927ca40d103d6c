use super::app_logic::HostApp;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

fn draw_help_block(f: &mut Frame, app: &HostApp, area: Rect) {
    let help_text_lines_content = vec![
        Line::from("Enter/Space: Abrir selector | y: Aceptar y salir | x: Limpiar | q/Esc: Salir"),
        Line::from("En el selector: ↑↓/jk mover | Espacio marcar | Enter confirmar | Esc cancelar"),
    ];
    let help_paragraph = Paragraph::new(help_text_lines_content).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Portfolio Admin · {}", app.heading)),
    );
    f.render_widget(help_paragraph, area);
}

fn draw_committed_block(f: &mut Frame, app: &HostApp, area: Rect) {
    let committed = app.committed.borrow();
    let items: Vec<ListItem> = if committed.is_empty() {
        vec![ListItem::new(Span::styled(
            "(nada seleccionado)",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        // Rows may be missing for ids that were seeded but never touched.
        committed
            .ids
            .iter()
            .map(|id| {
                let name = committed.name_of(*id).unwrap_or("");
                ListItem::new(format!("#{id}  {name}"))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Seleccionados ({})", committed.ids.len())),
    );
    f.render_widget(list, area);
}

fn draw_status_line(f: &mut Frame, app: &HostApp, area: Rect) {
    if let Some(status) = app.selector.status() {
        let line = Line::from(Span::styled(status, Style::default().fg(Color::Red)));
        f.render_widget(Paragraph::new(line), area);
    }
}

pub(super) fn ui_frame(frame: &mut Frame, app: &HostApp) {
    let help_lines = 2;
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(help_lines + 2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(frame.area());

    draw_help_block(frame, app, main_chunks[0]);
    app.selector
        .render_trigger(frame, main_chunks[1], !app.selector.is_open());
    draw_status_line(frame, app, main_chunks[2]);
    draw_committed_block(frame, app, main_chunks[3]);

    // Overlays last so they sit on top of the form.
    app.selector.render_overlay(frame);
}
