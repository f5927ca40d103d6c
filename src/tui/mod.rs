// Host screen: a minimal form that owns a committed selection and renders one
// resource selector.
mod app_logic;
mod app_state;
mod event_handler;
mod ui_renderer;

pub use app_logic::HostApp;
pub use app_state::CommittedSelection;

pub use self::run_tui::run_host;

mod run_tui {
    use super::app_logic::HostApp;
    use super::event_handler::handle_events;
    use super::ui_renderer::ui_frame;
    use anyhow::Result;
    use crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };
    use ratatui::prelude::{CrosstermBackend, Terminal};
    use std::io::{self, Stdout};
    use tracing::info;

    /// Run the host until the user accepts (`Ok(true)`) or quits (`Ok(false)`).
    pub fn run_host(mut app: HostApp) -> Result<bool> {
        let mut terminal = init_terminal()?;
        info!(heading = %app.heading, "host screen started");

        let loop_result = run_loop(&mut terminal, &mut app);
        restore_terminal(terminal)?;
        loop_result?;

        Ok(app.accepted())
    }

    fn run_loop(
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        app: &mut HostApp,
    ) -> Result<()> {
        while app.is_running() {
            app.tick();
            terminal.draw(|frame| ui_frame(frame, app))?;
            handle_events(app)?;
        }
        Ok(())
    }

    fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).map_err(Into::into)
    }

    fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor().map_err(Into::into)
    }
}
