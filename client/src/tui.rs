use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::Rng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use shared::{Command, DisplayColor};
use sim::{Board, Cell, Savannah, SpeciesRegistry, TickControl, TickReport};
use std::io;
use std::time::{Duration, Instant};

/// Run the savannah in the terminal until the player quits
pub fn run<R: Rng>(savannah: &mut Savannah, rng: &mut R, tick: Duration) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to build terminal")?;
    terminal.hide_cursor().ok();

    let result = event_loop(&mut terminal, savannah, rng, tick);

    terminal.show_cursor().ok();
    if let Err(err) = disable_raw_mode() {
        tracing::error!(?err, "failed to disable raw mode");
    }
    if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
        tracing::error!(?err, "failed to leave alternate screen");
    }

    result
}

fn event_loop<B: Backend, R: Rng>(
    terminal: &mut Terminal<B>,
    savannah: &mut Savannah,
    rng: &mut R,
    tick: Duration,
) -> Result<()> {
    let legend = legend_lines(&savannah.registry);
    let mut last_report: Option<TickReport> = None;

    loop {
        let report = savannah.advance(rng, |board| {
            terminal
                .draw(|frame| draw(frame, board, &legend, last_report.as_ref()))
                .map(|_| ())
        })?;
        tracing::debug!(tick = report.tick, population = report.population, "tick");
        last_report = Some(report);

        let command = wait_for_command(tick)?;
        if savannah.handle_command(command, rng) == TickControl::Quit {
            tracing::info!(tick = report.tick, "quit requested");
            return Ok(());
        }
    }
}

/// Collect the first command typed before the tick delay runs out.
///
/// Quit ends the wait early, even after another key was pressed.
fn wait_for_command(tick: Duration) -> Result<Option<Command>> {
    let deadline = Instant::now() + tick;
    let mut command = None;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(command);
        }
        if !event::poll(remaining).context("Failed to poll terminal events")? {
            continue;
        }
        if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
            command = merge_key(command, key);
            if command.is_some_and(|c| c.is_quit()) {
                return Ok(command);
            }
        }
    }
}

/// Fold one more key press into the command held for this tick: the first
/// command wins, except that quitting always takes over
fn merge_key(held: Option<Command>, key: KeyEvent) -> Option<Command> {
    match key_to_command(key) {
        Some(Command::Quit) => Some(Command::Quit),
        pressed => held.or(pressed),
    }
}

/// Q and Escape quit; any other letter asks for the species on that key
pub fn key_to_command(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&'q') => Some(Command::Quit),
        KeyCode::Char(c) if c.is_ascii_alphanumeric() => Some(Command::AddSpecies(c.to_ascii_uppercase())),
        _ => None,
    }
}

pub fn color(color: DisplayColor) -> Color {
    match color {
        DisplayColor::Gray => Color::Gray,
        DisplayColor::White => Color::White,
        DisplayColor::Yellow => Color::LightYellow,
        DisplayColor::DarkYellow => Color::Yellow,
        DisplayColor::Red => Color::LightRed,
        DisplayColor::DarkRed => Color::Red,
        DisplayColor::Green => Color::LightGreen,
        DisplayColor::DarkGreen => Color::Green,
        DisplayColor::Blue => Color::Blue,
        DisplayColor::Cyan => Color::Cyan,
        DisplayColor::Magenta => Color::Magenta,
    }
}

pub fn board_lines(board: &Board) -> Vec<Line<'static>> {
    board
        .rows()
        .map(|row| {
            let spans: Vec<Span<'static>> = row
                .iter()
                .map(|cell| match *cell {
                    Cell::Empty => Span::styled(".", Style::default().fg(Color::DarkGray)),
                    Cell::Occupied { glyph, color: c } => Span::styled(
                        glyph.to_string(),
                        Style::default().fg(color(c)).add_modifier(Modifier::BOLD),
                    ),
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

pub fn legend_lines(registry: &SpeciesRegistry) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = registry
        .iter()
        .map(|(trigger, species)| {
            Line::from(vec![
                Span::raw(format!("Press {} - to add ", trigger)),
                Span::styled(
                    format!("{};", species.name()),
                    Style::default().fg(color(species.descriptor().color)),
                ),
            ])
        })
        .collect();
    lines.push(Line::from("Q, or Escape - Exit game;"));
    lines
}

/// Rows needed for `lines` of content inside a bordered block
fn framed_height(lines: usize) -> u16 {
    u16::try_from(lines).unwrap_or(u16::MAX).saturating_add(2)
}

fn draw(frame: &mut Frame, board: &Board, legend: &[Line<'static>], last: Option<&TickReport>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(framed_height(board.height())),
            Constraint::Length(framed_height(legend.len())),
            Constraint::Min(1),
        ])
        .split(frame.size());

    let board_view = Paragraph::new(board_lines(board)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Savannah "),
    );
    frame.render_widget(board_view, chunks[0]);

    let legend_view =
        Paragraph::new(legend.to_vec()).block(Block::default().borders(Borders::ALL).title(" Keys "));
    frame.render_widget(legend_view, chunks[1]);

    let status = match last {
        Some(report) => format!(
            "Tick {}  Animals {}  Births {}  Deaths {}",
            report.tick, report.population, report.births, report.deaths
        ),
        None => "Tick 0".to_string(),
    };
    frame.render_widget(Paragraph::new(status), chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use sim::{AnimalId, SimConfig, Species};
    use shared::{Sex, SpeciesDescriptor};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_to_command(press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(key_to_command(press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(key_to_command(press(KeyCode::Char('Q'))), Some(Command::Quit));
        assert_eq!(
            key_to_command(press(KeyCode::Char('l'))),
            Some(Command::AddSpecies('L'))
        );
        assert_eq!(key_to_command(press(KeyCode::Enter)), None);
        assert_eq!(key_to_command(press(KeyCode::Char('%'))), None);
    }

    #[test]
    fn test_quit_overrides_held_command() {
        let held = merge_key(None, press(KeyCode::Char('l')));
        assert_eq!(held, Some(Command::AddSpecies('L')));

        assert_eq!(merge_key(held, press(KeyCode::Char('a'))), held);
        assert_eq!(merge_key(held, press(KeyCode::Enter)), held);
        assert_eq!(merge_key(held, press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(merge_key(held, press(KeyCode::Esc)), Some(Command::Quit));
    }

    #[test]
    fn test_framed_height_saturates() {
        assert_eq!(framed_height(10), 12);
        assert_eq!(framed_height(u16::MAX as usize - 1), u16::MAX);
        assert_eq!(framed_height(100_000), u16::MAX);
    }

    #[test]
    fn test_legend() {
        let lines = legend_lines(&SpeciesRegistry::built_in());
        let text: Vec<String> = lines.iter().map(line_text).collect();

        assert_eq!(
            text,
            vec![
                "Press A - to add Antilope;",
                "Press L - to add Lion;",
                "Press R - to add Rabbit;",
                "Press F - to add Fox;",
                "Q, or Escape - Exit game;",
            ]
        );
    }

    #[test]
    fn test_board_lines() {
        let mut board = Board::new(3, 2);
        let lion = Species::new(SpeciesDescriptor::lion())
            .spawn(AnimalId(0), Sex::Male)
            .at((2, 1));
        board.fill(&[lion]);

        let lines: Vec<String> = board_lines(&board).iter().map(line_text).collect();
        assert_eq!(lines, vec!["...", "..L"]);
    }

    #[test]
    fn test_draw_to_test_backend() {
        let mut savannah =
            Savannah::new(SimConfig::with_board(5, 3), SpeciesRegistry::built_in()).unwrap();
        let species = savannah.registry.get('A').unwrap().clone();
        savannah
            .population
            .spawn_at(&species, Sex::Female, sim::Position::new(0, 0));

        let mut terminal = Terminal::new(TestBackend::new(40, 16)).unwrap();
        let legend = legend_lines(&savannah.registry);
        let mut rng = rand::thread_rng();

        savannah
            .advance(&mut rng, |board| {
                terminal
                    .draw(|frame| draw(frame, board, &legend, None))
                    .map(|_| ())
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let rendered: String = buffer.content.iter().map(|cell| cell.symbol()).collect();
        assert!(rendered.contains("Savannah"));
        assert!(rendered.contains("A...."));
        assert!(rendered.contains("Exit game"));
    }
}
