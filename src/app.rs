//! App: terminal init, main loop, gravity ticks and key handling.

use crate::GameConfig;
use crate::game::{Direction, GameState};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::timer::GravityTimer;
use crate::ui::{self, Effects};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

/// Redraw at least this often (~60 FPS) so effects animate between ticks.
const FRAME_DURATION: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// One game session: owns the state, the gravity timer and the terminal.
pub struct App {
    state: GameState,
    theme: Theme,
    timer: GravityTimer,
    effects: Effects,
}

impl App {
    pub fn new(config: &GameConfig, theme: Theme) -> Self {
        Self::with_state(GameState::new(config, config.piece_source()), theme)
    }

    fn with_state(state: GameState, theme: Theme) -> Self {
        let mut timer = GravityTimer::new();
        timer.sync(&state, Instant::now());
        Self {
            state,
            theme,
            timer,
            effects: Effects::default(),
        }
    }

    fn apply_action(&mut self, action: Action, now: Instant) -> Flow {
        match action {
            Action::Quit => return Flow::Quit,
            Action::MoveLeft => {
                self.state.move_piece(Direction::Left);
            }
            Action::MoveRight => {
                self.state.move_piece(Direction::Right);
            }
            Action::MoveDown => {
                self.state.move_piece(Direction::Down);
            }
            Action::Rotate => {
                self.state.rotate();
            }
            // No pause toggle once the game has ended.
            Action::Pause if !self.state.is_game_over() => self.state.toggle_pause(),
            Action::NewGame => {
                self.state.reset();
                self.timer.cancel();
                self.effects.clear();
            }
            Action::Pause | Action::None => {}
        }
        self.timer.sync(&self.state, now);
        Flow::Continue
    }

    /// Run a due gravity tick, then resync the timer (the level may have changed).
    fn tick_gravity(&mut self, now: Instant) {
        if self.timer.poll(now) {
            self.state.tick();
            self.timer.sync(&self.state, now);
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = terminal.show_cursor();
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.timer.sync(&self.state, Instant::now());
        loop {
            let now = Instant::now();
            terminal.draw(|f| ui::draw(f, &self.state, &self.theme, &mut self.effects, now))?;

            let timeout = self
                .timer
                .until_due(now)
                .map_or(FRAME_DURATION, |d| d.min(FRAME_DURATION));
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let Event::Key(key) = event::read()? else {
                        continue;
                    };
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.apply_action(key_to_action(key), Instant::now()) == Flow::Quit {
                        return Ok(());
                    }
                }
            }

            self.tick_gravity(Instant::now());
        }
    }
}
