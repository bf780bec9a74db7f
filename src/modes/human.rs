use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::{interval, sleep, Instant};
use tracing::{debug, info};

use crate::game::{Command, GameConfig, GameEngine, GameStatus, TickOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::render::Renderer;

pub struct HumanMode {
    engine: GameEngine,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let engine = GameEngine::new(config).context("Invalid game configuration")?;

        Ok(Self {
            engine,
            metrics: SessionMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!(grid_size = self.engine.config().grid_size, "Session started");

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        info!(
            games = self.metrics.games_played,
            high_score = self.metrics.high_score,
            "Session ended"
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // The tick delay is re-read from the engine after every tick, so
        // speed changes apply from the next scheduled tick on
        let tick_timer = sleep(self.tick_delay());
        tokio::pin!(tick_timer);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = &mut tick_timer => {
                    self.update_game();
                    tick_timer.as_mut().reset(Instant::now() + self.tick_delay());
                }

                _ = render_timer.tick() => {
                    self.metrics.update(self.engine.status() == GameStatus::Running);
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.engine, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Command(command) => self.apply_command(command),
            KeyAction::SpeedUp => {
                let interval_ms = self.engine.speed_up();
                debug!(interval_ms, "Speed changed");
            }
            KeyAction::SlowDown => {
                let interval_ms = self.engine.slow_down();
                debug!(interval_ms, "Speed changed");
            }
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn apply_command(&mut self, command: Command) {
        let before = self.engine.status();
        self.engine.apply(command);

        if before == GameStatus::NotStarted && self.engine.status() == GameStatus::Running {
            self.metrics.on_game_start();
        }
    }

    /// Delay until the next scheduled tick, read fresh from the engine
    fn tick_delay(&self) -> Duration {
        self.engine.tick_interval()
    }

    fn update_game(&mut self) {
        match self.engine.tick() {
            TickOutcome::GameOver(_) | TickOutcome::Won => {
                self.metrics.on_game_over(self.engine.score());
            }
            TickOutcome::Idle | TickOutcome::Moved | TickOutcome::Scored => {}
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Snake};
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mode() -> HumanMode {
        HumanMode::new(GameConfig::small().with_seed(3)).unwrap()
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert_eq!(mode.engine.status(), GameStatus::NotStarted);
        assert_eq!(mode.engine.score(), 0);
    }

    #[test]
    fn test_invalid_config_is_error() {
        assert!(HumanMode::new(GameConfig::new(0)).is_err());
    }

    #[test]
    fn test_space_starts_and_pauses() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char(' '), KeyEventKind::Press));
        assert_eq!(mode.engine.status(), GameStatus::Running);

        // Releases are ignored
        mode.handle_event(key(KeyCode::Char(' '), KeyEventKind::Release));
        assert_eq!(mode.engine.status(), GameStatus::Running);

        mode.handle_event(key(KeyCode::Char(' '), KeyEventKind::Press));
        assert_eq!(mode.engine.status(), GameStatus::Paused);
    }

    #[test]
    fn test_ticks_only_while_running() {
        let mut mode = mode();
        mode.update_game();
        assert_eq!(mode.engine.state().ticks, 0);

        mode.handle_event(key(KeyCode::Char(' '), KeyEventKind::Press));
        mode.engine.state_mut().point = Some(0);
        mode.update_game();
        assert_eq!(mode.engine.state().ticks, 1);
    }

    #[test]
    fn test_game_over_recorded_then_restart() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char(' '), KeyEventKind::Press));
        mode.engine.state_mut().snake = Snake::new(8);
        mode.engine.state_mut().score = 4;
        mode.update_game();

        assert_eq!(mode.engine.status(), GameStatus::GameOver);
        assert_eq!(mode.metrics.games_played, 1);
        assert_eq!(mode.metrics.high_score, 4);

        mode.handle_event(key(KeyCode::Char('r'), KeyEventKind::Press));
        assert_eq!(mode.engine.status(), GameStatus::NotStarted);
        assert_eq!(mode.engine.score(), 0);
    }

    #[test]
    fn test_direction_keys_reach_engine() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Up, KeyEventKind::Press));
        assert_eq!(mode.engine.state().direction, Direction::Up);

        mode.handle_event(key(KeyCode::Char('-'), KeyEventKind::Press));
        assert_eq!(mode.engine.state().tick_interval_ms, 500);
        mode.handle_event(key(KeyCode::Char('+'), KeyEventKind::Press));
        assert_eq!(mode.engine.state().tick_interval_ms, 450);
    }

    #[test]
    fn test_tick_delay_follows_engine_speed() {
        let mut mode = mode();
        assert_eq!(mode.tick_delay(), Duration::from_millis(500));

        mode.handle_event(key(KeyCode::Char('+'), KeyEventKind::Press));
        assert_eq!(mode.tick_delay(), Duration::from_millis(450));

        // A scoring tick shortens the delay used to re-arm the timer
        mode.handle_event(key(KeyCode::Char(' '), KeyEventKind::Press));
        mode.engine.state_mut().point = Some(41);
        mode.update_game();
        assert_eq!(mode.engine.score(), 1);
        assert_eq!(mode.tick_delay(), Duration::from_millis(440));
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('q'), KeyEventKind::Press));
        assert!(mode.should_quit);
    }
}
