use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{CellKind, GameEngine, GameStatus};
use crate::metrics::SessionMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, engine: &GameEngine, metrics: &SessionMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(engine, metrics), chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if engine.status().is_terminal() {
            frame.render_widget(self.render_game_over(engine, metrics), game_area);
        } else {
            frame.render_widget(self.render_grid(engine), game_area);
        }

        frame.render_widget(self.render_controls(engine.status()), chunks[2]);
    }

    fn cell_span(kind: CellKind) -> Span<'static> {
        match kind {
            CellKind::Head => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            CellKind::Tail => Span::styled("□ ", Style::default().fg(Color::Green)),
            CellKind::TailEnd => Span::styled("▫ ", Style::default().fg(Color::LightGreen)),
            CellKind::Point => Span::styled(
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            CellKind::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
        }
    }

    fn render_grid(&self, engine: &GameEngine) -> Paragraph<'static> {
        let size = engine.state().grid.size();
        let spans: Vec<Span<'static>> = engine
            .cells()
            .map(|(_, kind)| Self::cell_span(kind))
            .collect();
        let lines: Vec<Line<'static>> = spans
            .chunks(size)
            .map(|row| Line::from(row.to_vec()))
            .collect();

        let title = match engine.status() {
            GameStatus::NotStarted => " SNAKE | press Space to start ",
            GameStatus::Paused => " SNAKE | paused ",
            _ => " SNAKE ",
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, engine: &GameEngine, metrics: &SessionMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                engine.score().to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", engine.state().tick_interval_ms), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled(engine.status().label(), Style::default().fg(Color::Cyan)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, engine: &GameEngine, metrics: &SessionMetrics) -> Paragraph<'static> {
        let (headline, color) = match engine.status() {
            GameStatus::Won => ("BOARD CLEARED", Color::Green),
            _ => ("GAME OVER", Color::Red),
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    engine.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Games: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.games_played.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Space",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" for a new game or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self, status: GameStatus) -> Paragraph<'static> {
        let toggle = match status {
            GameStatus::Running => " to pause | ",
            GameStatus::GameOver | GameStatus::Won => " new game | ",
            _ => " to start | ",
        };

        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(toggle),
            Span::styled("+/-", Style::default().fg(Color::Cyan)),
            Span::raw(" speed | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(engine: &GameEngine) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let renderer = Renderer::new();
        let metrics = SessionMetrics::new();
        terminal
            .draw(|frame| renderer.render(frame, engine, &metrics))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_board_and_score() {
        let mut engine = GameEngine::new(GameConfig::small().with_seed(1)).unwrap();
        engine.toggle_play();

        let screen = draw(&engine);
        assert!(screen.contains("Score:"));
        assert!(screen.contains("■"));
        assert!(screen.contains("O"));
    }

    #[test]
    fn test_renders_game_over_panel() {
        let mut engine = GameEngine::new(GameConfig::small().with_seed(1)).unwrap();
        engine.state_mut().status = GameStatus::GameOver;

        let screen = draw(&engine);
        assert!(screen.contains("GAME OVER"));
    }
}
