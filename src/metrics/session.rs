use std::time::{Duration, Instant};

/// Statistics for one terminal session
pub struct SessionMetrics {
    last_update: Instant,
    /// Time spent running in the current game, pauses excluded
    pub running_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            running_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
        }
    }

    /// Called once per frame; time only counts while the game is running
    pub fn update(&mut self, running: bool) {
        let now = Instant::now();
        if running {
            self.running_time += now.duration_since(self.last_update);
        }
        self.last_update = now;
    }

    pub fn on_game_start(&mut self) {
        self.last_update = Instant::now();
        self.running_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        self.high_score = self.high_score.max(final_score);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.running_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
