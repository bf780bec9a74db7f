use std::collections::VecDeque;

use super::action::Direction;

/// Geometry of the square board; cells are addressed by flat index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: usize,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.size * self.size
    }

    /// Starting cell for the head
    pub fn center(&self) -> usize {
        self.len().saturating_sub(1) / 2
    }

    pub fn row(&self, index: usize) -> usize {
        index / self.size
    }

    pub fn col(&self, index: usize) -> usize {
        index % self.size
    }

    /// Flat index of (row, col), or None off the board
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.size && col < self.size).then(|| row * self.size + col)
    }

    /// Neighbour of `index` in `direction`, or None when the move leaves the board
    pub fn step(&self, index: usize, direction: Direction) -> Option<usize> {
        let (d_row, d_col) = direction.delta();
        let row = self.row(index).checked_add_signed(d_row)?;
        let col = self.col(index).checked_add_signed(d_col)?;
        self.index(row, col)
    }
}

/// What occupies a cell, as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Empty,
    Head,
    Tail,
    TailEnd,
    Point,
}

/// The snake as a head index plus the tail, nearest-to-head first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub head: usize,
    pub tail: VecDeque<usize>,
}

impl Snake {
    /// A snake with no tail
    pub fn new(head: usize) -> Self {
        Self {
            head,
            tail: VecDeque::new(),
        }
    }

    pub fn with_tail(head: usize, tail: impl IntoIterator<Item = usize>) -> Self {
        Self {
            head,
            tail: tail.into_iter().collect(),
        }
    }

    /// Oldest tail segment
    pub fn tail_end(&self) -> Option<usize> {
        self.tail.back().copied()
    }

    /// Head plus tail
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        1 + self.tail.len()
    }

    pub fn occupies(&self, index: usize) -> bool {
        self.head == index || self.tail.contains(&index)
    }

    /// Whether moving the head onto `index` hits the tail. The tail end is
    /// ignored when it leaves its cell on the same tick.
    pub fn collides_with_tail(&self, index: usize, tail_end_vacates: bool) -> bool {
        let body = if tail_end_vacates {
            self.tail.len().saturating_sub(1)
        } else {
            self.tail.len()
        };
        self.tail.iter().take(body).any(|&segment| segment == index)
    }

    /// Move the head to `new_head`. The old head joins the tail; the tail end
    /// is kept when growing and dropped otherwise.
    pub fn advance(&mut self, new_head: usize, grow: bool) {
        self.tail.push_front(self.head);
        if !grow {
            self.tail.pop_back();
        }
        self.head = new_head;
    }
}

/// Lifecycle of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    NotStarted,
    Running,
    Paused,
    GameOver,
    /// The snake filled the board
    Won,
}

impl GameStatus {
    /// Only a reset leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::GameOver | GameStatus::Won)
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::NotStarted => "READY",
            GameStatus::Running => "RUNNING",
            GameStatus::Paused => "PAUSED",
            GameStatus::GameOver => "GAME OVER",
            GameStatus::Won => "BOARD CLEARED",
        }
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the board
    Wall,
    /// Snake hit its own tail
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub grid: Grid,
    pub snake: Snake,
    pub point: Option<usize>,
    /// Heading the next tick will use
    pub direction: Direction,
    /// Heading used by the last completed tick
    pub last_direction: Direction,
    /// Set on a scoring tick; the tail keeps its end on the following tick
    pub should_grow: bool,
    pub score: u32,
    pub tick_interval_ms: u64,
    pub status: GameStatus,
    pub ticks: u32,
}

impl GameState {
    /// The initial layout: head in the centre facing right, no tail, no point
    pub fn new(grid_size: usize, tick_interval_ms: u64) -> Self {
        let grid = Grid::new(grid_size);
        Self {
            grid,
            snake: Snake::new(grid.center()),
            point: None,
            direction: Direction::Right,
            last_direction: Direction::Right,
            should_grow: false,
            score: 0,
            tick_interval_ms,
            status: GameStatus::NotStarted,
            ticks: 0,
        }
    }

    /// Cells free of head and tail (a point may sit on one of them)
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..self.grid.len())
            .filter(|&index| !self.snake.occupies(index))
            .collect()
    }

    /// Cell kind per index. Tail end wins over tail, tail over head, head over point.
    pub fn board(&self) -> Vec<CellKind> {
        let mut board = vec![CellKind::Empty; self.grid.len()];
        if let Some(point) = self.point {
            board[point] = CellKind::Point;
        }
        board[self.snake.head] = CellKind::Head;
        for &segment in &self.snake.tail {
            board[segment] = CellKind::Tail;
        }
        if let Some(end) = self.snake.tail_end() {
            board[end] = CellKind::TailEnd;
        }
        board
    }

    /// Every (index, kind) pair in index order
    pub fn cells(&self) -> impl Iterator<Item = (usize, CellKind)> {
        self.board().into_iter().enumerate()
    }

    pub fn cell_kind(&self, index: usize) -> CellKind {
        if self.snake.tail_end() == Some(index) {
            CellKind::TailEnd
        } else if self.snake.tail.contains(&index) {
            CellKind::Tail
        } else if self.snake.head == index {
            CellKind::Head
        } else if self.point == Some(index) {
            CellKind::Point
        } else {
            CellKind::Empty
        }
    }
}
