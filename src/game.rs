//! Game state: board, falling piece, next piece, score, level, pause and game over.

use crate::GameConfig;
use crate::board::{Board, Cell, Position};
use crate::random::PieceSource;
use crate::tetromino::{Shape, TetrominoKind};
use std::time::Duration;

/// Points for clearing 0..=4 rows with one lock.
const LINE_CLEAR_POINTS: [u32; 5] = [0, 100, 300, 500, 800];

/// Score needed per level.
const POINTS_PER_LEVEL: u32 = 1000;

/// Gravity speed-up per level.
const SPEED_STEP_MS: u64 = 100;
/// Shortest drop interval.
const MIN_DROP_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    const fn delta(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
        }
    }
}

/// Result of committing the falling piece to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockOutcome {
    pub cleared_rows: u32,
    pub points: u32,
    pub level_changed: bool,
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Paused or game over; nothing happened.
    Ignored,
    Moved,
    /// Sideways move into a wall or locked cell; discarded.
    Blocked,
    Locked(LockOutcome),
}

/// The active piece: kind, current rotation state and top-left position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallingPiece {
    pub kind: TetrominoKind,
    pub shape: Shape,
    pub pos: Position,
}

impl FallingPiece {
    /// Absolute board coordinates of every filled cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_cells()
            .map(|(dx, dy)| (self.pos.x + dx, self.pos.y + dy))
    }
}

/// Single source of truth for one game session. Mutated only through its operations.
#[derive(Debug)]
pub struct GameState {
    board: Board,
    piece: FallingPiece,
    next: TetrominoKind,
    score: u32,
    level: u32,
    game_over: bool,
    paused: bool,
    initial_speed_ms: u64,
    source: Box<dyn PieceSource>,
}

impl GameState {
    pub fn new(config: &GameConfig, mut source: Box<dyn PieceSource>) -> Self {
        let board = Board::new(config.width as usize, config.height as usize);
        let piece = spawn_piece(&board, source.next_kind());
        let next = source.next_kind();
        Self {
            board,
            piece,
            next,
            score: 0,
            level: 1,
            game_over: false,
            paused: false,
            initial_speed_ms: config.initial_speed_ms,
            source,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece(&self) -> &FallingPiece {
        &self.piece
    }

    pub fn next_kind(&self) -> TetrominoKind {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Gravity period for the current level: 100 ms faster per level, never below 100 ms.
    pub fn drop_interval(&self) -> Duration {
        let step = u64::from(self.level.saturating_sub(1)) * SPEED_STEP_MS;
        Duration::from_millis(
            self.initial_speed_ms
                .saturating_sub(step)
                .max(MIN_DROP_INTERVAL_MS),
        )
    }

    pub fn move_piece(&mut self, direction: Direction) -> MoveOutcome {
        if self.paused || self.game_over {
            return MoveOutcome::Ignored;
        }
        let (dx, dy) = direction.delta();
        let target = self.piece.pos.offset(dx, dy);
        if !self.board.collides(&self.piece.shape, target) {
            self.piece.pos = target;
            MoveOutcome::Moved
        } else if direction == Direction::Down {
            MoveOutcome::Locked(self.lock())
        } else {
            MoveOutcome::Blocked
        }
    }

    /// One gravity step.
    pub fn tick(&mut self) -> MoveOutcome {
        self.move_piece(Direction::Down)
    }

    /// Clockwise quarter turn in place. Returns false if it was rejected.
    pub fn rotate(&mut self) -> bool {
        if self.paused || self.game_over {
            return false;
        }
        let rotated = self.piece.shape.rotated_cw();
        if self.board.collides(&rotated, self.piece.pos) {
            return false;
        }
        self.piece.shape = rotated;
        true
    }

    fn lock(&mut self) -> LockOutcome {
        let kind = self.piece.kind;
        let cells: Vec<_> = self.piece.cells().collect();
        for (x, y) in cells {
            if y < 0 {
                self.game_over = true;
                log::info!("game over: {:?} locked above the board, score {}", kind, self.score);
                return LockOutcome {
                    game_over: true,
                    ..LockOutcome::default()
                };
            }
            self.board.set(x as usize, y as usize, Cell::Filled(kind));
        }

        let cleared_rows = self.board.clear_full_rows();
        let points = LINE_CLEAR_POINTS[(cleared_rows as usize).min(LINE_CLEAR_POINTS.len() - 1)];
        self.score += points;
        let old_level = self.level;
        self.level = level_for_score(self.score);
        let level_changed = self.level != old_level;
        log::debug!(
            "locked {:?} at ({}, {}): {} rows, +{} points",
            kind,
            self.piece.pos.x,
            self.piece.pos.y,
            cleared_rows,
            points
        );
        if level_changed {
            log::debug!("level {} -> {}", old_level, self.level);
        }

        self.piece = spawn_piece(&self.board, self.next);
        self.next = self.source.next_kind();

        LockOutcome {
            cleared_rows,
            points,
            level_changed,
            game_over: false,
        }
    }

    /// Start over: empty board, fresh pieces, score 0, level 1, running.
    pub fn reset(&mut self) {
        self.board = Board::new(self.board.width(), self.board.height());
        self.piece = spawn_piece(&self.board, self.source.next_kind());
        self.next = self.source.next_kind();
        self.score = 0;
        self.level = 1;
        self.game_over = false;
        self.paused = false;
        log::info!("new game");
    }

    /// Flips the pause flag. The host decides whether pausing is offered after game over.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Locked cells with the falling piece drawn on top. Piece cells above row 0 are clipped.
    pub fn display_rows(&self) -> Vec<Vec<Cell>> {
        let mut rows: Vec<Vec<Cell>> = self.board.rows().map(<[Cell]>::to_vec).collect();
        for (x, y) in self.piece.cells() {
            if x < 0 || y < 0 {
                continue;
            }
            if let Some(cell) = rows.get_mut(y as usize).and_then(|r| r.get_mut(x as usize)) {
                *cell = Cell::Filled(self.piece.kind);
            }
        }
        rows
    }
}

#[cfg(test)]
impl GameState {
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
        self.level = level_for_score(score);
    }

    pub(crate) fn force_game_over(&mut self) {
        self.game_over = true;
    }
}

pub fn level_for_score(score: u32) -> u32 {
    score / POINTS_PER_LEVEL + 1
}

/// Top-centre spawn at row 0. If the base shape does not fit there it is lifted above
/// the board instead, one row at a time up to its own height, so the next blocked drop
/// locks a cell above row 0 and ends the game. Without the lift a blocked spawn would
/// overlap the stack and play could never end.
fn spawn_piece(board: &Board, kind: TetrominoKind) -> FallingPiece {
    let shape = kind.base_shape();
    let mut pos = Position::new(board.width() as i32 / 2 - 1, 0);
    for _ in 0..shape.height() {
        if !board.collides(&shape, pos) {
            break;
        }
        pos.y -= 1;
    }
    FallingPiece { kind, shape, pos }
}
