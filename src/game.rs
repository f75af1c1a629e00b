//! Game controller: lifecycle state machine and the drop scheduler
//!
//! Owns the board, the score, and the active/next pieces exclusively. The
//! controller holds no timer handles; the host measures monotonic deltas and
//! feeds them to [`Game::tick`].

use std::time::Duration;

use crate::board::{Board, InvalidDimensions};
use crate::piece::Piece;
use crate::score::Score;
use crate::spawner::Spawner;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
    /// Terminal until an explicit reset
    Over,
}

/// Input actions the controller accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    Pause,
    Start,
    Reset,
}

/// Discrete events for observers (audio, logging). Observers only drain the
/// queue; nothing they do can reach back into engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Moved,
    Rotated,
    HardDropped,
    LinesCleared(usize),
    GameOver,
}

/// The main game struct
pub struct Game {
    /// The game board - sole source of truth for locked cells
    pub board: Board,
    /// Current falling piece
    pub current: Option<Piece>,
    /// Single-piece lookahead, promoted on the next spawn
    pub next: Option<Piece>,
    /// Score tracking
    pub score: Score,
    /// Lifecycle phase
    pub phase: Phase,
    spawner: Spawner,
    /// Time accumulated toward the next automatic descent. Frozen while
    /// paused, zeroed on every descent and on lock.
    drop_timer: Duration,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(width: usize, height: usize) -> Result<Self, InvalidDimensions> {
        Ok(Self {
            board: Board::new(width, height)?,
            current: None,
            next: None,
            score: Score::new(),
            phase: Phase::Idle,
            spawner: Spawner::new(),
            drop_timer: Duration::ZERO,
            events: Vec::new(),
        })
    }

    /// Deterministic game for tests
    pub fn with_seed(width: usize, height: usize, seed: u64) -> Result<Self, InvalidDimensions> {
        let mut game = Self::new(width, height)?;
        game.spawner = Spawner::with_seed(seed);
        Ok(game)
    }

    /// Process an input action. Gameplay actions are silently ignored outside
    /// Running; that is a phase rule, not an error.
    pub fn process_action(&mut self, action: Action) {
        match action {
            Action::Start => self.start(),
            Action::Reset => self.reset(),
            Action::Pause => self.toggle_pause(),
            _ if self.phase != Phase::Running => {}
            Action::MoveLeft => {
                if self.shift(-1) {
                    self.events.push(GameEvent::Moved);
                }
            }
            Action::MoveRight => {
                if self.shift(1) {
                    self.events.push(GameEvent::Moved);
                }
            }
            Action::SoftDrop => {
                self.soft_drop();
            }
            Action::HardDrop => self.hard_drop(),
            Action::Rotate => {
                if self.rotate_current() {
                    self.events.push(GameEvent::Rotated);
                }
            }
        }
    }

    /// Begin a run. Only meaningful from Idle; the host restarts a finished
    /// game with reset() followed by start().
    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        self.board.clear();
        self.score = Score::new();
        self.drop_timer = Duration::ZERO;
        self.next = None;
        self.phase = Phase::Running;
        self.spawn_piece();
    }

    /// Running <-> Paused toggle; no-op in Idle or Over. Nothing mutates
    /// while paused and the drop accumulator resumes where it stopped.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            other => other,
        };
    }

    /// Unconditional return to Idle, clearing board and state
    pub fn reset(&mut self) {
        self.board.clear();
        self.score = Score::new();
        self.current = None;
        self.next = None;
        self.drop_timer = Duration::ZERO;
        self.events.clear();
        self.phase = Phase::Idle;
    }

    /// Advance the drop scheduler by an elapsed-time delta. When the
    /// accumulator exceeds the current drop interval, the piece descends one
    /// row or, if it cannot, locks in place.
    pub fn tick(&mut self, delta: Duration) {
        if self.phase != Phase::Running {
            return;
        }
        self.drop_timer += delta;
        if self.drop_timer > self.score.drop_interval() {
            self.drop_timer = Duration::ZERO;
            self.descend();
        }
    }

    /// Drain pending events for observers
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// One automatic descent step
    fn descend(&mut self) {
        let Some(piece) = &mut self.current else {
            return;
        };
        if !piece.move_by(0, 1, &self.board) {
            self.lock_current();
        }
    }

    fn shift(&mut self, dx: i32) -> bool {
        match &mut self.current {
            Some(piece) => piece.move_by(dx, 0, &self.board),
            None => false,
        }
    }

    /// Manual single-row descent. A blocked soft drop is simply rejected;
    /// only the scheduler and hard drops lock pieces.
    fn soft_drop(&mut self) -> bool {
        match &mut self.current {
            Some(piece) => piece.move_by(0, 1, &self.board),
            None => false,
        }
    }

    fn hard_drop(&mut self) {
        let Some(piece) = &mut self.current else {
            return;
        };
        let distance = piece.hard_drop(&self.board);
        self.score.add_hard_drop(distance);
        self.events.push(GameEvent::HardDropped);
        self.lock_current();
    }

    fn rotate_current(&mut self) -> bool {
        match &mut self.current {
            Some(piece) => piece.rotate(&self.board),
            None => false,
        }
    }

    /// Lock the active piece, clear rows, update the score, and spawn the
    /// lookahead piece
    fn lock_current(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };
        self.board.lock(&piece);

        let cleared = self.board.clear_full_rows();
        if cleared > 0 {
            self.score.add_clear(cleared);
            self.events.push(GameEvent::LinesCleared(cleared));
        }

        self.drop_timer = Duration::ZERO;
        self.spawn_piece();
    }

    /// Promote the lookahead piece to active (generating one on the first
    /// spawn of a run) and pre-generate the new lookahead. A freshly spawned
    /// piece that collides immediately ends the game.
    fn spawn_piece(&mut self) {
        let piece = match self.next.take() {
            Some(piece) => piece,
            None => Piece::spawn(self.spawner.next_kind(), self.board.width()),
        };
        self.next = Some(Piece::spawn(self.spawner.next_kind(), self.board.width()));

        let blocked = self.board.collides(&piece.cells, piece.x, piece.y);
        self.current = Some(piece);
        if blocked {
            self.phase = Phase::Over;
            self.events.push(GameEvent::GameOver);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, DEFAULT_HEIGHT, DEFAULT_WIDTH};
    use crate::tetromino::PieceKind;

    fn game() -> Game {
        let mut game = Game::with_seed(DEFAULT_WIDTH, DEFAULT_HEIGHT, 42).unwrap();
        game.start();
        game
    }

    /// Swap in a specific active piece, bypassing the spawner
    fn force_piece(game: &mut Game, kind: PieceKind) {
        game.current = Some(Piece::spawn(kind, game.board.width()));
    }

    fn fill_row_except(game: &mut Game, y: i32, skip: &[i32]) {
        for x in 0..game.board.width() as i32 {
            if !skip.contains(&x) {
                game.board.set(x, y, Cell::Filled(PieceKind::Z));
            }
        }
    }

    #[test]
    fn test_start_spawns_current_and_next() {
        let game = game();
        assert_eq!(game.phase, Phase::Running);
        assert!(game.current.is_some());
        assert!(game.next.is_some());
        assert!(game.board.is_empty());
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut game = game();
        let kind = game.current.as_ref().unwrap().kind;
        game.process_action(Action::Start); // should not respawn mid-run
        assert_eq!(game.current.as_ref().unwrap().kind, kind);
    }

    #[test]
    fn test_descent_to_floor_locks() {
        let mut game = game();
        force_piece(&mut game, PieceKind::O);
        // the 2x2 square can descend height-2 rows before resting on the floor
        for _ in 0..DEFAULT_HEIGHT - 2 {
            assert!(game.current.as_mut().unwrap().move_by(0, 1, &game.board));
        }
        assert!(!game.current.as_mut().unwrap().move_by(0, 1, &game.board));
        // the next scheduled descent locks it
        game.descend();
        assert!(!game.board.is_empty());
        assert!(game.board.get(4, DEFAULT_HEIGHT as i32 - 1).unwrap().is_filled());
    }

    #[test]
    fn test_tick_accumulates_until_interval() {
        let mut game = game();
        let y = game.current.as_ref().unwrap().y;
        game.tick(Duration::from_millis(400));
        game.tick(Duration::from_millis(400));
        assert_eq!(game.current.as_ref().unwrap().y, y);
        game.tick(Duration::from_millis(400)); // crosses the 1000ms interval
        assert_eq!(game.current.as_ref().unwrap().y, y + 1);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut game = game();
        let y = game.current.as_ref().unwrap().y;
        let x = game.current.as_ref().unwrap().x;
        game.process_action(Action::Pause);
        assert_eq!(game.phase, Phase::Paused);
        game.tick(Duration::from_secs(10));
        game.process_action(Action::MoveLeft);
        game.process_action(Action::HardDrop);
        let piece = game.current.as_ref().unwrap();
        assert_eq!((piece.x, piece.y), (x, y));
        assert!(game.board.is_empty());
        game.process_action(Action::Pause);
        assert_eq!(game.phase, Phase::Running);
    }

    #[test]
    fn test_pause_noop_in_idle_and_over() {
        let mut game = Game::with_seed(DEFAULT_WIDTH, DEFAULT_HEIGHT, 1).unwrap();
        game.toggle_pause();
        assert_eq!(game.phase, Phase::Idle);
    }

    #[test]
    fn test_hard_drop_locks_and_scores() {
        let mut game = game();
        force_piece(&mut game, PieceKind::O);
        game.process_action(Action::HardDrop);
        // 2 points per row over height-2 rows, no lines cleared
        assert_eq!(game.score.points, 2 * (DEFAULT_HEIGHT as u64 - 2));
        assert!(!game.board.is_empty());
        assert!(game.current.is_some()); // respawned
        let events = game.take_events();
        assert!(events.contains(&GameEvent::HardDropped));
    }

    #[test]
    fn test_completing_a_row_clears_and_scores() {
        let mut game = game();
        let bottom = DEFAULT_HEIGHT as i32 - 1;
        // bottom row missing exactly the four columns a flat I will fill
        fill_row_except(&mut game, bottom, &[3, 4, 5, 6]);
        force_piece(&mut game, PieceKind::I); // spawns at x=3, row 1 of its matrix occupied
        game.process_action(Action::HardDrop);

        assert_eq!(game.score.lines, 1);
        assert!(!game.board.is_row_full(bottom as usize));
        // hard drop bonus plus a level-1 single
        let drop_rows = DEFAULT_HEIGHT as u64 - 2; // from matrix row 1 to the bottom row
        assert_eq!(game.score.points, 100 + 2 * drop_rows);
        let events = game.take_events();
        assert!(events.contains(&GameEvent::LinesCleared(1)));
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let mut game = game();
        // block the spawn rows, leaving column 0 open so nothing clears
        for y in 0..2 {
            fill_row_except(&mut game, y, &[0]);
        }
        force_piece(&mut game, PieceKind::T);
        game.process_action(Action::HardDrop); // locks instantly, respawn collides
        assert_eq!(game.phase, Phase::Over);
        assert!(game.take_events().contains(&GameEvent::GameOver));

        // terminal: no further mutation until reset
        let points = game.score.points;
        game.tick(Duration::from_secs(5));
        game.process_action(Action::HardDrop);
        assert_eq!(game.score.points, points);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut game = game();
        game.process_action(Action::HardDrop);
        game.process_action(Action::Reset);
        assert_eq!(game.phase, Phase::Idle);
        assert!(game.board.is_empty());
        assert!(game.current.is_none());
        assert!(game.next.is_none());
        assert_eq!(game.score.points, 0);
    }

    #[test]
    fn test_next_piece_is_promoted() {
        let mut game = game();
        let upcoming = game.next.as_ref().unwrap().kind;
        game.process_action(Action::HardDrop);
        assert_eq!(game.current.as_ref().unwrap().kind, upcoming);
        assert!(game.next.is_some());
    }

    #[test]
    fn test_moves_rejected_at_walls_without_side_effect() {
        let mut game = game();
        force_piece(&mut game, PieceKind::O);
        for _ in 0..DEFAULT_WIDTH {
            game.process_action(Action::MoveLeft);
        }
        let x = game.current.as_ref().unwrap().x;
        assert_eq!(x, 0);
        game.process_action(Action::MoveLeft);
        assert_eq!(game.current.as_ref().unwrap().x, 0);
    }

    #[test]
    fn test_soft_drop_does_not_lock() {
        let mut game = game();
        force_piece(&mut game, PieceKind::O);
        for _ in 0..DEFAULT_HEIGHT {
            game.process_action(Action::SoftDrop);
        }
        // resting on the floor but still active
        assert!(game.current.is_some());
        assert!(game.board.is_empty());
    }

    #[test]
    fn test_score_never_decreases() {
        let mut game = game();
        let mut last = 0;
        for _ in 0..30 {
            game.process_action(Action::HardDrop);
            if game.phase != Phase::Running {
                break;
            }
            assert!(game.score.points >= last);
            last = game.score.points;
        }
    }
}
