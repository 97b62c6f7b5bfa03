use crate::logic::board::Board;
use crate::logic::clock::{Clock, SystemClock};
use crate::logic::generator::MoveGenerator;
use crate::logic::persistence::{PersistenceError, SavedGame};
use crate::logic::piece::{Color, Piece};
use crate::logic::position::Position;
use crate::logic::record::{Move, MoveRecord};
use crate::logic::rules::{apply_move, is_in_check, is_promotion_square};
use crate::logic::square::Square;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

/// Called once after every committed state change.
pub type Observer = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    Won(Color),
    Draw,
    TimedOut(Color),
    Abandoned(Color),
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "Game is still running"),
            Self::Won(color) => write!(f, "{color} won the game"),
            Self::Draw => write!(f, "Draw"),
            Self::TimedOut(color) => write!(f, "{color} lost: timeout"),
            Self::Abandoned(color) => write!(f, "{color} abandoned the game"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds each side may spend over the whole game.
    pub allowed_time: f64,
    pub white_name: String,
    pub black_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            allowed_time: 1800.0,
            white_name: "Player White".to_string(),
            black_name: "Player Black".to_string(),
        }
    }
}

impl GameConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Seconds charged to this side so far.
    pub elapsed: f64,
}

impl Player {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            elapsed: 0.0,
        }
    }
}

pub struct GameState {
    pub board: Board,
    pub turn: Color,
    history: Vec<MoveRecord>,
    white: Player,
    black: Player,
    allowed_time: f64,
    /// Logical start of the game. Move costs of the first move count from here.
    start_time: f64,
    pending_promotion: Option<Square>,
    abandoned_by: Option<Color>,
    draw_agreed: bool,
    undo_stack: Vec<SavedGame>,
    redo_stack: Vec<SavedGame>,
    clock: Arc<dyn Clock>,
    observer: Option<Observer>,
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("board", &self.board.to_fen_string(self.turn))
            .field("history", &self.history.len())
            .field("white", &self.white)
            .field("black", &self.black)
            .field("allowed_time", &self.allowed_time)
            .field("pending_promotion", &self.pending_promotion)
            .field("abandoned_by", &self.abandoned_by)
            .field("draw_agreed", &self.draw_agreed)
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .finish_non_exhaustive()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

impl GameState {
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        log::info!(
            "new game: {} vs {}, {}s each",
            config.white_name,
            config.black_name,
            config.allowed_time
        );
        Self {
            board: Board::new(),
            turn: Color::White,
            history: Vec::new(),
            white: Player::new(&config.white_name),
            black: Player::new(&config.black_name),
            allowed_time: config.allowed_time,
            start_time: clock.now(),
            pending_promotion: None,
            abandoned_by: None,
            draw_agreed: false,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            clock,
            observer: None,
        }
    }

    /// Fresh game with the standard layout, notifying `observer` on every change.
    pub fn new_game(observer: impl FnMut() + 'static, allowed_time: f64) -> Self {
        let config = GameConfig {
            allowed_time,
            ..GameConfig::default()
        };
        Self::new(&config).with_observer(observer)
    }

    /// Rebuilds a game from its JSON save.
    pub fn load_game(
        json: &str,
        observer: impl FnMut() + 'static,
        allowed_time: f64,
    ) -> Result<Self, PersistenceError> {
        Self::new_game(observer, allowed_time).load_json(json)
    }

    /// Replaces the time source. The game start is reset to the new clock's now.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.start_time = clock.now();
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: impl FnMut() + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn load_json(mut self, json: &str) -> Result<Self, PersistenceError> {
        let saved = SavedGame::from_json(json)?;
        self.restore(&saved)?;
        log::info!("loaded game with {} moves", self.history.len());
        Ok(self)
    }

    pub fn load_from_reader<R: Read>(self, mut reader: R) -> Result<Self, PersistenceError> {
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        self.load_json(&json)
    }

    /// Snapshot of the game in its save format, stamped with the current time.
    pub fn to_saved(&self) -> SavedGame {
        SavedGame::new(self.start_time, self.clock.now(), &self.history)
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        self.to_saved().to_json()
    }

    pub fn save_to_writer<W: Write>(&self, mut writer: W) -> Result<(), PersistenceError> {
        writer.write_all(self.to_json()?.as_bytes())?;
        writer.flush()?;
        log::info!("saved game with {} moves", self.history.len());
        Ok(())
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn player(&self, color: Color) -> &Player {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn player_mut(&mut self, color: Color) -> &mut Player {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    pub const fn allowed_time(&self) -> f64 {
        self.allowed_time
    }

    pub const fn pending_promotion(&self) -> Option<Square> {
        self.pending_promotion
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Owned copy of the board, log and side to move, for search.
    pub fn snapshot(&self) -> Position {
        Position {
            board: self.board.clone(),
            turn: self.turn,
            history: self.history.clone(),
        }
    }

    pub fn find_piece(&self, piece: Piece) -> Option<Square> {
        self.board.find(piece)
    }

    /// The board after each logged ply, in order.
    pub fn board_history(&self) -> Vec<Board> {
        let mut board = Board::new();
        let mut boards = Vec::with_capacity(self.history.len());
        for (index, record) in self.history.iter().enumerate() {
            apply_move(&mut board, &self.history[..index], record.from, record.to);
            if let Some(promoted) = record.promoted {
                board.set_piece(record.to, Some(promoted));
            }
            boards.push(board.clone());
        }
        boards
    }

    /// Legal moves of the piece on `from`. Empty unless it belongs to the side
    /// to move, and empty while a promotion is pending.
    pub fn legal_moves_from(&self, from: Square) -> Vec<Move> {
        let owned = self
            .board
            .get(from)
            .is_some_and(|piece| piece.is_owned_by(self.turn));
        if !owned || self.pending_promotion.is_some() {
            return Vec::new();
        }
        MoveGenerator::new().legal_moves_from(&self.board, &self.history, from)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.pending_promotion.is_some() {
            return Vec::new();
        }
        MoveGenerator::new().generate_moves(&self.board, &self.history, self.turn)
    }

    pub fn is_in_check(&self) -> bool {
        is_in_check(&self.board, &self.history, self.turn)
    }

    fn last_timestamp(&self) -> f64 {
        self.history.last().map_or(self.start_time, |record| record.dt)
    }

    /// Seconds `color` has left, counting the running move of the side to move.
    pub fn remaining_time(&self, color: Color) -> f64 {
        let live = if color == self.turn {
            self.clock.now() - self.last_timestamp()
        } else {
            0.0
        };
        self.allowed_time - self.player(color).elapsed - live
    }

    /// Outcome of the game so far. Abandonment beats an agreed draw, which
    /// beats a timeout (White checked first), which beats the board itself.
    pub fn winner(&self) -> GameStatus {
        if let Some(color) = self.abandoned_by {
            return GameStatus::Abandoned(color);
        }
        if self.draw_agreed {
            return GameStatus::Draw;
        }
        for color in [Color::White, Color::Black] {
            if self.remaining_time(color) <= 0.0 {
                return GameStatus::TimedOut(color);
            }
        }
        if MoveGenerator::new().has_legal_moves(&self.board, &self.history, self.turn) {
            GameStatus::Running
        } else if self.is_in_check() {
            GameStatus::Won(self.turn.opposite())
        } else {
            GameStatus::Draw
        }
    }

    /// Plays a move taken from the generator's output; legality is not re-checked.
    ///
    /// A committed move pushes an undo snapshot, clears the redo stack and
    /// notifies the observer. A pawn reaching the last rank leaves the game
    /// waiting for [`GameState::choice`] unless `promotion` is given.
    pub fn make_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
        committed: bool,
    ) {
        let dt = self.clock.now();
        if self.apply(from, to, promotion, dt, None, committed) && committed {
            log::debug!("{} played {from}{to}", self.player(self.mover_of_last()).name);
            self.notify();
        }
    }

    /// Convenience for [`GameState::make_move`] with a generator move, committed.
    pub fn play(&mut self, mv: Move) {
        self.make_move(mv.from, mv.to, mv.promotion, true);
    }

    fn mover_of_last(&self) -> Color {
        self.history
            .last()
            .map_or(self.turn, |record| record.piece.color)
    }

    fn apply(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
        dt: f64,
        move_cost: Option<f64>,
        committed: bool,
    ) -> bool {
        let Some(piece) = self.board.get(from) else {
            log::warn!("ignoring move from empty square {from}");
            return false;
        };

        if committed {
            let snapshot = self.to_saved();
            self.undo_stack.push(snapshot);
            self.redo_stack.clear();
        }

        let move_cost = move_cost.unwrap_or_else(|| dt - self.last_timestamp());
        let mover = self.turn;
        self.player_mut(mover).elapsed += move_cost;

        let captured = apply_move(&mut self.board, &self.history, from, to);
        self.turn = self.turn.opposite();
        self.history.push(MoveRecord {
            dt,
            from,
            to,
            piece,
            captured,
            promoted: None,
            move_cost,
        });

        if is_promotion_square(piece, to) {
            self.turn = self.turn.opposite();
            self.pending_promotion = Some(to);
            if let Some(promoted) = promotion {
                self.resolve_promotion(promoted);
            }
        }
        true
    }

    fn resolve_promotion(&mut self, piece: Piece) -> bool {
        let Some(square) = self.pending_promotion.take() else {
            return false;
        };
        self.board.set_piece(square, Some(piece));
        self.turn = self.turn.opposite();
        if let Some(last) = self.history.last_mut() {
            last.promoted = Some(piece);
        }
        true
    }

    /// Resolves a pending promotion with `piece`. Does nothing when no
    /// promotion is pending.
    pub fn choice(&mut self, piece: Piece) {
        if self.pending_promotion.is_none() {
            log::warn!("promotion choice {piece} ignored: nothing pending");
            return;
        }
        let snapshot = self.to_saved();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();

        self.resolve_promotion(piece);
        log::debug!("promoted to {piece}");
        self.notify();
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            log::warn!("nothing to undo");
            return false;
        };
        let current = self.to_saved();
        self.redo_stack.push(current);
        self.rewind(&snapshot);
        log::debug!("undo: back to {} moves", self.history.len());
        self.notify();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            log::warn!("nothing to redo");
            return false;
        };
        let current = self.to_saved();
        self.undo_stack.push(current);
        self.rewind(&snapshot);
        log::debug!("redo: forward to {} moves", self.history.len());
        self.notify();
        true
    }

    pub fn abandon(&mut self, color: Color) {
        if self.abandoned_by.is_none() {
            self.abandoned_by = Some(color);
            log::debug!("{color} abandoned");
            self.notify();
        }
    }

    pub fn agree_draw(&mut self) {
        if !self.draw_agreed {
            self.draw_agreed = true;
            log::debug!("draw agreed");
            self.notify();
        }
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer();
        }
    }

    fn rewind(&mut self, snapshot: &SavedGame) {
        if let Err(err) = self.restore(snapshot) {
            log::error!("failed to replay snapshot: {err}");
        }
    }

    /// Shifts the snapshot's timestamps to now and replays its log from the
    /// standard layout.
    fn restore(&mut self, saved: &SavedGame) -> Result<(), PersistenceError> {
        let offset = self.clock.now() - saved.save;
        let records = saved.records(offset)?;
        self.start_time = saved.time + offset;
        self.replay(records)
    }

    fn replay(&mut self, records: Vec<MoveRecord>) -> Result<(), PersistenceError> {
        self.board = Board::new();
        self.turn = Color::White;
        self.history.clear();
        self.white.elapsed = 0.0;
        self.black.elapsed = 0.0;
        self.pending_promotion = None;

        for (index, record) in records.into_iter().enumerate() {
            match self.board.get(record.from) {
                Some(piece) if piece.is_owned_by(self.turn) => {}
                Some(piece) => {
                    return Err(PersistenceError::IllegalRecord {
                        index,
                        reason: format!("{piece} on {} cannot move for {}", record.from, self.turn),
                    });
                }
                None => {
                    return Err(PersistenceError::IllegalRecord {
                        index,
                        reason: format!("{} is empty", record.from),
                    });
                }
            }
            self.apply(
                record.from,
                record.to,
                record.promoted,
                record.dt,
                Some(record.move_cost),
                false,
            );
        }
        Ok(())
    }
}
