//! Local view of the shared game: grid, turn flag and status.
//!
//! Every mutation notifies the subscribed [`Observer`]s synchronously on the
//! mutating thread. Observers that touch the UI wrap themselves in a
//! [`Redispatch`] so the UI work lands on the UI thread.

use super::board::Board;
use crate::core::dispatch::UiContext;
use crate::core::entities::{Dimensions, Player, Status};
use crate::core::errors::GameError;
use log::{debug, info};
use std::sync::Arc;

pub trait Observer: Send {
    fn update(&self, model: &BoardModel);
}

/// Owned copy of everything a view reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub status: Status,
    pub error_reason: Option<String>,
    pub my_turn: bool,
    pub moves_left: usize,
}

pub struct BoardModel {
    board: Board,
    status: Status,
    error_reason: Option<String>,
    my_turn: bool,
    observers: Vec<Box<dyn Observer>>,
}

impl BoardModel {
    pub fn new(dimensions: Dimensions) -> Self {
        BoardModel {
            board: Board::new(dimensions),
            status: Status::InProgress,
            error_reason: None,
            my_turn: false,
            observers: vec![],
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Drops `player`'s piece into `column`, flips the turn flag and returns
    /// the landing row.
    pub fn apply_move(&mut self, column: usize, player: Player) -> Result<usize, GameError> {
        if self.status.is_terminal() {
            return Err(GameError::GameOver(self.status));
        }

        let row = self.board.drop_piece(column, player.cell())?;
        self.my_turn = !self.my_turn;

        debug!(
            "{} dropped into column {} (row {}), my turn: {}",
            player.name(),
            column,
            row,
            self.my_turn
        );

        self.notify();
        Ok(row)
    }

    pub fn set_status(&mut self, status: Status) {
        info!("status changed to {}", status);

        self.status = status;
        self.notify();
    }

    pub fn set_error(&mut self, reason: &str) {
        info!("session error: {}", reason);

        self.status = Status::Error;
        self.error_reason = Some(reason.to_string());
        self.notify();
    }

    pub fn set_my_turn(&mut self, my_turn: bool) {
        if self.my_turn == my_turn {
            return;
        }

        self.my_turn = my_turn;
        self.notify();
    }

    pub fn is_my_turn(&self) -> bool {
        self.my_turn
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn error_reason(&self) -> Option<&str> {
        self.error_reason.as_deref()
    }

    pub fn moves_left(&self) -> usize {
        self.board.empty_cells()
    }

    pub fn moves_made(&self) -> usize {
        self.board.filled()
    }

    /// Player one drops first; pieces alternate from there.
    pub fn next_player(&self) -> Player {
        let first = Player::PlayerOne;
        if self.moves_made() % 2 == 0 {
            first
        } else {
            first.opponent()
        }
    }

    pub fn can_drop(&self, column: usize) -> Result<(), GameError> {
        self.board.check_drop(column).map(|_| ())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn dimensions(&self) -> Dimensions {
        self.board.dimensions()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            status: self.status,
            error_reason: self.error_reason.clone(),
            my_turn: self.my_turn,
            moves_left: self.moves_left(),
        }
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer.update(self);
        }
    }
}

/// Forwards snapshots to `callback` on the UI thread.
pub struct Redispatch<F> {
    context: UiContext,
    callback: Arc<F>,
}

impl<F> Redispatch<F>
where
    F: Fn(Snapshot) + Send + Sync + 'static,
{
    pub fn new(context: UiContext, callback: F) -> Self {
        Redispatch {
            context,
            callback: Arc::new(callback),
        }
    }
}

impl<F> Observer for Redispatch<F>
where
    F: Fn(Snapshot) + Send + Sync + 'static,
{
    fn update(&self, model: &BoardModel) {
        let snapshot = model.snapshot();
        let callback = self.callback.clone();

        self.context.dispatch(move || callback(snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entities::Cell;
    use crate::core::errors::MoveFault;
    use std::sync::{Arc, Mutex};
    use std::thread;

    struct Recorder {
        seen: Arc<Mutex<Vec<Snapshot>>>,
    }

    impl Observer for Recorder {
        fn update(&self, model: &BoardModel) {
            self.seen.lock().unwrap().push(model.snapshot());
        }
    }

    fn recorded(model: &mut BoardModel) -> Arc<Mutex<Vec<Snapshot>>> {
        let seen = Arc::new(Mutex::new(vec![]));
        model.subscribe(Box::new(Recorder { seen: seen.clone() }));
        seen
    }

    fn assert_moves_left_matches(model: &BoardModel) {
        let dims = model.dimensions();
        let mut non_empty = 0;
        for row in 0..dims.rows {
            for col in 0..dims.columns {
                if model.board().get(row, col) != Some(Cell::Empty) {
                    non_empty += 1;
                }
            }
        }
        assert_eq!(model.moves_left(), dims.rows * dims.columns - non_empty);
    }

    #[test]
    fn one_more_move_than_rows_fails() {
        for rows in [4, 6, 7] {
            let mut model = BoardModel::new(Dimensions::new(rows, 7));
            for _ in 0..rows {
                let player = model.next_player();
                model.apply_move(3, player).unwrap();
            }

            let player = model.next_player();
            let err = model.apply_move(3, player).unwrap_err();
            assert!(matches!(
                err,
                GameError::InvalidMove {
                    column: 3,
                    reason: MoveFault::ColumnFull
                }
            ));
            assert_eq!(model.board().column_height(3), rows);
            for col in (0..7).filter(|c| *c != 3) {
                assert_eq!(model.board().column_height(col), 0);
            }
        }
    }

    #[test]
    fn turn_alternates_on_every_accepted_move() {
        let mut model = BoardModel::new(Dimensions::default());
        model.set_my_turn(true);

        let columns = [0, 0, 1, 6, 6, 6, 2, 3];
        let mut expected = true;
        for (i, col) in columns.iter().enumerate() {
            // the same player on purpose: alternation ignores who moved
            let player = if i % 3 == 0 {
                Player::PlayerOne
            } else {
                Player::PlayerTwo
            };
            model.apply_move(*col, player).unwrap();
            expected = !expected;
            assert_eq!(model.is_my_turn(), expected);
            assert_moves_left_matches(&model);
        }
    }

    #[test]
    fn rejected_move_keeps_turn() {
        let mut model = BoardModel::new(Dimensions::new(1, 2));
        model.apply_move(0, Player::PlayerOne).unwrap();
        assert!(model.is_my_turn());

        assert!(model.apply_move(0, Player::PlayerTwo).is_err());
        assert!(model.apply_move(9, Player::PlayerTwo).is_err());
        assert!(model.is_my_turn());
        assert_eq!(model.moves_left(), 1);
    }

    #[test]
    fn terminal_status_blocks_moves() {
        let mut model = BoardModel::new(Dimensions::default());
        model.set_status(Status::Tie);

        assert!(matches!(
            model.apply_move(0, Player::PlayerOne),
            Err(GameError::GameOver(Status::Tie))
        ));
        assert_eq!(model.moves_left(), 42);
    }

    #[test]
    fn notifies_on_every_change() {
        let mut model = BoardModel::new(Dimensions::default());
        let seen = recorded(&mut model);

        model.set_my_turn(true);
        model.set_my_turn(true);
        model.apply_move(2, Player::PlayerOne).unwrap();
        let _ = model.apply_move(8, Player::PlayerTwo);
        model.set_error("boom");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].my_turn);
        assert!(!seen[1].my_turn);
        assert_eq!(seen[1].moves_left, 41);
        assert_eq!(seen[2].status, Status::Error);
        assert_eq!(seen[2].error_reason.as_deref(), Some("boom"));
    }

    #[test]
    fn next_player_follows_piece_count() {
        let mut model = BoardModel::new(Dimensions::default());
        assert_eq!(model.next_player(), Player::PlayerOne);
        model.apply_move(0, Player::PlayerOne).unwrap();
        assert_eq!(model.next_player(), Player::PlayerTwo);
        model.apply_move(0, Player::PlayerTwo).unwrap();
        assert_eq!(model.next_player(), Player::PlayerOne);
    }

    #[test]
    fn redispatch_runs_inline_on_ui_thread() {
        let (context, queue) = UiContext::current();
        let mut model = BoardModel::new(Dimensions::default());
        let seen = Arc::new(Mutex::new(vec![]));

        let sink = seen.clone();
        model.subscribe(Box::new(Redispatch::new(context, move |snapshot: Snapshot| {
            sink.lock().unwrap().push(snapshot)
        })));
        model.set_my_turn(true);

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(queue.run_pending(), 0);
    }

    #[test]
    fn redispatch_queues_from_receive_thread() {
        let (context, queue) = UiContext::current();
        let model = Arc::new(Mutex::new(BoardModel::new(Dimensions::default())));
        let seen = Arc::new(Mutex::new(vec![]));

        let sink = seen.clone();
        model
            .lock()
            .unwrap()
            .subscribe(Box::new(Redispatch::new(context, move |snapshot: Snapshot| {
                sink.lock().unwrap().push(snapshot)
            })));

        let remote = model.clone();
        thread::spawn(move || {
            remote
                .lock()
                .unwrap()
                .apply_move(4, Player::PlayerOne)
                .unwrap();
        })
        .join()
        .unwrap();

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(queue.run_pending(), 1);

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].board.get(5, 4), Some(Cell::PlayerOne));
        assert!(seen[0].my_turn);
    }
}
