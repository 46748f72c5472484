use crate::bot::games::{evaluate, Board, BoardState, Mark};

use super::{Store, StoreError};

/* Tic-tac-toe sessions.
 * A game lives in the map only while it is in progress: reaching a win or
 * a tie removes it in the same locked operation that produced the result,
 * so a stale click after the end resolves to GameNotFound.
 */

#[derive(Clone, Debug)]
pub struct Game {
    pub player_x: u64,
    pub player_o: u64,
    pub turn: Mark,
    pub board: Board,
    pub channel_id: u64,
    pub message_id: Option<u64>,
}

impl Game {
    pub fn new(player_x: u64, player_o: u64, channel_id: u64) -> Game {
        Game {
            player_x,
            player_o,
            turn: Mark::X,
            board: [None; 9],
            channel_id,
            message_id: None,
        }
    }

    fn mark_of(&self, user: u64) -> Option<Mark> {
        if user == self.player_x {
            Some(Mark::X)
        } else if user == self.player_o {
            Some(Mark::O)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    pub player_x: u64,
    pub player_o: u64,
    pub turn: Mark,
    pub board: Board,
    pub channel_id: u64,
    pub message_id: Option<u64>,
}

fn snapshot(game: &Game) -> GameSnapshot {
    GameSnapshot {
        player_x: game.player_x,
        player_o: game.player_o,
        turn: game.turn,
        board: game.board,
        channel_id: game.channel_id,
        message_id: game.message_id,
    }
}

#[derive(Debug, PartialEq)]
pub enum MoveRejection {
    NotAParticipant,
    NotYourTurn,
    CellOccupied,
}

#[derive(Debug, PartialEq)]
pub enum MoveOutcome {
    Advanced(GameSnapshot),
    Won { snapshot: GameSnapshot, winner: u64 },
    Tied(GameSnapshot),
    Rejected(MoveRejection),
}

impl Store {
    pub async fn insert_game(&self, game_id: &str, game: Game) {
        self.games.lock().await.insert(game_id.to_string(), game);
    }

    pub async fn attach_game_message(
        &self,
        game_id: &str,
        message_id: u64,
    ) -> Result<(), StoreError> {
        let mut games = self.games.lock().await;
        let game = games
            .get_mut(game_id)
            .ok_or_else(|| StoreError::GameNotFound(game_id.to_string()))?;
        game.message_id = Some(message_id);
        Ok(())
    }

    /* Applies one move. Rejections leave the board and turn untouched.
     * A move that ends the game frees the session before returning.
     */
    pub async fn apply_move(
        &self,
        game_id: &str,
        user: u64,
        cell: usize,
    ) -> Result<MoveOutcome, StoreError> {
        let mut games = self.games.lock().await;
        let game = games
            .get_mut(game_id)
            .ok_or_else(|| StoreError::GameNotFound(game_id.to_string()))?;

        if cell >= game.board.len() {
            return Err(StoreError::CellOutOfRange(cell));
        }

        let mark = match game.mark_of(user) {
            Some(mark) => mark,
            None => return Ok(MoveOutcome::Rejected(MoveRejection::NotAParticipant)),
        };
        if mark != game.turn {
            return Ok(MoveOutcome::Rejected(MoveRejection::NotYourTurn));
        }
        if game.board[cell].is_some() {
            return Ok(MoveOutcome::Rejected(MoveRejection::CellOccupied));
        }

        game.board[cell] = Some(mark);

        match evaluate(&game.board) {
            BoardState::Won(mark) => {
                let snapshot = snapshot(game);
                let winner = match mark {
                    Mark::X => game.player_x,
                    Mark::O => game.player_o,
                };
                games.remove(game_id);
                Ok(MoveOutcome::Won { snapshot, winner })
            }
            BoardState::Tied => {
                let snapshot = snapshot(game);
                games.remove(game_id);
                Ok(MoveOutcome::Tied(snapshot))
            }
            BoardState::InProgress => {
                game.turn = game.turn.other();
                Ok(MoveOutcome::Advanced(snapshot(game)))
            }
        }
    }

    // Frees a session without resolving it. Used by the idle timeout.
    pub async fn remove_game(&self, game_id: &str) -> Option<GameSnapshot> {
        self.games
            .lock()
            .await
            .remove(game_id)
            .map(|game| snapshot(&game))
    }

    #[allow(dead_code)]
    pub async fn game_snapshot(&self, game_id: &str) -> Option<GameSnapshot> {
        self.games.lock().await.get(game_id).map(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: u64 = 11;
    const BOB: u64 = 22;

    async fn fresh_game(store: &Store) {
        store.insert_game("g1", Game::new(ALICE, BOB, 500)).await;
    }

    #[tokio::test]
    async fn test_rejections_leave_state_unchanged() {
        let store = Store::new();
        fresh_game(&store).await;

        store.apply_move("g1", ALICE, 0).await.unwrap();
        let before = store.game_snapshot("g1").await.unwrap();

        // Not a participant
        let outcome = store.apply_move("g1", 999, 1).await.unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Rejected(MoveRejection::NotAParticipant)
        );

        // Not this player's turn
        let outcome = store.apply_move("g1", ALICE, 1).await.unwrap();
        assert_eq!(outcome, MoveOutcome::Rejected(MoveRejection::NotYourTurn));

        // Cell already occupied
        let outcome = store.apply_move("g1", BOB, 0).await.unwrap();
        assert_eq!(outcome, MoveOutcome::Rejected(MoveRejection::CellOccupied));

        // Board and turn did not move
        assert_eq!(store.game_snapshot("g1").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_win_frees_session() {
        let store = Store::new();
        fresh_game(&store).await;

        // X takes the top row while O plays the middle row
        store.apply_move("g1", ALICE, 0).await.unwrap();
        store.apply_move("g1", BOB, 3).await.unwrap();
        store.apply_move("g1", ALICE, 1).await.unwrap();
        store.apply_move("g1", BOB, 4).await.unwrap();
        let outcome = store.apply_move("g1", ALICE, 2).await.unwrap();

        match outcome {
            MoveOutcome::Won { winner, snapshot } => {
                assert_eq!(winner, ALICE);
                assert_eq!(snapshot.board[2], Some(Mark::X));
            }
            other => panic!("expected a win, got {:?}", other),
        }

        // Session is gone; a stale click resolves to GameNotFound
        assert_eq!(
            store.apply_move("g1", BOB, 5).await,
            Err(StoreError::GameNotFound("g1".to_string()))
        );
    }

    #[tokio::test]
    async fn test_full_board_without_line_is_tie() {
        let store = Store::new();
        fresh_game(&store).await;

        // X: 0 2 3 7 8, O: 1 4 5 6 leaves no line of three
        let moves = [
            (ALICE, 0),
            (BOB, 1),
            (ALICE, 2),
            (BOB, 4),
            (ALICE, 3),
            (BOB, 5),
            (ALICE, 7),
            (BOB, 6),
        ];
        for (user, cell) in moves {
            let outcome = store.apply_move("g1", user, cell).await.unwrap();
            assert!(matches!(outcome, MoveOutcome::Advanced(_)));
        }

        let outcome = store.apply_move("g1", ALICE, 8).await.unwrap();
        assert!(matches!(outcome, MoveOutcome::Tied(_)));
        assert!(store.game_snapshot("g1").await.is_none());
    }

    #[tokio::test]
    async fn test_remove_game_for_timeout() {
        let store = Store::new();
        fresh_game(&store).await;

        let snapshot = store.remove_game("g1").await.unwrap();
        assert_eq!(snapshot.player_x, ALICE);
        assert!(store.remove_game("g1").await.is_none());
    }
}
