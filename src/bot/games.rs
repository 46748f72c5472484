use std::str::FromStr;

/* Games holds the pure rules shared by the interactive games.
 * It knows nothing about the chat platform or the store: boards and
 * choices come in, outcomes come out.
 */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Mark::X => "❌",
            Mark::O => "⭕",
        }
    }
}

pub type Board = [Option<Mark>; 9];

// The eight three-in-a-row lines of a 3x3 board.
const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, PartialEq)]
pub enum BoardState {
    InProgress,
    Won(Mark),
    Tied,
}

/* Evaluates a board against the eight win lines.
 * A full board with no line match is a tie.
 */
pub fn evaluate(board: &Board) -> BoardState {
    for line in WIN_LINES {
        if let Some(mark) = board[line[0]] {
            if board[line[1]] == Some(mark) && board[line[2]] == Some(mark) {
                return BoardState::Won(mark);
            }
        }
    }

    if board.iter().all(|cell| cell.is_some()) {
        BoardState::Tied
    } else {
        BoardState::InProgress
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    pub fn as_str(self) -> &'static str {
        match self {
            Choice::Rock => "rock",
            Choice::Paper => "paper",
            Choice::Scissors => "scissors",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Choice::Rock => "🪨 Rock",
            Choice::Paper => "📄 Paper",
            Choice::Scissors => "✂️ Scissors",
        }
    }

    // Rock beats scissors, paper beats rock, scissors beats paper.
    fn beats(self, other: Choice) -> bool {
        matches!(
            (self, other),
            (Choice::Rock, Choice::Scissors)
                | (Choice::Paper, Choice::Rock)
                | (Choice::Scissors, Choice::Paper)
        )
    }
}

impl FromStr for Choice {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, <Self as FromStr>::Err> {
        match s {
            "rock" => Ok(Choice::Rock),
            "paper" => Ok(Choice::Paper),
            "scissors" => Ok(Choice::Scissors),
            _ => Err("Allowed choices: rock, paper, scissors"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Duel {
    ChallengerWins,
    OpponentWins,
    Draw,
}

/* Resolves a single rock-paper-scissors exchange from the challenger's side. */
pub fn duel(challenger: Choice, opponent: Choice) -> Duel {
    if challenger == opponent {
        Duel::Draw
    } else if challenger.beats(opponent) {
        Duel::ChallengerWins
    } else {
        Duel::OpponentWins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Utility function to build a board from a compact string, e.g. "XOX O  X ".
    fn board_of(text: &str) -> Board {
        let mut board: Board = [None; 9];
        for (i, c) in text.chars().enumerate() {
            board[i] = match c {
                'X' => Some(Mark::X),
                'O' => Some(Mark::O),
                _ => None,
            };
        }
        board
    }

    #[test]
    fn test_evaluate_detects_every_line() {
        for line in WIN_LINES {
            for mark in [Mark::X, Mark::O] {
                let mut board: Board = [None; 9];
                for cell in line {
                    board[cell] = Some(mark);
                }
                assert_eq!(evaluate(&board), BoardState::Won(mark));
            }
        }
    }

    #[test]
    fn test_evaluate_tie_requires_full_board() {
        // No line of three, all cells filled
        let board = board_of("XOXXOXOXO");
        assert_eq!(evaluate(&board), BoardState::Tied);

        // Same layout with one cell open is still in progress
        let board = board_of("XOXXOXOX ");
        assert_eq!(evaluate(&board), BoardState::InProgress);
    }

    #[test]
    fn test_evaluate_empty_board_in_progress() {
        assert_eq!(evaluate(&[None; 9]), BoardState::InProgress);
    }

    #[test]
    fn test_duel_full_matrix() {
        for challenger in Choice::ALL {
            for opponent in Choice::ALL {
                let expected = if challenger == opponent {
                    Duel::Draw
                } else {
                    match (challenger, opponent) {
                        (Choice::Rock, Choice::Scissors)
                        | (Choice::Paper, Choice::Rock)
                        | (Choice::Scissors, Choice::Paper) => Duel::ChallengerWins,
                        _ => Duel::OpponentWins,
                    }
                };
                assert_eq!(duel(challenger, opponent), expected);
            }
        }
    }

    #[test]
    fn test_choice_from_str() {
        assert_eq!(Choice::from_str("rock"), Ok(Choice::Rock));
        assert_eq!(Choice::from_str("paper"), Ok(Choice::Paper));
        assert_eq!(Choice::from_str("scissors"), Ok(Choice::Scissors));
        assert!(Choice::from_str("lizard").is_err());
    }
}
