use cosmwasm_schema::cw_serde;
use thiserror::Error;

/// A mark on the board, or the mark a participant plays with.
#[cw_serde]
#[derive(Copy)]
pub enum Sign {
    Empty,
    Cross,
    Zero,
}

impl Sign {
    /// The sign held by the other participant.
    pub fn opposite(self) -> Sign {
        match self {
            Sign::Cross => Sign::Zero,
            Sign::Zero => Sign::Cross,
            Sign::Empty => Sign::Empty,
        }
    }
}

/// How a finished board ended.
#[cw_serde]
#[derive(Copy)]
pub enum Outcome {
    Won(Sign),
    Draw,
}

/// An error that can occur when playing on a board.
#[derive(Error, Debug, PartialEq)]
pub enum GameError {
    /// The sign tried to play out of turn.
    #[error("Not your move")]
    NotYourMove,
    /// The coordinates are outside the 3x3 grid.
    #[error("Cell ({x}, {y}) is out of the board")]
    InvalidCell { x: u8, y: u8 },
    /// The target cell already holds a sign.
    #[error("Cell ({x}, {y}) is already occupied")]
    CellOccupied { x: u8, y: u8 },
}

/// The winning lines of tic-tac-toe as (x, y) coordinates.
const WINNING_LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// A 3x3 board and whose turn it is.
#[cw_serde]
#[derive(Copy)]
pub struct Board {
    cells: [[Sign; 3]; 3],
    is_cross_move: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates an empty board with `Cross` to move first.
    pub fn new() -> Board {
        Board {
            cells: [[Sign::Empty; 3]; 3],
            is_cross_move: true,
        }
    }

    pub fn cells(&self) -> &[[Sign; 3]; 3] {
        &self.cells
    }

    pub fn is_cross_move(&self) -> bool {
        self.is_cross_move
    }

    /// The sign due to move next.
    pub fn turn(&self) -> Sign {
        if self.is_cross_move {
            Sign::Cross
        } else {
            Sign::Zero
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|&s| s == Sign::Empty)
    }

    /// Places `sign` at (`x`, `y`) and passes the turn.
    pub fn play(&mut self, sign: Sign, x: u8, y: u8) -> Result<(), GameError> {
        if sign == Sign::Empty || self.turn() != sign {
            return Err(GameError::NotYourMove);
        }

        let cell = self
            .cells
            .get_mut(x as usize)
            .and_then(|row| row.get_mut(y as usize))
            .ok_or(GameError::InvalidCell { x, y })?;

        if *cell != Sign::Empty {
            return Err(GameError::CellOccupied { x, y });
        }
        *cell = sign;

        self.is_cross_move = !self.is_cross_move;
        Ok(())
    }

    /// The sign holding a complete line, if any.
    pub fn winner(&self) -> Option<Sign> {
        WINNING_LINES.iter().find_map(|line| {
            let (x, y) = line[0];
            let sign = self.cells[x][y];
            (sign != Sign::Empty && line.iter().all(|&(x, y)| self.cells[x][y] == sign))
                .then_some(sign)
        })
    }

    /// Returns the outcome once the board is decided: a complete line, or a full board.
    pub fn outcome(&self) -> Option<Outcome> {
        if let Some(sign) = self.winner() {
            return Some(Outcome::Won(sign));
        }
        self.cells
            .iter()
            .flatten()
            .all(|&s| s != Sign::Empty)
            .then_some(Outcome::Draw)
    }
}
