use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Timestamp, Uint128};
use cw20::Denom;

use crate::game::Sign;
use crate::state::{Game, GameState, Winner};

#[cw_serde]
pub struct InstantiateMsg {
    /// The wallet that receives commission.
    pub treasury: String,
    /// Uncompressed secp256k1 public key allowed to sign commission changes.
    pub permit_signer: Binary,
    /// Commission percent, 5 when omitted.
    pub commission: Option<u64>,
}

/// A stake paid in cw20 tokens. The contract must hold an allowance for `amount`.
#[cw_serde]
pub struct TokenBet {
    pub address: String,
    pub amount: Uint128,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Open a game. The stake is the attached coin, or `token` when set.
    CreateGame {
        days: u64,
        hours: u64,
        minutes: u64,
        token: Option<TokenBet>,
    },
    /// Join a free game with a matching stake.
    JoinGame {
        id: u64,
        /// The cw20 token the game is played for, `None` for native games.
        token: Option<String>,
    },
    /// Put your sign on cell (`x`, `y`).
    Step { id: u64, x: u8, y: u8 },
    /// Finish a game whose current move ran out of time.
    CheckGameTime { id: u64 },
    /// Close a free game nobody joined in time.
    CancelGame { id: u64 },
    /// Collect your share of a finished game.
    Withdraw { id: u64 },
    /// Change the commission with a permit signed by the permit signer.
    SetCommission { value: u64, signature: Binary },
    /// Open a permit window of `days` from now.
    SetPermitValidDays { days: u64 },
}

#[cw_serde]
pub enum QueryMsg {
    /// A single game.
    Game { id: u64 },
    /// The board of a game.
    Cell { id: u64 },
    /// All games waiting for a rival.
    FreeGames {},
    /// The sign `address` plays with in a game.
    Sign { id: u64, address: String },
    /// The address due to move in a game being played.
    NextMove { id: u64 },
    /// Winning percentage of an address.
    StatisticByAddress { address: String },
    /// Percentage of finished games cross won.
    CrossGameStatistic {},
    /// Percentage of finished games zero won.
    ZeroGameStatistic {},
    /// Percentage of finished games ending in a draw.
    DrawGameStatistic {},
    Config {},
    /// The time until which commission permits are accepted.
    PermitDeadline {},
}

#[cw_serde]
pub struct GameResponse {
    pub id: u64,
    pub owner: Addr,
    pub rival: Option<Addr>,
    pub state: GameState,
    pub winner: Winner,
    pub owner_sign: Sign,
    pub rival_sign: Sign,
    pub is_cross_move: bool,
    pub bet: Uint128,
    pub denom: Denom,
    pub waiting_time: u64,
    pub last_active_time: Timestamp,
    pub board: [[Sign; 3]; 3],
    pub owner_withdrawn: bool,
    pub rival_withdrawn: bool,
}

impl GameResponse {
    pub fn new(id: u64, game: Game) -> Self {
        let rival_sign = match game.state {
            GameState::Free => Sign::Empty,
            _ => game.rival_sign(),
        };
        GameResponse {
            id,
            rival_sign,
            is_cross_move: game.board.is_cross_move(),
            board: *game.board.cells(),
            owner: game.owner,
            rival: game.rival,
            state: game.state,
            winner: game.winner,
            owner_sign: game.owner_sign,
            bet: game.bet,
            denom: game.denom,
            waiting_time: game.waiting_time,
            last_active_time: game.last_active_time,
            owner_withdrawn: game.owner_withdrawn,
            rival_withdrawn: game.rival_withdrawn,
        }
    }
}

#[cw_serde]
pub struct CellResponse {
    pub cells: [[Sign; 3]; 3],
}

#[cw_serde]
pub struct FreeGamesResponse {
    pub games: Vec<GameResponse>,
}

#[cw_serde]
pub struct SignResponse {
    pub sign: Sign,
}

#[cw_serde]
pub struct NextMoveResponse {
    pub address: Addr,
    pub sign: Sign,
    pub deadline: Timestamp,
}

#[cw_serde]
pub struct StatisticResponse {
    pub percent: u64,
}

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub treasury: Addr,
    pub permit_signer: Binary,
    pub commission: u64,
    pub nonce: u64,
    pub permit_valid_days: u64,
}

#[cw_serde]
pub struct PermitDeadlineResponse {
    pub deadline: Timestamp,
}
