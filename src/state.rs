use crate::game::{Board, Sign};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Timestamp, Uint128};
use cw20::Denom;
use cw_storage_plus::{Item, Map};

#[cw_serde]
#[derive(Copy)]
pub enum GameState {
    Free,
    Playing,
    Finished,
}

/// The result of a game. Anything but `None` means the game is finished.
#[cw_serde]
#[derive(Copy)]
pub enum Winner {
    None,
    Cross,
    Zero,
    Draw,
    Cancelled,
}

impl From<Sign> for Winner {
    fn from(sign: Sign) -> Self {
        match sign {
            Sign::Cross => Winner::Cross,
            Sign::Zero => Winner::Zero,
            Sign::Empty => Winner::None,
        }
    }
}

#[cw_serde]
pub struct Game {
    pub owner: Addr,
    pub rival: Option<Addr>,
    pub state: GameState,
    pub winner: Winner,
    /// `Empty` until the rival joins; the rival holds the opposite sign.
    pub owner_sign: Sign,
    pub board: Board,
    /// Gross stake each participant puts in.
    pub bet: Uint128,
    pub denom: Denom,
    /// Seconds allowed per move.
    pub waiting_time: u64,
    pub last_active_time: Timestamp,
    /// Stake held for the owner after the commission was forwarded.
    pub owner_escrow: Uint128,
    /// Stake held for the rival after the commission was forwarded.
    pub rival_escrow: Uint128,
    pub owner_withdrawn: bool,
    pub rival_withdrawn: bool,
}

impl Game {
    pub fn rival_sign(&self) -> Sign {
        self.owner_sign.opposite()
    }

    /// The sign `addr` plays with, `Empty` for outsiders.
    pub fn sign_of(&self, addr: &Addr) -> Sign {
        if *addr == self.owner {
            self.owner_sign
        } else if self.rival.as_ref() == Some(addr) {
            self.rival_sign()
        } else {
            Sign::Empty
        }
    }

    pub fn addr_of(&self, sign: Sign) -> Option<&Addr> {
        if sign == Sign::Empty {
            None
        } else if sign == self.owner_sign {
            Some(&self.owner)
        } else {
            self.rival.as_ref()
        }
    }

    pub fn winner_addr(&self) -> Option<&Addr> {
        match self.winner {
            Winner::Cross => self.addr_of(Sign::Cross),
            Winner::Zero => self.addr_of(Sign::Zero),
            _ => None,
        }
    }

    pub fn participants(&self) -> impl Iterator<Item = &Addr> {
        std::iter::once(&self.owner).chain(self.rival.as_ref())
    }

    /// The moment the current move (or the join, while free) runs out.
    pub fn deadline(&self) -> Timestamp {
        self.last_active_time.plus_seconds(self.waiting_time)
    }

    /// Amount `addr` may still withdraw from a finished game.
    pub fn payout_for(&self, addr: &Addr) -> Uint128 {
        let is_owner = *addr == self.owner;
        let is_rival = self.rival.as_ref() == Some(addr);

        match self.winner {
            Winner::Cross | Winner::Zero if self.winner_addr() == Some(addr) => {
                self.owner_escrow + self.rival_escrow
            }
            Winner::Draw if is_owner => self.owner_escrow,
            Winner::Draw if is_rival => self.rival_escrow,
            Winner::Cancelled if is_owner => self.owner_escrow,
            _ => Uint128::zero(),
        }
    }

    pub fn has_withdrawn(&self, addr: &Addr) -> bool {
        if *addr == self.owner {
            self.owner_withdrawn
        } else {
            self.rival_withdrawn
        }
    }

    pub fn mark_withdrawn(&mut self, addr: &Addr) {
        if *addr == self.owner {
            self.owner_withdrawn = true;
        } else {
            self.rival_withdrawn = true;
        }
    }
}

#[cw_serde]
pub struct Config {
    /// May change the permit validity window.
    pub admin: Addr,
    /// Receives every commission.
    pub treasury: Addr,
    /// Uncompressed secp256k1 key whose signatures authorize commission changes.
    pub permit_signer: Binary,
}

#[cw_serde]
pub struct PermitState {
    /// Percent of each stake forwarded to the treasury.
    pub commission: u64,
    /// Advances on every accepted permit.
    pub nonce: u64,
    pub valid_days: u64,
    pub deadline: Timestamp,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const PERMIT: Item<PermitState> = Item::new("permit");
pub const GAME_COUNT: Item<u64> = Item::new("game_count");
pub const GAMES: Map<u64, Game> = Map::new("games");
