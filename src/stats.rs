//! Outcome counters for finished games.
//!
//! Counters only ever grow: each game is recorded once, at the moment it
//! becomes `Finished`.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Storage};
use cw_storage_plus::{Item, Map};

use crate::state::{Game, Winner};

#[cw_serde]
#[derive(Default)]
pub struct GlobalStats {
    pub cross_wins: u64,
    pub zero_wins: u64,
    pub draws: u64,
    pub cancelled: u64,
    pub total_finished: u64,
}

#[cw_serde]
#[derive(Default)]
pub struct PlayerStats {
    pub wins: u64,
    pub total_played: u64,
}

pub const GLOBAL_STATS: Item<GlobalStats> = Item::new("global_stats");
pub const PLAYER_STATS: Map<&Addr, PlayerStats> = Map::new("player_stats");

/// Integer percentage of `count` in `total`, 0 when nothing was counted.
pub fn percent(count: u64, total: u64) -> u64 {
    if total == 0 {
        0
    } else {
        count * 100 / total
    }
}

pub fn load_global(storage: &dyn Storage) -> StdResult<GlobalStats> {
    Ok(GLOBAL_STATS.may_load(storage)?.unwrap_or_default())
}

pub fn load_player(storage: &dyn Storage, addr: &Addr) -> StdResult<PlayerStats> {
    Ok(PLAYER_STATS.may_load(storage, addr)?.unwrap_or_default())
}

/// Records a game that has just finished.
pub fn record(storage: &mut dyn Storage, game: &Game) -> StdResult<()> {
    let mut global = load_global(storage)?;
    global.total_finished += 1;

    match game.winner {
        Winner::Cross => global.cross_wins += 1,
        Winner::Zero => global.zero_wins += 1,
        Winner::Draw => global.draws += 1,
        Winner::Cancelled => global.cancelled += 1,
        Winner::None => {}
    }
    GLOBAL_STATS.save(storage, &global)?;

    // A cancelled game was never played by anyone.
    if game.winner == Winner::Cancelled {
        return Ok(());
    }

    let winner_addr = game.winner_addr();
    for addr in game.participants() {
        PLAYER_STATS.update(storage, addr, |stats| -> StdResult<_> {
            let mut stats = stats.unwrap_or_default();
            stats.total_played += 1;
            if winner_addr == Some(addr) {
                stats.wins += 1;
            }
            Ok(stats)
        })?;
    }
    Ok(())
}
