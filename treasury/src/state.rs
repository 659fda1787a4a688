use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw20::Denom;
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct Transaction {
    pub to: Addr,
    pub value: Uint128,
    /// `Cw20` marks a token transaction.
    pub denom: Denom,
    pub executed: bool,
    /// Number of owners currently approving.
    pub approvals: u32,
}

impl Transaction {
    pub fn is_token_tx(&self) -> bool {
        matches!(self.denom, Denom::Cw20(_))
    }
}

pub const OWNERS: Item<Vec<Addr>> = Item::new("owners");
pub const REQUIRED: Item<u32> = Item::new("required");
pub const TX_COUNT: Item<u64> = Item::new("tx_count");
pub const TRANSACTIONS: Map<u64, Transaction> = Map::new("transactions");
pub const APPROVALS: Map<(u64, &Addr), bool> = Map::new("approvals");
