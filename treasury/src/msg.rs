use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Coin, Uint128};
use cw20::Denom;

#[cw_serde]
pub struct InstantiateMsg {
    pub owners: Vec<String>,
    /// Approvals needed before a transaction may execute.
    pub required: u32,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Propose sending native coins of `denom`.
    Submit {
        to: String,
        value: Uint128,
        denom: String,
    },
    /// Propose sending cw20 tokens.
    SubmitToken {
        to: String,
        value: Uint128,
        token: String,
    },
    Approve { tx_id: u64 },
    /// Withdraw an earlier approval.
    Revoke { tx_id: u64 },
    /// Send the funds of a transaction with enough approvals.
    Execute { tx_id: u64 },
}

#[cw_serde]
pub enum QueryMsg {
    Transaction { tx_id: u64 },
    /// Whether `owner` approved a transaction.
    Approved { tx_id: u64, owner: String },
    Owners {},
    /// Native coins held by the wallet.
    Balance { denom: String },
    /// cw20 tokens held by the wallet.
    TokenBalance { token: String },
}

#[cw_serde]
pub struct TransactionResponse {
    pub id: u64,
    pub to: Addr,
    pub value: Uint128,
    pub denom: Denom,
    pub is_token_tx: bool,
    pub executed: bool,
    pub approvals: u32,
}

#[cw_serde]
pub struct ApprovedResponse {
    pub approved: bool,
}

#[cw_serde]
pub struct OwnersResponse {
    pub owners: Vec<Addr>,
    pub required: u32,
}

#[cw_serde]
pub struct BalanceResponse {
    pub balance: Coin,
}

#[cw_serde]
pub struct TokenBalanceResponse {
    pub balance: Uint128,
}
