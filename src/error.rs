use crate::game::GameError;
use cosmwasm_std::{StdError, Uint128};
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    StdError(#[from] StdError),
    #[error("{0}")]
    GameError(#[from] GameError),
    #[error("{0}")]
    Payment(#[from] PaymentError),
    #[error("Contract is already initialized")]
    AlreadyInitialized,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Permit signer must be a 65 byte uncompressed secp256k1 public key")]
    InvalidSigner,
    #[error("Commission must be between 0 and 100, got {0}")]
    InvalidCommission(u64),
    #[error("Bet must be a positive amount")]
    InvalidBet,
    #[error("That game {id} does not exist")]
    GameNotFound { id: u64 },
    #[error("Can't play with yourself")]
    CannotPlayWithYourself,
    #[error("Game {id} is not waiting for a rival")]
    GameNotFree { id: u64 },
    #[error("Game {id} is not being played")]
    GameNotPlaying { id: u64 },
    #[error("Game {id} is not finished")]
    GameNotFinished { id: u64 },
    #[error("The stake currency does not match game {id}")]
    WrongCurrency { id: u64 },
    #[error("Bet must be {expected}, got {got}")]
    WrongBet { expected: Uint128, got: Uint128 },
    #[error("{addr} is not a participant of game {id}")]
    NotAParticipant { id: u64, addr: String },
    #[error("Move time over")]
    MoveTimeOver,
    #[error("Move time is not over yet")]
    MoveTimeNotOver,
    #[error("Waiting time for a rival is not over yet")]
    WaitingTimeNotOver,
    #[error("Already withdrawn")]
    AlreadyWithdrawn,
    #[error("Not entitled to a payout")]
    NotEntitled,
    #[error("No permission")]
    NoPermission,
    #[error("Permit life-time is over")]
    PermitExpired,
}
