use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    StdError(#[from] StdError),
    #[error("Contract is already initialized")]
    AlreadyInitialized,
    #[error("Not an owner")]
    Unauthorized,
    #[error("Owners must not be empty")]
    NoOwners,
    #[error("Owner {0} is listed twice")]
    DuplicateOwner(String),
    #[error("Required approvals must be between 1 and {owners}, got {required}")]
    InvalidThreshold { required: u32, owners: u32 },
    #[error("Transaction {id} does not exist")]
    TxNotFound { id: u64 },
    #[error("Transaction {id} is already approved by {owner}")]
    AlreadyApproved { id: u64, owner: String },
    #[error("Transaction {id} is not approved by {owner}")]
    NotApproved { id: u64, owner: String },
    #[error("Transaction {id} is already executed")]
    AlreadyExecuted { id: u64 },
    #[error("Transaction {id} has {approvals} of {required} approvals")]
    QuorumNotMet {
        id: u64,
        approvals: u32,
        required: u32,
    },
}
