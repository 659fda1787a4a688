use crate::state::{Transaction, APPROVALS, OWNERS, REQUIRED, TRANSACTIONS, TX_COUNT};
use crate::{
    error::ContractError,
    msg::{ExecuteMsg, InstantiateMsg, QueryMsg},
};
use cosmwasm_std::{
    ensure, to_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response, Storage,
};
use cw2::{get_contract_version, set_contract_version};

const CONTRACT_NAME: &str = "crates.io:tic-tac-toe-treasury";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    ensure!(
        get_contract_version(deps.storage).is_err(),
        ContractError::AlreadyInitialized
    );
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    ensure!(!msg.owners.is_empty(), ContractError::NoOwners);

    let mut owners: Vec<Addr> = Vec::with_capacity(msg.owners.len());
    for owner in &msg.owners {
        let owner = deps.api.addr_validate(owner)?;
        ensure!(
            !owners.contains(&owner),
            ContractError::DuplicateOwner(owner.to_string())
        );
        owners.push(owner);
    }

    let count = owners.len() as u32;
    ensure!(
        msg.required >= 1 && msg.required <= count,
        ContractError::InvalidThreshold {
            required: msg.required,
            owners: count,
        }
    );

    OWNERS.save(deps.storage, &owners)?;
    REQUIRED.save(deps.storage, &msg.required)?;
    TX_COUNT.save(deps.storage, &0)?;

    Ok(Response::default()
        .add_attribute("action", "instantiate")
        .add_attribute("owners", count.to_string())
        .add_attribute("required", msg.required.to_string()))
}

pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    ensure_owner(deps.storage, &info.sender)?;

    let api = deps.api;

    match msg {
        ExecuteMsg::Submit { to, value, denom } => {
            let to = api.addr_validate(&to)?;
            exec::submit(deps, info, to, value, cw20::Denom::Native(denom))
        }
        ExecuteMsg::SubmitToken { to, value, token } => {
            let to = api.addr_validate(&to)?;
            let token = api.addr_validate(&token)?;
            exec::submit(deps, info, to, value, cw20::Denom::Cw20(token))
        }
        ExecuteMsg::Approve { tx_id } => exec::approve(deps, info, tx_id),
        ExecuteMsg::Revoke { tx_id } => exec::revoke(deps, info, tx_id),
        ExecuteMsg::Execute { tx_id } => exec::execute(deps, info, tx_id),
    }
}

fn ensure_owner(storage: &dyn Storage, sender: &Addr) -> Result<(), ContractError> {
    let owners = OWNERS.load(storage)?;
    ensure!(owners.contains(sender), ContractError::Unauthorized);
    Ok(())
}

/// Loads a transaction that has not been executed yet.
fn load_pending(storage: &dyn Storage, id: u64) -> Result<Transaction, ContractError> {
    let tx = TRANSACTIONS
        .may_load(storage, id)?
        .ok_or(ContractError::TxNotFound { id })?;
    ensure!(!tx.executed, ContractError::AlreadyExecuted { id });
    Ok(tx)
}

mod exec {
    use super::*;
    use cosmwasm_std::{coins, BankMsg, CosmosMsg, Uint128, WasmMsg};
    use cw20::{Cw20ExecuteMsg, Denom};

    pub fn submit(
        deps: DepsMut,
        info: MessageInfo,
        to: Addr,
        value: Uint128,
        denom: Denom,
    ) -> Result<Response, ContractError> {
        let id = TX_COUNT.may_load(deps.storage)?.unwrap_or_default();
        TX_COUNT.save(deps.storage, &(id + 1))?;

        let tx = Transaction {
            to,
            value,
            denom,
            executed: false,
            approvals: 0,
        };
        TRANSACTIONS.save(deps.storage, id, &tx)?;

        Ok(Response::default()
            .add_attribute("action", "submit")
            .add_attribute("tx_id", id.to_string())
            .add_attribute("owner", info.sender)
            .add_attribute("to", tx.to.to_string())
            .add_attribute("value", value)
            .add_attribute("token_tx", tx.is_token_tx().to_string()))
    }

    pub fn approve(deps: DepsMut, info: MessageInfo, id: u64) -> Result<Response, ContractError> {
        let mut tx = load_pending(deps.storage, id)?;

        let key = (id, &info.sender);
        ensure!(
            !APPROVALS.may_load(deps.storage, key)?.unwrap_or(false),
            ContractError::AlreadyApproved {
                id,
                owner: info.sender.to_string(),
            }
        );

        APPROVALS.save(deps.storage, key, &true)?;
        tx.approvals += 1;
        TRANSACTIONS.save(deps.storage, id, &tx)?;

        Ok(Response::default()
            .add_attribute("action", "approve")
            .add_attribute("tx_id", id.to_string())
            .add_attribute("owner", info.sender.to_string())
            .add_attribute("approvals", tx.approvals.to_string()))
    }

    pub fn revoke(deps: DepsMut, info: MessageInfo, id: u64) -> Result<Response, ContractError> {
        let mut tx = load_pending(deps.storage, id)?;

        let key = (id, &info.sender);
        ensure!(
            APPROVALS.may_load(deps.storage, key)?.unwrap_or(false),
            ContractError::NotApproved {
                id,
                owner: info.sender.to_string(),
            }
        );

        APPROVALS.remove(deps.storage, key);
        tx.approvals -= 1;
        TRANSACTIONS.save(deps.storage, id, &tx)?;

        Ok(Response::default()
            .add_attribute("action", "revoke")
            .add_attribute("tx_id", id.to_string())
            .add_attribute("owner", info.sender.to_string())
            .add_attribute("approvals", tx.approvals.to_string()))
    }

    pub fn execute(deps: DepsMut, info: MessageInfo, id: u64) -> Result<Response, ContractError> {
        let mut tx = load_pending(deps.storage, id)?;

        let required = REQUIRED.load(deps.storage)?;
        ensure!(
            tx.approvals >= required,
            ContractError::QuorumNotMet {
                id,
                approvals: tx.approvals,
                required,
            }
        );

        // Saved before the transfer message runs.
        tx.executed = true;
        TRANSACTIONS.save(deps.storage, id, &tx)?;

        let transfer: CosmosMsg = match &tx.denom {
            Denom::Native(denom) => BankMsg::Send {
                to_address: tx.to.to_string(),
                amount: coins(tx.value.u128(), denom),
            }
            .into(),
            Denom::Cw20(token) => WasmMsg::Execute {
                contract_addr: token.to_string(),
                msg: to_binary(&Cw20ExecuteMsg::Transfer {
                    recipient: tx.to.to_string(),
                    amount: tx.value,
                })?,
                funds: vec![],
            }
            .into(),
        };

        Ok(Response::default()
            .add_message(transfer)
            .add_attribute("action", "execute")
            .add_attribute("tx_id", id.to_string())
            .add_attribute("owner", info.sender)
            .add_attribute("to", tx.to)
            .add_attribute("value", tx.value))
    }
}

pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Transaction { tx_id } => Ok(to_binary(&query::transaction(deps, tx_id)?)?),
        QueryMsg::Approved { tx_id, owner } => {
            let owner = deps.api.addr_validate(&owner)?;
            Ok(to_binary(&query::approved(deps, tx_id, &owner)?)?)
        }
        QueryMsg::Owners {} => Ok(to_binary(&query::owners(deps)?)?),
        QueryMsg::Balance { denom } => Ok(to_binary(&query::balance(deps, env, denom)?)?),
        QueryMsg::TokenBalance { token } => {
            let token = deps.api.addr_validate(&token)?;
            Ok(to_binary(&query::token_balance(deps, env, &token)?)?)
        }
    }
}

mod query {
    use super::*;
    use crate::msg::{
        ApprovedResponse, BalanceResponse, OwnersResponse, TokenBalanceResponse,
        TransactionResponse,
    };
    use cw20::{BalanceResponse as Cw20BalanceResponse, Cw20QueryMsg};

    pub fn transaction(deps: Deps, id: u64) -> Result<TransactionResponse, ContractError> {
        let tx = TRANSACTIONS
            .may_load(deps.storage, id)?
            .ok_or(ContractError::TxNotFound { id })?;

        Ok(TransactionResponse {
            id,
            is_token_tx: tx.is_token_tx(),
            to: tx.to,
            value: tx.value,
            denom: tx.denom,
            executed: tx.executed,
            approvals: tx.approvals,
        })
    }

    pub fn approved(deps: Deps, id: u64, owner: &Addr) -> Result<ApprovedResponse, ContractError> {
        let approved = APPROVALS
            .may_load(deps.storage, (id, owner))?
            .unwrap_or(false);
        Ok(ApprovedResponse { approved })
    }

    pub fn owners(deps: Deps) -> Result<OwnersResponse, ContractError> {
        Ok(OwnersResponse {
            owners: OWNERS.load(deps.storage)?,
            required: REQUIRED.load(deps.storage)?,
        })
    }

    pub fn balance(deps: Deps, env: Env, denom: String) -> Result<BalanceResponse, ContractError> {
        let balance = deps.querier.query_balance(env.contract.address, denom)?;
        Ok(BalanceResponse { balance })
    }

    pub fn token_balance(
        deps: Deps,
        env: Env,
        token: &Addr,
    ) -> Result<TokenBalanceResponse, ContractError> {
        let resp: Cw20BalanceResponse = deps.querier.query_wasm_smart(
            token,
            &Cw20QueryMsg::Balance {
                address: env.contract.address.to_string(),
            },
        )?;
        Ok(TokenBalanceResponse {
            balance: resp.balance,
        })
    }
}
