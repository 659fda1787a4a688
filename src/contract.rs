use crate::permit::SECONDS_PER_DAY;
use crate::state::{Config, PermitState, CONFIG, GAMES, GAME_COUNT, PERMIT};
use crate::{
    error::ContractError,
    msg::{ExecuteMsg, InstantiateMsg, QueryMsg},
};
use cosmwasm_std::{
    ensure, to_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, Storage,
};
use cw2::{get_contract_version, set_contract_version};

const CONTRACT_NAME: &str = "crates.io:tic-tac-toe-escrow";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_COMMISSION: u64 = 5;

pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    // The version marker doubles as the "initialized" flag.
    ensure!(
        get_contract_version(deps.storage).is_err(),
        ContractError::AlreadyInitialized
    );
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let treasury = deps.api.addr_validate(&msg.treasury)?;
    ensure!(
        msg.permit_signer.len() == 65 && msg.permit_signer[0] == 0x04,
        ContractError::InvalidSigner
    );
    let commission = msg.commission.unwrap_or(DEFAULT_COMMISSION);
    ensure!(commission <= 100, ContractError::InvalidCommission(commission));

    CONFIG.save(
        deps.storage,
        &Config {
            admin: info.sender.clone(),
            treasury: treasury.clone(),
            permit_signer: msg.permit_signer,
        },
    )?;
    PERMIT.save(
        deps.storage,
        &PermitState {
            commission,
            nonce: 0,
            valid_days: 0,
            deadline: env.block.time,
        },
    )?;
    GAME_COUNT.save(deps.storage, &0)?;

    Ok(Response::default()
        .add_attribute("action", "instantiate")
        .add_attribute("admin", info.sender)
        .add_attribute("treasury", treasury)
        .add_attribute("commission", commission.to_string()))
}

pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateGame {
            days,
            hours,
            minutes,
            token,
        } => exec::create_game(deps, env, info, (days, hours, minutes), token),
        ExecuteMsg::JoinGame { id, token } => exec::join_game(deps, env, info, id, token),
        ExecuteMsg::Step { id, x, y } => exec::step(deps, env, info, id, x, y),
        ExecuteMsg::CheckGameTime { id } => exec::check_game_time(deps, env, id),
        ExecuteMsg::CancelGame { id } => exec::cancel_game(deps, env, info, id),
        ExecuteMsg::Withdraw { id } => exec::withdraw(deps, info, id),
        ExecuteMsg::SetCommission { value, signature } => {
            exec::set_commission(deps, env, info, value, signature)
        }
        ExecuteMsg::SetPermitValidDays { days } => {
            exec::set_permit_valid_days(deps, env, info, days)
        }
    }
}

/// Loads a game, failing for ids that were never assigned.
fn load_game(storage: &dyn Storage, id: u64) -> Result<crate::state::Game, ContractError> {
    GAMES
        .may_load(storage, id)?
        .ok_or(ContractError::GameNotFound { id })
}

mod exec {
    use super::*;
    use crate::{
        game::{Board, GameError, Outcome, Sign},
        msg::TokenBet,
        permit,
        state::{Game, GameState, Winner},
        stats,
    };
    use cosmwasm_std::{
        coins, Addr, BankMsg, CosmosMsg, StdError, StdResult, Uint128, Uint64, WasmMsg,
    };
    use cw20::{Cw20ExecuteMsg, Denom};
    use cw_utils::{nonpayable, one_coin};
    use std::{
        collections::hash_map::DefaultHasher,
        hash::{Hash, Hasher},
    };

    pub fn create_game(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        (days, hours, minutes): (u64, u64, u64),
        token: Option<TokenBet>,
    ) -> Result<Response, ContractError> {
        let waiting_time = waiting_time(days, hours, minutes)?;

        let (bet, denom) = match token {
            None => {
                let coin = one_coin(&info)?;
                (coin.amount, Denom::Native(coin.denom))
            }
            Some(TokenBet { address, amount }) => {
                nonpayable(&info)?;
                ensure!(!amount.is_zero(), ContractError::InvalidBet);
                (amount, Denom::Cw20(deps.api.addr_validate(&address)?))
            }
        };

        let config = CONFIG.load(deps.storage)?;
        let percent = PERMIT.load(deps.storage)?.commission;
        let commission = commission_of(bet, percent);
        let escrow = bet - commission;

        let messages = collect_stake(
            &denom,
            &info.sender,
            &env.contract.address,
            &config.treasury,
            escrow,
            commission,
        )?;

        let id = GAME_COUNT.may_load(deps.storage)?.unwrap_or_default();
        GAME_COUNT.save(deps.storage, &(id + 1))?;

        let game = Game {
            owner: info.sender.clone(),
            rival: None,
            state: GameState::Free,
            winner: Winner::None,
            owner_sign: Sign::Empty,
            board: Board::new(),
            bet,
            denom,
            waiting_time,
            last_active_time: env.block.time,
            owner_escrow: escrow,
            rival_escrow: Uint128::zero(),
            owner_withdrawn: false,
            rival_withdrawn: false,
        };
        GAMES.save(deps.storage, id, &game)?;

        Ok(Response::default()
            .add_messages(messages)
            .add_attribute("action", "create_game")
            .add_attribute("game_id", id.to_string())
            .add_attribute("owner", info.sender)
            .add_attribute("bet", bet)
            .add_attribute("commission", commission)
            .add_attribute("waiting_time", waiting_time.to_string()))
    }

    pub fn join_game(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        id: u64,
        token: Option<String>,
    ) -> Result<Response, ContractError> {
        let mut game = load_game(deps.storage, id)?;

        ensure!(
            game.state == GameState::Free,
            ContractError::GameNotFree { id }
        );
        ensure!(
            info.sender != game.owner,
            ContractError::CannotPlayWithYourself
        );

        match (&game.denom, token) {
            (Denom::Native(denom), None) => {
                let coin = one_coin(&info)?;
                ensure!(coin.denom == *denom, ContractError::WrongCurrency { id });
                ensure!(
                    coin.amount == game.bet,
                    ContractError::WrongBet {
                        expected: game.bet,
                        got: coin.amount,
                    }
                );
            }
            (Denom::Cw20(address), Some(token)) => {
                nonpayable(&info)?;
                let token = deps.api.addr_validate(&token)?;
                ensure!(token == *address, ContractError::WrongCurrency { id });
            }
            _ => return Err(ContractError::WrongCurrency { id }),
        }

        let config = CONFIG.load(deps.storage)?;
        let percent = PERMIT.load(deps.storage)?.commission;
        let commission = commission_of(game.bet, percent);
        let escrow = game.bet - commission;

        let messages = collect_stake(
            &game.denom,
            &info.sender,
            &env.contract.address,
            &config.treasury,
            escrow,
            commission,
        )?;

        game.owner_sign = owner_sign(id, &env, &info.sender);
        game.rival = Some(info.sender.clone());
        game.rival_escrow = escrow;
        game.state = GameState::Playing;
        game.last_active_time = env.block.time;
        GAMES.save(deps.storage, id, &game)?;

        Ok(Response::default()
            .add_messages(messages)
            .add_attribute("action", "join_game")
            .add_attribute("game_id", id.to_string())
            .add_attribute("rival", info.sender)
            .add_attribute("owner_sign", format!("{:?}", game.owner_sign))
            .add_attribute("commission", commission))
    }

    pub fn step(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        id: u64,
        x: u8,
        y: u8,
    ) -> Result<Response, ContractError> {
        let mut game = load_game(deps.storage, id)?;

        ensure!(
            game.state == GameState::Playing,
            ContractError::GameNotPlaying { id }
        );
        let sign = game.sign_of(&info.sender);
        ensure!(
            sign != Sign::Empty,
            ContractError::NotAParticipant {
                id,
                addr: info.sender.to_string(),
            }
        );
        ensure!(sign == game.board.turn(), GameError::NotYourMove);
        ensure!(env.block.time < game.deadline(), ContractError::MoveTimeOver);

        game.board.play(sign, x, y)?;
        game.last_active_time = env.block.time;

        if let Some(outcome) = game.board.outcome() {
            game.winner = match outcome {
                Outcome::Won(sign) => sign.into(),
                Outcome::Draw => Winner::Draw,
            };
            game.state = GameState::Finished;
            stats::record(deps.storage, &game)?;
        }
        GAMES.save(deps.storage, id, &game)?;

        Ok(Response::default()
            .add_attribute("action", "step")
            .add_attribute("game_id", id.to_string())
            .add_attribute("player", info.sender)
            .add_attribute("x", x.to_string())
            .add_attribute("y", y.to_string())
            .add_attribute("winner", format!("{:?}", game.winner)))
    }

    pub fn check_game_time(deps: DepsMut, env: Env, id: u64) -> Result<Response, ContractError> {
        let mut game = load_game(deps.storage, id)?;

        ensure!(
            game.state == GameState::Playing,
            ContractError::GameNotPlaying { id }
        );
        ensure!(
            env.block.time >= game.deadline(),
            ContractError::MoveTimeNotOver
        );

        // The side that was due to move forfeits.
        game.winner = game.board.turn().opposite().into();
        game.state = GameState::Finished;
        stats::record(deps.storage, &game)?;
        GAMES.save(deps.storage, id, &game)?;

        Ok(Response::default()
            .add_attribute("action", "check_game_time")
            .add_attribute("game_id", id.to_string())
            .add_attribute("winner", format!("{:?}", game.winner)))
    }

    pub fn cancel_game(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        id: u64,
    ) -> Result<Response, ContractError> {
        let mut game = load_game(deps.storage, id)?;

        ensure!(info.sender == game.owner, ContractError::Unauthorized);
        ensure!(
            game.state == GameState::Free,
            ContractError::GameNotFree { id }
        );
        ensure!(
            env.block.time >= game.deadline(),
            ContractError::WaitingTimeNotOver
        );

        game.winner = Winner::Cancelled;
        game.state = GameState::Finished;
        stats::record(deps.storage, &game)?;
        GAMES.save(deps.storage, id, &game)?;

        Ok(Response::default()
            .add_attribute("action", "cancel_game")
            .add_attribute("game_id", id.to_string()))
    }

    pub fn withdraw(deps: DepsMut, info: MessageInfo, id: u64) -> Result<Response, ContractError> {
        let mut game = load_game(deps.storage, id)?;

        ensure!(
            game.state == GameState::Finished,
            ContractError::GameNotFinished { id }
        );
        let amount = game.payout_for(&info.sender);
        ensure!(!amount.is_zero(), ContractError::NotEntitled);
        ensure!(
            !game.has_withdrawn(&info.sender),
            ContractError::AlreadyWithdrawn
        );

        // Saved before the transfer message runs.
        game.mark_withdrawn(&info.sender);
        GAMES.save(deps.storage, id, &game)?;

        Ok(Response::default()
            .add_message(payout(&game.denom, &info.sender, amount)?)
            .add_attribute("action", "withdraw")
            .add_attribute("game_id", id.to_string())
            .add_attribute("recipient", info.sender)
            .add_attribute("amount", amount))
    }

    pub fn set_commission(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        value: u64,
        signature: Binary,
    ) -> Result<Response, ContractError> {
        ensure!(value <= 100, ContractError::InvalidCommission(value));

        let permit = permit::consume(deps, &env, &info.sender, value, &signature)?;

        Ok(Response::default()
            .add_attribute("action", "set_commission")
            .add_attribute("participant", info.sender)
            .add_attribute("commission", permit.commission.to_string())
            .add_attribute("nonce", permit.nonce.to_string()))
    }

    pub fn set_permit_valid_days(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        days: u64,
    ) -> Result<Response, ContractError> {
        let config = CONFIG.load(deps.storage)?;
        ensure!(info.sender == config.admin, ContractError::Unauthorized);

        let window = Uint64::new(days)
            .checked_mul(Uint64::new(SECONDS_PER_DAY))
            .map_err(StdError::from)?;

        let permit = PERMIT.update(deps.storage, |mut permit| -> StdResult<_> {
            permit.valid_days = days;
            permit.deadline = env.block.time.plus_seconds(window.u64());
            Ok(permit)
        })?;

        Ok(Response::default()
            .add_attribute("action", "set_permit_valid_days")
            .add_attribute("days", days.to_string())
            .add_attribute("deadline", permit.deadline.seconds().to_string()))
    }

    fn waiting_time(days: u64, hours: u64, minutes: u64) -> StdResult<u64> {
        let total = Uint64::new(days)
            .checked_mul(Uint64::new(SECONDS_PER_DAY))?
            .checked_add(Uint64::new(hours).checked_mul(Uint64::new(3_600))?)?
            .checked_add(Uint64::new(minutes).checked_mul(Uint64::new(60))?)?;
        Ok(total.u64())
    }

    /// Commission on a single stake, truncated.
    fn commission_of(bet: Uint128, percent: u64) -> Uint128 {
        bet.multiply_ratio(percent, 100u64)
    }

    /// Moves a deposited stake into escrow and the commission to the treasury.
    ///
    /// Native coins already arrived with the call, so only the commission is
    /// forwarded. Tokens are pulled from the depositor's allowance.
    fn collect_stake(
        denom: &Denom,
        from: &Addr,
        contract: &Addr,
        treasury: &Addr,
        escrow: Uint128,
        commission: Uint128,
    ) -> StdResult<Vec<CosmosMsg>> {
        let mut messages = vec![];
        match denom {
            Denom::Native(denom) => {
                if !commission.is_zero() {
                    messages.push(
                        BankMsg::Send {
                            to_address: treasury.to_string(),
                            amount: coins(commission.u128(), denom),
                        }
                        .into(),
                    );
                }
            }
            Denom::Cw20(token) => {
                for (recipient, amount) in [(contract, escrow), (treasury, commission)] {
                    if amount.is_zero() {
                        continue;
                    }
                    messages.push(cw20_call(
                        token,
                        &Cw20ExecuteMsg::TransferFrom {
                            owner: from.to_string(),
                            recipient: recipient.to_string(),
                            amount,
                        },
                    )?);
                }
            }
        }
        Ok(messages)
    }

    fn payout(denom: &Denom, to: &Addr, amount: Uint128) -> StdResult<CosmosMsg> {
        match denom {
            Denom::Native(denom) => Ok(BankMsg::Send {
                to_address: to.to_string(),
                amount: coins(amount.u128(), denom),
            }
            .into()),
            Denom::Cw20(token) => cw20_call(
                token,
                &Cw20ExecuteMsg::Transfer {
                    recipient: to.to_string(),
                    amount,
                },
            ),
        }
    }

    fn cw20_call(token: &Addr, msg: &Cw20ExecuteMsg) -> StdResult<CosmosMsg> {
        Ok(WasmMsg::Execute {
            contract_addr: token.to_string(),
            msg: to_binary(msg)?,
            funds: vec![],
        }
        .into())
    }

    /// Picks the owner's sign for a freshly joined game.
    ///
    /// The lowest bit of a hash over the game id, the block and the rival
    /// decides: set means the owner plays cross. Neither player can choose it.
    fn owner_sign(id: u64, env: &Env, rival: &Addr) -> Sign {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        env.block.height.hash(&mut hasher);
        env.block.time.nanos().hash(&mut hasher);
        rival.as_str().hash(&mut hasher);

        if hasher.finish() & 1 == 1 {
            Sign::Cross
        } else {
            Sign::Zero
        }
    }

}

pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Game { id } => Ok(to_binary(&query::game(deps, id)?)?),
        QueryMsg::Cell { id } => Ok(to_binary(&query::cell(deps, id)?)?),
        QueryMsg::FreeGames {} => Ok(to_binary(&query::free_games(deps)?)?),
        QueryMsg::Sign { id, address } => {
            let addr = deps.api.addr_validate(&address)?;
            Ok(to_binary(&query::sign(deps, id, &addr)?)?)
        }
        QueryMsg::NextMove { id } => Ok(to_binary(&query::next_move(deps, id)?)?),
        QueryMsg::StatisticByAddress { address } => {
            let addr = deps.api.addr_validate(&address)?;
            Ok(to_binary(&query::statistic_by_address(deps, &addr)?)?)
        }
        QueryMsg::CrossGameStatistic {} => {
            Ok(to_binary(&query::global_statistic(deps, |s| s.cross_wins)?)?)
        }
        QueryMsg::ZeroGameStatistic {} => {
            Ok(to_binary(&query::global_statistic(deps, |s| s.zero_wins)?)?)
        }
        QueryMsg::DrawGameStatistic {} => {
            Ok(to_binary(&query::global_statistic(deps, |s| s.draws)?)?)
        }
        QueryMsg::Config {} => Ok(to_binary(&query::config(deps)?)?),
        QueryMsg::PermitDeadline {} => Ok(to_binary(&query::permit_deadline(deps)?)?),
    }
}

mod query {
    use super::*;
    use crate::msg::{
        CellResponse, ConfigResponse, FreeGamesResponse, GameResponse, NextMoveResponse,
        PermitDeadlineResponse, SignResponse, StatisticResponse,
    };
    use crate::state::GameState;
    use crate::stats::{self, GlobalStats};
    use cosmwasm_std::{Addr, Order, StdResult};

    pub fn game(deps: Deps, id: u64) -> Result<GameResponse, ContractError> {
        Ok(GameResponse::new(id, load_game(deps.storage, id)?))
    }

    pub fn cell(deps: Deps, id: u64) -> Result<CellResponse, ContractError> {
        let game = load_game(deps.storage, id)?;
        Ok(CellResponse {
            cells: *game.board.cells(),
        })
    }

    pub fn free_games(deps: Deps) -> Result<FreeGamesResponse, ContractError> {
        let games: StdResult<Vec<_>> = GAMES
            .range(deps.storage, None, None, Order::Ascending)
            .filter(|item| {
                item.as_ref()
                    .map_or(true, |(_, game)| game.state == GameState::Free)
            })
            .map(|item| {
                let (id, game) = item?;
                Ok(GameResponse::new(id, game))
            })
            .collect();

        Ok(FreeGamesResponse { games: games? })
    }

    pub fn sign(deps: Deps, id: u64, addr: &Addr) -> Result<SignResponse, ContractError> {
        let game = load_game(deps.storage, id)?;
        Ok(SignResponse {
            sign: game.sign_of(addr),
        })
    }

    pub fn next_move(deps: Deps, id: u64) -> Result<NextMoveResponse, ContractError> {
        let game = load_game(deps.storage, id)?;
        ensure!(
            game.state == GameState::Playing,
            ContractError::GameNotPlaying { id }
        );

        let sign = game.board.turn();
        let address = game
            .addr_of(sign)
            .cloned()
            .ok_or(ContractError::GameNotPlaying { id })?;
        Ok(NextMoveResponse {
            address,
            sign,
            deadline: game.deadline(),
        })
    }

    pub fn statistic_by_address(deps: Deps, addr: &Addr) -> Result<StatisticResponse, ContractError> {
        let player = stats::load_player(deps.storage, addr)?;
        Ok(StatisticResponse {
            percent: stats::percent(player.wins, player.total_played),
        })
    }

    pub fn global_statistic(
        deps: Deps,
        count: impl Fn(&GlobalStats) -> u64,
    ) -> Result<StatisticResponse, ContractError> {
        let global = stats::load_global(deps.storage)?;
        Ok(StatisticResponse {
            percent: stats::percent(count(&global), global.total_finished),
        })
    }

    pub fn config(deps: Deps) -> Result<ConfigResponse, ContractError> {
        let config = CONFIG.load(deps.storage)?;
        let permit = PERMIT.load(deps.storage)?;
        Ok(ConfigResponse {
            admin: config.admin,
            treasury: config.treasury,
            permit_signer: config.permit_signer,
            commission: permit.commission,
            nonce: permit.nonce,
            permit_valid_days: permit.valid_days,
        })
    }

    pub fn permit_deadline(deps: Deps) -> Result<PermitDeadlineResponse, ContractError> {
        let permit = PERMIT.load(deps.storage)?;
        Ok(PermitDeadlineResponse {
            deadline: permit.deadline,
        })
    }
}
