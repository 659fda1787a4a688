//! Signed, nonce-bound authorization for changing the commission.
//!
//! The signer signs the sha256 digest of a domain-separated `Permit`
//! message. The verifier rebuilds every field itself: the participant is the
//! caller, the nonce and deadline come from storage. Each accepted permit
//! advances the nonce, so a signature can be used only once.

use cosmwasm_std::{Addr, Api, DepsMut, Env};
use sha2::{Digest, Sha256};

use crate::error::ContractError;
use crate::state::{PermitState, CONFIG, PERMIT};

pub const DOMAIN_NAME: &str = "TicTacToe";
pub const SECONDS_PER_DAY: u64 = 86_400;

const DOMAIN_TYPE: &[u8] = b"Domain(string name,string chainId,address verifyingContract)";
const PERMIT_TYPE: &[u8] =
    b"Permit(address participant,uint256 value,uint256 nonce,uint256 deadline)";

fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Binds a permit to one contract on one chain.
pub struct Domain<'a> {
    pub name: &'a str,
    pub chain_id: &'a str,
    pub verifying_contract: &'a Addr,
}

impl<'a> Domain<'a> {
    pub fn new(env: &'a Env) -> Self {
        Domain {
            name: DOMAIN_NAME,
            chain_id: &env.block.chain_id,
            verifying_contract: &env.contract.address,
        }
    }

    pub fn separator(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(sha256(DOMAIN_TYPE));
        hasher.update(sha256(self.name.as_bytes()));
        hasher.update(sha256(self.chain_id.as_bytes()));
        hasher.update(sha256(self.verifying_contract.as_bytes()));
        hasher.finalize().into()
    }
}

pub struct Permit<'a> {
    pub participant: &'a Addr,
    pub value: u64,
    pub nonce: u64,
    /// Unix seconds.
    pub deadline: u64,
}

impl Permit<'_> {
    fn struct_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(sha256(PERMIT_TYPE));
        hasher.update(sha256(self.participant.as_bytes()));
        hasher.update(self.value.to_be_bytes());
        hasher.update(self.nonce.to_be_bytes());
        hasher.update(self.deadline.to_be_bytes());
        hasher.finalize().into()
    }

    /// The 32 bytes the signer signs.
    pub fn digest(&self, domain: &Domain) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update([0x19, 0x01]);
        hasher.update(domain.separator());
        hasher.update(self.struct_hash());
        hasher.finalize().into()
    }
}

/// Checks that a 65 byte `r || s || v` signature over `digest` recovers to `signer`.
pub fn verify_signature(
    api: &dyn Api,
    digest: &[u8; 32],
    signature: &[u8],
    signer: &[u8],
) -> Result<(), ContractError> {
    if signature.len() != 65 {
        return Err(ContractError::NoPermission);
    }
    let recovery_param = match signature[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        _ => return Err(ContractError::NoPermission),
    };

    let recovered = api
        .secp256k1_recover_pubkey(digest, &signature[..64], recovery_param)
        .map_err(|_| ContractError::NoPermission)?;

    if recovered != signer {
        return Err(ContractError::NoPermission);
    }
    Ok(())
}

/// Validates a commission-change permit from `participant` and consumes its nonce.
pub fn consume(
    deps: DepsMut,
    env: &Env,
    participant: &Addr,
    value: u64,
    signature: &[u8],
) -> Result<PermitState, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut permit = PERMIT.load(deps.storage)?;

    if env.block.time > permit.deadline {
        return Err(ContractError::PermitExpired);
    }

    let message = Permit {
        participant,
        value,
        nonce: permit.nonce,
        deadline: permit.deadline.seconds(),
    };
    let digest = message.digest(&Domain::new(env));
    verify_signature(deps.api, &digest, signature, &config.permit_signer)?;

    permit.nonce += 1;
    permit.commission = value;
    PERMIT.save(deps.storage, &permit)?;
    Ok(permit)
}
