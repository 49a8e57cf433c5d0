use cosmrs::cosmwasm::MsgExecuteContract;
use cosmrs::tendermint::chain::Id as ChainId;
use cosmrs::tx::{Body, Fee, Msg, SignDoc, SignerInfo};
use cosmrs::{AccountId, Coin};
use tracing::debug;

use crate::config::ChainConfig;
use crate::error::{RelayError, Result};
use crate::models::relay::{PriceRelayPayload, ReferenceExecuteMsg};
use crate::models::transaction::AccountInfo;
use crate::services::blockchain::wallet::WalletKey;

pub struct SigningManager;

impl SigningManager {
    /// `{"relay": payload}` addressed to the reference contract, no funds
    pub fn relay_msg(
        wallet: &WalletKey,
        contract: &AccountId,
        payload: &PriceRelayPayload,
    ) -> Result<MsgExecuteContract> {
        let msg = serde_json::to_vec(&ReferenceExecuteMsg::Relay(payload.clone()))
            .map_err(|e| sign_err("Failed to encode relay message", e))?;

        Ok(MsgExecuteContract {
            sender: wallet.address().clone(),
            contract: contract.clone(),
            msg,
            funds: vec![],
        })
    }

    /// Build and sign (SIGN_MODE_DIRECT) the relay transaction, returning
    /// the encoded `TxRaw` bytes ready for broadcast.
    pub fn sign_relay_tx(
        wallet: &WalletKey,
        chain: &ChainConfig,
        account: &AccountInfo,
        payload: &PriceRelayPayload,
    ) -> Result<Vec<u8>> {
        let contract: AccountId = chain
            .contract_address
            .parse()
            .map_err(|e| sign_err("Invalid contract address", e))?;
        let chain_id: ChainId = chain
            .chain_id
            .parse()
            .map_err(|e| sign_err("Invalid chain id", e))?;

        let message = Self::relay_msg(wallet, &contract, payload)?
            .to_any()
            .map_err(|e| sign_err("Failed to encode MsgExecuteContract", e))?;
        let body = Body::new(vec![message], "", 0u32);

        let fee_coin = Coin::new(chain.fee_amount(), &chain.fee_denom)
            .map_err(|e| sign_err("Invalid fee denom", e))?;
        let fee = Fee::from_amount_and_gas(fee_coin, chain.gas_limit);
        let auth_info = SignerInfo::single_direct(Some(wallet.public_key()), account.sequence)
            .auth_info(fee);

        let sign_doc = SignDoc::new(&body, &auth_info, &chain_id, account.account_number)
            .map_err(|e| sign_err("Failed to build sign doc", e))?;
        let raw = wallet.sign(sign_doc)?;

        debug!(
            "Transaction signed: account_number={} sequence={} gas={} fee={}{}",
            account.account_number,
            account.sequence,
            chain.gas_limit,
            chain.fee_amount(),
            chain.fee_denom
        );

        raw.to_bytes()
            .map_err(|e| sign_err("Failed to encode signed transaction", e))
    }
}

fn sign_err(context: &str, e: impl std::fmt::Display) -> RelayError {
    RelayError::SignOrBroadcast(format!("{}: {}", context, e))
}
