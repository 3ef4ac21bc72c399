use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use ethers::prelude::*;
use ethers::utils::to_checksum;
use log::info;

use crate::domain::{AuthorizationReceipt, NormalizedAmount, ResolvedAsset};
use crate::execution::errors::FlowError;
use crate::logging::log_approval;

abigen!(
    Erc20Approval,
    r#"[
        function approve(address spender, uint256 value) returns (bool)
    ]"#
);

/// On-chain calls the order flow needs.
///
/// An invoker is bound to one wallet: every transaction it sends is signed by that wallet, so the
/// owner is never passed per call.
#[async_trait]
pub trait ContractInvoker: Send + Sync {
    /// Sends `approve(spender, value)` on `token` and returns once the chain confirmed it.
    async fn approve(&self, token: Address, spender: Address, value: U256) -> Result<H256>;
}

// ===============================
// ETHERS INVOKER
// ===============================

pub struct EthersContractInvoker<M> {
    client: Arc<M>,
    confirmations: usize,
}

impl<M: Middleware + 'static> EthersContractInvoker<M> {
    pub fn new(client: Arc<M>, confirmations: usize) -> Self {
        Self {
            client,
            confirmations: confirmations.max(1),
        }
    }
}

#[async_trait]
impl<M: Middleware + 'static> ContractInvoker for EthersContractInvoker<M> {
    async fn approve(&self, token: Address, spender: Address, value: U256) -> Result<H256> {
        let contract = Erc20Approval::new(token, self.client.clone());
        let call = contract.approve(spender, value);

        let pending = call
            .send()
            .await
            .with_context(|| format!("approve on {:?} was rejected", token))?;
        let tx_hash = pending.tx_hash();

        let receipt = pending
            .confirmations(self.confirmations)
            .await
            .with_context(|| format!("waiting for approve {:?} failed", tx_hash))?
            .ok_or_else(|| anyhow!("approve {:?} dropped before confirmation", tx_hash))?;

        if receipt.status != Some(U64::from(1)) {
            bail!("approve {:?} reverted", tx_hash);
        }

        Ok(tx_hash)
    }
}

// ===============================
// AUTHORIZER
// ===============================

/// Lets the venue relayer pull the sell amount out of the wallet.
pub struct Authorizer {
    invoker: Arc<dyn ContractInvoker>,
    spender: Address,
}

impl Authorizer {
    pub fn new(invoker: Arc<dyn ContractInvoker>, spender: Address) -> Self {
        Self { invoker, spender }
    }

    /// Blocks until the approval is confirmed. The allowance is not undone if a later step fails.
    pub async fn authorize(
        &self,
        token: &ResolvedAsset,
        amount: &NormalizedAmount,
    ) -> Result<AuthorizationReceipt, FlowError> {
        log_approval(
            &to_checksum(&token.contract_address, None),
            &to_checksum(&self.spender, None),
            &amount.to_string(),
        );

        let tx_hash = self
            .invoker
            .approve(token.contract_address, self.spender, amount.as_u256())
            .await
            .map_err(|e| FlowError::AuthorizationFailed(format!("{:#}", e)))?;

        info!("✅ Allowance confirmed for {} (tx {:?})", token.asset_id, tx_hash);

        Ok(AuthorizationReceipt {
            token: token.contract_address,
            spender: self.spender,
            amount: *amount,
            tx_hash,
        })
    }

    /// Sets the relayer allowance on `token` back to zero.
    pub async fn revoke(&self, token: &ResolvedAsset) -> Result<H256, FlowError> {
        info!("↩️ Revoking relayer allowance on {}", token.asset_id);

        self.invoker
            .approve(token.contract_address, self.spender, U256::zero())
            .await
            .map_err(|e| FlowError::AuthorizationFailed(format!("{:#}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::errors::FlowErrorKind;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingInvoker {
        calls: Mutex<Vec<(Address, Address, U256)>>,
        reject: bool,
    }

    #[async_trait]
    impl ContractInvoker for RecordingInvoker {
        async fn approve(&self, token: Address, spender: Address, value: U256) -> Result<H256> {
            self.calls.lock().unwrap().push((token, spender, value));
            if self.reject {
                bail!("execution reverted");
            }
            Ok(H256::repeat_byte(0xab))
        }
    }

    fn weth() -> ResolvedAsset {
        ResolvedAsset {
            asset_id: "eth".into(),
            contract_address: "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1".parse().unwrap(),
            decimal_precision: 18,
        }
    }

    fn relayer() -> Address {
        "0xC92E8bdf79f0507f65a392b0ab4667716BFE0110".parse().unwrap()
    }

    #[tokio::test]
    async fn approves_exact_amount_for_relayer() {
        let invoker = Arc::new(RecordingInvoker::default());
        let authorizer = Authorizer::new(invoker.clone(), relayer());
        let amount = NormalizedAmount::new(U256::exp10(18));

        let receipt = authorizer.authorize(&weth(), &amount).await.unwrap();

        assert_eq!(receipt.spender, relayer());
        assert_eq!(receipt.amount, amount);
        assert_eq!(receipt.tx_hash, H256::repeat_byte(0xab));
        assert_eq!(
            *invoker.calls.lock().unwrap(),
            vec![(weth().contract_address, relayer(), U256::exp10(18))]
        );
    }

    #[tokio::test]
    async fn rejected_approval_is_authorization_failure() {
        let invoker = Arc::new(RecordingInvoker {
            reject: true,
            ..Default::default()
        });
        let authorizer = Authorizer::new(invoker, relayer());

        let err = authorizer
            .authorize(&weth(), &NormalizedAmount::new(U256::one()))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FlowErrorKind::AuthorizationFailed);
        assert!(err.to_string().contains("execution reverted"));
    }

    #[tokio::test]
    async fn revoke_approves_zero() {
        let invoker = Arc::new(RecordingInvoker::default());
        let authorizer = Authorizer::new(invoker.clone(), relayer());

        authorizer.revoke(&weth()).await.unwrap();

        assert_eq!(invoker.calls.lock().unwrap()[0].2, U256::zero());
    }
}
