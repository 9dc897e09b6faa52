use idx_codec::{SmartContract, TokenEvent, TokenInstance, TokenTransfer};
use idx_db::{Repositories, SupplyDelta};

use crate::{MessageProcessor, ProcessorError};

/// spec.md §4.5.5: no key-schema entry covers `token_event` (the
/// spec's "Key schema" table only names block/transaction parents),
/// so there is no referential wait here — TokenProcessor runs purely
/// off the TokenEvent payload, grounded on
/// `original_source/core/internal/api/service/token_processor.go`'s
/// three-branch `Process`.
pub struct TokenProcessor {
    repos: Repositories,
}

impl TokenProcessor {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }
}

#[async_trait::async_trait]
impl MessageProcessor for TokenProcessor {
    async fn process(&self, payload: &[u8]) -> Result<(), ProcessorError> {
        let event: TokenEvent = serde_json::from_slice(payload)?;

        if event.smart_contract_deployed {
            // Step 1: seed the Token and SmartContract rows from the
            // deploying transfer's metadata/value.
            self.repos.token.upsert_token(event.address, &event.metadata, event.value).await?;
            let contract = SmartContract {
                address: event.address,
                name: event.metadata.name.clone(),
                compiler_version: None,
                source_code: None,
                abi: event.metadata.bytecode.as_ref().map(hex::encode),
                verified_by_eth: false,
                evm_version: None,
            };
            self.repos.token.upsert_smart_contract(&contract).await?;
        } else if event.is_mint {
            self.repos.token.adjust_supply(event.address, SupplyDelta::Increase(event.value)).await?;
        } else if event.is_burn {
            self.repos.token.adjust_supply(event.address, SupplyDelta::Decrease(event.value)).await?;
        }

        // Step 2: a non-zero token_id means this is an ERC-721/1155
        // transfer, so the instance's owner moves to `to`.
        if !event.token_id.is_zero() {
            let instance = TokenInstance {
                token_contract_address: event.address,
                token_id: event.token_id,
                owner_address: event.to,
            };
            self.repos.token.upsert_token_instance(&instance).await?;
        }

        // Step 3: always record the transfer itself.
        let transfer = TokenTransfer {
            transaction_hash: event.transaction_hash,
            log_index: event.log_index,
            from: event.from,
            to: event.to,
            token_contract_address: event.address,
            amount: event.value,
        };
        self.repos.token.insert_token_transfer(&transfer).await?;

        Ok(())
    }
}
