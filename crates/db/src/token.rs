use alloy_primitives::Address;
use idx_codec::{SmartContract, Token, TokenInstance, TokenMetadata, TokenTransfer, Uint256};
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, thiserror::Error)]
pub enum TokenSupplyError {
    #[error("token {address} not found for supply adjustment")]
    NotFound { address: String },
    #[error("supply decrease below zero for token {address}: supply={supply} decrease={decrease}")]
    NegativeSupply { address: String, supply: String, decrease: String },
    #[error(transparent)]
    Db(#[from] DbError),
}

#[derive(Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upserts the Token row seeded at smart-contract-deployment time
    /// (spec.md §4.5.5 step 1).
    pub async fn upsert_token(&self, address: Address, metadata: &TokenMetadata, total_supply: Uint256) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO token (address, name, symbol, decimals, total_supply, holder_count, fiat_value, circulation_market_cap)
            VALUES ($1, $2, $3, $4, $5, 0, NULL, NULL)
            ON CONFLICT (address) DO UPDATE SET
                name = EXCLUDED.name,
                symbol = EXCLUDED.symbol,
                decimals = EXCLUDED.decimals,
                total_supply = EXCLUDED.total_supply
            "#,
        )
        .bind(address.to_string())
        .bind(&metadata.name)
        .bind(&metadata.symbol)
        .bind(metadata.decimals.map(|d| d as i16))
        .bind(total_supply.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn upsert_smart_contract(&self, contract: &SmartContract) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO smart_contract (address, name, compiler_version, source_code, abi, verified_by_eth, evm_version)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (address) DO UPDATE SET
                name = EXCLUDED.name,
                source_code = EXCLUDED.source_code,
                verified_by_eth = EXCLUDED.verified_by_eth
            "#,
        )
        .bind(contract.address.to_string())
        .bind(&contract.name)
        .bind(&contract.compiler_version)
        .bind(&contract.source_code)
        .bind(&contract.abi)
        .bind(contract.verified_by_eth)
        .bind(&contract.evm_version)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// `ON CONFLICT DO UPDATE owner` — spec.md §4.5.5 step 2.
    pub async fn upsert_token_instance(&self, instance: &TokenInstance) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO token_instance (token_contract_address, token_id, owner_address)
            VALUES ($1, $2, $3)
            ON CONFLICT (token_contract_address, token_id) DO UPDATE SET
                owner_address = EXCLUDED.owner_address
            "#,
        )
        .bind(instance.token_contract_address.to_string())
        .bind(instance.token_id.to_string())
        .bind(instance.owner_address.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn insert_token_transfer(&self, transfer: &TokenTransfer) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO token_transfer (transaction_hash, log_index, from_address, to_address, token_contract_address, amount)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (transaction_hash, log_index) DO NOTHING
            "#,
        )
        .bind(transfer.transaction_hash.to_string())
        .bind(transfer.log_index as i32)
        .bind(transfer.from.to_string())
        .bind(transfer.to.to_string())
        .bind(transfer.token_contract_address.to_string())
        .bind(transfer.amount.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// `SELECT … FOR UPDATE` then `UPDATE`, inside one transaction
    /// (spec.md §4.5.5: "Supply adjustments … performed inside a
    /// row-locking DB transaction"). A decrease below zero is a fatal
    /// per-message error (spec.md §7 "Integrity violation").
    pub async fn adjust_supply(&self, address: Address, delta: SupplyDelta) -> Result<(), TokenSupplyError> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let row: Option<(String,)> = sqlx::query_as("SELECT total_supply FROM token WHERE address = $1 FOR UPDATE")
            .bind(address.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(DbError::from)?;

        let Some((current_raw,)) = row else {
            return Err(TokenSupplyError::NotFound { address: address.to_string() });
        };

        let current = Uint256::parse(&current_raw).map_err(|_| TokenSupplyError::NotFound { address: address.to_string() })?;

        let updated = match delta {
            SupplyDelta::Increase(amount) => current
                .checked_add(&amount)
                .ok_or_else(|| TokenSupplyError::NegativeSupply {
                    address: address.to_string(),
                    supply: current.to_string(),
                    decrease: amount.to_string(),
                })?,
            SupplyDelta::Decrease(amount) => current.checked_sub(&amount).ok_or_else(|| TokenSupplyError::NegativeSupply {
                address: address.to_string(),
                supply: current.to_string(),
                decrease: amount.to_string(),
            })?,
        };

        sqlx::query("UPDATE token SET total_supply = $1 WHERE address = $2")
            .bind(updated.to_string())
            .bind(address.to_string())
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum SupplyDelta {
    Increase(Uint256),
    Decrease(Uint256),
}
