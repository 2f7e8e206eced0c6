use dashmap::DashMap;
use ledger_core::types::Token;
use ledger_core::units::{address_key, parse_address};
use ledger_core::{LedgerError, Result};
use ledger_db::models::DbToken;
use ledger_db::repositories::TokenRepository;
use ledger_db::DatabasePool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Read-mostly cache over the tokens table.
///
/// Staleness is bounded by the TTL; `invalidate` forces the next lookup to
/// reload. Never used for balance-sufficiency decisions.
pub struct TokenRegistry {
    db: Arc<DatabasePool>,
    ttl: Duration,
    by_id: DashMap<String, Token>,
    by_address: DashMap<String, Token>,
    refreshed_at: RwLock<Option<Instant>>,
}

impl TokenRegistry {
    pub fn new(db: Arc<DatabasePool>, ttl: Duration) -> Self {
        Self {
            db,
            ttl,
            by_id: DashMap::new(),
            by_address: DashMap::new(),
            refreshed_at: RwLock::new(None),
        }
    }

    /// Resolve a token by identifier or chain address. Address lookups are
    /// case-insensitive.
    pub async fn resolve(&self, ident: &str, require_active: bool) -> Result<Token> {
        self.ensure_fresh().await?;
        let token = self
            .lookup(ident)
            .ok_or_else(|| LedgerError::TokenNotFound(ident.to_string()))?;
        if require_active && !token.active {
            return Err(LedgerError::TokenInactive(token.id));
        }
        Ok(token)
    }

    fn lookup(&self, ident: &str) -> Option<Token> {
        if let Some(entry) = self.by_id.get(ident.trim()) {
            return Some(entry.clone());
        }
        let key = match parse_address(ident) {
            Ok(address) => address_key(address),
            Err(_) => return None,
        };
        self.by_address.get(&key).map(|entry| entry.clone())
    }

    /// Drop the cache; the next lookup reloads from the store.
    pub async fn invalidate(&self) {
        *self.refreshed_at.write().await = None;
    }

    async fn ensure_fresh(&self) -> Result<()> {
        {
            let stamp = self.refreshed_at.read().await;
            if let Some(at) = *stamp {
                if at.elapsed() < self.ttl {
                    return Ok(());
                }
            }
        }

        let mut stamp = self.refreshed_at.write().await;
        // another task may have refreshed while we waited for the lock
        if let Some(at) = *stamp {
            if at.elapsed() < self.ttl {
                return Ok(());
            }
        }

        let rows = TokenRepository::get_all(self.db.inner()).await?;
        self.by_id.clear();
        self.by_address.clear();
        for row in rows {
            let token = into_token(row)?;
            self.by_address
                .insert(address_key(token.address), token.clone());
            self.by_id.insert(token.id.clone(), token);
        }
        *stamp = Some(Instant::now());
        debug!(tokens = self.by_id.len(), "Token registry refreshed");
        Ok(())
    }
}

fn into_token(row: DbToken) -> Result<Token> {
    let address = parse_address(&row.address)
        .map_err(|_| LedgerError::Database(format!("malformed address for token {}", row.id)))?;
    Ok(Token {
        id: row.id,
        address,
        symbol: row.symbol,
        decimals: row.decimals.clamp(0, i16::from(u8::MAX)) as u8,
        min_deposit: row.min_deposit,
        active: row.active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_row_converts_with_normalized_address() {
        let row = DbToken {
            id: "boop".to_string(),
            address: "0xd8da6bf26964af9d7eed9e03e53415d37aa96045".to_string(),
            symbol: "BOOP".to_string(),
            decimals: 18,
            min_deposit: None,
            active: true,
            created_at: 0,
        };
        let token = into_token(row).unwrap();
        assert_eq!(token.decimals, 18);
        assert_eq!(
            address_key(token.address),
            "0xd8da6bf26964af9d7eed9e03e53415d37aa96045"
        );
    }

    #[test]
    fn malformed_address_row_is_an_infrastructure_error() {
        let row = DbToken {
            id: "bad".to_string(),
            address: "not-an-address".to_string(),
            symbol: "BAD".to_string(),
            decimals: 18,
            min_deposit: None,
            active: true,
            created_at: 0,
        };
        assert!(matches!(into_token(row), Err(LedgerError::Database(_))));
    }
}
