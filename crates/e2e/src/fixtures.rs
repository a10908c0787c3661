//! Test fixture accounts
//!
//! Scenarios run against real accounts on the hosted app, so each scenario
//! leases one account exclusively and returns it when it ends. Parallel
//! scenarios block on an empty pool instead of sharing credentials state.
//!
//! Credentials are never baked into source: TODOFLOW_ACCOUNTS holds a
//! comma-separated list of account emails, TODOFLOW_PASSWORD the shared
//! password.

use std::ops::Deref;
use std::sync::{Arc, Mutex};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

use crate::error::{SuiteError, SuiteResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub email: String,
    pub password: String,
}

/// A pool of fixture accounts handing out exclusive leases.
pub struct AccountPool {
    available: Arc<Mutex<Vec<Account>>>,
    slots: Arc<Semaphore>,
}

impl AccountPool {
    pub fn new(accounts: Vec<Account>) -> SuiteResult<Self> {
        if accounts.is_empty() {
            return Err(SuiteError::MissingCredentials(
                "account pool is empty".to_string(),
            ));
        }
        let slots = Arc::new(Semaphore::new(accounts.len()));
        Ok(Self {
            available: Arc::new(Mutex::new(accounts)),
            slots,
        })
    }

    /// Build the pool from TODOFLOW_ACCOUNTS and TODOFLOW_PASSWORD.
    pub fn from_env() -> SuiteResult<Self> {
        let emails = std::env::var("TODOFLOW_ACCOUNTS").map_err(|_| {
            SuiteError::MissingCredentials(
                "TODOFLOW_ACCOUNTS is not set (comma-separated account emails)".to_string(),
            )
        })?;
        let password = std::env::var("TODOFLOW_PASSWORD").map_err(|_| {
            SuiteError::MissingCredentials("TODOFLOW_PASSWORD is not set".to_string())
        })?;
        Self::new(parse_accounts(&emails, &password)?)
    }

    pub fn len(&self) -> usize {
        self.slots.available_permits()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lease an account, waiting until one is free.
    pub async fn lease(&self) -> AccountLease {
        let permit = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .expect("account pool semaphore closed");
        let account = self
            .available
            .lock()
            .expect("account pool lock poisoned")
            .pop()
            .expect("semaphore permit issued for an empty pool");
        debug!("Leased account {}", account.email);
        AccountLease {
            account,
            available: Arc::clone(&self.available),
            _permit: permit,
        }
    }
}

/// Exclusive hold on one account; returns it to the pool on drop.
pub struct AccountLease {
    account: Account,
    available: Arc<Mutex<Vec<Account>>>,
    _permit: OwnedSemaphorePermit,
}

impl Deref for AccountLease {
    type Target = Account;

    fn deref(&self) -> &Account {
        &self.account
    }
}

impl Drop for AccountLease {
    fn drop(&mut self) {
        debug!("Returning account {}", self.account.email);
        if let Ok(mut available) = self.available.lock() {
            available.push(self.account.clone());
        }
        // The permit field drops after this body, once the account is back.
    }
}

fn parse_accounts(emails: &str, password: &str) -> SuiteResult<Vec<Account>> {
    let accounts: Vec<Account> = emails
        .split(',')
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(|email| Account {
            email: email.to_string(),
            password: password.to_string(),
        })
        .collect();

    if accounts.is_empty() {
        return Err(SuiteError::MissingCredentials(
            "TODOFLOW_ACCOUNTS contains no account emails".to_string(),
        ));
    }
    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_accounts(n: usize) -> Vec<Account> {
        (0..n)
            .map(|i| Account {
                email: format!("fixture{}@example.com", i),
                password: "secret".to_string(),
            })
            .collect()
    }

    #[test]
    fn parses_comma_separated_emails() {
        let accounts =
            parse_accounts(" a@example.com, b@example.com ,,c@example.com ", "pw").unwrap();
        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[0].email, "a@example.com");
        assert_eq!(accounts[2].email, "c@example.com");
        assert!(accounts.iter().all(|a| a.password == "pw"));
    }

    #[test]
    fn rejects_blank_account_list() {
        assert!(matches!(
            parse_accounts(" , ", "pw"),
            Err(SuiteError::MissingCredentials(_))
        ));
    }

    #[test]
    fn rejects_empty_pool() {
        assert!(matches!(
            AccountPool::new(vec![]),
            Err(SuiteError::MissingCredentials(_))
        ));
    }

    #[tokio::test]
    async fn leases_are_distinct() {
        let pool = AccountPool::new(test_accounts(3)).unwrap();
        let a = pool.lease().await;
        let b = pool.lease().await;
        let c = pool.lease().await;
        assert_ne!(a.email, b.email);
        assert_ne!(b.email, c.email);
        assert_ne!(a.email, c.email);
        assert!(pool.is_empty());
    }

    #[tokio::test]
    async fn lease_blocks_until_an_account_returns() {
        let pool = AccountPool::new(test_accounts(1)).unwrap();
        let first = pool.lease().await;

        // Pool exhausted: a second lease must not resolve yet.
        let pending = tokio::time::timeout(Duration::from_millis(50), pool.lease()).await;
        assert!(pending.is_err());

        let leased_email = first.email.clone();
        drop(first);

        let second = tokio::time::timeout(Duration::from_millis(500), pool.lease())
            .await
            .expect("lease should resolve after return");
        assert_eq!(second.email, leased_email);
    }

    #[tokio::test]
    async fn dropped_lease_restores_pool_size() {
        let pool = AccountPool::new(test_accounts(2)).unwrap();
        {
            let _a = pool.lease().await;
            let _b = pool.lease().await;
            assert_eq!(pool.len(), 0);
        }
        assert_eq!(pool.len(), 2);
    }
}
