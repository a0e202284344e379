//! In-memory port implementations and app assembly for handler tests.
//!
//! The in-memory stores honour the same contracts as the Diesel adapters:
//! descending orderings, half-open windows, unique email, and transaction
//! to user referential integrity.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::{web, App};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::ports::{
    AuditSink, AuditSinkError, Credential, CredentialStore, StoreError, TransactionStore,
    UserStore,
};
use crate::domain::{
    hash_password, AuditEvent, AuthenticatedUser, CredentialLoginService, NewTransaction,
    NewUserProfile, Role, Transaction, TransactionPatch, UserPatch, UserProfile,
};

use super::state::HttpState;
use super::token::{AuthConfig, TokenCodec};

#[derive(Default)]
struct UserRows {
    rows: Vec<UserProfile>,
    next_id: i64,
}

/// In-memory [`UserStore`] mirroring the Diesel adapter's semantics.
#[derive(Default)]
pub struct InMemoryUserStore {
    state: Mutex<UserRows>,
}

impl InMemoryUserStore {
    fn insert(&self, draft: &NewUserProfile) -> Result<i64, StoreError> {
        let mut state = self.state.lock().expect("user store lock");
        if state.rows.iter().any(|row| row.email == draft.email()) {
            return Err(StoreError::unique_violation("email"));
        }
        state.next_id += 1;
        let id = state.next_id;
        state.rows.push(UserProfile {
            id,
            name: draft.name().to_owned(),
            email: draft.email().to_owned(),
            monthly_income: draft.monthly_income(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn contains(&self, id: i64) -> bool {
        self.state
            .lock()
            .expect("user store lock")
            .rows
            .iter()
            .any(|row| row.id == id)
    }

    fn count(&self) -> usize {
        self.state.lock().expect("user store lock").rows.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list(&self) -> Result<Vec<UserProfile>, StoreError> {
        let mut rows = self.state.lock().expect("user store lock").rows.clone();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<UserProfile>, StoreError> {
        Ok(self
            .state
            .lock()
            .expect("user store lock")
            .rows
            .iter()
            .find(|row| row.id == id)
            .cloned())
    }

    async fn create(&self, draft: &NewUserProfile) -> Result<i64, StoreError> {
        self.insert(draft)
    }

    async fn update(&self, id: i64, patch: &UserPatch) -> Result<bool, StoreError> {
        let mut state = self.state.lock().expect("user store lock");
        let Some(row) = state.rows.iter_mut().find(|row| row.id == id) else {
            return Ok(false);
        };
        if let Some(name) = patch.name() {
            row.name = name.to_owned();
        }
        if let Some(email) = patch.email() {
            row.email = email.to_owned();
        }
        if let Some(income) = patch.monthly_income() {
            row.monthly_income = income;
        }
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut state = self.state.lock().expect("user store lock");
        let before = state.rows.len();
        state.rows.retain(|row| row.id != id);
        Ok(state.rows.len() < before)
    }
}

#[derive(Default)]
struct TransactionRows {
    rows: Vec<Transaction>,
    next_id: i64,
}

/// In-memory [`TransactionStore`] mirroring the Diesel adapter's semantics.
pub struct InMemoryTransactionStore {
    state: Mutex<TransactionRows>,
    users: Arc<InMemoryUserStore>,
}

impl InMemoryTransactionStore {
    fn new(users: Arc<InMemoryUserStore>) -> Self {
        Self {
            state: Mutex::new(TransactionRows::default()),
            users,
        }
    }

    fn insert(&self, draft: &NewTransaction) -> Result<i64, StoreError> {
        if !self.users.contains(draft.user_id()) {
            return Err(StoreError::foreign_key_violation("user"));
        }
        let mut state = self.state.lock().expect("transaction store lock");
        state.next_id += 1;
        let id = state.next_id;
        state.rows.push(Transaction {
            id,
            user_id: draft.user_id(),
            operator: draft.operator().to_owned(),
            kind: draft.kind(),
            amount: draft.amount(),
            occurred_at: draft.occurred_at(),
            raw_label: draft.raw_label().map(str::to_owned),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn count(&self) -> usize {
        self.state.lock().expect("transaction store lock").rows.len()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn list_by_user(
        &self,
        user_id: i64,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut rows: Vec<Transaction> = self
            .state
            .lock()
            .expect("transaction store lock")
            .rows
            .iter()
            .filter(|tx| tx.user_id == user_id)
            .filter(|tx| from.is_none_or(|from| tx.occurred_at >= from))
            .filter(|tx| to.is_none_or(|to| tx.occurred_at < to))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<Transaction>, StoreError> {
        Ok(self
            .state
            .lock()
            .expect("transaction store lock")
            .rows
            .iter()
            .find(|tx| tx.id == id)
            .cloned())
    }

    async fn create(&self, draft: &NewTransaction) -> Result<i64, StoreError> {
        self.insert(draft)
    }

    async fn update(&self, id: i64, patch: &TransactionPatch) -> Result<bool, StoreError> {
        let mut state = self.state.lock().expect("transaction store lock");
        let Some(row) = state.rows.iter_mut().find(|tx| tx.id == id) else {
            return Ok(false);
        };
        if let Some(operator) = patch.operator() {
            row.operator = operator.to_owned();
        }
        if let Some(kind) = patch.kind() {
            row.kind = kind;
        }
        if let Some(amount) = patch.amount() {
            row.amount = amount;
        }
        if let Some(occurred_at) = patch.occurred_at() {
            row.occurred_at = occurred_at;
        }
        if let Some(raw_label) = patch.raw_label() {
            row.raw_label = Some(raw_label.to_owned());
        }
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut state = self.state.lock().expect("transaction store lock");
        let before = state.rows.len();
        state.rows.retain(|tx| tx.id != id);
        Ok(state.rows.len() < before)
    }
}

/// In-memory [`CredentialStore`] seeded with one admin and one viewer.
pub struct InMemoryCredentialStore {
    records: Vec<Credential>,
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        Ok(self
            .records
            .iter()
            .find(|record| record.username == username)
            .cloned())
    }
}

/// Audit sink capturing lines and snapshots, optionally failing every
/// write.
#[derive(Default)]
pub struct RecordingAuditSink {
    lines: Mutex<Vec<String>>,
    snapshots: Mutex<Vec<serde_json::Value>>,
    fail: AtomicBool,
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn record(&self, event: &AuditEvent) -> Result<(), AuditSinkError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(AuditSinkError::io("sink unavailable"));
        }
        self.lines
            .lock()
            .expect("audit lock")
            .push(event.to_string());
        Ok(())
    }

    async fn snapshot(&self, payload: &serde_json::Value) -> Result<(), AuditSinkError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(AuditSinkError::io("sink unavailable"));
        }
        self.snapshots
            .lock()
            .expect("audit lock")
            .push(payload.clone());
        Ok(())
    }
}

/// Everything a handler test needs: seeded ports, codec, and state.
pub struct TestContext {
    users: Arc<InMemoryUserStore>,
    transactions: Arc<InMemoryTransactionStore>,
    audit: Arc<RecordingAuditSink>,
    pub codec: TokenCodec,
    pub state: HttpState,
}

impl TestContext {
    /// Fresh context with working audit.
    pub fn new() -> Self {
        Self::build(false)
    }

    /// Fresh context whose audit sink fails every write.
    pub fn with_failing_audit() -> Self {
        Self::build(true)
    }

    fn build(failing_audit: bool) -> Self {
        let users = Arc::new(InMemoryUserStore::default());
        let transactions = Arc::new(InMemoryTransactionStore::new(Arc::clone(&users)));
        let audit = Arc::new(RecordingAuditSink::default());
        audit.fail.store(failing_audit, Ordering::Relaxed);
        let credentials = Arc::new(InMemoryCredentialStore {
            records: vec![
                Credential {
                    user_id: 1,
                    username: "admin".into(),
                    password_hash: hash_password("admin-password"),
                    role: "admin".into(),
                },
                Credential {
                    user_id: 2,
                    username: "viewer".into(),
                    password_hash: hash_password("viewer-password"),
                    role: "user".into(),
                },
            ],
        });
        let codec = TokenCodec::new(&AuthConfig {
            secret: "handler-test-secret-with-enough-length".into(),
            issuer: "ledger-backend".into(),
            audience: "ledger-clients".into(),
            expiry_minutes: 60,
        });
        let state = HttpState::new(
            Arc::clone(&users) as Arc<dyn UserStore>,
            Arc::clone(&transactions) as Arc<dyn TransactionStore>,
            Arc::new(CredentialLoginService::new(credentials)),
            Arc::clone(&audit) as Arc<dyn AuditSink>,
        );
        Self {
            users,
            transactions,
            audit,
            codec,
            state,
        }
    }

    /// Token for an admin principal.
    pub fn admin_token(&self) -> String {
        self.token(Role::Admin)
    }

    /// Token for a non-admin principal.
    pub fn user_token(&self) -> String {
        self.token(Role::User)
    }

    fn token(&self, role: Role) -> String {
        self.codec
            .issue(&AuthenticatedUser {
                user_id: 1,
                username: "tester".into(),
                role,
            })
            .expect("issue test token")
    }

    /// Seed a user profile directly in the store.
    pub fn seed_user(&self, name: &str, email: &str, income: Decimal) -> i64 {
        let draft = NewUserProfile::new(name, email, income).expect("valid seed user");
        self.users.insert(&draft).expect("seed user")
    }

    /// Seed a transaction directly in the store.
    pub fn seed_transaction(
        &self,
        user_id: i64,
        operator: &str,
        kind: &str,
        amount: Decimal,
        occurred_at: &str,
    ) -> i64 {
        let occurred_at = DateTime::parse_from_rfc3339(occurred_at)
            .expect("valid RFC3339 seed timestamp")
            .with_timezone(&Utc);
        let draft = NewTransaction::new(user_id, operator, kind, amount, occurred_at, None)
            .expect("valid seed transaction");
        self.transactions.insert(&draft).expect("seed transaction")
    }

    /// Number of stored user profiles.
    pub fn user_count(&self) -> usize {
        self.users.count()
    }

    /// Number of stored transactions.
    pub fn transaction_count(&self) -> usize {
        self.transactions.count()
    }

    /// Captured audit lines, in order.
    pub fn audit_lines(&self) -> Vec<String> {
        self.audit.lines.lock().expect("audit lock").clone()
    }

    /// Number of captured snapshots.
    pub fn snapshot_count(&self) -> usize {
        self.audit.snapshots.lock().expect("audit lock").len()
    }
}

/// Build the full API app wired to the context's ports.
pub fn test_app(
    context: &TestContext,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(context.state.clone()))
        .app_data(web::Data::new(context.codec.clone()))
        .configure(crate::server::routes)
}
