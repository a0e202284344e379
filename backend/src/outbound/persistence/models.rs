//! Row structs mapping Diesel tables to domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::schema::{transactions, user_accounts, users};

/// Read model for the `users` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub monthly_income: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Insert model for the `users` table; id and timestamp come from the
/// database.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub monthly_income: Decimal,
}

/// Changeset for partial user updates; `None` fields are skipped.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChangeset<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub monthly_income: Option<Decimal>,
}

/// Read model for the `transactions` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TransactionRow {
    pub id: i64,
    pub user_id: i64,
    pub operator: String,
    pub kind: String,
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
    pub raw_label: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert model for the `transactions` table.
#[derive(Debug, Insertable)]
#[diesel(table_name = transactions)]
pub struct NewTransactionRow<'a> {
    pub user_id: i64,
    pub operator: &'a str,
    pub kind: &'a str,
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
    pub raw_label: Option<&'a str>,
}

/// Changeset for partial transaction updates; `None` fields are skipped.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = transactions)]
pub struct TransactionChangeset<'a> {
    pub operator: Option<&'a str>,
    pub kind: Option<&'a str>,
    pub amount: Option<Decimal>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub raw_label: Option<&'a str>,
}

/// Read model for the `user_accounts` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = user_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CredentialRow {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}
