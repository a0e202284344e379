//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; regenerate with
//! `diesel print-schema` after schema changes.

diesel::table! {
    /// User profiles: the accounts the ledger tracks.
    users (id) {
        /// Primary key, assigned by the sequence.
        id -> Int8,
        /// Display name.
        name -> Varchar,
        /// Contact email, unique.
        email -> Varchar,
        /// Declared monthly income.
        monthly_income -> Numeric,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ledger movements, one row per statement line.
    transactions (id) {
        /// Primary key, assigned by the sequence.
        id -> Int8,
        /// Owning user profile; foreign key to `users`.
        user_id -> Int8,
        /// Counterparty label, trimmed.
        operator -> Varchar,
        /// Upper-case movement kind.
        kind -> Varchar,
        /// Movement amount.
        amount -> Numeric,
        /// When the movement happened.
        occurred_at -> Timestamptz,
        /// Original statement line, when imported.
        raw_label -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Login credentials, consulted only by the authenticator.
    user_accounts (id) {
        /// Primary key, assigned by the sequence.
        id -> Int8,
        /// User profile this login belongs to.
        user_id -> Int8,
        /// Login name, unique.
        username -> Varchar,
        /// Salted one-way hash, `salt$hexdigest`.
        password_hash -> Varchar,
        /// Role label; open set, parsed at the boundary.
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(transactions -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, transactions, user_accounts);
