use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// One DCA purchase as stored.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Entry {
    pub id: i64,
    pub user_id: i64,
    pub date: String,
    pub invest_amount: f64,
    pub unit_price: f64,
    pub derived_amount: f64, // units acquired, fixed at insert time
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated input for a new entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub date: String,
    pub invest_amount: f64,
    pub unit_price: f64,
    pub derived_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, FromRow)]
pub struct Totals {
    pub entry_count: i64,
    pub total_invested: f64,
    pub total_amount: f64,
}
