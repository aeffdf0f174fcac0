use serde::{Deserialize, Serialize};

use super::repo_types::Entry;

/// A number as sent by a JSON client or a form (`100` or `"100"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct AddEntryRequest {
    pub date: Option<String>,
    pub invest_amount: Option<Amount>,
    pub unit_price: Option<Amount>,
}

/// Entry id as a JSON integer or its decimal text (`5` or `"5"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(i64),
    Text(String),
}

impl EntryId {
    pub fn get(&self) -> Option<i64> {
        match self {
            EntryId::Number(id) => Some(*id),
            EntryId::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteEntryRequest {
    pub entry_id: Option<EntryId>,
}

/// Entry as exposed to the client.
#[derive(Debug, Serialize)]
pub struct EntryItem {
    pub id: i64,
    pub date: String,
    pub invest_amount: f64,
    pub unit_price: f64,
    pub derived_amount: f64,
}

impl From<Entry> for EntryItem {
    fn from(e: Entry) -> Self {
        Self {
            id: e.id,
            date: e.date,
            invest_amount: e.invest_amount,
            unit_price: e.unit_price,
            derived_amount: e.derived_amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntryListResponse {
    pub ok: bool,
    pub entries: Vec<EntryItem>,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub ok: bool,
    pub entry: EntryItem,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub entry_count: i64,
    pub total_invested: f64,
    pub total_amount: f64,
    /// Average cost per unit; `None` for an empty ledger.
    pub average_price: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub ok: bool,
    pub summary: Summary,
}
