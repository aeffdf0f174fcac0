use tracing::{debug, info};

use super::{
    dto::{AddEntryRequest, Amount, Summary},
    repo,
    repo_types::{Entry, NewEntry},
};
use crate::{error::AppError, state::AppState};

/// Units acquired for `invest_amount` at `unit_price`. Plain division, no rounding.
pub fn derive_amount(invest_amount: f64, unit_price: f64) -> f64 {
    invest_amount / unit_price
}

fn positive(field: &str, value: Option<Amount>) -> Result<f64, AppError> {
    let value = match value {
        None => return Err(AppError::validation(format!("{field} is required"))),
        Some(Amount::Number(n)) => n,
        Some(Amount::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(AppError::validation(format!("{field} is required")));
            }
            s.parse::<f64>()
                .map_err(|_| AppError::validation(format!("{field} must be a number")))?
        }
    };
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::validation(format!("{field} must be greater than 0")));
    }
    Ok(value)
}

pub fn validate_entry(req: AddEntryRequest) -> Result<NewEntry, AppError> {
    let date = req
        .date
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::validation("date is required"))?;
    let invest_amount = positive("invest_amount", req.invest_amount)?;
    let unit_price = positive("unit_price", req.unit_price)?;

    // positive finite inputs can still overflow to inf or underflow to 0
    let derived_amount = derive_amount(invest_amount, unit_price);
    if !derived_amount.is_finite() || derived_amount <= 0.0 {
        return Err(AppError::validation(
            "invest_amount / unit_price is out of range",
        ));
    }

    Ok(NewEntry {
        date,
        invest_amount,
        unit_price,
        derived_amount,
    })
}

pub async fn list_entries(st: &AppState, user_id: i64) -> Result<Vec<Entry>, AppError> {
    let entries = repo::list_by_user(&st.db, user_id).await?;
    debug!(user_id, count = entries.len(), "entries listed");
    Ok(entries)
}

pub async fn add_entry(
    st: &AppState,
    user_id: i64,
    req: AddEntryRequest,
) -> Result<Entry, AppError> {
    let new_entry = validate_entry(req)?;
    let entry = repo::insert(&st.db, user_id, &new_entry).await?;
    info!(user_id, entry_id = entry.id, "entry added");
    Ok(entry)
}

/// Removes the entry if the caller owns it. Missing or foreign ids are not
/// reported, so the caller cannot probe other users' ledgers.
pub async fn delete_entry(st: &AppState, user_id: i64, entry_id: i64) -> Result<(), AppError> {
    let removed = repo::delete_owned(&st.db, user_id, entry_id).await?;
    info!(user_id, entry_id, removed, "entry delete");
    Ok(())
}

pub async fn summary(st: &AppState, user_id: i64) -> Result<Summary, AppError> {
    let t = repo::totals_by_user(&st.db, user_id).await?;
    let average_price = (t.total_amount > 0.0).then(|| t.total_invested / t.total_amount);
    Ok(Summary {
        entry_count: t.entry_count,
        total_invested: t.total_invested,
        total_amount: t.total_amount,
        average_price,
    })
}
