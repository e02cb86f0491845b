//! Text search and column filters shared by the list views and the admin API.
//!
//! Searching is a case-insensitive substring match, OR-combined across a
//! fixed set of columns which may belong to a joined table:
//!
//! ```rust,ignore
//! let fields = [
//!     (dive::Entity, dive::Column::Location).into_column_ref(),
//!     (member::Entity, member::Column::Email).into_column_ref(),
//! ];
//! let condition = search_condition("Jadransko", &fields);
//! ```

use sea_orm::{
    ColumnTrait, Condition, Value,
    sea_query::{ColumnRef, Expr, Func, LikeExpr, SimpleExpr},
};
use serde_json::Value as JsonValue;

use crate::errors::ApiError;

// Basic safety limits
const MAX_SEARCH_QUERY_LENGTH: usize = 1_000;
const MAX_FILTER_VALUE_LENGTH: usize = 10_000;

/// Escape LIKE wildcards so user input only ever matches literally.
/// Escapes: % (match any) and _ (match single char)
fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn truncate_query(query: &str) -> &str {
    match query.char_indices().nth(MAX_SEARCH_QUERY_LENGTH) {
        Some((cut, _)) => &query[..cut],
        None => query,
    }
}

/// `UPPER(column) LIKE '%NEEDLE%' ESCAPE '\'`
///
/// SQLite's `UPPER` only folds ASCII while PostgreSQL and MySQL fold all of
/// Unicode, so a needle with non-ASCII letters is matched in both foldings.
#[must_use]
pub fn contains_ci(column: ColumnRef, needle: &str) -> SimpleExpr {
    let escaped = escape_like_wildcards(truncate_query(needle));
    let ascii = upper_like(column.clone(), &escaped.to_ascii_uppercase());
    let unicode = escaped.to_uppercase();
    if unicode == escaped.to_ascii_uppercase() {
        return ascii;
    }
    ascii.or(upper_like(column, &unicode))
}

fn upper_like(column: ColumnRef, folded: &str) -> SimpleExpr {
    Expr::expr(Func::upper(SimpleExpr::Column(column)))
        .like(LikeExpr::new(format!("%{folded}%")).escape('\\'))
}

/// OR-combine [`contains_ci`] over `fields`.
///
/// Returns `None` for an empty query so callers can skip filtering entirely.
#[must_use]
pub fn search_condition(query: &str, fields: &[ColumnRef]) -> Option<Condition> {
    if query.is_empty() || fields.is_empty() {
        return None;
    }
    let condition = fields
        .iter()
        .cloned()
        .fold(Condition::any(), |condition, field| {
            condition.add(contains_ci(field, query))
        });
    Some(condition)
}

/// Convert a JSON filter value into a bindable database value.
fn json_to_value(value: &JsonValue) -> Option<Value> {
    match value {
        JsonValue::String(s) if s.len() <= MAX_FILTER_VALUE_LENGTH => Some(s.clone().into()),
        JsonValue::Bool(b) => Some((*b).into()),
        JsonValue::Number(n) => n
            .as_i64()
            .map(Value::from)
            .or_else(|| n.as_f64().map(Value::from)),
        _ => None,
    }
}

/// Build the admin list condition from a React-Admin `filter` JSON object.
///
/// - `q` searches `search_fields`
/// - `id` matches one id or a list of ids
/// - any key listed in `filter_columns` is an exact match; `null` matches
///   missing values
///
/// Unknown keys are ignored. All parts are AND-combined.
///
/// # Errors
///
/// Returns a bad request error if `filter` is not a JSON object.
pub fn apply_filters<C>(
    filter: Option<&str>,
    search_fields: &[ColumnRef],
    filter_columns: &[(&'static str, C)],
    id_column: C,
) -> Result<Condition, ApiError>
where
    C: ColumnTrait + Copy,
{
    let mut condition = Condition::all();
    let Some(raw) = filter.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(condition);
    };

    let parsed: serde_json::Map<String, JsonValue> = serde_json::from_str(raw)
        .map_err(|_| ApiError::bad_request("filter must be a JSON object"))?;

    for (key, value) in &parsed {
        match key.as_str() {
            "q" => {
                if let Some(search) = value.as_str().and_then(|q| search_condition(q, search_fields)) {
                    condition = condition.add(search);
                }
            }
            "id" => {
                let ids: Vec<i64> = match value {
                    JsonValue::Array(items) => items.iter().filter_map(JsonValue::as_i64).collect(),
                    other => other.as_i64().into_iter().collect(),
                };
                condition = condition.add(id_column.is_in(ids));
            }
            name => {
                let Some(&(_, column)) = filter_columns.iter().find(|(field, _)| *field == name) else {
                    tracing::debug!(field = name, "Ignoring filter on unknown field");
                    continue;
                };
                if value.is_null() {
                    condition = condition.add(column.is_null());
                } else if let Some(value) = json_to_value(value) {
                    condition = condition.add(column.eq(value));
                }
            }
        }
    }

    Ok(condition)
}
