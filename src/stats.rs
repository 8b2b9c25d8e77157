use crate::errors::AppError;
use crate::models::Table;

/// Occurrences of each distinct value in `column`, counts descending. Equal
/// counts keep first-seen order, so the result is deterministic for a fixed
/// input.
pub fn value_counts(table: &Table, column: &str) -> Vec<(String, u64)> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    for value in table.column_values(column) {
        match counts.iter_mut().find(|(seen, _)| seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value.to_string(), 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Arithmetic mean of the cells of `column` that parse as numbers. Errors
/// when there are none; callers that render pages branch on emptiness first
/// and show a notice instead.
pub fn mean_of(table: &Table, column: &str) -> Result<f64, AppError> {
    let values: Vec<f64> = table
        .column_values(column)
        .iter()
        .filter_map(|cell| cell.trim().parse::<f64>().ok())
        .collect();

    if values.is_empty() {
        return Err(AppError::EmptyAggregate);
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Per-key totals of `value_column`, totals descending, ties in first-seen
/// order. This is the opt-in aggregated leaderboard view; the store itself
/// keeps every award row.
pub fn sum_by(table: &Table, key_column: &str, value_column: &str) -> Vec<(String, i64)> {
    let keys = table.column_values(key_column);
    let values = table.column_values(value_column);

    let mut totals: Vec<(String, i64)> = Vec::new();
    for (key, value) in keys.iter().zip(values.iter()) {
        let amount = value.trim().parse::<i64>().unwrap_or(0);
        match totals.iter_mut().find(|(seen, _)| seen == key) {
            Some((_, total)) => *total += amount,
            None => totals.push((key.to_string(), amount)),
        }
    }

    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}
