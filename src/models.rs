use serde::{Deserialize, Serialize};

/// The three logical tables. Each maps to one CSV file in the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    MoodLog,
    Leaderboard,
    Bookings,
}

impl TableKind {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::MoodLog => "mood_log.csv",
            Self::Leaderboard => "leaderboard.csv",
            Self::Bookings => "bookings.csv",
        }
    }

    /// Canonical schema, used when the backing file does not exist yet.
    /// Bookings uses the superset schema; `Child` stays empty for bookings
    /// made by students themselves.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::MoodLog => &["Date", "Mood", "Focus"],
            Self::Leaderboard => &["Student", "Points"],
            Self::Bookings => &["Name", "Child", "Date", "Reason"],
        }
    }
}

/// An ordered, schema-on-read table: a header plus rows in insertion order.
/// Cells are kept as the strings found on disk; callers parse what they need.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn empty(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Values of one column in row order; missing cells read as "".
    pub fn column_values<'a>(&'a self, column: &str) -> Vec<&'a str> {
        match self.column_index(column) {
            Some(idx) => self
                .rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
            None => Vec::new(),
        }
    }
}

pub const MOODS: &[&str] = &["Happy", "Sad", "Angry", "Neutral"];
pub const FOCUS_MIN: i64 = 1;
pub const FOCUS_MAX: i64 = 5;
pub const STUDENT_REASONS: &[&str] = &["Stress", "Anxiety", "Career Guidance", "Other"];
pub const PARENT_REASONS: &[&str] = &["Stress", "Academic", "Family", "Other"];

// -- JSON API payloads --

#[derive(Debug, Deserialize)]
pub struct MoodEntry {
    /// `YYYY-MM-DD`; defaults to today (server time) when omitted.
    pub date: Option<String>,
    pub mood: String,
    pub focus: i64,
}

#[derive(Debug, Deserialize)]
pub struct PointsEntry {
    pub student: String,
    pub points: i64,
}

#[derive(Debug, Deserialize)]
pub struct BookingEntry {
    pub name: String,
    /// Present for parent bookings; the reason set depends on it.
    pub child: Option<String>,
    pub date: String,
    pub reason: String,
}

// -- JSON API responses --

#[derive(Debug, Serialize)]
pub struct CountEntry {
    pub value: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct TotalEntry {
    pub student: String,
    pub points: i64,
}

#[derive(Debug, Serialize)]
pub struct MoodLogResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub mood_counts: Vec<CountEntry>,
    pub average_focus: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub columns: Vec<String>,
    /// Raw award rows sorted by Points descending; duplicates preserved.
    pub rows: Vec<Vec<String>>,
    /// Per-student totals, the opt-in aggregated view.
    pub totals: Vec<TotalEntry>,
}

#[derive(Debug, Serialize)]
pub struct BookingsResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct AppendedResponse {
    pub table: String,
    pub rows: usize,
}
