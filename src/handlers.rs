use crate::errors::AppError;
use crate::models::{
    AppendedResponse, BookingEntry, BookingsResponse, CountEntry, LeaderboardResponse, MoodEntry,
    MoodLogResponse, PointsEntry, TableKind, TotalEntry, FOCUS_MAX, FOCUS_MIN, MOODS,
    PARENT_REASONS, STUDENT_REASONS,
};
use crate::state::AppState;
use crate::stats::{mean_of, sum_by, value_counts};
use crate::store::sort_descending;
use crate::ui;
use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub notice: Option<String>,
}

// -- pages --

pub async fn home() -> Html<String> {
    Html(ui::render_home())
}

pub async fn student_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let store = state.store.lock().await;
    let mood = store.load(TableKind::MoodLog).await?;
    let leaderboard = store.load(TableKind::Leaderboard).await?;
    drop(store);

    let mood_counts = value_counts(&mood, "Mood");
    let ranked = sort_descending(&leaderboard, "Points");
    Ok(Html(ui::render_student(
        &mood,
        &mood_counts,
        &ranked,
        query.notice.as_deref(),
    )))
}

pub async fn parent_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let leaderboard = state.store.lock().await.load(TableKind::Leaderboard).await?;
    let ranked = sort_descending(&leaderboard, "Points");
    Ok(Html(ui::render_parent(&ranked, query.notice.as_deref())))
}

pub async fn teacher_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let store = state.store.lock().await;
    let mood = store.load(TableKind::MoodLog).await?;
    let leaderboard = store.load(TableKind::Leaderboard).await?;
    let bookings = store.load(TableKind::Bookings).await?;
    drop(store);

    let mood_counts = value_counts(&mood, "Mood");
    let average_focus = if mood.is_empty() {
        None
    } else {
        Some(mean_of(&mood, "Focus")?)
    };
    let ranked = sort_descending(&leaderboard, "Points");
    let totals = sum_by(&leaderboard, "Student", "Points");

    Ok(Html(ui::render_teacher(
        &mood,
        &mood_counts,
        average_focus,
        &ranked,
        &totals,
        &bookings,
    )))
}

// -- form submissions --

#[derive(Debug, Deserialize)]
pub struct MoodForm {
    pub mood: String,
    pub focus: String,
}

#[derive(Debug, Deserialize)]
pub struct PointsForm {
    pub student: String,
    pub points: String,
}

#[derive(Debug, Deserialize)]
pub struct StudentBookingForm {
    pub name: String,
    pub date: String,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ParentBookingForm {
    pub name: String,
    pub child: String,
    pub date: String,
    pub reason: String,
}

pub async fn log_mood(
    State(state): State<AppState>,
    Form(form): Form<MoodForm>,
) -> Result<Redirect, AppError> {
    let focus = parse_number("Focus", &form.focus)?;
    append_mood(
        &state,
        MoodEntry {
            date: None,
            mood: form.mood,
            focus,
        },
    )
    .await?;
    Ok(Redirect::to("/student?notice=Entry%20logged"))
}

pub async fn add_points(
    State(state): State<AppState>,
    Form(form): Form<PointsForm>,
) -> Result<Redirect, AppError> {
    let points = parse_number("Points", &form.points)?;
    append_points(
        &state,
        PointsEntry {
            student: form.student,
            points,
        },
    )
    .await?;
    Ok(Redirect::to("/student?notice=Points%20added"))
}

pub async fn book_student_session(
    State(state): State<AppState>,
    Form(form): Form<StudentBookingForm>,
) -> Result<Redirect, AppError> {
    append_booking(
        &state,
        BookingEntry {
            name: form.name,
            child: None,
            date: form.date,
            reason: form.reason,
        },
    )
    .await?;
    Ok(Redirect::to("/student?notice=Session%20booked"))
}

pub async fn book_parent_session(
    State(state): State<AppState>,
    Form(form): Form<ParentBookingForm>,
) -> Result<Redirect, AppError> {
    append_booking(
        &state,
        BookingEntry {
            name: form.name,
            child: Some(form.child),
            date: form.date,
            reason: form.reason,
        },
    )
    .await?;
    Ok(Redirect::to("/parent?notice=Session%20booked"))
}

// -- JSON API --

pub async fn get_mood_log(
    State(state): State<AppState>,
) -> Result<Json<MoodLogResponse>, AppError> {
    let table = state.store.lock().await.load(TableKind::MoodLog).await?;
    let mood_counts = value_counts(&table, "Mood")
        .into_iter()
        .map(|(value, count)| CountEntry { value, count })
        .collect();
    let average_focus = mean_of(&table, "Focus").ok();

    Ok(Json(MoodLogResponse {
        columns: table.columns,
        rows: table.rows,
        mood_counts,
        average_focus,
    }))
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let table = state.store.lock().await.load(TableKind::Leaderboard).await?;
    let ranked = sort_descending(&table, "Points");
    let totals = sum_by(&table, "Student", "Points")
        .into_iter()
        .map(|(student, points)| TotalEntry { student, points })
        .collect();

    Ok(Json(LeaderboardResponse {
        columns: ranked.columns,
        rows: ranked.rows,
        totals,
    }))
}

pub async fn get_bookings(
    State(state): State<AppState>,
) -> Result<Json<BookingsResponse>, AppError> {
    let table = state.store.lock().await.load(TableKind::Bookings).await?;
    Ok(Json(BookingsResponse {
        columns: table.columns,
        rows: table.rows,
    }))
}

pub async fn post_mood_log(
    State(state): State<AppState>,
    Json(entry): Json<MoodEntry>,
) -> Result<Json<AppendedResponse>, AppError> {
    let table = append_mood(&state, entry).await?;
    Ok(Json(AppendedResponse {
        table: TableKind::MoodLog.file_name().to_string(),
        rows: table.rows.len(),
    }))
}

pub async fn post_leaderboard(
    State(state): State<AppState>,
    Json(entry): Json<PointsEntry>,
) -> Result<Json<AppendedResponse>, AppError> {
    let table = append_points(&state, entry).await?;
    Ok(Json(AppendedResponse {
        table: TableKind::Leaderboard.file_name().to_string(),
        rows: table.rows.len(),
    }))
}

pub async fn post_booking(
    State(state): State<AppState>,
    Json(entry): Json<BookingEntry>,
) -> Result<Json<AppendedResponse>, AppError> {
    let table = append_booking(&state, entry).await?;
    Ok(Json(AppendedResponse {
        table: TableKind::Bookings.file_name().to_string(),
        rows: table.rows.len(),
    }))
}

// -- shared append paths --

async fn append_mood(
    state: &AppState,
    entry: MoodEntry,
) -> Result<crate::models::Table, AppError> {
    let date = match entry.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => Local::now().date_naive(),
    };
    let mood = parse_choice("Mood", &entry.mood, MOODS)?;
    if entry.focus < FOCUS_MIN || entry.focus > FOCUS_MAX {
        return Err(AppError::validation(format!(
            "Focus must be between {FOCUS_MIN} and {FOCUS_MAX}"
        )));
    }

    let row = [
        ("Date", date.to_string()),
        ("Mood", mood),
        ("Focus", entry.focus.to_string()),
    ];
    state.store.lock().await.append(TableKind::MoodLog, &row).await
}

async fn append_points(
    state: &AppState,
    entry: PointsEntry,
) -> Result<crate::models::Table, AppError> {
    let student = require_text("Student name", &entry.student)?;
    if entry.points < 1 {
        return Err(AppError::validation("Points must be at least 1"));
    }

    let row = [
        ("Student", student),
        ("Points", entry.points.to_string()),
    ];
    state
        .store
        .lock()
        .await
        .append(TableKind::Leaderboard, &row)
        .await
}

async fn append_booking(
    state: &AppState,
    entry: BookingEntry,
) -> Result<crate::models::Table, AppError> {
    let name = require_text("Name", &entry.name)?;
    let date = parse_date(&entry.date)?;
    // the reason set depends on who books: parents name a child
    let (child, reason) = match entry.child.as_deref() {
        Some(child) => (
            require_text("Child name", child)?,
            parse_choice("Reason", &entry.reason, PARENT_REASONS)?,
        ),
        None => (
            String::new(),
            parse_choice("Reason", &entry.reason, STUDENT_REASONS)?,
        ),
    };

    let row = [
        ("Name", name),
        ("Child", child),
        ("Date", date.to_string()),
        ("Reason", reason),
    ];
    state.store.lock().await.append(TableKind::Bookings, &row).await
}

// -- validation --

fn require_text(label: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{label} must not be blank")));
    }
    Ok(trimmed.to_string())
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Date must be YYYY-MM-DD, got '{raw}'")))
}

fn parse_choice(label: &str, value: &str, allowed: &[&str]) -> Result<String, AppError> {
    let trimmed = value.trim();
    if !allowed.contains(&trimmed) {
        return Err(AppError::validation(format!(
            "{label} must be one of: {}",
            allowed.join(", ")
        )));
    }
    Ok(trimmed.to_string())
}

fn parse_number(label: &str, value: &str) -> Result<i64, AppError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::validation(format!("{label} must be a whole number")))
}
