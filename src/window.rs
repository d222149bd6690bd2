//! Recurring weekly check-in windows.
//!
//! A window opens at `start_time` on the first `start_day` on or after the
//! due date. There is no close time: once opened, a window stays open until
//! the check-in is completed. A due check-in whose window has not opened yet
//! is reported as "window closed".

use crate::defaults::Policy;
use crate::types::window::RecurringWindow;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    Open,
    /// No gating: the window is disabled or its start time is unreadable.
    Ungated,
    NotYetDue,
    WindowClosed,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowEvaluation {
    pub is_open: bool,
    pub opened_at: NaiveDateTime,
    pub state: WindowState,
    pub message: String,
}

/// Parses a day-of-week name, abbreviation or number (Sunday = 0).
pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    let normalized = name.trim().to_lowercase();
    let day = match normalized.as_str() {
        "0" | "sun" | "sunday" => Weekday::Sun,
        "1" | "mon" | "monday" => Weekday::Mon,
        "2" | "tue" | "tues" | "tuesday" => Weekday::Tue,
        "3" | "wed" | "wednesday" => Weekday::Wed,
        "4" | "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
        "5" | "fri" | "friday" => Weekday::Fri,
        "6" | "sat" | "saturday" => Weekday::Sat,
        _ => return None,
    };
    Some(day)
}

pub fn parse_weekday(name: &str, fallback: Weekday) -> Weekday {
    weekday_from_name(name).unwrap_or_else(|| {
        warn!(start_day = name, fallback = %fallback, "unrecognized window start day");
        fallback
    })
}

pub fn parse_start_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Opening instant for the cycle containing `due`:
/// `due + (start_day - due_day + 7) mod 7` days, at `time`.
pub fn window_start(due: NaiveDate, start_day: Weekday, time: NaiveTime) -> NaiveDateTime {
    let due_day = i64::from(due.weekday().num_days_from_sunday());
    let start = i64::from(start_day.num_days_from_sunday());
    let days_to_add = (start - due_day + 7) % 7;
    (due + Duration::days(days_to_add)).and_time(time)
}

pub fn evaluate_window(
    due: NaiveDate,
    window: &RecurringWindow,
    now: NaiveDateTime,
) -> WindowEvaluation {
    evaluate_availability(due, window, now, false, &Policy::default())
}

/// Evaluates against a host instant, converted to local time in its zone.
pub fn evaluate_window_in_tz<Tz: TimeZone>(
    due: NaiveDate,
    window: &RecurringWindow,
    now: &DateTime<Tz>,
    completed: bool,
    policy: &Policy,
) -> WindowEvaluation {
    evaluate_availability(due, window, now.naive_local(), completed, policy)
}

pub fn evaluate_availability(
    due: NaiveDate,
    window: &RecurringWindow,
    now: NaiveDateTime,
    completed: bool,
    policy: &Policy,
) -> WindowEvaluation {
    let due_start = due.and_time(NaiveTime::MIN);

    let gate = if !window.enabled {
        None
    } else {
        match parse_start_time(&window.start_time) {
            Some(time) => {
                let day = parse_weekday(&window.start_day, policy.fallback_start_day);
                Some(window_start(due, day, time))
            }
            None => {
                warn!(
                    start_time = window.start_time.as_str(),
                    "malformed window start time, leaving check-in ungated"
                );
                None
            }
        }
    };
    let opened_at = gate.unwrap_or(due_start);

    let (state, message) = if completed {
        (
            WindowState::Completed,
            "Check-in already completed".to_string(),
        )
    } else if gate.is_none() {
        (WindowState::Ungated, "Check-in is open".to_string())
    } else if now.date() < due {
        (
            WindowState::NotYetDue,
            format!("Not yet available, due {}", due.format("%a %b %-d")),
        )
    } else if now >= opened_at {
        (
            WindowState::Open,
            format!("Window open since {}", opened_at.format("%a %b %-d %H:%M")),
        )
    } else {
        (
            WindowState::WindowClosed,
            format!("Window closed, opens {}", opened_at.format("%a %b %-d %H:%M")),
        )
    };

    debug!(due = %due, now = %now, state = ?state, "evaluated check-in window");

    WindowEvaluation {
        is_open: matches!(state, WindowState::Open | WindowState::Ungated),
        opened_at,
        state,
        message,
    }
}
