use chrono::{Local, NaiveDate};

use crate::error::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The user's local calendar day. Entries and streaks are keyed on this.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|err| {
        AppError::validation_with_details(
            format!("invalid date '{raw}': {err}"),
            serde_json::json!({ "expectedFormat": "YYYY-MM-DD" }),
        )
    })
}
