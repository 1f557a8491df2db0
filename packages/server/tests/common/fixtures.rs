//! Test fixtures for creating test data.

use serde_json::{json, Value};

/// Contact request body with a given first name and birth date
pub fn contact_body(first_name: &str, birth_date: &str) -> Value {
    json!({
        "first_name": first_name,
        "last_name": "Tester",
        "email": format!("{}@example.com", first_name.to_lowercase()),
        "phone": "+380501234567",
        "birth_date": birth_date,
        "description": "test contact",
    })
}

/// `YYYY-MM-DD` for a birth date whose anniversary is `days_from_today` ahead
pub fn birth_date_in(days_from_today: i64) -> String {
    use chrono::{Datelike, Duration, NaiveDate, Utc};

    let target = Utc::now().date_naive() + Duration::days(days_from_today);
    // Same month/day 28 years earlier (keeps leap years); Feb 29 shifts to Feb 28
    let date = NaiveDate::from_ymd_opt(target.year() - 28, target.month(), target.day())
        .or_else(|| NaiveDate::from_ymd_opt(target.year() - 28, target.month(), 28))
        .expect("valid date");
    date.format("%Y-%m-%d").to_string()
}
