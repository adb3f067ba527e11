use chrono::{DateTime, NaiveDate};

use crate::error::{TrError, TrResult};

pub fn date_from_str(s: &str) -> TrResult<NaiveDate> {
    const FORMATS: &[&str] = &[
        "%Y%m%d",
        "%Y-%m-%d",
        "%Y%m%dT%H%M%S",        // ISO 8601 Basic
        "%Y-%m-%dT%H:%M:%S%.f", // ISO 8601 Extended
    ];

    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        // RFC 3339
        return Ok(datetime.date_naive());
    }

    Err(TrError::Invalid {
        code: "INVALID_DATE",
        message: format!("Unable to parse date '{s}'"),
    })
}

pub fn date_to_str(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn date_to_unix_secs(date: &NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_from_str() {
        assert_eq!(
            date_to_str(&date_from_str("20231231").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("20231231T235959").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("2023-12-31").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("2023-12-31T23:59:59").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("2023-12-31T23:59:59Z").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("2023-12-31T23:59:59+08:00").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("2023-12-31T23:59:59.123456").unwrap()),
            "2023-12-31"
        );
        assert!(date_from_str("invalid-date").is_err());
    }

    #[test]
    fn test_date_to_str() {
        assert_eq!(
            date_to_str(&NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()),
            "2023-01-01"
        );
        assert_eq!(
            date_to_str(&NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
            "2023-12-31"
        );
    }

    #[test]
    fn test_date_to_unix_secs() {
        assert_eq!(
            date_to_unix_secs(&NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
            0
        );
        assert_eq!(
            date_to_unix_secs(&NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            1704067200
        );
    }

}
