use crate::error::{AppError, AppResult};
use chrono::{DateTime, Duration, NaiveDate, Utc};

fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::ValidationError(format!("Invalid date '{value}', expected YYYY-MM-DD")))
}

/// 日期查询区间 (UTC)：[start 00:00:00, end+1 00:00:00)
pub fn date_bounds(
    start: Option<&str>,
    end: Option<&str>,
) -> AppResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let from = start.map(parse_date).transpose()?;
    let to = end.map(parse_date).transpose()?;
    if let (Some(f), Some(t)) = (from, to)
        && f > t
    {
        return Err(AppError::ValidationError(
            "start_date must not be after end_date".to_string(),
        ));
    }
    Ok((
        from.map(day_start),
        to.map(|d| day_start(d) + Duration::days(1)),
    ))
}

pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_bounds_are_half_open_days() {
        let (from, to) = date_bounds(Some("2025-01-01"), Some("2025-01-31")).unwrap();
        assert_eq!(from.unwrap().to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert_eq!(to.unwrap().to_rfc3339(), "2025-02-01T00:00:00+00:00");
    }

    #[test]
    fn test_date_bounds_validation() {
        assert!(date_bounds(Some("2025-13-01"), None).is_err());
        assert!(date_bounds(Some("2025-02-01"), Some("2025-01-01")).is_err());
        assert_eq!(date_bounds(None, None).unwrap(), (None, None));
    }
}
