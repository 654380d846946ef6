use crate::error::{AppError, AppResult};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rand::Rng;
use regex::Regex;

/// 订单号：ODR-<门店编码><yyyyMMdd>-<4位序号>
pub fn order_reference(outlet_code: &str, date: NaiveDate, seq: i64) -> String {
    format!(
        "ODR-{}{}-{:04}",
        outlet_code.to_uppercase(),
        date.format("%Y%m%d"),
        seq
    )
}

/// 会员号：<门店编码><yyyy>-<6位序号>
pub fn membership_number(outlet_code: &str, year: i32, seq: i64) -> String {
    format!("{}{}-{:06}", outlet_code.to_uppercase(), year, seq)
}

/// 支付流水号：PAY-<方式>-<毫秒时间戳>-<随机数>
pub fn payment_reference(method: &str, now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    format!(
        "PAY-{}-{}-{:03}",
        method.to_uppercase(),
        now.timestamp_millis(),
        rng.gen_range(0..1000)
    )
}

/// 分账流水号：SPLIT-<毫秒时间戳>-<随机数>
pub fn split_reference(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    format!("SPLIT-{}-{:03}", now.timestamp_millis(), rng.gen_range(0..1000))
}

/// 订单序号计数周期(按天)
pub fn order_period(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d").to_string()
}

/// 会员序号计数周期(按年)
pub fn membership_period(now: DateTime<Utc>) -> String {
    now.year().to_string()
}

pub fn validate_outlet_code(code: &str) -> AppResult<()> {
    let re = Regex::new(r"^[A-Z0-9]{2,10}$")
        .map_err(|e| AppError::InternalError(format!("Invalid outlet code pattern: {e}")))?;
    if !re.is_match(code) {
        return Err(AppError::ValidationError(
            "Outlet code must be 2-10 uppercase letters or digits".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_order_reference_format() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(order_reference("jkt", date, 1), "ODR-JKT20250307-0001");
        assert_eq!(order_reference("JKT", date, 12345), "ODR-JKT20250307-12345");
    }

    #[test]
    fn test_membership_number_format() {
        assert_eq!(membership_number("bdg", 2025, 42), "BDG2025-000042");
    }

    #[test]
    fn test_payment_reference_embeds_method_and_time() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let r = payment_reference("cash", now);
        assert!(r.starts_with(&format!("PAY-CASH-{}-", now.timestamp_millis())));
    }

    #[test]
    fn test_periods() {
        let now = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(order_period(now), "20251231");
        assert_eq!(membership_period(now), "2025");
    }

    #[test]
    fn test_validate_outlet_code() {
        assert!(validate_outlet_code("JKT01").is_ok());
        assert!(validate_outlet_code("j").is_err());
        assert!(validate_outlet_code("jkt").is_err());
        assert!(validate_outlet_code("TOO-LONG").is_err());
    }
}
