//! 金额计算：金额统一为分 (i64)，比例统一为基点 (i32, 10000 = 100%)

use crate::error::{AppError, AppResult};

pub const FULL_RATE_BP: i32 = 10_000;

/// `amount × rate_bp / 10000`，四舍五入到分 (half-up，远离零)
pub fn percent_of(amount: i64, rate_bp: i32) -> i64 {
    let product = amount as i128 * rate_bp as i128;
    let half = FULL_RATE_BP as i128 / 2;
    let rounded = if product >= 0 {
        (product + half) / FULL_RATE_BP as i128
    } else {
        (product - half) / FULL_RATE_BP as i128
    };
    rounded as i64
}

pub fn validate_rate_bp(rate_bp: i32) -> AppResult<()> {
    if !(0..=FULL_RATE_BP).contains(&rate_bp) {
        return Err(AppError::ValidationError(format!(
            "Rate must be between 0 and {FULL_RATE_BP} basis points"
        )));
    }
    Ok(())
}

pub fn validate_amount(amount: i64, field: &str) -> AppResult<()> {
    if amount < 0 {
        return Err(AppError::ValidationError(format!("{field} must not be negative")));
    }
    Ok(())
}

/// 仅用于日志与文案
pub fn format_cents(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of_exact() {
        assert_eq!(percent_of(10_000, 1_000), 1_000); // 100.00 × 10% = 10.00
        assert_eq!(percent_of(10_000, 500), 500);
        assert_eq!(percent_of(20_000, 1_000), 2_000);
    }

    #[test]
    fn test_percent_of_rounds_half_up() {
        // 0.05 × 10% = 0.005 -> 0.01
        assert_eq!(percent_of(5, 1_000), 1);
        // 0.04 × 10% = 0.004 -> 0.00
        assert_eq!(percent_of(4, 1_000), 0);
        // 12.345% of 1.00 = 0.12345 -> 0.12
        assert_eq!(percent_of(100, 1_235), 12);
        assert_eq!(percent_of(-5, 1_000), -1);
    }

    #[test]
    fn test_validate_rate_bp() {
        assert!(validate_rate_bp(0).is_ok());
        assert!(validate_rate_bp(10_000).is_ok());
        assert!(validate_rate_bp(-1).is_err());
        assert!(validate_rate_bp(10_001).is_err());
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(11_500), "115.00");
        assert_eq!(format_cents(7), "0.07");
        assert_eq!(format_cents(-250), "-2.50");
    }
}
