//! 结账金额计算，不访问数据库
//!
//! 顺序：积分兑换 -> 折扣 -> 下限归零 -> 校验实收 -> 找零。所有金额为分。

use crate::entities::{DiscountType, PaymentMethod};
use crate::error::{AppError, AppResult};
use crate::models::PaymentSplitRequest;
use crate::utils::{format_cents, percent_of};

/// 兑换奖励对订单金额的影响
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardEffect {
    /// 免费赠送订单中已有的菜品
    FreeItem {
        unit_price: i64,
        ordered_quantity: i32,
        reward_quantity: i32,
    },
    /// 直接减免固定金额
    FlatDiscount(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewardOutcome {
    pub amount: i64,
    /// 需要从订单行扣除的数量
    pub freed_quantity: i32,
}

pub fn reward_outcome(effect: RewardEffect) -> RewardOutcome {
    match effect {
        RewardEffect::FreeItem {
            unit_price,
            ordered_quantity,
            reward_quantity,
        } => {
            let freed_quantity = reward_quantity.min(ordered_quantity).max(0);
            RewardOutcome {
                amount: unit_price * freed_quantity as i64,
                freed_quantity,
            }
        }
        RewardEffect::FlatDiscount(value) => RewardOutcome {
            amount: value.max(0),
            freed_quantity: 0,
        },
    }
}

/// 百分比折扣按小计计算，固定折扣直接取值
pub fn discount_amount(discount_type: DiscountType, value: i64, subtotal: i64) -> i64 {
    match discount_type {
        DiscountType::Percentage => {
            let rate_bp = value.clamp(0, i32::MAX as i64) as i32;
            percent_of(subtotal, rate_bp)
        }
        DiscountType::Fixed => value.max(0),
    }
}

/// 余额必须严格大于所需积分
pub fn has_enough_points(balance: i64, points_required: i64) -> bool {
    balance > points_required
}

/// 按订单原始总额计算可获得的积分，向下取整
pub fn earned_points(total_amount: i64, earn_unit: i64) -> i64 {
    if earn_unit <= 0 || total_amount <= 0 {
        return 0;
    }
    total_amount / earn_unit
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub final_amount: i64,
    pub change_amount: i64,
}

pub fn settle(
    total_amount: i64,
    reward_amount: i64,
    discount_amount: i64,
    tendered: i64,
) -> AppResult<Settlement> {
    let final_amount = (total_amount - reward_amount - discount_amount).max(0);
    if tendered < final_amount {
        return Err(AppError::InsufficientPayment(format!(
            "Tendered {} is less than amount due {}",
            format_cents(tendered),
            format_cents(final_amount)
        )));
    }
    Ok(Settlement {
        final_amount,
        change_amount: tendered - final_amount,
    })
}

/// 分账明细；未提供时生成一条覆盖全部实收金额的记录
pub fn resolve_splits(
    tendered: i64,
    primary_method: PaymentMethod,
    splits: Option<&[PaymentSplitRequest]>,
) -> AppResult<Vec<(PaymentMethod, i64)>> {
    let Some(splits) = splits.filter(|s| !s.is_empty()) else {
        return Ok(vec![(primary_method, tendered)]);
    };

    if splits.iter().any(|s| s.amount <= 0) {
        return Err(AppError::ValidationError(
            "Split amounts must be positive".to_string(),
        ));
    }
    let sum: i64 = splits.iter().map(|s| s.amount).sum();
    if sum != tendered {
        return Err(AppError::ValidationError(format!(
            "Split amounts ({}) must add up to the tendered amount ({})",
            format_cents(sum),
            format_cents(tendered)
        )));
    }
    Ok(splits.iter().map(|s| (s.payment_method, s.amount)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_tender_has_no_change() {
        let s = settle(11_500, 0, 0, 11_500).unwrap();
        assert_eq!(s.final_amount, 11_500);
        assert_eq!(s.change_amount, 0);
    }

    #[test]
    fn test_discount_then_flat_reward() {
        let discount = discount_amount(DiscountType::Percentage, 1_000, 20_000);
        assert_eq!(discount, 2_000);
        let reward = reward_outcome(RewardEffect::FlatDiscount(5_000));
        let s = settle(20_000, reward.amount, discount, 13_000).unwrap();
        assert_eq!(s.final_amount, 13_000);
        assert_eq!(s.change_amount, 0);
    }

    #[test]
    fn test_insufficient_tender() {
        let err = settle(11_500, 0, 0, 11_499).unwrap_err();
        assert!(matches!(err, AppError::InsufficientPayment(_)));
    }

    #[test]
    fn test_final_amount_clamped_to_zero() {
        let s = settle(1_000, 800, 500, 0).unwrap();
        assert_eq!(s.final_amount, 0);
        assert_eq!(s.change_amount, 0);
    }

    #[test]
    fn test_free_item_capped_by_ordered_quantity() {
        let out = reward_outcome(RewardEffect::FreeItem {
            unit_price: 3_500,
            ordered_quantity: 1,
            reward_quantity: 2,
        });
        assert_eq!(out.freed_quantity, 1);
        assert_eq!(out.amount, 3_500);
    }

    #[test]
    fn test_fixed_discount() {
        assert_eq!(discount_amount(DiscountType::Fixed, 2_500, 10_000), 2_500);
        assert_eq!(discount_amount(DiscountType::Fixed, -1, 10_000), 0);
    }

    #[test]
    fn test_points() {
        assert_eq!(earned_points(2_500_000, 1_000_000), 2);
        assert_eq!(earned_points(999_999, 1_000_000), 0);
        assert!(has_enough_points(101, 100));
        assert!(!has_enough_points(100, 100));
    }

    #[test]
    fn test_splits_must_match_tender() {
        let splits = vec![
            PaymentSplitRequest {
                payment_method: PaymentMethod::Cash,
                amount: 5_000,
            },
            PaymentSplitRequest {
                payment_method: PaymentMethod::Card,
                amount: 6_500,
            },
        ];
        let resolved = resolve_splits(11_500, PaymentMethod::Cash, Some(&splits)).unwrap();
        assert_eq!(resolved.len(), 2);
        assert!(resolve_splits(12_000, PaymentMethod::Cash, Some(&splits)).is_err());

        let single = resolve_splits(11_500, PaymentMethod::Qris, None).unwrap();
        assert_eq!(single, vec![(PaymentMethod::Qris, 11_500)]);
    }
}
