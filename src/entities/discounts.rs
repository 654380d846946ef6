use super::enums::DiscountType;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "discounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub outlet_id: Uuid,
    pub name: String,
    pub discount_type: DiscountType,
    pub value: i64, // percentage: 基点; fixed: 分
    pub is_member_only: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// 有效期 [start_date, end_date]，end_date 为空表示长期有效
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && self.end_date.is_none_or(|end| now <= end)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
