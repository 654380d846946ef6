use crate::entities::{
    MembershipStatus, customer_entity as customer, customer_point_entity as customer_point,
    outlet_entity as outlet,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::activity_log_service::record_activity;
use crate::services::sequence::{self, MEMBER_SCOPE};
use crate::utils::{membership_number, membership_period};
use chrono::{Datelike, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct CustomerService {
    pool: DatabaseConnection,
}

impl CustomerService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 建档时分配会员号并创建零积分账户
    pub async fn create_customer(
        &self,
        ctx: &AuthContext,
        req: CreateCustomerRequest,
    ) -> AppResult<CustomerResponse> {
        if req.name.trim().is_empty() {
            return Err(AppError::ValidationError("Customer name is required".to_string()));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let outlet = outlet::Entity::find_by_id(ctx.outlet_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Outlet not found".to_string()))?;

        let seq = sequence::next_value(&txn, MEMBER_SCOPE, ctx.outlet_id, &membership_period(now), now)
            .await?;
        let number = membership_number(&outlet.outlet_code, now.year(), seq);

        let created = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            outlet_id: Set(ctx.outlet_id),
            name: Set(req.name.trim().to_string()),
            email: Set(req.email),
            phone: Set(req.phone),
            address: Set(req.address),
            membership_number: Set(number),
            membership_status: Set(req.membership_status.unwrap_or(MembershipStatus::Active)),
            membership_start_date: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        customer_point::ActiveModel {
            id: Set(Uuid::new_v4()),
            outlet_id: Set(ctx.outlet_id),
            customer_id: Set(created.id),
            total_points: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        record_activity(
            &txn,
            ctx.user_id,
            "create",
            "customers",
            Some(created.id),
            format!("Registered member {}", created.membership_number),
        )
        .await?;
        txn.commit().await?;

        log::info!(
            "Customer registered: membership={} outlet={}",
            created.membership_number,
            ctx.outlet_id
        );
        Ok(CustomerResponse::new(created, 0))
    }

    pub async fn list_customers(
        &self,
        ctx: &AuthContext,
        query: &CustomerQuery,
    ) -> AppResult<PaginatedResponse<CustomerResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let mut select = customer::Entity::find().filter(customer::Column::OutletId.eq(ctx.outlet_id));
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(customer::Column::Name.contains(search))
                    .add(customer::Column::Phone.contains(search))
                    .add(customer::Column::MembershipNumber.contains(search)),
            );
        }

        let total = select.clone().count(&self.pool).await?;
        let rows = select
            .order_by_desc(customer::Column::CreatedAt)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|c| c.id).collect();
        let points = customer_point::Entity::find()
            .filter(customer_point::Column::OutletId.eq(ctx.outlet_id))
            .filter(customer_point::Column::CustomerId.is_in(ids))
            .all(&self.pool)
            .await?;

        let data = rows
            .into_iter()
            .map(|c| {
                let balance = points
                    .iter()
                    .find(|p| p.customer_id == c.id)
                    .map_or(0, |p| p.total_points);
                CustomerResponse::new(c, balance)
            })
            .collect();
        Ok(PaginatedResponse::new(data, &params, total))
    }

    pub async fn get_customer(&self, ctx: &AuthContext, id: Uuid) -> AppResult<CustomerResponse> {
        let row = customer::Entity::find_by_id(id)
            .filter(customer::Column::OutletId.eq(ctx.outlet_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;
        let balance = self.points_of(ctx, id).await?;
        Ok(CustomerResponse::new(row, balance))
    }

    pub async fn update_customer(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        req: UpdateCustomerRequest,
    ) -> AppResult<CustomerResponse> {
        let txn = self.pool.begin().await?;
        let existing = customer::Entity::find_by_id(id)
            .filter(customer::Column::OutletId.eq(ctx.outlet_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

        let mut active = existing.into_active_model();
        if let Some(name) = req.name {
            if name.trim().is_empty() {
                return Err(AppError::ValidationError("Customer name is required".to_string()));
            }
            active.name = Set(name.trim().to_string());
        }
        if let Some(email) = req.email {
            active.email = Set(Some(email));
        }
        if let Some(phone) = req.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = req.address {
            active.address = Set(Some(address));
        }
        if let Some(status) = req.membership_status {
            active.membership_status = Set(status);
        }
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        record_activity(
            &txn,
            ctx.user_id,
            "update",
            "customers",
            Some(updated.id),
            format!("Updated member {}", updated.membership_number),
        )
        .await?;
        txn.commit().await?;

        let balance = self.points_of(ctx, id).await?;
        Ok(CustomerResponse::new(updated, balance))
    }

    async fn points_of(&self, ctx: &AuthContext, customer_id: Uuid) -> AppResult<i64> {
        let balance = customer_point::Entity::find()
            .filter(customer_point::Column::OutletId.eq(ctx.outlet_id))
            .filter(customer_point::Column::CustomerId.eq(customer_id))
            .one(&self.pool)
            .await?
            .map_or(0, |p| p.total_points);
        Ok(balance)
    }
}
