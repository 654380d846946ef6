use crate::entities::outlet_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOutletRequest {
    #[schema(example = "Bandung Branch")]
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    #[schema(example = "BDG")]
    pub outlet_code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OutletResponse {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub outlet_code: String,
    pub created_at: DateTime<Utc>,
}

impl From<outlet_entity::Model> for OutletResponse {
    fn from(m: outlet_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            address: m.address,
            phone: m.phone,
            logo_url: m.logo_url,
            outlet_code: m.outlet_code,
            created_at: m.created_at,
        }
    }
}
