pub mod auth;
pub mod catalog;
pub mod common;
pub mod customer;
pub mod inventory;
pub mod order;
pub mod outlet;
pub mod pagination;
pub mod payment;
pub mod report;
pub mod shift;

pub use auth::*;
pub use catalog::*;
pub use common::*;
pub use customer::*;
pub use inventory::*;
pub use order::*;
pub use outlet::*;
pub use pagination::*;
pub use payment::*;
pub use report::*;
pub use shift::*;
