//! `SeaORM` entity definitions.

pub mod prelude;

pub mod employees;
pub mod leave_balances;
pub mod leave_comments;
pub mod leave_policies;
pub mod leave_requests;
pub mod leave_types;
pub mod organizations;
pub mod sea_orm_active_enums;
