//! Core business logic for Leavewise.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Business-day arithmetic, balance rules and the request state machine live here;
//! `leavewise-db` applies them inside database transactions.
//!
//! # Modules
//!
//! - `auth` - Caller context and role hierarchy
//! - `calendar` - Business-day arithmetic and the injectable clock
//! - `leave` - Balances, request validation and lifecycle

pub mod auth;
pub mod calendar;
pub mod leave;
