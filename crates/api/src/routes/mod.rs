//! HTTP route handlers.

pub mod carriers;
pub mod costs;
pub mod mock;
pub mod ops;
