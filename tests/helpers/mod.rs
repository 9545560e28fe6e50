//! Shared test utilities

pub mod database_helper;
pub mod test_data;
