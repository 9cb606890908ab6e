//! Address and display helpers

pub mod helper;

pub use helper::{account_truncate, is_valid_address, sales_label};
