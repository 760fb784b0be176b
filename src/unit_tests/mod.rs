pub mod check;
pub mod config;
pub mod defaulter;
pub mod quantity;
