pub mod error;
pub mod fields;
pub mod logger;
pub mod monitor;
pub mod validation;
