pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use adapters::http::OpenLibraryClient;
pub use crate::core::{enrich::generate_book_data, etl::EtlEngine, pipeline::BookPipeline};
pub use domain::ports::BookErrorPolicy;
pub use utils::error::{EtlError, Result};
