pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_output_formats, validate_path, validate_positive_number,
    validate_range, validate_url, MAX_TIMEOUT_SECONDS,
};

#[cfg(feature = "cli")]
use crate::adapters::http::DEFAULT_BASE_URL;
#[cfg(feature = "cli")]
use crate::core::BookErrorPolicy;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_url("base_url", config.base_url())?;
    validate_non_empty_string("author", config.author())?;
    validate_path("output_path", config.output_path())?;
    validate_output_formats("output_formats", config.output_formats())?;

    if let Some(max_books) = config.max_books() {
        validate_positive_number("max_books", max_books, 1)?;
    }
    if let Some(timeout) = config.timeout_seconds() {
        validate_range("timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
    }

    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "book-etl")]
#[command(about = "Collect an author's books from Open Library with subjects, publishers and ISBNs")]
pub struct CliConfig {
    /// Author name to search for
    #[arg(short, long)]
    pub author: String,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Output formats: json, csv
    #[arg(long, value_delimiter = ',', default_value = "json")]
    pub formats: Vec<String>,

    /// Per-request timeout
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Only enrich the first N search results
    #[arg(long)]
    pub max_books: Option<usize>,

    /// What to do when one book cannot be enriched: abort or skip
    #[arg(long, default_value = "abort")]
    pub on_book_error: BookErrorPolicy,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log timing and request counts per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn author(&self) -> &str {
        &self.author
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn max_books(&self) -> Option<usize> {
        self.max_books
    }

    fn book_error_policy(&self) -> BookErrorPolicy {
        self.on_book_error
    }
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
