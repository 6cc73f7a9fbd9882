//! # Boreas Config
//!
//! Typed configuration for Boreas applications.
//!
//! Configuration is loaded in layers, later layers overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. A TOML or JSON file
//! 3. Environment variables of the form `PREFIX__SECTION__KEY`
//!
//! Unknown fields are rejected so that typos fail loudly at startup.
//!
//! ## Example
//!
//! ```
//! use boreas_config::{ConfigLoader, LogFormat};
//!
//! let config = ConfigLoader::new()
//!     .with_string("[logging]\nformat = \"pretty\"", "toml")
//!     .unwrap()
//!     .load()
//!     .unwrap();
//!
//! assert_eq!(config.logging.format, LogFormat::Pretty);
//! assert_eq!(config.request.max_body_bytes, 1024 * 1024);
//! ```

#![doc(html_root_url = "https://docs.rs/boreas-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{BoreasConfig, LogFormat, LoggingSection, MetricsSection, RequestSection};
pub use error::ConfigError;
pub use loader::ConfigLoader;
