//! Configuration for Practice Desk clients
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. An optional TOML or YAML file (`practice.toml` unless overridden)
//! 3. `PRACTICE__*` environment variables, with `__` separating nesting
//!    levels (`PRACTICE__API__BASE_URL`, `PRACTICE__LOGGING__JSON`)
//!
//! A `.env` file in the working directory is loaded into the environment first.
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .with_file("practice.toml")
//!     .load()?;
//! println!("talking to {}", config.api.base_url);
//! # Ok::<(), config_engine::ConfigError>(())
//! ```

pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use error::*;
pub use loader::*;
pub use settings::*;
pub use validation::*;
