//! Configuration loading and validation.
//!
//! Settings are loaded from a `.env` file (if present) and then from
//! environment variables, matching exactly the flat variable names fixed by
//! the external interface contract (`NATS_URL`, `DB_HOST`, ...) — there is
//! no `APP__`-style prefix or nesting, because these names are a
//! wire-compatibility requirement, not an internal convention.
//!
//! # Example
//!
//! ```ignore
//! use casino_core::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("NATS URL: {}", settings.nats_url);
//! ```

mod settings;

pub use settings::Settings;
