//! The HTTP surface (§4.9, §6): `/health`, `/aggregates`, `/materialized`,
//! `/metrics`.

mod handlers;
mod state;

pub use handlers::router;
pub use state::AppState;
