//! REST API layer: explicit per-resource handlers and an explicit route
//! table, no reflective dispatch.

pub mod error;
pub mod handlers;
pub mod routes;
mod validate;

pub use error::{ApiError, ApiResult};
pub use handlers::AppState;
pub use routes::create_router;
