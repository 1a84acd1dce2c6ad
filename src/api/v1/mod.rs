mod auth_gate;
mod error;
mod handler;
mod router;

pub use auth_gate::{bearer_token, with_auth, with_optional_auth};
pub use error::{ApiError, ApiErrorCode, recover_error};
pub use handler::ApiResponse;
pub use router::{health, routes};
