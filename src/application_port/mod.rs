mod auth_service;
mod session;
mod user_service;

pub use auth_service::*;
pub use session::*;
pub use user_service::*;
