mod auth_service_impl;
mod jwt_codec;
mod password_hasher;
mod session_manager_impl;
mod user_service_impl;

pub use auth_service_impl::*;
pub use jwt_codec::*;
pub use password_hasher::*;
pub use session_manager_impl::*;
pub use user_service_impl::*;

#[cfg(test)]
pub(crate) mod test_support;
