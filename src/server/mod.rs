mod server;
mod user_count_reporter;

pub use server::*;
pub use user_count_reporter::*;
