//! Process-local adapters, selected with the `memory` backend setting.

mod token_cache_memory;
mod user_repo_memory;

pub use token_cache_memory::*;
pub use user_repo_memory::*;
