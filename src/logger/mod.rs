//! Bootstrap logging with `info` until settings are loaded, then reload the
//! filter from `log.filter`.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
