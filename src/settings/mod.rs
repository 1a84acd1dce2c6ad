//! Settings come from a TOML file (`--settings`, or the build profile's
//! default under `settings/`) with `USERGATE__*` environment overrides.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
