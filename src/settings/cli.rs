use super::Parser;

#[derive(Parser, Debug)]
pub struct Cli {
    /// Path to a settings TOML file.
    #[arg(long)]
    pub settings: Option<String>,
}
