use clap::Parser;
use std::path::PathBuf;

use crate::modules::config::DEFAULT_DATA_DIR;

/// CLI arguments for fura
#[derive(Debug, Parser)]
#[command(name = "fura")]
#[command(about = "Fura AI - chat and image generation in the terminal")]
#[command(version)]
pub struct Cli {
    /// Directory holding config.json, chat history and generated images
    #[arg(long, env = "FURA_DATA_DIR", value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Log filter used when RUST_LOG is not set (e.g. "info", "fura_lib=debug")
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub log_level: String,

    /// Answer with local mock services instead of calling the remote APIs
    #[arg(long)]
    pub offline: bool,
}
