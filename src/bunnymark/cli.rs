//! Command line for the bunnymark binary
//!
//! Flags override whatever the config file (or the defaults) say.

use std::path::PathBuf;

use clap::Parser;

use super::config::{BenchConfig, ConfigError};

#[derive(Parser, Debug)]
#[command(name = "bunnymark")]
#[command(about = "Sprite throughput benchmark on a layered ECS")]
pub struct Cli {
    /// RON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Bunnies spawned per update while the mouse is held
    #[arg(long)]
    pub amount: Option<u32>,

    /// Start in colorful mode
    #[arg(long)]
    pub colorful: bool,

    /// Window width in pixels
    #[arg(long)]
    pub width: Option<i32>,

    /// Window height in pixels
    #[arg(long)]
    pub height: Option<i32>,

    /// PNG to use as the bunny sprite
    #[arg(long)]
    pub sprite: Option<PathBuf>,

    /// Write the resolved config to this path and exit
    #[arg(long)]
    pub write_config: Option<PathBuf>,
}

impl Cli {
    /// Load the config file (if any) and apply flag overrides.
    pub fn resolve(&self) -> Result<BenchConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::load(path)?,
            None => BenchConfig::default(),
        };

        if let Some(amount) = self.amount {
            config.amount = amount;
        }
        if self.colorful {
            config.colorful = true;
        }
        if let Some(width) = self.width {
            config.window_width = width;
        }
        if let Some(height) = self.height {
            config.window_height = height;
        }
        if let Some(sprite) = &self.sprite {
            config.sprite_path = Some(sprite.clone());
        }

        config.validate()?;
        Ok(config)
    }
}
