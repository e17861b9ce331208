//! bunnymark: spawn bunnies until the frame rate gives out

use clap::Parser;
use macroquad::prelude::*;

use bunnymark_ecs::bunnymark::assets::load_sprite;
use bunnymark_ecs::bunnymark::cli::Cli;
use bunnymark_ecs::bunnymark::config::BenchConfig;
use bunnymark_ecs::bunnymark::{seed_rng, Game};

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn window_conf(config: &BenchConfig) -> Conf {
    Conf {
        window_title: format!("bunnymark v{}", VERSION),
        window_width: config.window_width,
        window_height: config.window_height,
        window_resizable: true,
        high_dpi: true,
        platform: macroquad::miniquad::conf::Platform {
            swap_interval: config.uncapped_fps.then_some(0),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let cli = Cli::parse();
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Some(path) = &cli.write_config {
        match config.save(path) {
            Ok(()) => log::info!("wrote config to {}", path.display()),
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    macroquad::Window::from_config(window_conf(&config), run(config));
}

async fn run(config: BenchConfig) {
    seed_rng();
    let texture = load_sprite(config.sprite_path.as_deref()).await;
    let mut game = Game::new(&config, texture);

    loop {
        game.update();
        game.draw();
        next_frame().await;
    }
}
