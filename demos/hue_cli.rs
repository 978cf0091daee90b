//! CLI for building Hue light commands.
//!
//! This example demonstrates the command layer of the library: every command
//! is checked against the light's state and turned into the request the
//! bridge expects. Requests are printed instead of sent, so no bridge is
//! needed.
//!
//! Run with: cargo run --example hue_cli -- --help

use std::sync::Arc;

use clap::{Parser, Subcommand};
use futures::StreamExt;
use hue_lights_rs::{
    ChannelTransport, Color, ConnectionContext, Light, LightIdentity, LightState,
};

#[derive(Parser)]
#[command(name = "hue-cli")]
#[command(about = "Build Hue light commands from the command line", long_about = None)]
struct Cli {
    /// IP address of the bridge
    #[arg(short, long, default_value = "192.168.1.2")]
    bridge: String,

    /// API username on the bridge
    #[arg(short, long, default_value = "username")]
    user: String,

    /// Index of the light on the bridge
    #[arg(short, long, default_value = "1")]
    light: String,

    /// Treat the light as already on
    #[arg(long)]
    on: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn the light on
    On,

    /// Turn the light off
    Off,

    /// Turn the light on and set an RGB color ("r,g,b")
    Color {
        /// Color as r,g,b with 0-255 components
        rgb: Color,
        /// Optional brightness (0-255)
        #[arg(short, long)]
        brightness: Option<i32>,
    },

    /// Set chromaticity coordinates
    Xy { x: f64, y: f64 },

    /// Set brightness (0-255)
    Brightness { level: i32 },

    /// Change brightness by a relative amount (-255 to 255)
    Dim {
        #[arg(allow_hyphen_values = true)]
        change: i32,
    },

    /// Set color temperature (0-65535)
    Temperature { ct: i32 },

    /// Blink once, or for 15 seconds with --long
    Blink {
        #[arg(long)]
        long: bool,
    },

    /// Start or stop the color loop
    Loop {
        #[arg(long)]
        stop: bool,
    },

    /// Rename the light
    Rename { name: String },
}

fn run(light: &mut Light, command: Commands) -> Result<(), hue_lights_rs::Error> {
    match command {
        Commands::On => {
            light.turn_on()?;
        }
        Commands::Off => {
            light.turn_off()?;
        }
        Commands::Color { rgb, brightness } => {
            light
                .turn_on()?
                .set_color_rgb(rgb.red(), rgb.green(), rgb.blue())?;
            if let Some(level) = brightness {
                light.set_brightness(level)?;
            }
        }
        Commands::Xy { x, y } => {
            light.set_color_xy(x, y)?;
        }
        Commands::Brightness { level } => {
            light.set_brightness(level)?;
        }
        Commands::Dim { change } => {
            light.increment_brightness(change)?;
        }
        Commands::Temperature { ct } => {
            light.set_color_temperature(ct)?;
        }
        Commands::Blink { long } => {
            if long {
                light.blink_long()?;
            } else {
                light.blink()?;
            }
        }
        Commands::Loop { stop } => {
            if stop {
                light.stop_color_loop()?;
            } else {
                light.start_color_loop()?;
            }
        }
        Commands::Rename { name } => {
            light.rename(&name)?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (transport, commands) = ChannelTransport::new();
    let mut light = Light::new(
        LightIdentity::new(&cli.light, &format!("light {}", cli.light)),
        LightState::new(cli.on),
        ConnectionContext::new(&cli.bridge, &cli.user),
        Arc::new(transport),
    );

    let result = run(&mut light, cli.command);
    println!("Light is {}", if light.is_on() { "ON" } else { "OFF" });
    drop(light);

    let sent: Vec<_> = futures::executor::block_on(commands.collect());
    for command in &sent {
        println!("{}", command);
    }

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
