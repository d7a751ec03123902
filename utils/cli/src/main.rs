use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use fansim_cli::{load_configuration, run_demo, LogMatrix, MatrixDisplay, TerminalMatrix};
use fansim_network::{
    app::{
        core::{DelayUnit, Rpm},
        Configuration, Engine,
    },
    serve, USAGE,
};
use tokio::net::TcpListener;

/// Spinning fan simulator
///
/// Draws a spinning fan together with a temperature gauge on a simulated 8x8 LED matrix.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = false)]
struct Cli {
    /// Configuration file in the JSON format
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Initial fan speed, overrides the configuration file
    #[arg(short, long, value_name = "RPM")]
    speed: Option<Rpm>,
    /// Unit of the delay between two fan images, overrides the configuration file
    #[arg(long, value_name = "UNIT")]
    delay_unit: Option<DelayUnit>,
    /// Where to draw the LED matrix
    #[arg(short, long, value_enum, default_value = "terminal")]
    display: DisplayKind,
    /// Actual command
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DisplayKind {
    /// Colored cells in the terminal
    Terminal,
    /// Frames printed to the log at the debug level
    Log,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP control interface
    Serve {
        /// Listening socket address
        #[arg(short, long, default_value = "0.0.0.0:5000")]
        address: SocketAddr,
    },
    /// Walk the gauge through all temperatures while toggling the fan
    Demo {
        /// Delay between two demo steps
        #[arg(long, default_value = "2000", value_name = "MS")]
        step: u64,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate the completions for
        #[arg(value_enum)]
        shell: clap_complete_command::Shell,
    },
}

impl Cli {
    fn configuration(&self) -> anyhow::Result<Configuration> {
        let mut config = match &self.config {
            Some(path) => load_configuration(path)?,
            None => Configuration::default(),
        };
        if let Some(speed) = self.speed {
            config.speed_rpm = speed;
        }
        if let Some(delay_unit) = self.delay_unit {
            config.delay_unit = delay_unit;
        }
        Ok(config)
    }

    fn display(&self) -> anyhow::Result<MatrixDisplay> {
        let display = match self.display {
            DisplayKind::Terminal => MatrixDisplay::Terminal(
                TerminalMatrix::new(std::io::stdout()).context("Unable to prepare the terminal")?,
            ),
            DisplayKind::Log => MatrixDisplay::Log(LogMatrix::default()),
        };
        Ok(display)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { address } => {
            let config = cli.configuration()?;
            let engine = Arc::new(Engine::new(cli.display()?, config));

            let listener = TcpListener::bind(address)
                .await
                .with_context(|| format!("Unable to bind the {address}"))?;
            log::info!("{USAGE}");

            serve(engine.clone(), listener, async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    log::error!("Unable to listen for the shutdown signal: {err}");
                }
            })
            .await?;

            log::info!("Waiting for the animation worker to finish");
            tokio::task::spawn_blocking(move || engine.stop()).await??;
        }
        Command::Demo { step } => {
            let config = cli.configuration()?;
            let engine = Arc::new(Engine::new(cli.display()?, config));
            let step = Duration::from_millis(step);

            tokio::select! {
                result = run_demo(&engine, step) => result?,
                _ = tokio::signal::ctrl_c() => log::info!("Demo interrupted"),
            }

            log::info!("Waiting for the animation worker to finish");
            tokio::task::spawn_blocking(move || engine.stop()).await??;
        }

        Command::Completions { shell } => {
            shell.generate(&mut Cli::command(), &mut std::io::stdout());
        }
    }

    Ok(())
}
