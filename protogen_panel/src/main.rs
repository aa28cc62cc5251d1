use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use protogen_core::{Direction, PanelConfig, PanelResult, ProtogenClient, ResourceId};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use protogen_panel::commands::{self, show::ShowFormat};
use protogen_panel::dashboard::Dashboard;
use protogen_panel::{PanelKind, PanelOptions};

#[derive(Parser)]
#[command(name = "protogen")]
#[command(about = "Remote control panel for a protogen head")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the protogen web server
    #[arg(long, global = true)]
    url: Option<String>,

    /// Poll period for live panels, in milliseconds
    #[arg(long = "interval-ms", global = true)]
    interval_ms: Option<u64>,

    /// Per-request timeout, in milliseconds
    #[arg(long = "timeout-ms", global = true)]
    timeout_ms: Option<u64>,

    /// Config file (defaults to <config dir>/protogen/panel.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal dashboard
    Dashboard {
        /// Player the minecraft controls act for
        #[arg(short = 'p', long = "player")]
        player: Option<String>,
    },

    /// Build a panel, poll it once and print it
    Show {
        #[arg(value_enum)]
        panel: PanelKind,
        /// Print the element tree as JSON
        #[arg(long, conflicts_with = "html")]
        json: bool,
        /// Print the element tree as HTML
        #[arg(long)]
        html: bool,
        /// Player the minecraft controls act for
        #[arg(short = 'p', long = "player")]
        player: Option<String>,
        /// Seed used by the "Generate world" control
        #[arg(long)]
        seed: Option<String>,
    },

    /// App launcher
    Apps {
        #[command(subcommand)]
        command: AppsCommand,
    },

    /// Head display controls
    Head {
        #[command(subcommand)]
        command: HeadCommand,
    },

    /// Minecraft world and players
    Minecraft {
        #[command(subcommand)]
        command: MinecraftCommand,
    },

    /// Panel configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum AppsCommand {
    /// List installed apps
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show name, description and links of an app
    Info {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Make an app the running one
    Launch { id: String },
    /// Print the running app
    Active,
}

#[derive(Subcommand)]
enum HeadCommand {
    /// Switch display mode (e.g. protogen_head)
    Mode { mode: String },
    /// Print or set the current emotion
    Emotion { set: Option<String> },
    /// List available emotions
    Emotions,
    /// Print or set the brightness level
    Brightness { set: Option<String> },
    /// List available brightness levels
    BrightnessLevels,
    /// Print or set whether the screen is blanked
    Blank { set: Option<bool> },
    /// Set audio loudness (0-100)
    Audio {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        level: u8,
    },
    /// Set mouth colour
    MouthColor { color: String },
    /// Set eye colour
    EyeColor { color: String },
}

#[derive(Subcommand)]
enum MinecraftCommand {
    /// Start the minecraft app
    Start,
    /// Generate a new world
    Generate { seed: Option<String> },
    /// List players
    Players,
    /// Add a player
    Join { player: String },
    /// Remove a player
    Leave { player: String },
    /// Move a player one step (left, right, up, down)
    Move { player: String, direction: Direction },
    /// Place the player's selected block
    Place { player: String },
    /// Select the block a player places
    Block { player: String, block: String },
    /// List block types and colours
    Blocks {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, matches!(cli.command, Commands::Dashboard { .. }));

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool, to_file: bool) {
    let default = if verbose {
        "warn,protogen=debug,protogen_core=debug,protogen_panel=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if !to_file {
        builder.with_writer(std::io::stderr).init();
        return;
    }

    // The dashboard owns the terminal; log lines would draw over it
    match open_log_file() {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        None => builder.with_writer(std::io::sink).init(),
    }
}

fn open_log_file() -> Option<fs::File> {
    let dir = dirs::cache_dir()?.join("protogen");
    fs::create_dir_all(&dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("panel.log"))
        .ok()
}

/// File and environment first, then command-line flags
fn load_config(cli: &Cli) -> anyhow::Result<PanelConfig> {
    let mut config = PanelConfig::load(cli.config.as_deref())?;
    if let Some(url) = &cli.url {
        config.base_url = url.clone();
    }
    if let Some(interval) = cli.interval_ms {
        config.poll_interval_ms = interval;
    }
    if let Some(timeout) = cli.timeout_ms {
        config.request_timeout_ms = timeout;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Config { command } = &cli.command {
        return run_config_command(&cli, command);
    }

    let config = load_config(&cli)?;
    let client = ProtogenClient::new(&config)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    tracing::debug!(base_url = %config.base_url, "client ready");

    match cli.command {
        Commands::Dashboard { player } => {
            let options = PanelOptions {
                player: player.map(ResourceId::from),
                seed: None,
            };
            Dashboard::new(client, options, config.poll_interval(), runtime.handle().clone()).run()
        }
        command => Ok(runtime.block_on(run_command(command, &client))?),
    }
}

async fn run_command(command: Commands, client: &ProtogenClient) -> PanelResult<()> {
    match command {
        Commands::Show {
            panel,
            json,
            html,
            player,
            seed,
        } => {
            let format = if json {
                ShowFormat::Json
            } else if html {
                ShowFormat::Html
            } else {
                ShowFormat::Outline
            };
            let options = PanelOptions {
                player: player.map(ResourceId::from),
                seed,
            };
            commands::show::show_panel(client, panel, &options, format).await
        }

        Commands::Apps { command } => match command {
            AppsCommand::List { json } => commands::apps::list_apps(client, json).await,
            AppsCommand::Info { id, json } => {
                commands::apps::app_info(client, &ResourceId::from(id), json).await
            }
            AppsCommand::Launch { id } => {
                commands::apps::launch_app(client, &ResourceId::from(id)).await
            }
            AppsCommand::Active => commands::apps::active_app(client).await,
        },

        Commands::Head { command } => match command {
            HeadCommand::Mode { mode } => commands::head::set_mode(client, &mode).await,
            HeadCommand::Emotion { set } => commands::head::emotion(client, set.as_deref()).await,
            HeadCommand::Emotions => commands::head::list_emotions(client).await,
            HeadCommand::Brightness { set } => {
                commands::head::brightness(client, set.as_deref()).await
            }
            HeadCommand::BrightnessLevels => commands::head::list_brightness_levels(client).await,
            HeadCommand::Blank { set } => commands::head::blank(client, set).await,
            HeadCommand::Audio { level } => commands::head::audio_loudness(client, level).await,
            HeadCommand::MouthColor { color } => commands::head::mouth_color(client, &color).await,
            HeadCommand::EyeColor { color } => commands::head::eye_color(client, &color).await,
        },

        Commands::Minecraft { command } => match command {
            MinecraftCommand::Start => commands::minecraft::start(client).await,
            MinecraftCommand::Generate { seed } => {
                commands::minecraft::generate(client, seed.as_deref()).await
            }
            MinecraftCommand::Players => commands::minecraft::list_players(client).await,
            MinecraftCommand::Join { player } => {
                commands::minecraft::join(client, &ResourceId::from(player)).await
            }
            MinecraftCommand::Leave { player } => {
                commands::minecraft::leave(client, &ResourceId::from(player)).await
            }
            MinecraftCommand::Move { player, direction } => {
                commands::minecraft::move_player(client, &ResourceId::from(player), direction).await
            }
            MinecraftCommand::Place { player } => {
                commands::minecraft::place_block(client, &ResourceId::from(player)).await
            }
            MinecraftCommand::Block { player, block } => {
                commands::minecraft::select_block(client, &ResourceId::from(player), &block).await
            }
            MinecraftCommand::Blocks { json } => {
                commands::minecraft::list_blocks(client, json).await
            }
        },

        // Handled before the runtime starts
        Commands::Dashboard { .. } | Commands::Config { .. } => Ok(()),
    }
}

fn run_config_command(cli: &Cli, command: &ConfigCommand) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Show => {
            let config = load_config(cli)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommand::Init { force } => {
            let path = match &cli.config {
                Some(path) => path.clone(),
                None => PanelConfig::default_path()
                    .context("No config directory on this platform; pass --config")?,
            };
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists. Use --force to overwrite it.",
                    path.display()
                );
            }
            PanelConfig::default().save(&path)?;
            println!(
                "{} Wrote {}",
                "✓".green(),
                path.display().to_string().cyan()
            );
        }
    }
    Ok(())
}
