//! CLI frontend for the dialogue and tile map libraries.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "mp",
    about = "Inspect and run branching dialogues and painted tile maps",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and play dialogue files
    Dialogue {
        #[command(subcommand)]
        command: DialogueCommands,
    },

    /// Inspect and edit tile map files
    Tilemap {
        #[command(subcommand)]
        command: TilemapCommands,
    },
}

#[derive(Subcommand)]
enum DialogueCommands {
    /// List every node of a dialogue
    Show {
        /// Dialogue JSON file
        file: PathBuf,
    },

    /// List the nodes reachable from a node
    Next {
        /// Dialogue JSON file
        file: PathBuf,

        /// Node to start from (default: the first node)
        #[arg(long)]
        from: Option<i32>,

        /// Flag the player holds, for `flag` conditions (repeatable)
        #[arg(long = "flag")]
        flags: Vec<String>,
    },

    /// Walk a dialogue by picking options in order
    Play {
        /// Dialogue JSON file
        file: PathBuf,

        /// Option index to pick at each step (repeatable)
        #[arg(short, long = "choose")]
        choices: Vec<usize>,

        /// Flag the player holds, for `flag` conditions (repeatable)
        #[arg(long = "flag")]
        flags: Vec<String>,
    },
}

#[derive(Subcommand)]
enum TilemapCommands {
    /// List the layers and painted flipbooks of a tile map
    Show {
        /// Tile map JSON file
        file: PathBuf,
    },

    /// Resize a tile map, dropping flipbooks that no longer fit
    Resize {
        /// Tile map JSON file
        file: PathBuf,

        /// New width in tiles
        #[arg(long)]
        width: u32,

        /// New height in tiles
        #[arg(long)]
        height: u32,

        /// Output file (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply a tile replacer table as if the map were dropped into a world
    Replace {
        /// Tile map JSON file
        file: PathBuf,

        /// Tile replacer table JSON file
        #[arg(long)]
        rules: PathBuf,

        /// Name of the world the map is dropped into
        #[arg(long)]
        world: String,

        /// Write the map with the replaced tiles cleared
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Dialogue { command } => match command {
            DialogueCommands::Show { file } => commands::dialogue::show(&file),
            DialogueCommands::Next { file, from, flags } => {
                commands::dialogue::next(&file, from, &flags)
            }
            DialogueCommands::Play {
                file,
                choices,
                flags,
            } => commands::dialogue::play(&file, &choices, &flags),
        },
        Commands::Tilemap { command } => match command {
            TilemapCommands::Show { file } => commands::tilemap::show(&file),
            TilemapCommands::Resize {
                file,
                width,
                height,
                output,
            } => commands::tilemap::resize(&file, width, height, output.as_deref()),
            TilemapCommands::Replace {
                file,
                rules,
                world,
                output,
            } => commands::tilemap::replace(&file, &rules, &world, output.as_deref()),
        },
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
