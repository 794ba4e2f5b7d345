use clap::{Parser, Subcommand};

use codesnap::commands;
use codesnap::error;

#[derive(Parser)]
#[command(
    name = "codesnap",
    about = "AI coding process recording and log generation system"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a codesnap store in the current directory
    Init,

    /// Interactive session: one checkpoint per entered prompt
    Start {
        /// Tags to associate with prompts
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Description for checkpoints
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Create a single checkpoint
    Save {
        /// Prompt text driving this checkpoint
        #[arg(short, long)]
        prompt: Option<String>,
        /// Description for the checkpoint
        #[arg(short, long, default_value = "")]
        description: String,
        /// Tags to associate with the checkpoint
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List checkpoints
    List,

    /// Compare two checkpoints, or one checkpoint with the live tree
    Diff {
        /// First checkpoint id or name
        checkpoint1: String,
        /// Second checkpoint id or name
        checkpoint2: Option<String>,
        /// Compare with the current project state instead
        #[arg(short, long)]
        current: bool,
    },

    /// Restore the project tree to a checkpoint
    Restore {
        /// Checkpoint id or name to restore
        checkpoint: String,
        /// Restore into this directory instead of the project root
        #[arg(short, long)]
        output: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export the checkpoint history to a file
    Export {
        /// Output file path
        output: String,
        /// Export format: markdown or html
        #[arg(short, long, default_value = "markdown")]
        format: String,
    },

    /// Show store summary
    Status,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Init) => commands::init::run(),
        Some(Commands::Start { tags, description }) => commands::start::run(&tags, &description),
        Some(Commands::Save {
            prompt,
            description,
            tags,
        }) => commands::save::run(prompt.as_deref(), &description, tags),
        Some(Commands::List) => commands::list::run(),
        Some(Commands::Diff {
            checkpoint1,
            checkpoint2,
            current,
        }) => commands::diff::run(&checkpoint1, checkpoint2.as_deref(), current),
        Some(Commands::Restore {
            checkpoint,
            output,
            yes,
        }) => commands::restore::run(&checkpoint, output.as_deref(), yes),
        Some(Commands::Export { output, format }) => commands::export::run(&output, &format),
        Some(Commands::Status) => commands::status::run(),

        None => {
            // Smart default: show status if initialized, else hint at init
            match error::find_project_root() {
                Ok(_) => commands::status::run(),
                Err(_) => {
                    println!("No codesnap store found. Run `codesnap init` to get started.");
                    Ok(())
                }
            }
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
