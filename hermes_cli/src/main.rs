use clap::{Parser, Subcommand};
use hermes_tracking::json::schema::generate_json_schema;
use mimalloc::MiMalloc;

use crate::track::TrackArgs;

mod parsers;
mod track;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replays location samples against a route and prints the progress after each one
    #[command(visible_alias = "t")]
    Track {
        #[command(flatten)]
        args: TrackArgs,
    },
    /// Prints the JSON schema of route documents
    Schema,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Track { args }) => track::run(args).await?,
        Some(Commands::Schema) => println!("{}", generate_json_schema()?),
        None => {}
    }

    Ok(())
}
