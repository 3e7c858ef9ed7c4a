//! xmlnode CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "xmlnode")]
#[command(version, about = "Pretty-print and query XML documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and write it back pretty-printed
    Fmt {
        /// XML file to format
        file: PathBuf,

        /// Indentation width per level, 0 for a single line [default: 2, or 1 with --tabs]
        #[arg(long)]
        indent: Option<usize>,

        /// Indent with tabs instead of spaces
        #[arg(long)]
        tabs: bool,

        /// Omit the XML declaration
        #[arg(long)]
        no_declaration: bool,

        /// Write output to FILE instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Print the children reached by following named steps from the root
    Query {
        /// XML file to query
        file: PathBuf,

        /// Steps of the form `name` or `name[key=value,...]`
        #[arg(required = true)]
        steps: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xmlnode=info,xml_node=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fmt {
            file,
            indent,
            tabs,
            no_declaration,
            output,
        } => commands::fmt::execute(commands::fmt::FmtArgs {
            file,
            indent,
            tabs,
            no_declaration,
            output,
        }),
        Commands::Query { file, steps } => {
            commands::query::execute(commands::query::QueryArgs { file, steps })
        }
    }
}
