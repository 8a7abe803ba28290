pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "course-api")]
#[command(about = "Course and blog API server for the e-learning platform")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Create or update the PostgreSQL schema")]
    Migrate(commands::migrate::MigrateArgs),

    #[command(about = "Mint a bearer token for local testing")]
    Token(commands::token::TokenArgs),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Serve(args) => commands::serve::handle(args).await,
        Commands::Migrate(args) => commands::migrate::handle(args, output_format).await,
        Commands::Token(args) => commands::token::handle(args, output_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_flags() {
        let cli = Cli::try_parse_from(["course-api", "serve", "--port", "8080", "--memory", "--seed", "courses.json"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.memory);
                assert_eq!(args.seed.as_deref(), Some(std::path::Path::new("courses.json")));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn token_requires_user_id() {
        assert!(Cli::try_parse_from(["course-api", "token"]).is_err());
        let cli = Cli::try_parse_from(["course-api", "--json", "token", "--user-id", "u1"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
    }
}
