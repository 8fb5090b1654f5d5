//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cloudsearch")]
#[command(author, version, about = "Query and maintain a CloudSearch domain", long_about = None)]
pub struct Cli {
    /// Settings file (defaults to <config dir>/cloudsearch/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Search domain id (overrides config and CLOUDSEARCH_ID)
    #[arg(long, global = true)]
    pub domain: Option<String>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }

    /// Default log filter for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the search URL for a query without sending it
    Url(QueryArgs),

    /// Run a search and print the hit ids and facets
    Search(QueryArgs),

    /// Delete a document by id
    Delete(DeleteArgs),

    /// Print the effective settings
    Config,
}

// === Queries ===

#[derive(Args, Debug, Default, Clone)]
pub struct QueryArgs {
    /// Free-text keyword
    #[arg(long)]
    pub keyword: Option<String>,

    /// Text equality joined with AND (FIELD=VALUE)
    #[arg(long = "and", value_name = "FIELD=VALUE")]
    pub and_filters: Vec<String>,

    /// Text equality joined with OR (FIELD=VALUE)
    #[arg(long = "or", value_name = "FIELD=VALUE")]
    pub or_filters: Vec<String>,

    /// Integer match or range (FIELD=N, FIELD=A..B, FIELD=A.., FIELD=..B)
    #[arg(long = "int", value_name = "FIELD=N|RANGE")]
    pub int_filters: Vec<String>,

    /// Request a facet
    #[arg(long = "facet", value_name = "NAME")]
    pub facets: Vec<String>,

    /// Field to return (repeatable)
    #[arg(long = "return-field", value_name = "NAME")]
    pub return_fields: Vec<String>,

    /// Page size
    #[arg(long)]
    pub size: Option<u32>,

    /// Offset of the first hit
    #[arg(long, default_value = "0")]
    pub start: u32,

    /// Rank field, prefixed with '-' for descending
    #[arg(long, allow_hyphen_values = true)]
    pub rank: Option<String>,

    /// Raw query string used instead of keyword and filters
    #[arg(long)]
    pub raw: Option<String>,
}

// === Documents ===

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Id of the document to delete
    #[arg(long)]
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_command() {
        let cli = Cli::try_parse_from([
            "cloudsearch",
            "--domain",
            "movies",
            "url",
            "--keyword",
            "star",
            "--and",
            "genre=Sci-Fi",
            "--int",
            "year=2000..2004",
            "--rank",
            "-year",
        ])
        .unwrap();

        assert_eq!(cli.domain.as_deref(), Some("movies"));
        match cli.command {
            Commands::Url(args) => {
                assert_eq!(args.keyword.as_deref(), Some("star"));
                assert_eq!(args.and_filters, vec!["genre=Sci-Fi"]);
                assert_eq!(args.int_filters, vec!["year=2000..2004"]);
                assert_eq!(args.rank.as_deref(), Some("-year"));
                assert_eq!(args.start, 0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_output_format_and_verbosity() {
        let cli = Cli::try_parse_from(["cloudsearch", "--yaml", "-vv", "config"]).unwrap();
        assert_eq!(cli.output_format(), OutputFormat::Yaml);
        assert_eq!(cli.log_level(), "trace");

        let cli = Cli::try_parse_from(["cloudsearch", "config"]).unwrap();
        assert_eq!(cli.output_format(), OutputFormat::Json);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_conflicting_formats_rejected() {
        assert!(Cli::try_parse_from(["cloudsearch", "--json", "--toml", "config"]).is_err());
    }
}
