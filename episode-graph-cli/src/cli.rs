use clap::{Parser, Subcommand};

/// Sentence used when no text is given on the command line.
pub const DEFAULT_TEXT: &str =
    "Marie Curie discovered radium and worked at Sorbonne University in Paris.";

#[derive(Parser, Debug)]
#[command(name = "episode-graph")]
#[command(about = "Extract entities and relationships with an LLM and store them as graph episodes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Extract from TEXT and ingest the result as one episode
    Ingest {
        /// Text to extract from
        text: Option<String>,

        /// Source description stored on the episode (defaults to the model's)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Search stored facts
    Search {
        query: String,

        /// Maximum number of results (1-100, defaults to SEARCH_LIMIT)
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=100))]
        limit: Option<u16>,
    },

    /// Print the extraction for TEXT as JSON without touching the graph
    Extract {
        text: Option<String>,
    },
}

/// The text argument, or [`DEFAULT_TEXT`] when absent or blank.
pub fn text_or_default(text: Option<&str>) -> &str {
    match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => DEFAULT_TEXT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_without_text() {
        let cli = Cli::try_parse_from(["episode-graph", "ingest"]).expect("parse");
        assert_eq!(
            cli.command,
            Command::Ingest {
                text: None,
                description: None
            }
        );
    }

    #[test]
    fn ingest_with_text_and_description() {
        let cli = Cli::try_parse_from([
            "episode-graph",
            "ingest",
            "Ada Lovelace wrote notes.",
            "--description",
            "podcast transcript",
        ])
        .expect("parse");
        assert_eq!(
            cli.command,
            Command::Ingest {
                text: Some("Ada Lovelace wrote notes.".to_string()),
                description: Some("podcast transcript".to_string())
            }
        );
    }

    #[test]
    fn search_with_limit() {
        let cli = Cli::try_parse_from(["episode-graph", "search", "radium", "-l", "3"]).expect("parse");
        assert_eq!(
            cli.command,
            Command::Search {
                query: "radium".to_string(),
                limit: Some(3)
            }
        );
    }

    #[test]
    fn search_requires_query() {
        assert!(Cli::try_parse_from(["episode-graph", "search"]).is_err());
    }

    #[test]
    fn search_limit_out_of_range() {
        assert!(Cli::try_parse_from(["episode-graph", "search", "radium", "--limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["episode-graph", "search", "radium", "--limit", "101"]).is_err());
    }

    #[test]
    fn default_text_fallback() {
        assert_eq!(text_or_default(None), DEFAULT_TEXT);
        assert_eq!(text_or_default(Some("   ")), DEFAULT_TEXT);
        assert_eq!(text_or_default(Some("radium")), "radium");
    }
}
