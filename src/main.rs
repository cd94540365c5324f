//! heritage-search - command-line access to the dataset, heritage object and person search.
//!
//! Usage:
//!   heritage-search search datasets --query pottery \
//!     --filter licenses=https://creativecommons.org/licenses/by/4.0/
//!   heritage-search search persons --sort-by birthYear --sort-order asc --limit 5
//!   heritage-search get objects https://example.org/objects/1

use clap::{Parser, Subcommand, ValueEnum};
use heritage_search::config::{Config, Services};
use heritage_search::search::SearchOptions;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "heritage-search")]
#[command(about = "Faceted search over heritage datasets, objects and persons")]
struct Args {
    /// Search index base URL
    #[arg(long, global = true, env = "HERITAGE_SEARCH_INDEX_URL")]
    index_url: Option<String>,

    /// SPARQL query endpoint
    #[arg(long, global = true, env = "HERITAGE_SEARCH_SPARQL_URL")]
    sparql_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search one kind of record
    Search {
        kind: Kind,

        /// Free-text query
        #[arg(short, long)]
        query: Option<String>,

        #[arg(long)]
        offset: Option<i64>,

        #[arg(short, long)]
        limit: Option<i64>,

        /// relevance, name or (persons) birthYear
        #[arg(long)]
        sort_by: Option<String>,

        /// asc or desc
        #[arg(long)]
        sort_order: Option<String>,

        /// Selected facet value, as facet=value (repeatable)
        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
    /// Fetch one record by IRI
    Get { kind: Kind, iri: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Datasets,
    Objects,
    Persons,
}

fn parse_filter(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(facet, value)| (facet.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected facet=value, got '{}'", value))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = args.index_url {
        config.search.url = url;
    }
    if let Some(url) = args.sparql_url {
        config.sparql.url = url;
    }
    let services = Services::from_config(&config)?;

    let output = match args.command {
        Command::Search {
            kind,
            query,
            offset,
            limit,
            sort_by,
            sort_order,
            filters,
        } => {
            let mut options = SearchOptions {
                query,
                offset,
                limit,
                sort_by,
                sort_order,
                ..Default::default()
            };
            for (facet, value) in filters {
                options = options.with_filter(facet, value);
            }

            let result = match kind {
                Kind::Datasets => serde_json::to_value(services.datasets.search(&options).await?)?,
                Kind::Objects => {
                    serde_json::to_value(services.heritage_objects.search(&options).await?)?
                }
                Kind::Persons => serde_json::to_value(services.persons.search(&options).await?)?,
            };
            serde_json::to_string_pretty(&result)?
        }
        Command::Get { kind, iri } => {
            // Unknown records serialize to null
            let record = match kind {
                Kind::Datasets => serde_json::to_value(services.datasets.get_by_id(&iri).await?)?,
                Kind::Objects => {
                    serde_json::to_value(services.heritage_objects.get_by_id(&iri).await?)?
                }
                Kind::Persons => serde_json::to_value(services.persons.get_by_id(&iri).await?)?,
            };

            if record.is_null() {
                eprintln!("No record found for {}", iri);
                std::process::exit(1);
            }
            serde_json::to_string_pretty(&record)?
        }
    };

    println!("{}", output);

    Ok(())
}
