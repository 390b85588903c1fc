use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use taxofacet::model::SortKey;

#[derive(Parser, Debug)]
#[command(name = "taxofacet")]
#[command(about = "Faceted search over a classified-ads taxonomy", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (takes precedence over the user config)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

fn parse_sort(s: &str) -> Result<SortKey, String> {
    s.parse()
}

/// Filter selections shared by every command that builds a query.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Category path, outermost first (up to three levels)
    #[arg(num_args = 0..=3, value_name = "CATEGORY")]
    pub path: Vec<String>,

    /// City (matches anywhere in the location)
    #[arg(long)]
    pub city: Option<String>,

    /// Minimum price
    #[arg(long)]
    pub min: Option<f64>,

    /// Maximum price
    #[arg(long)]
    pub max: Option<f64>,

    /// Free-text search in title and description
    #[arg(short, long)]
    pub query: Option<String>,

    /// newest, oldest, price_asc, price_desc or popular
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<SortKey>,

    /// Attribute facet (repeatable)
    #[arg(long = "attr", value_name = "NAME=VALUE")]
    pub attrs: Vec<String>,

    /// Start from a search URL instead of the options above
    #[arg(long, conflicts_with_all = ["path", "city", "min", "max", "query", "sort", "attrs"])]
    pub url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the category tree
    Tree {
        /// Also list each node's attribute fields
        #[arg(long)]
        schemas: bool,
    },

    /// Show the attribute schema governing a category path
    Schema {
        #[arg(required = true, num_args = 1..=3, value_name = "CATEGORY")]
        path: Vec<String>,
    },

    /// Show the queries a filter compiles to
    Compile {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search listings
    #[command(alias = "s")]
    Search {
        #[command(flatten)]
        filter: FilterArgs,

        /// JSON file with listing rows (defaults to the bundled sample)
        #[arg(long, value_name = "FILE")]
        listings: Option<PathBuf>,

        /// Load this many further pages after the first
        #[arg(long, default_value_t = 0)]
        more: u32,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encode or decode search URLs
    Url {
        #[command(subcommand)]
        action: UrlAction,
    },

    /// Validate a listing form and print the pairs it would submit
    Submit {
        #[arg(required = true, num_args = 1..=3, value_name = "CATEGORY")]
        path: Vec<String>,

        /// Form input (repeatable)
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum UrlAction {
    /// Print the canonical URL for a filter
    Encode {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print the filter state a URL describes
    Decode { url: String },
}
