use clap::Parser;
use colored::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use taxofacet::api::SearchApi;
use taxofacet::config::SearchConfig;
use taxofacet::error::{FacetError, Result};
use taxofacet::filter::FilterStateController;
use taxofacet::model::CategoryPath;
use taxofacet::session::{BrowseSession, Completion, FetchRequest};
use taxofacet::store::sample::sample_listings;
use taxofacet::store::InMemoryRepository;
use tracing_subscriber::EnvFilter;

mod args;
mod print;
use args::{Cli, Commands, FilterArgs, UrlAction};
use print::{print_results, print_schema, print_tree, print_warning};

const LOG_ENV: &str = "TAXOFACET_LOG";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = SearchConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Tree { schemas } => handle_tree(&config, schemas),
        Commands::Schema { path } => handle_schema(&config, path),
        Commands::Compile { filter, json } => handle_compile(&config, filter, json),
        Commands::Search {
            filter,
            listings,
            more,
            json,
        } => handle_search(&config, filter, listings, more, json).await,
        Commands::Url { action } => match action {
            UrlAction::Encode { filter } => handle_url_encode(&config, filter),
            UrlAction::Decode { url } => handle_url_decode(&config, url),
        },
        Commands::Submit { path, fields } => handle_submit(&config, path, fields),
    }
}

fn offline_api(config: &SearchConfig) -> Result<SearchApi<InMemoryRepository>> {
    SearchApi::from_config(InMemoryRepository::default(), config)
}

fn handle_tree(config: &SearchConfig, schemas: bool) -> Result<()> {
    let tree = config.taxonomy()?;
    print_tree(&tree, schemas);
    Ok(())
}

fn handle_schema(config: &SearchConfig, path: Vec<String>) -> Result<()> {
    let api = offline_api(config)?;
    let path = CategoryPath::from_segments(path);
    let known = api.tree().normalize(&path);
    if known != path {
        print_warning(&format!(
            "'{}' is not in the taxonomy; closest match is '{}'",
            path, known
        ));
    }
    let (fields, source) = api.schema(&path);
    print_schema(&path, fields, source);
    Ok(())
}

fn split_pair(pair: &str) -> Result<(&str, &str)> {
    pair.split_once('=')
        .filter(|(name, _)| !name.trim().is_empty())
        .map(|(name, value)| (name.trim(), value))
        .ok_or_else(|| FacetError::Argument(format!("expected NAME=VALUE, got '{}'", pair)))
}

/// Put the filter options into the controller's draft. Attributes are
/// validated against the schema of the selected path.
fn fill_draft(controller: &mut FilterStateController, filter: &FilterArgs) -> Result<()> {
    let mut segments = filter.path.iter().map(String::as_str);
    controller.set_draft_category(segments.next());
    controller.set_draft_subcategory(segments.next());
    controller.set_draft_subsubcategory(segments.next());
    controller.set_draft_city(filter.city.as_deref());
    controller.set_draft_price(filter.min, filter.max);
    controller.set_draft_free_text(filter.query.as_deref());
    if let Some(sort) = filter.sort {
        controller.set_draft_sort(sort);
    }

    let mut errors = Vec::new();
    for pair in &filter.attrs {
        let (name, value) = split_pair(pair)?;
        match controller.set_draft_attribute(name, Some(value)) {
            Ok(true) => {}
            Ok(false) => print_warning(&format!(
                "Ignoring '{}': not a field of {}",
                name,
                controller.draft().path
            )),
            Err(e) => errors.push(e),
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(FacetError::Validation(errors))
    }
}

/// Issue the first request for the filter options: from the URL when one
/// was given, from the draft otherwise.
fn first_request(session: &mut BrowseSession, filter: &FilterArgs) -> Result<FetchRequest> {
    match &filter.url {
        Some(url) => session.load_url(url),
        None => {
            fill_draft(session.controller_mut(), filter)?;
            Ok(session.apply())
        }
    }
}

fn handle_compile(config: &SearchConfig, filter: FilterArgs, json: bool) -> Result<()> {
    let api = offline_api(config)?;
    let mut session = api.session();
    let request = first_request(&mut session, &filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&request.query)?);
    } else {
        println!("{}", request.query.data);
        println!("{}", request.query.count);
    }
    Ok(())
}

async fn handle_search(
    config: &SearchConfig,
    filter: FilterArgs,
    listings: Option<PathBuf>,
    more: u32,
    json: bool,
) -> Result<()> {
    let repo = match listings {
        Some(path) => InMemoryRepository::load(path)?,
        None => InMemoryRepository::new(sample_listings()),
    };
    let api = SearchApi::from_config(repo, config)?;
    let mut session = api.session();

    let request = first_request(&mut session, &filter)?;
    let fetched = BrowseSession::execute(api.repository(), &request).await?;
    session.complete(&request, Ok(fetched));

    for _ in 0..more {
        match session.load_more_and_fetch(api.repository()).await {
            Some(Completion::Failed(message)) => print_warning(&message),
            Some(_) => {}
            None => break,
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(session.results())?);
    } else {
        println!("{}", session.controller().url().dimmed());
        print_results(session.results());
    }
    Ok(())
}

fn handle_url_encode(config: &SearchConfig, filter: FilterArgs) -> Result<()> {
    let api = offline_api(config)?;
    let mut session = api.session();
    let request = first_request(&mut session, &filter)?;
    println!("{}", request.url);
    Ok(())
}

fn handle_url_decode(config: &SearchConfig, url: String) -> Result<()> {
    let api = offline_api(config)?;
    let state = api.decode_url(&url)?;
    let known = api.tree().normalize(&state.path);
    if known != state.path {
        print_warning(&format!(
            "'{}' is not fully in the taxonomy; filtering still uses it as given",
            state.path
        ));
    }
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn handle_submit(config: &SearchConfig, path: Vec<String>, fields: Vec<String>) -> Result<()> {
    let api = offline_api(config)?;
    let path = CategoryPath::from_segments(path);

    let mut raw = BTreeMap::new();
    for pair in &fields {
        let (name, value) = split_pair(pair)?;
        raw.insert(name.to_string(), value.to_string());
    }

    for (name, value) in api.prepare_submission(&path, &raw)? {
        println!("{}={}", name, value);
    }
    Ok(())
}
