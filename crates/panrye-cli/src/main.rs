use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use panrye_client::{
    DEFAULT_OPERATOR, DEFAULT_SEARCH_ENDPOINT, DEFAULT_SEARCH_LIMIT, DirectApiClient,
    ResolveStrategy, Resolver, SearchClient,
};
use panrye_core::{KnownMapping, RegistryConfig, registry};

mod display;
mod widget;

use widget::{PrecedentWidget, RequestState, UrlOpener};

/// Look up a precedent by case identifier and render it.
#[derive(Parser, Debug)]
#[command(
    name = "panrye",
    version,
    about = "Precedent lookup against the national legal-information registry"
)]
struct Cli {
    /// Case identifier: registry sequence number or docket case number.
    identifier: String,

    /// Case title shown instead of the derived one.
    #[arg(long)]
    name: Option<String>,

    /// Use the legacy direct service instead of the fallback chain.
    #[arg(long)]
    direct: bool,

    /// JSON file replacing the built-in case-number mapping table.
    #[arg(long, value_name = "FILE")]
    mapping: Option<PathBuf>,

    /// Print the raw resolution outcome as JSON instead of the card view.
    #[arg(long)]
    json: bool,

    /// Maximum keyword-search results to scan.
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    limit: u32,

    /// Keyword search endpoint.
    #[arg(long, env = "PANRYE_SEARCH_ENDPOINT", default_value = DEFAULT_SEARCH_ENDPOINT)]
    search_endpoint: String,

    /// Bearer token for the keyword search endpoint.
    #[arg(long, env = "PANRYE_SEARCH_TOKEN")]
    search_token: Option<String>,

    /// Operator code for the legacy direct service.
    #[arg(long, env = "PANRYE_OPERATOR", default_value = DEFAULT_OPERATOR)]
    operator: String,

    /// Registry base URL.
    #[arg(long, env = "PANRYE_BASE_URL", default_value = registry::DEFAULT_BASE_URL)]
    base_url: String,

    /// Legacy registry base URL serving the direct API.
    #[arg(long, env = "PANRYE_LEGACY_BASE_URL", default_value = registry::DEFAULT_LEGACY_BASE_URL)]
    legacy_base_url: String,

    /// Print the external registry link after rendering.
    #[arg(long)]
    open: bool,

    /// Retry up to N times when resolution fails.
    #[arg(long, value_name = "N", default_value_t = 0)]
    retry: u32,
}

/// Opener for environments without a browser hook: prints the URL.
struct PrintOpener;

impl UrlOpener for PrintOpener {
    fn open_url(&self, url: &str) {
        println!("→ {url}");
    }
}

fn load_mapping(path: Option<&PathBuf>) -> anyhow::Result<KnownMapping> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading mapping file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing mapping file {}", path.display()))
        }
        None => Ok(KnownMapping::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("panrye v{}", env!("CARGO_PKG_VERSION"));
    let cli = Cli::parse();

    let registry = RegistryConfig::new(&cli.base_url, &cli.legacy_base_url);
    let mapping = load_mapping(cli.mapping.as_ref())?;

    let strategy: Box<dyn ResolveStrategy> = if cli.direct {
        Box::new(DirectApiClient::new(
            registry.clone(),
            mapping,
            &cli.operator,
        ))
    } else {
        let search = SearchClient::new(cli.search_endpoint.clone(), cli.search_token.clone());
        Box::new(Resolver::new(search, mapping, registry.clone()).with_search_limit(cli.limit))
    };

    let mut widget = PrecedentWidget::new(&cli.identifier, cli.name.as_deref(), registry);
    let Some(mut ticket) = widget.handle_open() else {
        // A freshly constructed widget always fetches on first open.
        return Ok(());
    };

    let mut retries_left = cli.retry;
    loop {
        let outcome = strategy
            .resolve(&ticket.identifier, ticket.display_name.as_deref())
            .await;
        widget.apply(&ticket, outcome);

        let failed = matches!(widget.state(), RequestState::Ready(outcome) if !outcome.is_success());
        if failed && retries_left > 0 {
            retries_left -= 1;
            tracing::info!(retries_left, "retrying resolution");
            ticket = widget.retry();
            continue;
        }
        break;
    }

    if widget.is_open() {
        if cli.json {
            if let RequestState::Ready(outcome) = widget.state() {
                println!("{}", serde_json::to_string_pretty(outcome)?);
            }
        } else {
            print!("{}", display::render_state(widget.state()));
        }
    }

    if cli.open {
        widget.open_external(&PrintOpener);
    }
    widget.handle_close();

    Ok(())
}
