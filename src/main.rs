//! Caselaw command-line entrypoint.
//!
//! ```text
//! caselaw-search [--court=<ids>] [--max-results=<n>] <keyword|semantic|both> <query...>
//! ```
//!
//! Prints the normalized payload as JSON on stdout.

use std::sync::Arc;

use anyhow::{Context, bail};

use caselaw::config::Config;
use caselaw::courts::{CourtResolver, DirectCourtCodes};
use caselaw::fusion::{FusionConfig, FusionSearcher};
use caselaw::rerank::{CohereReranker, Reranker};
use caselaw::search::{CaseLawClient, SearchMode, SearchRequest};

const USAGE: &str =
    "usage: caselaw-search [--court=<ids>] [--max-results=<n>] <keyword|semantic|both> <query...>";

struct Args {
    mode: SearchMode,
    query: String,
    court: Option<String>,
    max_results: Option<usize>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut court = None;
    let mut max_results = None;
    let mut positional = Vec::new();

    for arg in std::env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--court=") {
            court = Some(value.to_string());
        } else if let Some(value) = arg.strip_prefix("--max-results=") {
            max_results = Some(
                value
                    .parse::<usize>()
                    .with_context(|| format!("invalid --max-results '{value}'"))?,
            );
        } else if arg == "--help" || arg == "-h" {
            println!("{USAGE}");
            std::process::exit(0);
        } else {
            positional.push(arg);
        }
    }

    let mut positional = positional.into_iter();
    let Some(mode) = positional.next() else {
        bail!("{USAGE}");
    };
    let mode: SearchMode = mode.parse()?;
    let query = positional.collect::<Vec<_>>().join(" ");

    Ok(Args {
        mode,
        query,
        court,
        max_results,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;

    let config = Config::from_env()?;
    config.validate()?;
    let client = CaseLawClient::new(config)?;

    let mut request = SearchRequest::new(args.query, args.mode);
    if let Some(text) = &args.court {
        let filter = DirectCourtCodes.resolve(text);
        if !filter.valid {
            bail!("{}", filter.description);
        }
        tracing::info!(courts = %filter.court_codes, "Applying court filter");
        request = filter.apply(request);
    }

    let output = match (args.mode, args.max_results) {
        (SearchMode::Both, _) => {
            let reranker: Arc<dyn Reranker> = Arc::new(CohereReranker::from_env_or_stub());
            let fusion = FusionSearcher::new(&client, Some(reranker));
            serde_json::to_string_pretty(
                &fusion.dual_search(&request, FusionConfig::default()).await?,
            )?
        }
        (_, Some(max_results)) => {
            serde_json::to_string_pretty(&client.search_all_pages(&request, max_results).await?)?
        }
        (_, None) => serde_json::to_string_pretty(&client.search(&request).await?)?,
    };

    println!("{output}");
    Ok(())
}
