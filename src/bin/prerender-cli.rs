use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use prerender_relay::config::{load_from_env, TimeoutConfig};
use prerender_relay::prerender::{
    CrawlerMatch, Prerender, PrerenderOptions, RelayOutcome, RequestSnapshot,
};

#[derive(Parser)]
#[command(name = "prerender-cli")]
#[command(about = "Inspect prerender decisions for a request", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print whether a request would be prerendered, and where it would go
    Classify(RequestArgs),
    /// Classify, then call the rendering service and summarize its answer
    Fetch(RequestArgs),
}

#[derive(Args)]
struct RequestArgs {
    /// Absolute URL of the inbound request
    #[arg(long)]
    url: url::Url,

    #[arg(short = 'A', long)]
    user_agent: Option<String>,

    #[arg(short = 'X', long, default_value = "GET")]
    method: Method,

    /// Extra request header, `Name: value`. Repeatable.
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    #[arg(long)]
    bots_only: bool,

    #[arg(long)]
    legacy_crawler_match: bool,

    /// Defaults to PRERENDER_SERVICE_URL, then the public service
    #[arg(long)]
    service_url: Option<String>,

    #[arg(long, default_value_t = 20)]
    timeout_secs: u64,
}

impl RequestArgs {
    fn prerender(&self) -> Result<Prerender, Box<dyn std::error::Error>> {
        let settings = load_from_env()?.prerender;
        let service_url = self.service_url.as_deref().unwrap_or(&settings.service_url);

        let crawler_match = if self.legacy_crawler_match {
            CrawlerMatch::UserAgentInSignature
        } else {
            settings.crawler_match
        };

        let options = PrerenderOptions::new(service_url)?
            .with_token(&settings.token)?
            .with_bots_only(self.bots_only || settings.bots_only)
            .with_crawler_match(crawler_match);

        let timeouts = TimeoutConfig {
            upstream_secs: self.timeout_secs,
            ..Default::default()
        };
        Ok(Prerender::with_timeouts(options, &timeouts)?)
    }

    fn snapshot(&self) -> Result<RequestSnapshot, Box<dyn std::error::Error>> {
        build_snapshot(
            self.method.clone(),
            &self.url,
            self.user_agent.as_deref(),
            &self.headers,
        )
    }
}

fn build_snapshot(
    method: Method,
    url: &url::Url,
    user_agent: Option<&str>,
    raw_headers: &[String],
) -> Result<RequestSnapshot, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    if let Some(ua) = user_agent {
        headers.insert(axum::http::header::USER_AGENT, HeaderValue::from_str(ua)?);
    }
    for raw in raw_headers {
        let (name, value) = parse_header(raw)?;
        headers.append(name, value);
    }
    Ok(RequestSnapshot::from_url(method, url, headers))
}

/// Parse a `Name: value` argument.
fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), Box<dyn std::error::Error>> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("header '{}' is not in 'Name: value' form", raw))?;
    Ok((
        HeaderName::from_bytes(name.trim().as_bytes())?,
        HeaderValue::from_str(value.trim())?,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify(args) => {
            let prerender = args.prerender()?;
            let request = args.snapshot()?;
            let decision = prerender.should_prerender(&request);
            let upstream_url = decision.then(|| prerender.upstream_url(&request));

            let out = json!({
                "prerender": decision,
                "upstream_url": upstream_url,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Fetch(args) => {
            let prerender = args.prerender()?;
            let request = args.snapshot()?;

            if !prerender.should_prerender(&request) {
                println!("{}", serde_json::to_string_pretty(&json!({ "prerender": false }))?);
                return Ok(());
            }

            let (outcome, relayed) = match prerender.relay(&request).await? {
                RelayOutcome::Served(r) => ("served", r),
                RelayOutcome::Fallback(r) => ("fallback", r),
            };
            let header = |v: &Option<HeaderValue>| {
                v.as_ref().and_then(|v| v.to_str().ok()).map(str::to_string)
            };

            let out = json!({
                "prerender": true,
                "upstream_url": prerender.upstream_url(&request),
                "outcome": outcome,
                "status": relayed.status.as_u16(),
                "content_type": header(&relayed.content_type),
                "content_encoding": header(&relayed.content_encoding),
                "body_bytes": relayed.body.len(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
