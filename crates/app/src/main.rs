use chrono::{DateTime, Duration as TimeDelta, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use logsearch_core::{
    build_query, render_fragment, ClientConfig, EsClient, Hit, LogSearch, MarkerStyle,
    QueryOptions, SearchResponse,
};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "logsearch", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Search engine base URL (may include an index pattern path)
    #[arg(long, env = "LOGSEARCH_ES_URL", default_value = logsearch_core::DEFAULT_ENDPOINT)]
    es_url: String,

    /// Connect timeout in seconds; 0 uses the 3 second default
    #[arg(long, env = "LOGSEARCH_CONNECT_TIMEOUT", default_value = "0")]
    connect_timeout_secs: u64,

    /// Overall request deadline in seconds (connect, send and read)
    #[arg(long, env = "LOGSEARCH_REQUEST_TIMEOUT")]
    request_timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a full-text search and print the matching hits.
    Search {
        #[command(flatten)]
        window: QueryArgs,
        /// Echo the query document before sending it.
        #[arg(long, default_value_t = false)]
        show: bool,
        /// How to render highlighted matches.
        #[arg(long, value_enum, default_value = "ansi")]
        highlight: HighlightArg,
        /// Print the decoded response as JSON instead of a listing.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the query document that would be sent, without sending it.
    ShowQuery {
        #[command(flatten)]
        window: QueryArgs,
    },
}

#[derive(clap::Args)]
struct QueryArgs {
    /// Query string, e.g. `level:error AND host:web-*`
    query: String,
    /// Number of hits to return.
    #[arg(long, default_value = "10")]
    num_results: usize,
    /// Inclusive range start (RFC 3339). Defaults to `--since-minutes` before the end.
    #[arg(long, value_parser = parse_timestamp)]
    start: Option<DateTime<Utc>>,
    /// Inclusive range end (RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    end: Option<DateTime<Utc>>,
    /// Size of the default window, in minutes.
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(i64).range(0..))]
    since_minutes: i64,
}

#[derive(Clone, Copy, ValueEnum)]
enum HighlightArg {
    Ansi,
    Brackets,
    Strip,
}

impl From<HighlightArg> for MarkerStyle {
    fn from(value: HighlightArg) -> Self {
        match value {
            HighlightArg::Ansi => MarkerStyle::Ansi,
            HighlightArg::Brackets => MarkerStyle::Brackets,
            HighlightArg::Strip => MarkerStyle::Strip,
        }
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|error| format!("expected an RFC 3339 timestamp: {error}"))
}

impl QueryArgs {
    fn into_options(self, now: DateTime<Utc>, show: bool) -> anyhow::Result<QueryOptions> {
        let end_time = self.end.unwrap_or(now);
        let start_time = match self.start {
            Some(start) => start,
            None => TimeDelta::try_minutes(self.since_minutes)
                .and_then(|window| end_time.checked_sub_signed(window))
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "--since-minutes {} reaches outside the supported date range",
                        self.since_minutes
                    )
                })?,
        };

        Ok(QueryOptions {
            query: self.query,
            num_results: self.num_results,
            start_time,
            end_time,
            show,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig {
        endpoint: cli.es_url,
        connect_timeout: Duration::from_secs(cli.connect_timeout_secs),
        request_timeout: cli.request_timeout_secs.map(Duration::from_secs),
    };
    let client = EsClient::from_config(&config);
    info!(
        version = app_version,
        endpoint = %client.endpoint(),
        connect_timeout_ms = client.effective_connect_timeout().as_millis() as u64,
        started_at = %Utc::now().to_rfc3339(),
        "logsearch boot"
    );

    match cli.command {
        Command::Search {
            window,
            show,
            highlight,
            json,
        } => {
            let options = window.into_options(Utc::now(), show)?;
            if options.start_time > options.end_time {
                warn!(start = %options.start_time, end = %options.end_time, "time range is empty");
            }

            let response = run_search(&client, &options).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print!("{}", format_response(&response, highlight.into()));
            }
        }
        Command::ShowQuery { window } => {
            let options = window.into_options(Utc::now(), false)?;
            println!("{}", serde_json::to_string_pretty(&build_query(&options))?);
        }
    }

    Ok(())
}

async fn run_search<B>(backend: &B, options: &QueryOptions) -> anyhow::Result<SearchResponse>
where
    B: LogSearch + Sync,
{
    let response = backend
        .search(options)
        .await
        .map_err(|error| anyhow::anyhow!(error.to_string()))?;

    info!(
        query = %options.query,
        took_ms = response.took,
        total = response.hits.total,
        returned = response.hits.hits.len(),
        "search finished"
    );
    if response.timed_out {
        warn!(query = %options.query, "search engine reported a timeout; results may be partial");
    }

    Ok(response)
}

fn format_response(response: &SearchResponse, style: MarkerStyle) -> String {
    let mut output = format!(
        "hits: {} of {} (took {}ms)\n",
        response.hits.hits.len(),
        response.hits.total,
        response.took
    );
    for hit in &response.hits.hits {
        output.push_str(&format_hit(hit, style));
    }
    output
}

fn format_hit(hit: &Hit, style: MarkerStyle) -> String {
    let mut output = format!("[{}] score={:.4}\n", hit.id, hit.score);
    if let Some(timestamp) = hit.source.get("@timestamp").and_then(|value| value.as_str()) {
        output.push_str(&format!("  @timestamp={timestamp}\n"));
    }

    if hit.highlight.is_empty() {
        let source = serde_json::Value::Object(hit.source.clone());
        output.push_str(&format!("  source={source}\n"));
    }
    for (field, fragment) in hit.fragments() {
        output.push_str(&format!("  {field}: {}\n", render_fragment(fragment, style)));
    }
    output
}
