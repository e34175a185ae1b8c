use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde_json::{Value, json};
use std::env;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "broker-cli")]
#[command(about = "Command-line client for the query broker", long_about = None)]
struct Args {
    /// Broker HTTP URL
    /// Can also be set via QUERY_BROKER_URL environment variable
    #[arg(short, long)]
    url: Option<String>,

    /// Give up on the HTTP exchange after this many seconds
    #[arg(long, default_value = "60")]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a query across all agents
    Query {
        /// Query text
        text: String,
    },
    /// List agents known to the broker
    Agents,
    /// Show table schemas
    Schemas,
}

type HttpClient = Client<HttpConnector, Full<Bytes>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let base = args
        .url
        .or_else(|| env::var("QUERY_BROKER_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:8085".to_string());
    let base = base.trim_end_matches('/');
    let timeout = Duration::from_secs(args.timeout_secs);

    let client: HttpClient = Client::builder(TokioExecutor::new()).build_http();

    let (method, path, body) = match &args.command {
        Command::Query { text } => (Method::POST, "/query", json!({ "query": text }).to_string()),
        Command::Agents => (Method::GET, "/agents", String::new()),
        Command::Schemas => (Method::GET, "/schemas", String::new()),
    };

    let envelope = send(&client, method, &format!("{base}{path}"), body, timeout).await?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    let status = envelope["status"].as_u64().unwrap_or(0);
    if status != 200 {
        std::process::exit(1);
    }
    Ok(())
}

async fn send(
    client: &HttpClient,
    method: Method,
    url: &str,
    body: String,
    timeout: Duration,
) -> Result<Value> {
    let uri = url
        .parse::<hyper::Uri>()
        .with_context(|| format!("Invalid URL: {url}"))?;

    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .with_context(|| "Failed to build HTTP request")?;

    let res = tokio::time::timeout(timeout, client.request(req))
        .await
        .with_context(|| "HTTP request timeout")?
        .with_context(|| "HTTP request failed")?;

    let bytes = res
        .into_body()
        .collect()
        .await
        .with_context(|| "Failed to read response body")?
        .to_bytes();

    serde_json::from_slice(&bytes).with_context(|| {
        format!(
            "Response is not JSON: {}",
            String::from_utf8_lossy(&bytes)
        )
    })
}
