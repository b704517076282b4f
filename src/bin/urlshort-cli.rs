use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "urlshort-cli")]
#[command(about = "Management CLI for the urlshort admin API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    #[arg(short, long, env = "URLSHORT_ADMIN_KEY")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server status
    Status,
    /// List resolver layers in check order
    Layers,
    /// Show which layer resolves a path
    Resolve { path: String },
    /// List key-value store entries
    Store,
    /// Add or overwrite a store entry
    Add { path: String, url: String },
    /// Remove a store entry
    Remove { path: String },
    /// Recompile every layer from its sources
    Reload,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let request = match cli.command {
        Commands::Status => client.get(format!("{}/admin/status", cli.url)),
        Commands::Layers => client.get(format!("{}/admin/layers", cli.url)),
        Commands::Resolve { path } => client
            .get(format!("{}/admin/resolve", cli.url))
            .query(&[("path", path)]),
        Commands::Store => client.get(format!("{}/admin/store", cli.url)),
        Commands::Add { path, url } => client
            .put(format!("{}/admin/store", cli.url))
            .json(&json!({ "path": path, "url": url })),
        Commands::Remove { path } => client
            .delete(format!("{}/admin/store", cli.url))
            .json(&json!({ "path": path })),
        Commands::Reload => client.post(format!("{}/admin/reload", cli.url)),
    };

    let res = request.headers(headers).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
