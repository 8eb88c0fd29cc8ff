use clap::Parser;
use serde_json::{Map, Value};
use std::path::PathBuf;

use travis_client::api::save_api_file;
use travis_client::chain::{Accessor, Chain, Leaf};
use travis_client::config::{load_config, ClientConfig};
use travis_client::error::{ChainError, ClientResult};
use travis_client::observability::init_logging;
use travis_client::{AuthMessage, TravisClient};

#[derive(Parser)]
#[command(name = "travis-cli")]
#[command(about = "Call the Travis CI API through its compiled route chains", long_about = None)]
struct Cli {
    /// Chain words, e.g. `repos travis-ci travis-web builds get`
    #[arg(required_unless_present_any = ["list", "update_api"])]
    words: Vec<String>,

    /// Use api.travis-ci.com
    #[arg(long)]
    pro: bool,

    /// Enterprise installation URL
    #[arg(long, value_name = "URL")]
    enterprise: Option<String>,

    /// Bundled route description version
    #[arg(long, value_name = "V")]
    api_version: Option<String>,

    /// Route description file
    #[arg(long, value_name = "FILE")]
    routes: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Travis access token
    #[arg(long)]
    token: Option<String>,

    /// GitHub token, exchanged for an access token
    #[arg(long)]
    github_token: Option<String>,

    /// Payload field, repeatable
    #[arg(short, long = "data", value_name = "KEY=VALUE", value_parser = parse_pair)]
    data: Vec<(String, Value)>,

    /// Print every reachable chain and exit
    #[arg(long)]
    list: bool,

    /// Fetch the live route description and write it to FILE
    #[arg(long, value_name = "FILE")]
    update_api: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}: {}", e.kind(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    config.pro |= cli.pro;
    if let Some(url) = cli.enterprise {
        config.enterprise = Some(url);
    }
    if let Some(version) = cli.api_version {
        config.version = version;
    }
    if let Some(path) = cli.routes {
        config.routes_path = Some(path);
    }

    init_logging(&config.observability.log_level);

    let client = TravisClient::new(config)?;

    if cli.list {
        for signature in client.signatures() {
            println!("{}", signature);
        }
        return Ok(());
    }

    if let Some(path) = cli.update_api {
        let description = client.fetch_description().await?;
        if !description.is_empty() {
            save_api_file(&path, &description)?;
            tracing::info!(
                path = %path.display(),
                sections = description.len(),
                "Route description updated"
            );
        }
        return Ok(());
    }

    if let Some(token) = cli.token {
        client.authenticate(AuthMessage::access_token(token)).await?;
    } else if let Some(token) = cli.github_token {
        client.authenticate(AuthMessage::github_token(token)).await?;
    }

    let leaf = resolve(client.root(), &cli.words)?;
    let payload = (!cli.data.is_empty())
        .then(|| Value::Object(cli.data.into_iter().collect::<Map<_, _>>()));

    let result = leaf.invoke(payload).await?;
    println!("{:#}", result);
    Ok(())
}

/// Walk `words` from `chain`, collecting non-member words as arguments.
fn resolve(mut chain: Chain, words: &[String]) -> ClientResult<Leaf> {
    let mut pending: Vec<Value> = Vec::new();
    let last = words.len().saturating_sub(1);

    for (i, word) in words.iter().enumerate() {
        if !pending.is_empty() {
            match chain.call(pending.clone()) {
                Ok(called) if called.has_member(word) => {
                    chain = called;
                    pending.clear();
                }
                _ => {
                    pending.push(cast(word));
                    continue;
                }
            }
        } else if !chain.has_member(word) {
            pending.push(cast(word));
            continue;
        }

        match chain.get(word)? {
            Accessor::Segment(next) => chain = next,
            Accessor::Leaf(leaf) if i == last => return Ok(leaf),
            Accessor::Leaf(_) => return Err(ChainError::NotASegment(word.clone()).into()),
        }
    }

    if !pending.is_empty() {
        // Surface the arity error for leftover arguments.
        chain.call(pending)?;
    }
    let name = words.last().map(String::as_str).unwrap_or("root");
    Err(ChainError::NotALeaf(name.to_string()).into())
}

fn parse_pair(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", raw))?;
    Ok((key.to_string(), cast(value)))
}

/// Numbers stay numbers when they print back the same way.
fn cast(word: &str) -> Value {
    if let Ok(n) = word.parse::<i64>() {
        if n.to_string() == word {
            return Value::from(n);
        }
    }
    if let Ok(f) = word.parse::<f64>() {
        if f.is_finite() && f.to_string() == word {
            return Value::from(f);
        }
    }
    Value::String(word.to_string())
}
