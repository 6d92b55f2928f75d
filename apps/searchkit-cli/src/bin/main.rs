use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use searchkit_core::config::Config;
use searchkit_core::{Item, Query, SearchEngine};
use searchkit_elastic::ElasticSearch;

const USAGE: &str = "Usage: searchkit [--config <path>] <command> [args...]

Commands:
  search <index> [text] [--page N] [--count N] [--facet FIELD]... [--filter FIELD=VALUE]... [--debug]
  add <file.jsonl> [--batch N]
  present <index> <id> [type]
  delete <index> <id> [type]";

const DEFAULT_BATCH: usize = 500;

fn parse_args() -> (Option<PathBuf>, String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut config_path = None;
    if args.first().map(String::as_str) == Some("--config") {
        if args.len() < 2 { eprintln!("{}", USAGE); std::process::exit(1); }
        config_path = Some(PathBuf::from(args.remove(1)));
        args.remove(0);
    }
    if args.is_empty() { eprintln!("{}", USAGE); std::process::exit(1); }
    let cmd = args.remove(0);
    (config_path, cmd, args)
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1).map(String::as_str).ok_or_else(|| anyhow!("{} needs a value", flag))
}

/// Bare words are strings, anything that parses as JSON keeps its type.
fn scalar(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn parse_search(args: &[String]) -> Result<Query> {
    let index = args.first().ok_or_else(|| anyhow!("search needs an index"))?;
    let mut builder = Query::builder(index.as_str());
    let mut text: Option<&str> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--page" => { builder = builder.page(flag_value(args, i, "--page")?.parse().context("--page")?); i += 2; }
            "--count" => { builder = builder.count(flag_value(args, i, "--count")?.parse().context("--count")?); i += 2; }
            "--facet" => {
                let field = flag_value(args, i, "--facet")?;
                builder = builder.facet(field, json!({ "terms": { "field": field } }));
                i += 2;
            }
            "--filter" => {
                let pair = flag_value(args, i, "--filter")?;
                let (field, value) = pair.split_once('=').ok_or_else(|| anyhow!("--filter expects FIELD=VALUE, got '{}'", pair))?;
                builder = builder.filter(field, json!({ "term": { field: scalar(value) } }));
                i += 2;
            }
            "--debug" => { builder = builder.debug(true); i += 1; }
            other if other.starts_with("--") => bail!("unknown flag '{}'", other),
            word => {
                if text.is_some() { bail!("only one query text allowed, got extra '{}'", word); }
                text = Some(word);
                i += 1;
            }
        }
    }
    if let Some(text) = text {
        builder = builder.query("query_string", json!({ "query": text }));
    }
    Ok(builder.build())
}

/// One JSON object per line; `id` is the document id, everything else
/// (routing keys included) goes into the item's values.
fn parse_item(line: &str) -> Result<Item> {
    let mut values = match serde_json::from_str::<Value>(line)? {
        Value::Object(map) => map,
        other => bail!("expected a JSON object, got {}", other),
    };
    let id = match values.shift_remove("id") {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => bail!("unsupported id {}", other),
        None => bail!("missing 'id'"),
    };
    Ok(Item::with_values(id, values))
}

fn read_items(path: &Path) -> Result<Vec<Item>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut items = Vec::new();
    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        items.push(parse_item(&line).with_context(|| format!("{}:{}", path.display(), n + 1))?);
    }
    Ok(items)
}

fn lookup_item(args: &[String], cmd: &str) -> Result<Item> {
    let (Some(index), Some(id)) = (args.first(), args.get(1)) else {
        bail!("{} needs <index> <id> [type]", cmd);
    };
    let mut item = Item::new(id.as_str()).with("index", index.as_str());
    if let Some(doc_type) = args.get(2) {
        item = item.with("type", doc_type.as_str());
    }
    Ok(item)
}

async fn cmd_search(es: &ElasticSearch, args: &[String]) -> Result<()> {
    let query = parse_search(args)?;
    let results = es.search(query).await?;
    info!(
        total = results.total(),
        page = results.pager.current_page(),
        pages = results.pager.page_count(),
        elapsed_ms = results.elapsed.as_millis(),
        "search finished"
    );
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

async fn cmd_add(es: &ElasticSearch, config: &Config, args: &[String]) -> Result<()> {
    let path = args.first().map(PathBuf::from).ok_or_else(|| anyhow!("add needs a .jsonl file"))?;
    let mut batch_size: usize = config.get_or("cli.batch", DEFAULT_BATCH)?;
    if let Some(pos) = args.iter().position(|a| a == "--batch") {
        batch_size = flag_value(args, pos, "--batch")?.parse().context("--batch")?;
    }
    if batch_size == 0 { bail!("--batch must be positive"); }

    let items = read_items(&path)?;
    if items.is_empty() { println!("No items in {}", path.display()); return Ok(()); }
    let total = items.len();
    info!(total, batch_size, file = %path.display(), "adding items");

    let pb = ProgressBar::new(total as u64);
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} items ({percent}%) {msg}")?.progress_chars("#>-"));
    let mut rejected = 0usize;
    let mut pending = items.into_iter().peekable();
    while pending.peek().is_some() {
        let batch: Vec<Item> = pending.by_ref().take(batch_size).collect();
        let len = batch.len();
        match es.add(batch).await {
            Ok(()) => {}
            Err(searchkit_core::Error::PartialBatch { failed, .. }) => {
                warn!(failed, "batch partially rejected");
                rejected += failed;
            }
            Err(e) => { pb.abandon_with_message("failed"); return Err(e.into()); }
        }
        pb.inc(len as u64);
    }
    pb.finish_with_message("done");
    println!("Added {} of {} items", total - rejected, total);
    Ok(())
}

async fn cmd_present(es: &ElasticSearch, args: &[String]) -> Result<()> {
    let item = lookup_item(args, "present")?;
    let found = es.try_present(&item).await?;
    println!("{}", if found { "present" } else { "absent" });
    Ok(())
}

async fn cmd_delete(es: &ElasticSearch, args: &[String]) -> Result<()> {
    let item = lookup_item(args, "delete")?;
    let deleted = es.try_remove_by_id(&item).await?;
    println!("{}", if deleted { "deleted" } else { "not found" });
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let (config_path, cmd, args) = parse_args();
    let config = match config_path {
        Some(path) => Config::from_file(&path),
        None => Config::load(),
    }
    .map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let es = ElasticSearch::from_config(&config.engine()?)?;

    match cmd.as_str() {
        "search" => cmd_search(&es, &args).await,
        "add" => cmd_add(&es, &config, &args).await,
        "present" => cmd_present(&es, &args).await,
        "delete" => cmd_delete(&es, &args).await,
        _ => { eprintln!("{}", USAGE); std::process::exit(1); }
    }
}
