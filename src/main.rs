mod combined;
mod config;
mod feed;
mod http;
mod item;
mod merge;
mod page;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::Parser;

use crate::page::RenderPage;

/// Fetch the subscribed feeds and publish a merged page plus a combined
/// feed document.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Newline-separated list of feed URLs
    #[arg(long, default_value = "feeds.txt")]
    feeds: PathBuf,

    /// Directory the page and combined feed are written to
    #[arg(long, default_value = "docs")]
    output: PathBuf,

    /// Directory holding the optional page template and stylesheet
    #[arg(long, default_value = "templates")]
    templates: PathBuf,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let cfg = config::Config::from_env();
    let sources = config::read_feed_list(&args.feeds)?;
    fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let client = http::http_client(cfg.timeout)?;
    let outcome = merge::merge(
        &client,
        &sources,
        cfg.retry_policy(),
        cfg.max_per_feed,
        cfg.max_total,
    );

    let renderer = page::select_renderer(&args.templates)?;
    let ctx = page::PageContext {
        site_title: &cfg.site_title,
        site_url: &cfg.site_url,
        items: &outcome.items,
        source_count: sources.len(),
        generated_at: Local::now(),
    };
    let page_path = args.output.join("index.html");
    fs::write(&page_path, renderer.render(&ctx)?)
        .with_context(|| format!("failed to write {}", page_path.display()))?;
    copy_stylesheet(args)?;

    let channel = combined::build_channel(&cfg.site_title, &cfg.site_url, &outcome.items);
    let feed_path = args.output.join("combined.xml");
    combined::write_combined(&feed_path, &channel)?;

    println!(
        "OK: items={}, feeds={}, failed={}",
        outcome.items.len(),
        sources.len(),
        outcome.failed
    );
    println!("- page: {}", page_path.display());
    println!("- combined feed: {}", feed_path.display());

    Ok(())
}

/// The stylesheet rides along with the template: copied only when a
/// template is in use and a style.css sits next to it.
fn copy_stylesheet(args: &Args) -> anyhow::Result<()> {
    if !args.templates.join("index.html").exists() {
        return Ok(());
    }
    let css = args.templates.join("style.css");
    if css.exists() {
        fs::copy(&css, args.output.join("style.css"))
            .with_context(|| format!("failed to copy {}", css.display()))?;
    }
    Ok(())
}
