// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Fetch the page and audit it (structure + every link)
// 3. Print the report as a table or JSON
// 4. Exit with proper code (0 = success, 1 = broken links, 2 = error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - page analysis and link checking
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - runtime options
mod error; // src/error.rs - audit error types
mod fetch; // src/fetch.rs - downloading the page

use std::sync::Arc;

use anyhow::Result;
use clap::Parser; // Parser trait enables the parse() method
use tracing_subscriber::EnvFilter;

use checker::{AnalysisResult, HttpProbe, LinkProbe};
use cli::Cli;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err = the page could not be audited
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = cli.config();
    let address = fetch::parse_address(&cli.address)?;
    let client = config.http_client().map_err(error::AuditError::from)?;

    if !cli.json {
        println!("🔍 Auditing page: {}", address);
    }

    let page = fetch::fetch_page(&client, &address).await?;

    // The same client (and so the same timeout) is used for every link probe
    let probe: Arc<dyn LinkProbe> = Arc::new(HttpProbe::new(client));
    let report = checker::audit_page(page.url, &page.body, probe, config.max_concurrency).await;

    print_report(&report, cli.json)?;

    if report.broken_links > 0 {
        Ok(1) // Exit code 1 = broken links found
    } else {
        Ok(0) // Exit code 0 = all good
    }
}

// Logs go to stderr so --json output on stdout stays parseable.
// RUST_LOG wins over --verbose when it is set.
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &AnalysisResult, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_summary(report);
        print_table(report);
    }
    Ok(())
}

fn print_summary(report: &AnalysisResult) {
    println!();
    println!("📄 Address:      {}", report.address);
    println!("🏷️  Title:        {}", report.title);
    println!("📜 HTML version: {}", report.version);
    println!(
        "🔐 Login form:   {}",
        if report.login_form { "yes" } else { "no" }
    );
    println!("📑 Headings:");
    for (level, count) in report.headings.iter().enumerate() {
        println!("   h{}: {}", level + 1, count);
    }
    println!();
}

// Prints every link as a human-readable table in the terminal
fn print_table(report: &AnalysisResult) {
    println!("{:<60} {:<10} {:<10}", "URL", "SCOPE", "STATUS");
    println!("{}", "=".repeat(82));

    for link in &report.links {
        // The resolved URL is empty when the href could not be parsed
        let shown = if link.full_path.is_empty() {
            &link.url
        } else {
            &link.full_path
        };

        // Truncate URL if too long for display
        let url_display = if shown.chars().count() > 57 {
            format!("{}...", shown.chars().take(57).collect::<String>())
        } else {
            shown.clone()
        };

        let scope = if link.is_external { "external" } else { "internal" };
        let status = if link.is_broken { "❌ BROKEN" } else { "✅ OK" };

        println!("{:<60} {:<10} {:<10}", url_display, scope, status);
    }

    println!();
    println!("📊 Summary:");
    println!("   🏠 Internal: {}", report.internal_links);
    println!("   🌐 External: {}", report.external_links);
    println!("   ❌ Broken: {}", report.broken_links);
    println!("   📋 Total: {}", report.total_links);
}
