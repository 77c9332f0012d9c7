// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Run the crawl (the engine lives in the library, src/lib.rs)
// 3. Print the JSON report or the summary statistics
// 4. Exit with the proper code (0 = all links fine, 1 = failures or the
//    crawl could not start, 2 = usage/internal error)
//
// Ctrl-C handling lives here too: the crawl future races against
// tokio::signal::ctrl_c(), and on interrupt we exit 130 immediately.
// Status lines are written whole (see src/output.rs), so an interrupt can
// never leave a half-written line on stdout.
// =============================================================================

use std::io;
use std::time::Duration;

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;
use clap::Parser;

use linksweep::{
    run_crawl, Cli, CrawlError, CrawlOptions, CrawlReport, PrintMode, StatusWriter,
};

// The #[tokio::main] attribute transforms our async main into a real main
// function: it creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    let exit_code = tokio::select! {
        code = run() => match code {
            Ok(code) => code,
            Err(e) => {
                // An unexpected internal error - not a failed link, not a
                // dead seed, something actually went wrong in the tool
                eprintln!("linksweep: error: {}", e);
                2
            }
        },
        // Interrupt: terminate promptly. Abandoned workers hold no
        // exclusive resources and every status line is already flushed.
        _ = tokio::signal::ctrl_c() => 130,
    };

    std::process::exit(exit_code);
}

// The main application logic
// Returns:
//   Ok(0) = crawl finished, no request failed
//   Ok(1) = some request failed, or the seed could not be fetched
//   Err   = internal error (mapped to exit code 2 above)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let opts = CrawlOptions {
        seed: cli.url.clone(),
        threads: cli.threads,
        // 0 means no timeout
        timeout: if cli.timeout > 0 {
            Some(Duration::from_secs(cli.timeout))
        } else {
            None
        },
        internal: cli.internal,
        external: cli.external,
        follow_redirects: cli.follow_redirects,
        print: if cli.json {
            PrintMode::Silent
        } else if cli.print_all {
            PrintMode::All
        } else {
            PrintMode::FailuresOnly
        },
    };

    let mut out = StatusWriter::new(io::stdout(), cli.newline);

    let report = match run_crawl(&opts, &mut out).await {
        Ok(report) => report,
        Err(e @ CrawlError::Startup { .. }) => {
            // The seed itself was unreachable: report and exit 1, same as
            // a failed request would
            eprintln!("linksweep: error: {}", e);
            return Ok(1);
        }
        Err(e @ CrawlError::NoWorkers)
        | Err(e @ CrawlError::InvalidSeed { .. })
        | Err(e @ CrawlError::UnsupportedScheme { .. }) => {
            // Bad invocation rather than a crawl outcome
            eprintln!("linksweep: error: {}", e);
            return Ok(2);
        }
        Err(e) => return Err(e.into()),
    };

    if cli.json {
        // The whole report as a JSON array on stdout, one object per
        // checked link, instead of status lines
        println!("{}", serde_json::to_string_pretty(&report.records)?);
    }

    if !cli.quiet {
        print_summary(&report);
    }

    Ok(if report.failures > 0 { 1 } else { 0 })
}

// End-of-run statistics, on stderr so stdout stays machine-readable
fn print_summary(report: &CrawlReport) {
    let total = report.internal_links + report.external_links;
    if report.failures > 0 {
        eprintln!(
            "checked {} links ({} internal, {} external), {} failed, in {:.2}s",
            total,
            report.internal_links,
            report.external_links,
            report.failures,
            report.elapsed.as_secs_f64()
        );
    } else {
        eprintln!(
            "checked {} links ({} internal, {} external) in {:.2}s",
            total,
            report.internal_links,
            report.external_links,
            report.elapsed.as_secs_f64()
        );
    }
}
