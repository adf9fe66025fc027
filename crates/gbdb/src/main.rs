use std::{process, thread, time::Instant};

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use gbdb::{
    catalog::{CatalogStats, base_title, read_catalog, search, write_catalog},
    config::{BuildArgs, Cli, Command, REQUEST_TIMEOUT, SearchArgs},
    fetch::HttpSource,
    harvest,
    listing::discover,
    pool::CancelToken,
    progress::Progress,
};

/// Exit status after a second Ctrl+C.
const EXIT_INTERRUPTED: i32 = 130;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Build(args) => build(&args),
        Command::Search(args) => lookup(&args),
    }
}

fn build(args: &BuildArgs) -> anyhow::Result<()> {
    println!("\n================================");
    println!("  GB ROM Database Builder");
    println!("================================\n");

    let config = args.harvest_config()?;
    if args.config.is_some() {
        info!("Loaded {} URLs from config file", config.urls.len());
    }

    let cancel = CancelToken::new();
    spawn_interrupt_handler(cancel.clone())?;

    let source = HttpSource::new(REQUEST_TIMEOUT);

    println!("Fetching directory listings... (This may take a minute)");
    let entries = discover(&source, &config.urls, config.skip_bios);
    if cancel.is_cancelled() {
        warn!("Interrupted while fetching listings, nothing written");
        return Ok(());
    }
    println!("\nFound {} total ZIP files\n", entries.len());
    if entries.is_empty() {
        warn!("No archives found, nothing written");
        return Ok(());
    }

    println!("{}", "=".repeat(70));
    println!(
        " Processing {} ROM files. Press Ctrl+C at any time to cancel.",
        entries.len()
    );
    println!("{}\n", "=".repeat(70));

    let mut progress = Progress::new(entries.len());
    let report = harvest(&source, entries, &config, &cancel, |_, _| {
        if let Some(line) = progress.tick(Instant::now()) {
            eprint!("\r{line}");
        }
    })?;
    eprintln!();

    if report.cancelled {
        warn!(
            "Interrupted after {} archives, writing partial results",
            progress.completed()
        );
    }
    info!(
        "{} archives: {} empty, {} corrupt, {} failed downloads, {} undecodable images",
        report.archives,
        report.empty_archives,
        report.corrupt_archives,
        report.failed_downloads,
        report.image_failures
    );

    println!(
        "\nWriting {} records to {}",
        report.records.len(),
        args.output.display()
    );
    write_catalog(&args.output, &report.records)
        .with_context(|| format!("writing catalog {}", args.output.display()))?;
    println!("\nDone! ROM data written to {}", args.output.display());

    let stats = CatalogStats::from_records(&report.records);
    println!("\nDatabase Statistics:");
    println!("  Total ROMs: {}", stats.total);
    for (ext, count) in &stats.by_extension {
        println!("  {ext} files: {count}");
    }

    Ok(())
}

fn lookup(args: &SearchArgs) -> anyhow::Result<()> {
    let records = read_catalog(&args.catalog)
        .with_context(|| format!("reading catalog {}", args.catalog.display()))?;
    let hits = search(&records, &args.query, args.limit);
    if hits.is_empty() {
        println!("No matches for \"{}\"", args.query);
        return Ok(());
    }

    for record in hits {
        println!(
            "{}  [{}] {} {} {}",
            base_title(&record.filename),
            record.region,
            record.cgb_flag,
            record.mapper,
            record.rom_filename
        );
    }
    Ok(())
}

/// First Ctrl+C cancels the harvest so partial results get written; a second
/// one exits immediately.
fn spawn_interrupt_handler(cancel: CancelToken) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building signal runtime")?;

    thread::Builder::new()
        .name("gbdb-signal".into())
        .spawn(move || {
            runtime.block_on(async {
                if tokio::signal::ctrl_c().await.is_err() {
                    return;
                }
                eprintln!("\n\nProcess interrupted by user! Finishing running downloads...");
                cancel.cancel();

                if tokio::signal::ctrl_c().await.is_ok() {
                    process::exit(EXIT_INTERRUPTED);
                }
            });
        })
        .context("spawning signal thread")?;
    Ok(())
}
