use clap::Parser;
use std::sync::Arc;
use vinyl_stats::{
    analyzers::{
        collection::{AggregateStats, CollectionAnalyzer},
        tracks::{format_clock, label_counts, TrackAnalyzer},
        Bucket,
    },
    cli::commands::{Cli, Commands},
    discogs::{CollectionFetcher, DiscogsClient},
    normalize::record::RecordNormalizer,
    server,
    tracks::{DurationOverrides, TrackFilter, TrackLoader},
    utils::{
        file_ops::{load_collection, write_json},
        reporting::Reporter,
    },
    VinylError,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> vinyl_stats::Result<()> {
    match command {
        Commands::Serve(args) => {
            let config = args.server_config();
            println!("=== Starting vinyl-stats server on {} ===", config.bind);
            server::serve(config).await
        }

        Commands::Fetch {
            username,
            discogs,
            output,
            report,
        } => {
            let token = discogs
                .token
                .as_deref()
                .filter(|t| !t.is_empty())
                .ok_or(VinylError::MissingToken)?;
            let settings = discogs.fetch_settings();
            let client = DiscogsClient::new(token, &settings)?;
            let fetcher = CollectionFetcher::new(Arc::new(client), settings);

            println!("=== Fetching Discogs collection for {} ===", username);
            let fetch = fetcher.fetch_all(&username).await?;
            println!(
                "Fetched {} releases from {}/{} pages",
                fetch.releases.len(),
                fetch.pages_fetched,
                fetch.total_pages
            );
            if let Some(failure) = &fetch.stopped_at {
                println!("Stopped early at page {}: {}", failure.page, failure.reason);
            }

            if let Some(output) = output {
                write_json(&output, &fetch.releases)?;
                println!("Releases saved to: {}", output.display());
            }

            let records = RecordNormalizer::normalize_releases(&fetch.releases);
            let stats = CollectionAnalyzer::new().analyze(&records);
            print_stats(&stats);

            if let Some(report) = report {
                Reporter::new().generate_collection_report(&stats, &report)?;
                println!("Report saved to: {}", report.display());
            }
            Ok(())
        }

        Commands::Stats {
            input,
            report,
            export,
            json,
        } => {
            let records = load_collection(&input)?;
            let stats = CollectionAnalyzer::new().analyze(&records);

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("=== Collection Statistics: {} ===", input.display());
                print_stats(&stats);
            }

            let reporter = Reporter::new();
            if let Some(report) = report {
                reporter.generate_collection_report(&stats, &report)?;
                println!("Report saved to: {}", report.display());
            }
            if let Some(export) = export {
                reporter.export_records(&records, &export)?;
                println!("Normalized records saved to: {}", export.display());
            }
            Ok(())
        }

        Commands::Tracks {
            input,
            overrides,
            filter,
            report,
        } => {
            let overrides = match overrides {
                Some(path) => DurationOverrides::from_csv_path(path)?,
                None => DurationOverrides::new(),
            };
            let tracks = TrackLoader::from_path(&input, &overrides)?;
            let active = filter.to_filter(&TrackFilter::defaults_for(&tracks));
            let filtered = active.apply(&tracks);
            let summary = TrackAnalyzer::new().summarize(&filtered);

            println!("=== Track Summary: {} ===", input.display());
            println!(
                "Years {}-{}, up to {} min",
                active.year_min, active.year_max, active.max_minutes
            );
            println!("Tracks: {} of {}", summary.track_count, tracks.len());
            println!("Artists: {}", summary.unique_artists);
            println!("Total playtime: {}", summary.total_playtime());
            println!("Avg length: {}", summary.average_length());

            println!("\nTop artists:");
            for artist in &summary.top_artists {
                println!("  {:<40} {}", artist.name, artist.count);
            }
            println!("\nLongest tracks:");
            for track in &summary.longest {
                let secs = u64::from(track.secs.unwrap_or_default());
                println!(
                    "  {:>6}  {} - {}",
                    format_clock(secs),
                    track.artist,
                    track.title
                );
            }
            println!("\nLabels:");
            print_buckets(&label_counts(&tracks));

            if let Some(report) = report {
                Reporter::new().generate_track_report(&summary, &report)?;
                println!("Report saved to: {}", report.display());
            }
            Ok(())
        }
    }
}

fn print_stats(stats: &AggregateStats) {
    let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());

    println!("Total records: {}", stats.total);
    println!("Unique artists: {}", stats.unique_artists);
    println!(
        "Median / average year: {} / {}",
        or_dash(stats.median_year.map(|y| y.to_string())),
        or_dash(stats.avg_year.map(|y| format!("{:.1}", y)))
    );

    let sections: [(&str, &[Bucket]); 6] = [
        ("By decade", &stats.by_decade),
        ("By year", &stats.by_year),
        ("By format", &stats.by_format),
        ("By country", &stats.by_country),
        ("Top labels", &stats.top_labels),
        ("Top artists", &stats.top_artists),
    ];
    for (title, buckets) in sections {
        if buckets.is_empty() {
            continue;
        }
        println!("\n{}:", title);
        print_buckets(buckets);
    }
}

fn print_buckets(buckets: &[Bucket]) {
    for bucket in buckets {
        println!("  {:<40} {}", bucket.name, bucket.value);
    }
}
