use std::env;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use track51_rs::{CreateTrackingRequest, Track, TrackingClient, TracksQueryParams};

fn usage(program: &str) -> ! {
    eprintln!("Usage:");
    eprintln!("  {} create <tracking_number> <courier_code> [order_number]", program);
    eprintln!("  {} get <tracking_numbers> [items_amount]", program);
    eprintln!("  tracking_numbers: comma-separated (e.g., NUM1,NUM2,NUM3)");
    eprintln!("Environment: TRACK51_API_KEY (required), TRACK51_BASE_URL, TRACK51_PROXY, TRACK51_TIMEOUT_SECS");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "track51=info,track51_rs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("track51");
    let command = args.get(1).map(String::as_str);

    match command {
        Some("create") if args.len() >= 4 => {
            let client = TrackingClient::from_env().context("Failed to initialize client")?;
            let mut request = CreateTrackingRequest::new(&args[2], &args[3]);
            if let Some(order_number) = args.get(4) {
                request = request.order_number(order_number);
            }
            create(&client, request).await
        }
        Some("get") if args.len() >= 3 => {
            let numbers: Vec<&str> = args[2].split(',').collect();
            let items_amount = match args.get(3) {
                Some(s) => s
                    .parse()
                    .with_context(|| format!("Invalid items_amount: {}", s))?,
                None => 40,
            };
            let client = TrackingClient::from_env().context("Failed to initialize client")?;
            let params = TracksQueryParams::with_tracking_numbers(&numbers).items_amount(items_amount);
            get(&client, &params).await
        }
        _ => usage(program),
    }
}

async fn create(client: &TrackingClient, request: CreateTrackingRequest) -> Result<()> {
    let result = client.create(request).await.context("Create failed")?;

    for item in &result.success {
        println!("Created: {} ({})", item.tracking_number, item.courier_code);
    }
    for item in &result.error {
        println!("Rejected: {} ({})", item.tracking_number, item.courier_code);
    }
    Ok(())
}

async fn get(client: &TrackingClient, params: &TracksQueryParams) -> Result<()> {
    let page = client.all(params).await.context("Query failed")?;

    println!("Found {} package(s)", page.items.len());
    for track in &page.items {
        print_track(track);
    }
    if !page.is_last_page {
        println!("\nMore results may be available on the next page.");
    }
    Ok(())
}

fn print_track(track: &Track) {
    println!("\nTracking: {} ({})", track.tracking_number, track.courier_code);
    println!("  Status: {}", track.status());
    if let Some(days) = track.transit_time {
        println!("  Transit time: {} day(s)", days);
    }

    match track.origin_info.latest_checkpoint() {
        Some(checkpoint) => {
            println!(
                "  Latest: {} - {}",
                checkpoint.checkpoint_date.as_deref().unwrap_or("N/A"),
                checkpoint.tracking_detail.as_deref().unwrap_or("N/A")
            );
            if let Some(location) = checkpoint.location.as_deref().filter(|l| !l.is_empty()) {
                println!("  Location: {}", location);
            }
        }
        None => println!("  No checkpoints yet"),
    }
}
