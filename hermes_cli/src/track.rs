use std::{fs::File, io::BufReader, path::Path, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use hermes_tracking::{
    geometry::point::{Point, SpatialReference},
    json::types::JsonRoute,
    params::{AggregationScope, FractionMethod, TrackerParams},
    progress::state::ProgressState,
    route::{leg::DEFAULT_CONTIGUITY_TOLERANCE, route::Route},
    tracker::RouteTracker,
};
use jiff::{SignedDuration, fmt::friendly::SpanPrinter};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::parsers;

#[derive(Args)]
pub struct TrackArgs {
    /// Route document, see `hermes schema`
    #[arg(short, long)]
    route: PathBuf,

    /// JSON array of `[x, y]` location samples
    #[arg(short, long)]
    locations: PathBuf,

    /// Spatial reference of the samples, defaults to the route's
    #[arg(long)]
    wkid: Option<u32>,

    /// Count the remaining legs towards the destination (`route`) or only the current one (`leg`)
    #[arg(long, env = "HERMES_TRACKING_SCOPE", default_value = "leg")]
    scope: AggregationScope,

    #[arg(long, default_value = "vertex")]
    fraction: FractionMethod,

    /// Largest gap in map units allowed between consecutive segments of a leg
    #[arg(long, default_value_t = DEFAULT_CONTIGUITY_TOLERANCE)]
    contiguity_tolerance: f64,

    /// Stop on the first sample moving away from the destination
    #[arg(long)]
    strict: bool,

    /// Delay between two samples (e.g., "1s", "250ms")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    interval: Option<SignedDuration>,

    /// Print one JSON object per sample instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct TrackedSample<'a> {
    sample: usize,
    #[serde(flatten)]
    state: &'a ProgressState,
}

pub async fn run(args: TrackArgs) -> Result<(), anyhow::Error> {
    let params = TrackerParams {
        aggregation_scope: args.scope,
        fraction_method: args.fraction,
        strict_monotonicity: args.strict,
        ..TrackerParams::default()
    };

    let route = read_route(&args.route, args.contiguity_tolerance)?;
    let spatial_reference = args
        .wkid
        .map(SpatialReference::new)
        .or(route.spatial_reference())
        .unwrap_or(SpatialReference::WEB_MERCATOR);
    let samples = read_samples(&args.locations, spatial_reference)?;

    info!(
        "Tracking {} samples along {} legs ({})",
        samples.len(),
        route.legs().len(),
        route.length()
    );

    let mut tracker = RouteTracker::new(Arc::new(route), params)?;

    // A single consumer keeps the updates serialized.
    let (sender, mut receiver) = mpsc::channel::<Point>(16);
    let interval = args.interval;
    let producer = tokio::spawn(async move {
        for sample in samples {
            if sender.send(sample).await.is_err() {
                break;
            }

            if let Some(interval) = interval {
                tokio::time::sleep(interval.unsigned_abs()).await;
            }
        }
    });

    let mut table = progress_table();
    let mut sample_index = 0;
    let mut failure = None;

    while let Some(location) = receiver.recv().await {
        match tracker.update(&location) {
            Ok(state) => {
                let state = state.rounded();
                if args.json {
                    println!(
                        "{}",
                        serde_json::to_string(&TrackedSample {
                            sample: sample_index,
                            state: &state,
                        })?
                    );
                } else {
                    table.add_row(progress_row(sample_index, &state));
                }
            }
            Err(error) if args.strict => {
                failure = Some(anyhow::Error::new(error).context(format!(
                    "Sample {sample_index} at ({}, {})",
                    location.x(),
                    location.y()
                )));
                break;
            }
            Err(error) => warn!(sample = sample_index, "Skipped sample: {error}"),
        }

        sample_index += 1;
    }

    drop(receiver);
    producer.await?;

    if !args.json {
        println!("{table}");
    }

    match failure {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn read_route(path: &Path, contiguity_tolerance: f64) -> Result<Route, anyhow::Error> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let document: JsonRoute = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(document.build_route(contiguity_tolerance)?)
}

fn read_samples(
    path: &Path,
    spatial_reference: SpatialReference,
) -> Result<Vec<Point>, anyhow::Error> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let coordinates: Vec<[f64; 2]> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(coordinates
        .into_iter()
        .map(|[x, y]| Point::new(x, y, spatial_reference))
        .collect())
}

fn progress_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_header(vec![
        "#",
        "Leg",
        "Segment",
        "Remaining",
        "Next maneuver",
        "To maneuver",
        "To destination",
        "Time to maneuver",
        "Time to destination",
        "",
    ]);
    table
}

fn progress_row(sample_index: usize, state: &ProgressState) -> Vec<String> {
    let printer = SpanPrinter::new();

    vec![
        sample_index.to_string(),
        state.leg_index().to_string(),
        state.segment_index().to_string(),
        format!("{:.0}%", state.fraction_remaining() * 100.0),
        state.next_maneuver().text().to_string(),
        format!(
            "{} ({})",
            state.distance_to_next_maneuver(),
            state.miles_to_next_maneuver()
        ),
        format!(
            "{} ({})",
            state.distance_to_destination(),
            state.miles_to_destination()
        ),
        printer.duration_to_string(&state.time_to_next_maneuver()),
        printer.duration_to_string(&state.time_to_destination()),
        match state.inconsistency() {
            Some(_) => "moving away".to_string(),
            None => String::new(),
        },
    ]
}
