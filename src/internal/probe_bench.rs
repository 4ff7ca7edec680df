#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::indexing_slicing)]

use std::time::{Duration, Instant};

use env_logger::Builder;
use log::{LevelFilter, info};
use plotters::prelude::*;
use probing::{ProbeMethod, ProbingHashTable, TableStats};
use rand::{Rng, distr::Alphanumeric};

// Batch sizes 100, 300, ... 4900
const FIRST_BATCH: usize = 100;
const LAST_BATCH: usize = 5000;
const BATCH_STEP: usize = 200;
const KEY_LENGTH: usize = 8;
// Dash and gap lengths of the reference line, in keys
const DASH: f64 = 60.0;
const GAP: f64 = 40.0;

const METHODS: [ProbeMethod; 2] = [ProbeMethod::Linear, ProbeMethod::Quadratic];

/// One measured batch for one probing method
#[derive(Debug, Clone, Copy)]
struct Sample {
    keys: usize,
    insert_time: Duration,
    stats: TableStats,
}

fn init_logger() {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Info).format_timestamp_millis().parse_default_env();
    if let Err(err) = builder.try_init() {
        eprintln!("logger not installed: {err}");
    }
}

// Random ASCII letter keys
fn random_keys(rng: &mut impl Rng, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            (&mut *rng)
                .sample_iter(Alphanumeric)
                .filter(u8::is_ascii_alphabetic)
                .take(KEY_LENGTH)
                .map(char::from)
                .collect()
        })
        .collect()
}

fn measure(method: ProbeMethod, keys: &[String]) -> Sample {
    let mut table = ProbingHashTable::new(method);
    let start = Instant::now();
    for key in keys {
        table.insert(key.clone(), key.clone());
    }
    let insert_time = start.elapsed();
    Sample { keys: keys.len(), insert_time, stats: table.stats() }
}

fn print_example() {
    println!("--- Hash table demo ---");
    let mut table = ProbingHashTable::new(ProbeMethod::Linear);
    table.insert("apple", 100);
    table.insert("banana", 200);
    table.insert("cherry", 300);

    println!("Search 'banana': {:?} (expected 200)", table.search("banana"));
    println!("Total collisions: {}", table.total_collisions());
    println!("Table size: {}", table.capacity());
}

fn draw_chart(
    path: &str,
    caption: &str,
    y_desc: &str,
    series: &[(ProbeMethod, Vec<(f64, f64)>)],
    reference: Option<(&str, f64)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_x = LAST_BATCH as f64;
    let max_y = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|&(_, y)| y))
        .chain(reference.map(|(_, slope)| slope * max_x))
        .fold(0.0, f64::max) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..max_x, 0.0..max_y.max(f64::EPSILON))?;

    chart
        .configure_mesh()
        .x_desc("Number of keys (N)")
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    let colors = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];
    for (i, (method, points)) in series.iter().enumerate() {
        let style = ShapeStyle::from(&colors[i % colors.len()]).stroke_width(2);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), style))?
            .label(method.to_string())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, style.filled())))?;
    }

    // Dashed straight line through the origin, y = slope * x
    if let Some((label, slope)) = reference {
        let style = ShapeStyle::from(&BLACK.mix(0.6)).stroke_width(1);
        let mut dashes = Vec::new();
        let mut start = 0.0;
        while start < max_x {
            let end = (start + DASH).min(max_x);
            dashes.push(vec![(start, slope * start), (end, slope * end)]);
            start = end + GAP;
        }
        chart
            .draw_series(dashes.into_iter().map(|dash| PathElement::new(dash, style)))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    print_example();

    println!("\n--- Running insert benchmark ---");
    let mut rng = rand::rng();
    let mut results: Vec<(ProbeMethod, Vec<Sample>)> =
        METHODS.iter().map(|&method| (method, Vec::new())).collect();

    for n in (FIRST_BATCH..LAST_BATCH).step_by(BATCH_STEP) {
        let keys = random_keys(&mut rng, n);
        for (method, samples) in &mut results {
            let sample = measure(*method, &keys);
            info!(
                "{method}: {} keys in {:?}, capacity {}, collisions {}, resizes {}",
                sample.keys,
                sample.insert_time,
                sample.stats.capacity,
                sample.stats.total_collisions,
                sample.stats.resize_count
            );
            samples.push(sample);
        }
    }

    let times: Vec<(ProbeMethod, Vec<(f64, f64)>)> = results
        .iter()
        .map(|(method, samples)| {
            let points =
                samples.iter().map(|s| (s.keys as f64, s.insert_time.as_secs_f64())).collect();
            (*method, points)
        })
        .collect();
    // O(N) line scaled to the largest linear probing batch
    let slope = times
        .iter()
        .find(|(method, _)| *method == ProbeMethod::Linear)
        .and_then(|(_, points)| points.last())
        .map(|&(n, secs)| secs / n);
    draw_chart(
        "insert_time.png",
        "Insert time per batch",
        "Time (seconds)",
        &times,
        slope.map(|slope| ("Theoretical O(N)", slope)),
    )?;

    let collisions: Vec<(ProbeMethod, Vec<(f64, f64)>)> = results
        .iter()
        .map(|(method, samples)| {
            let points = samples
                .iter()
                .map(|s| (s.keys as f64, s.stats.total_collisions as f64))
                .collect();
            (*method, points)
        })
        .collect();
    draw_chart(
        "collisions.png",
        "Collisions since last resize",
        "Collisions",
        &collisions,
        None,
    )?;

    println!("Generated plot images: insert_time.png, collisions.png");
    Ok(())
}
