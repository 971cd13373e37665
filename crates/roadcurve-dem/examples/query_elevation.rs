//! Example: Query elevation from a directory of DEM tiles.
//!
//! Usage: cargo run --example query_elevation -- <lat> <lon> [dem_dir]

use roadcurve_dem::{Coverage, ElevationSurface, SurfaceOptions};
use std::env;
use std::time::Instant;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <lat> <lon> [dem_dir]", args[0]);
        eprintln!("Example: {} 50.94 6.96 ./dem", args[0]);
        std::process::exit(1);
    }

    let lat: f64 = args[1].parse().expect("Invalid latitude");
    let lon: f64 = args[2].parse().expect("Invalid longitude");
    let dem_dir = args.get(3).map(|s| s.as_str()).unwrap_or("dem");

    let coverage = Coverage::default();
    println!("Loading {} DEM tiles from {}...", coverage.tile_count(), dem_dir);
    let start = Instant::now();

    let surface = match ElevationSurface::build(dem_dir, coverage, &SurfaceOptions::default()) {
        Ok(surface) => surface,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    println!("Loaded {} tiles in {:.3}s", surface.tile_count(), start.elapsed().as_secs_f64());

    if !surface.contains(lat, lon) {
        println!("({}, {}) is outside the loaded coverage; reporting the default elevation", lat, lon);
    }

    let query_start = Instant::now();
    let elevation = surface.elevation_at(lat, lon);
    println!(
        "Elevation: {:.2} meters ({:.6}s)",
        elevation,
        query_start.elapsed().as_secs_f64()
    );
}
