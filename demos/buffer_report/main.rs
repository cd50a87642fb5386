//! Buffer report: buffers a handful of geometries and prints a summary.
//!
//! Usage:
//! ```text
//! cargo run --example buffer_report
//! RUST_LOG=geodesic_buffer=debug cargo run --example buffer_report
//! ```

use geodesic_buffer::kernel::OverlayKernel;
use geodesic_buffer::math::Point2;
use geodesic_buffer::operations::buffer::{BufferCursor, NoProgress};
use geodesic_buffer::operations::densify::GeodesicDensify;
use geodesic_buffer::operations::query::GeodeticLength;
use geodesic_buffer::{
    BufferOptions, Envelope, GeodesicBuffer, GeodesicError, Geometry, Polygon, Polyline,
};

fn report(label: &str, polygon: &Polygon) {
    println!(
        "{label:<24} rings={:<3} points={:<5} area={:.6} deg^2",
        polygon.ring_count(),
        polygon.point_count(),
        polygon.area()
    );
}

fn main() -> Result<(), GeodesicError> {
    // Default: WARN for everything, INFO for geodesic_buffer.
    // Override with RUST_LOG env var (e.g. RUST_LOG=geodesic_buffer=trace).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("geodesic_buffer=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let kernel = OverlayKernel::new();
    let options = BufferOptions::default().with_max_deviation(1.0);

    let point = GeodesicBuffer::new(Point2::new(139.767, 35.681), 1000.0)
        .with_options(options)
        .execute(&kernel, &mut NoProgress)?;
    report("point 1 km", &point);

    let line = Polyline::from_points(vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(2.0, 0.0),
    ]);
    let corridor = GeodesicBuffer::new(line.clone(), 5000.0)
        .with_options(options)
        .execute(&kernel, &mut NoProgress)?;
    report("polyline 5 km", &corridor);

    let square = Polygon::from_rings(vec![vec![
        Point2::new(10.0, 50.0),
        Point2::new(11.0, 50.0),
        Point2::new(11.0, 51.0),
        Point2::new(10.0, 51.0),
    ]]);
    for distance in [-10_000.0, 10_000.0] {
        let result = GeodesicBuffer::new(square.clone(), distance)
            .with_options(options)
            .execute(&kernel, &mut NoProgress)?;
        report(&format!("polygon {} km", distance / 1000.0), &result);
    }

    let envelope = Envelope::new(-5.0, -5.0, 5.0, 5.0);
    let shrunk = GeodesicBuffer::new(envelope, -50_000.0).execute(&kernel, &mut NoProgress)?;
    report("envelope -50 km", &shrunk);

    // Stop at the second poll to show cancellation.
    let mut polls = 0;
    let mut tracker = || {
        polls += 1;
        polls < 2
    };
    let fine = BufferOptions::default()
        .with_max_deviation(0.001)
        .with_max_vertices_in_full_circle(100_000);
    match GeodesicBuffer::new(line.clone(), 100_000.0)
        .with_options(fine)
        .execute(&kernel, &mut tracker)
    {
        Ok(result) => report("fine polyline", &result),
        Err(e) if e.is_cancelled() => println!("{:<24} cancelled", "fine polyline"),
        Err(e) => return Err(e),
    }

    let inputs = vec![
        Geometry::Point(Point2::new(0.0, 0.0)),
        Geometry::Point(Point2::new(0.5, 0.0)),
        Geometry::Polyline(line.clone()),
    ];
    let mut tracker = NoProgress;
    let cursor = BufferCursor::new(inputs, vec![20_000.0, 40_000.0], &kernel, &mut tracker)?
        .with_options(options.with_union_results(true));
    for merged in cursor {
        report("cursor union", &merged?);
    }

    let line = Geometry::Polyline(line);
    let length = GeodeticLength::new(&line).execute();
    println!("{:<24} {length:.3} m", "polyline length");

    let densified = GeodesicDensify::new(&line, 10_000.0).execute()?;
    if let Geometry::Polyline(densified) = &densified {
        println!("{:<24} points={}", "densified 10 km", densified.point_count());
    }
    let densified_length = GeodeticLength::new(&densified).execute();
    println!("{:<24} {densified_length:.3} m", "densified length");

    Ok(())
}
