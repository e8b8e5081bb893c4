use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::debug;
use roadnet;

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct MapLoadError(PathBuf, #[source] roadnet::load::Error);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    /// Fewest road segments, ignoring lengths
    Bfs,

    /// Shortest total length
    Dijkstra,

    /// Shortest total length, directed towards the goal
    AStar,
}

#[derive(Parser)]
struct Cli {
    /// The path to the road-map CSV file (optionally .gz or .bz2 compressed)
    map_file: PathBuf,

    /// Latitude of the start point
    start_lat: f64,

    /// Longitude of the start point
    start_lon: f64,

    /// Latitude of the end point
    end_lat: f64,

    /// Longitude of the end point
    end_lon: f64,

    /// The search algorithm to run
    #[arg(long, value_enum, default_value = "a-star")]
    algorithm: Algorithm,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let g = load_graph(&cli.map_file)?;

    let start = g
        .find_nearest_vertex(cli.start_lat, cli.start_lon)
        .expect("no vertex corresponding to the given start position");

    let end = g
        .find_nearest_vertex(cli.end_lat, cli.end_lon)
        .expect("no vertex corresponding to the given end position");

    let mut expanded: usize = 0;
    let route = match cli.algorithm {
        Algorithm::Bfs => g.bfs_with_observer(start, end, |_| expanded += 1)?,
        Algorithm::Dijkstra => g.dijkstra_with_observer(start, end, |_| expanded += 1)?,
        Algorithm::AStar => g.a_star_with_observer(start, end, |_| expanded += 1)?,
    };
    debug!("expanded {} intersections", expanded);

    let Some(route) = route else {
        return Err(format!("no route from {} to {}", start, end).into());
    };

    println!("{{");
    println!("  \"type\": \"FeatureCollection\",");
    println!("  \"features\": [");
    println!("    {{");
    println!("      \"type\": \"Feature\",");
    println!("      \"properties\": {{}},");

    println!("      \"geometry\": {{");
    println!("        \"type\": \"LineString\",");
    println!("        \"coordinates\": [");

    let mut points = route.iter().peekable();
    while let Some(point) = points.next() {
        let suffix = if points.peek().is_some() { "," } else { "" };
        println!("          [{}, {}]{}", point.lon, point.lat, suffix);
    }

    println!("        ]");
    println!("      }}");
    println!("    }}");
    println!("  ]");
    println!("}}");

    Ok(())
}

fn load_graph<P: AsRef<Path>>(path: P) -> Result<roadnet::Graph, MapLoadError> {
    let mut g = roadnet::Graph::new();
    match roadnet::load::add_roads_from_file(&mut g, roadnet::load::FileFormat::Unknown, path.as_ref())
    {
        Ok(_) => Ok(g),
        Err(e) => Err(MapLoadError(PathBuf::from(path.as_ref()), e)),
    }
}
