//! gridwalk demo: generate a grid, search it with BFS and DFS, classify the
//! targets along each path and compare the two runs.

use std::fs;
use std::path::PathBuf;
use std::process;

use gridwalk_core::{Cell, CellKind, Grid, Point};
use gridwalk_gen::{GenConfig, MapGen};
use gridwalk_paths::{Algorithm, GridReport, PathRange};
use gridwalk_stats::{
    AnalysisScope, Classification, ClassificationCache, Classifier, ClassifyError, Comparator,
    RunRecorder, RunStatistics, analyze_outcome, history,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const FLOWERS: [&str; 5] = ["daisy", "rose", "sunflower", "tulip", "flower"];

/// Labels a target by its catalog image name; flower names count as targets.
struct CatalogClassifier<'a> {
    config: &'a GenConfig,
}

impl Classifier for CatalogClassifier<'_> {
    fn classify(&mut self, cell: &Cell) -> Result<Classification, ClassifyError> {
        let image = cell.image.ok_or(ClassifyError::Inconclusive)?;
        let name = self
            .config
            .image_name(image)
            .ok_or_else(|| ClassifyError::Failed(format!("no catalog entry {}", image.0)))?;
        let label = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
        let is_flower = FLOWERS.iter().any(|k| label.contains(k));
        let confidence = if is_flower { 0.9 } else { 0.65 };
        Ok(Classification::new(label, confidence, is_flower))
    }
}

struct Args {
    size: i32,
    seed: u64,
    history: PathBuf,
    config: GenConfig,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} [size] [seed] [history.json] [gen-config.json]");
    eprintln!();
    eprintln!("  size             grid side length (default: 20)");
    eprintln!("  seed             RNG seed (default: random)");
    eprintln!("  history.json     comparison history (default: data/comparisons.json)");
    eprintln!("  gen-config.json  generator parameters (default: built in)");
    eprintln!();
    eprintln!("  --print-config   print the default generator parameters and exit");
    process::exit(1);
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("gridwalk-demo", String::as_str);

    if args.iter().skip(1).any(|a| a == "-h" || a == "--help") {
        usage(program);
    }
    if args.iter().skip(1).any(|a| a == "--print-config") {
        match serde_json::to_string_pretty(&GenConfig::default()) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing config: {e}"),
        }
        process::exit(0);
    }

    let size = match args.get(1) {
        Some(s) => s.parse().unwrap_or_else(|_| usage(program)),
        None => 20,
    };
    let seed = match args.get(2) {
        Some(s) => s.parse().unwrap_or_else(|_| usage(program)),
        None => rand::random(),
    };
    let history = args
        .get(3)
        .map_or_else(|| PathBuf::from("data/comparisons.json"), PathBuf::from);
    let config = match args.get(4) {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {e}");
                process::exit(1);
            });
            serde_json::from_str(&text).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {e}");
                process::exit(1);
            })
        }
        None => GenConfig::default(),
    };

    Args {
        size,
        seed,
        history,
        config,
    }
}

/// First and last selectable cells in row-major order.
fn pick_endpoints(grid: &Grid) -> Option<(Point, Point)> {
    let mut free = grid.iter().filter(|c| c.kind.selectable()).map(Cell::pos);
    let start = free.next()?;
    let goal = free.last()?;
    Some((start, goal))
}

fn run(
    algorithm: Algorithm,
    pr: &mut PathRange,
    grid: &Grid,
    endpoints: (Point, Point),
    classifier: &mut CatalogClassifier<'_>,
    cache: &mut ClassificationCache,
) -> Option<RunStatistics> {
    let outcome = match pr.search(algorithm, grid, endpoints.0, endpoints.1) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{algorithm} rejected: {e}");
            return None;
        }
    };

    let mut rec = RunRecorder::from_outcome(&outcome);
    analyze_outcome(&mut rec, grid, &outcome, AnalysisScope::Path, classifier, cache);
    let stats = rec.finish();

    println!("\n{}", grid.render(Some(&grid.path_mask(&outcome.path))));
    println!("{stats}");
    Some(stats)
}

fn main() {
    env_logger::init();
    let args = parse_args();

    println!("seed {}", args.seed);
    let mut mapgen = MapGen::new(args.config, StdRng::seed_from_u64(args.seed));
    let generated = match mapgen.generate(args.size) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error generating grid: {e}");
            process::exit(1);
        }
    };
    log::info!("generation outcome: {:?}", generated.outcome);
    let mut grid = generated.grid;

    let Some(endpoints) = pick_endpoints(&grid) else {
        eprintln!("Grid has no room for a start and a goal");
        process::exit(1);
    };
    grid.select_point(endpoints.0, CellKind::Start);
    grid.select_point(endpoints.1, CellKind::Goal);
    println!("{grid}");
    println!("{}", GridReport::new(&grid));

    let mut pr = PathRange::new(grid.bounds());
    let mut cache = ClassificationCache::new();
    let mut classifier = CatalogClassifier {
        config: &mapgen.config,
    };

    let runs: Vec<RunStatistics> = Algorithm::ALL
        .into_iter()
        .filter_map(|a| run(a, &mut pr, &grid, endpoints, &mut classifier, &mut cache))
        .collect();
    log::debug!(
        "classification cache: {} entries, {} hits, {} misses",
        cache.len(),
        cache.hits(),
        cache.misses()
    );

    let mut comparator = Comparator::new();
    for stats in &runs {
        comparator.add(stats.name(), stats);
    }
    let comparison = match comparator.compare() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Nothing to compare: {e}");
            process::exit(1);
        }
    };
    println!("\n{comparison}");

    match history::append(&args.history, &comparison) {
        Ok(n) => println!("\nsaved to {} ({n} comparisons)", args.history.display()),
        Err(e) => {
            eprintln!("Error saving comparison: {e}");
            process::exit(1);
        }
    }
}
