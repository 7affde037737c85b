use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use pathcomp::model::{load_topology, Link, LinkWeigher, Topology};
use pathcomp::runtime::config::{load_search_config, SearchConfig};
use pathcomp::search::{
    compute_paths, ComputedRoute, EdgeWeigher, GeneticConfig, MaxPaths, RiskGrouping,
    SearchAlgorithm, SearchStrategyConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "path_search_bench")]
#[command(about = "Benchmark pathcomp search algorithms on random or loaded topologies")]
struct Args {
    #[arg(long, default_value_t = 100)]
    nodes: usize,
    #[arg(long, default_value_t = 0.08)]
    density: f64,
    #[arg(long, default_value_t = 3)]
    seeds: usize,
    #[arg(long, default_value_t = 1)]
    start_seed: u64,
    #[arg(long, default_value_t = 3)]
    k_paths: usize,
    #[arg(long, default_value_t = 8)]
    iterations: usize,
    #[arg(long)]
    topology_json: Option<PathBuf>,
    /// YAML search config; when given only its algorithm is benchmarked.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    output_json: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) -> Result<()> {
    let level: Level = level
        .parse()
        .with_context(|| format!("invalid log level: {level}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact()
        .init();
    Ok(())
}

fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = (q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[rank]
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        f64::NAN
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

// A bidirectional ring keeps every node reachable; extra links are drawn
// with probability `density` and spread over a handful of risk groups.
fn generate_topology(seed: u64, nodes: usize, density: f64) -> Topology {
    let mut rng = StdRng::seed_from_u64(seed);
    let node_ids: Vec<u32> = (1..=nodes as u32).collect();
    let groups = (nodes / 4).max(1);
    let mut links: BTreeMap<(u32, u32), Link> = BTreeMap::new();

    let mut add_link = |rng: &mut StdRng, src: u32, dst: u32| {
        let group = rng.random_range(0..groups);
        let link = Link::new(src, dst, rng.random_range(1.0..20.0))
            .with_risk_group(format!("srlg-{group}"));
        links.entry((src, dst)).or_insert(link);
    };

    if nodes >= 2 {
        for (idx, &node) in node_ids.iter().enumerate() {
            let next = node_ids[(idx + 1) % nodes];
            add_link(&mut rng, node, next);
            add_link(&mut rng, next, node);
        }
    }

    let p = density.clamp(0.0, 1.0);
    for &src in &node_ids {
        for &dst in &node_ids {
            if src != dst && rng.random_bool(p) {
                add_link(&mut rng, src, dst);
            }
        }
    }

    Topology {
        nodes: node_ids,
        links: links.into_values().collect(),
    }
}

fn strategies(args: &Args, config: Option<&SearchConfig>) -> Vec<SearchStrategyConfig> {
    let k_paths = MaxPaths::Bounded(args.k_paths.max(1));
    if let Some(config) = config {
        let mut strategy = config.strategy.clone();
        if strategy.algorithm == SearchAlgorithm::KShortest && strategy.max_paths == MaxPaths::All {
            strategy.max_paths = k_paths;
        }
        return vec![strategy];
    }

    let genetic = GeneticConfig {
        generations: 10,
        population_size: 12,
        ..GeneticConfig::default()
    };
    SearchAlgorithm::ALL
        .into_iter()
        .map(|algorithm| SearchStrategyConfig {
            algorithm,
            max_paths: match algorithm {
                SearchAlgorithm::KShortest => k_paths,
                SearchAlgorithm::Suurballe | SearchAlgorithm::Srlg => MaxPaths::Bounded(1),
                _ => MaxPaths::All,
            },
            genetic: genetic.clone(),
        })
        .collect()
}

fn summarize_routes(routes: &BTreeMap<u32, Vec<ComputedRoute<Link>>>, total: usize) -> Value {
    let mut best_costs: Vec<f64> = routes
        .values()
        .filter_map(|found| found.first())
        .map(|route| route.cost.value())
        .filter(|cost| cost.is_finite())
        .collect();
    best_costs.sort_by(|a, b| a.total_cmp(b));

    let reachable = routes.values().filter(|found| !found.is_empty()).count();
    let path_counts: Vec<f64> = routes.values().map(|found| found.len() as f64).collect();
    let protected = routes
        .values()
        .filter(|found| found.iter().any(|route| route.backup.is_some()))
        .count();

    json!({
        "reachable": reachable,
        "total_destinations": total,
        "reachable_ratio": if total == 0 { 1.0 } else { reachable as f64 / total as f64 },
        "protected": protected,
        "mean_cost": mean(&best_costs),
        "p95_cost": percentile(&best_costs, 0.95),
        "mean_paths": mean(&path_counts),
    })
}

fn bench_strategy(
    topology: &Topology,
    grouping: &RiskGrouping<Link>,
    src: u32,
    iterations: usize,
    strategy: &SearchStrategyConfig,
) -> Result<Value> {
    let graph = topology.to_graph();
    let destinations: Vec<u32> = graph
        .vertices()
        .iter()
        .copied()
        .filter(|node| *node != src)
        .collect();

    let weigher: &dyn EdgeWeigher<Link> = &LinkWeigher;
    let mut samples_ms = Vec::new();
    let mut routes = BTreeMap::new();
    for _ in 0..iterations.max(1) {
        let start = Instant::now();
        let mut current = BTreeMap::new();
        for dst in &destinations {
            let found = compute_paths(
                &graph,
                &src,
                Some(dst),
                Some(weigher),
                strategy,
                Some(grouping),
            )
            .with_context(|| format!("{} search {src} -> {dst} failed", strategy.algorithm))?;
            current.insert(*dst, found);
        }
        samples_ms.push(start.elapsed().as_secs_f64() * 1000.0);
        routes = current;
    }
    samples_ms.sort_by(|a, b| a.total_cmp(b));
    debug!(algorithm = %strategy.algorithm, runs = samples_ms.len(), "strategy timed");

    let mut out = summarize_routes(&routes, destinations.len());
    if let Some(map) = out.as_object_mut() {
        map.insert("algorithm".to_string(), json!(strategy.algorithm.name()));
        map.insert("max_paths".to_string(), json!(strategy.max_paths.to_string()));
        map.insert("runtime_ms".to_string(), json!(mean(&samples_ms)));
        map.insert("p50_runtime_ms".to_string(), json!(percentile(&samples_ms, 0.5)));
        map.insert("p95_runtime_ms".to_string(), json!(percentile(&samples_ms, 0.95)));
    }
    Ok(out)
}

fn aggregate(seed_rows: &[Value]) -> Value {
    const FIELDS: [&str; 5] = [
        "runtime_ms",
        "p95_runtime_ms",
        "reachable_ratio",
        "mean_cost",
        "mean_paths",
    ];

    let mut buckets: BTreeMap<String, Vec<&Value>> = BTreeMap::new();
    for algo in seed_rows
        .iter()
        .filter_map(|row| row.get("algorithms").and_then(Value::as_array))
        .flatten()
    {
        if let Some(name) = algo.get("algorithm").and_then(Value::as_str) {
            buckets.entry(name.to_string()).or_default().push(algo);
        }
    }

    let rows = buckets
        .into_iter()
        .map(|(name, rows)| {
            let mut summary = serde_json::Map::new();
            summary.insert("algorithm".to_string(), json!(name));
            for field in FIELDS {
                let values: Vec<f64> = rows
                    .iter()
                    .filter_map(|row| row.get(field).and_then(Value::as_f64))
                    .collect();
                summary.insert(field.to_string(), json!(mean(&values)));
            }
            Value::Object(summary)
        })
        .collect();
    Value::Array(rows)
}

fn print_summary(aggregated: &Value) {
    println!("algorithm\truntime_ms\tp95_runtime_ms\treachable_ratio\tmean_cost\tmean_paths");
    for row in aggregated.as_array().into_iter().flatten() {
        let field = |name: &str| row.get(name).and_then(Value::as_f64).unwrap_or(f64::NAN);
        println!(
            "{}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{:.4}",
            row.get("algorithm").and_then(Value::as_str).unwrap_or("?"),
            field("runtime_ms"),
            field("p95_runtime_ms"),
            field("reachable_ratio"),
            field("mean_cost"),
            field("mean_paths"),
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let config = args.config.as_deref().map(load_search_config).transpose()?;
    let topology_path = args.topology_json.clone().or_else(|| {
        config
            .as_ref()
            .and_then(|config| config.topology.as_ref())
            .map(PathBuf::from)
    });
    let loaded = topology_path.as_deref().map(load_topology).transpose()?;
    let plans = strategies(&args, config.as_ref());

    let mut seed_rows = Vec::new();
    for idx in 0..args.seeds.max(1) {
        let seed = args.start_seed + idx as u64;
        let topology = match &loaded {
            Some(topology) => topology.clone(),
            None => generate_topology(seed, args.nodes.max(2), args.density),
        };
        let grouping = RiskGrouping::from_keys(&topology.risk_grouping());
        let Some(src) = topology.node_ids().into_iter().next() else {
            anyhow::bail!("topology has no nodes");
        };
        info!(
            seed,
            nodes = topology.node_ids().len(),
            links = topology.links.len(),
            groups = grouping.groups(),
            "benchmarking topology"
        );

        let algorithms = plans
            .iter()
            .map(|strategy| bench_strategy(&topology, &grouping, src, args.iterations, strategy))
            .collect::<Result<Vec<_>>>()?;

        seed_rows.push(json!({
            "seed": seed,
            "nodes": topology.node_ids().len(),
            "links": topology.links.len(),
            "source": src,
            "algorithms": algorithms,
        }));
    }

    let aggregated = aggregate(&seed_rows);
    print_summary(&aggregated);

    let payload = json!({
        "config": {
            "nodes": args.nodes,
            "density": args.density,
            "seeds": args.seeds,
            "start_seed": args.start_seed,
            "k_paths": args.k_paths,
            "iterations": args.iterations,
            "topology_json": topology_path,
            "search_config": args.config,
        },
        "runs": seed_rows,
        "aggregate": aggregated,
    });

    if let Some(path) = args.output_json {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_vec_pretty(&payload)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote bench report");
    } else {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }

    Ok(())
}
