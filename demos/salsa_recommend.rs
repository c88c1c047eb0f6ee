//! End-to-end sketch: bipartite edge list -> SALSA run -> most visited right nodes.
//!
//! The driver only produces visit counts and social proof; ranking is up to the
//! caller. Here we simply sort by visits to show what downstream selection sees.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use salsa_walk::{BipartiteAdjacency, NodeId, SalsaIterations, SalsaRequest};
use std::path::Path;

/// Load a bipartite edge list: `left right` per line, whitespace-separated.
///
/// Lines starting with `#` are ignored.
fn from_edgelist(path: &Path) -> Result<BipartiteAdjacency, String> {
    let txt = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

    let mut edges: Vec<(NodeId, NodeId)> = Vec::new();
    for (line_no, line) in txt.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut it = line.split_whitespace();
        let a = it.next().ok_or_else(|| format!("line {}: missing left", line_no + 1))?;
        let b = it.next().ok_or_else(|| format!("line {}: missing right", line_no + 1))?;
        let l: NodeId = a
            .parse()
            .map_err(|e| format!("line {}: bad left '{a}': {e}", line_no + 1))?;
        let r: NodeId = b
            .parse()
            .map_err(|e| format!("line {}: bad right '{b}': {e}", line_no + 1))?;
        edges.push((l, r));
    }
    if edges.is_empty() {
        return Err("edgelist produced empty graph".to_string());
    }
    Ok(BipartiteAdjacency::from_edges(&edges))
}

/// Two communities of users (left) and items (right); users mostly engage with
/// items of their own community.
fn two_community(
    n_users: u64,
    n_items: u64,
    degree: u64,
    p_out: f64,
    seed: u64,
) -> BipartiteAdjacency {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let half_items = n_items / 2;
    let mut edges = Vec::new();
    for u in 0..n_users {
        let home = u < n_users / 2;
        for _ in 0..degree {
            let same = rng.random::<f64>() >= p_out;
            let first_half = home == same;
            let item = if first_half {
                rng.random_range(0..half_items)
            } else {
                rng.random_range(half_items..n_items)
            };
            edges.push((u, 1_000_000 + item));
        }
    }
    BipartiteAdjacency::from_edges(&edges)
}

fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    // SALSA_EDGELIST=/path/to/edges.txt cargo run --example salsa_recommend
    let g = if let Ok(path) = std::env::var("SALSA_EDGELIST") {
        from_edgelist(Path::new(&path)).expect("failed to load SALSA_EDGELIST")
    } else {
        two_community(2_000, 500, 12, 0.05, 123)
    };

    let query: NodeId = 7;
    let request = SalsaRequest::new(query)
        .with_seeds([(8, 1.0), (9, 1.0), (10, 0.5)])
        .with_query_node_weight_fraction(0.8)
        .with_num_random_walks(20_000)
        .with_max_random_walk_length(5)
        .with_max_social_proof_size(5);

    let mut driver = SalsaIterations::new(&g);
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    driver.run(&request, &mut rng).expect("SALSA run failed");

    let stats = driver.stats();
    println!(
        "graph: left={}, right={}, edges={}",
        g.left_node_count(),
        g.right_node_count(),
        g.edge_count()
    );
    println!("stats: {stats:?}");

    let mut ranked: Vec<_> = driver.visited_right_nodes().iter().collect();
    ranked.sort_by(|a, b| b.1.visits.cmp(&a.1.visits).then_with(|| a.0.cmp(b.0)));

    println!();
    println!("top-10 right nodes by visits:");
    for (node, visit) in ranked.into_iter().take(10) {
        println!(
            "  node {node:8}  visits={:6}  social_proof={:?}",
            visit.visits,
            visit.social_proof.as_slice()
        );
    }
}
