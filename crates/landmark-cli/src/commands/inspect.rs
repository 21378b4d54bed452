//! landmark-mesh inspect command - display topology statistics.

use anyhow::Result;
use colored::Colorize;
use landmark_mesh::walk_fans;
use serde::Serialize;

use super::load_topology;
use crate::{Cli, OutputFormat, output};

#[derive(Serialize)]
struct TopologyInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    vertices: usize,
    edges: usize,
    unique_edges: usize,
    isolated_vertices: Vec<u32>,
    max_degree: usize,
    seed: u32,
    visited_vertices: usize,
    triangles: usize,
}

pub fn run(topology_spec: &str, seed: u32, cli: &Cli) -> Result<()> {
    let topology = load_topology(topology_spec)?;
    let graph = topology.graph()?;
    let walk = walk_fans(&graph, seed);

    let info = TopologyInfo {
        name: topology.name.clone(),
        vertices: graph.vertex_count(),
        edges: topology.edges.len(),
        unique_edges: graph.edge_count(),
        isolated_vertices: graph.isolated_vertices(),
        max_degree: (0..graph.vertex_count() as u32)
            .map(|v| graph.degree(v))
            .max()
            .unwrap_or(0),
        seed,
        visited_vertices: walk.visit_order.len(),
        triangles: walk.triangles.len(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&info, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Topology Information".bold().underline());
                if let Some(ref name) = info.name {
                    println!("  {}: {}", "Name".cyan(), name);
                }
                println!("  {}: {}", "Vertices".cyan(), info.vertices);
                println!(
                    "  {}: {} ({} unique)",
                    "Edges".cyan(),
                    info.edges,
                    info.unique_edges
                );
                println!("  {}: {}", "Max degree".cyan(), info.max_degree);
                if !info.isolated_vertices.is_empty() {
                    println!(
                        "  {}: {:?}",
                        "Isolated vertices".yellow(),
                        info.isolated_vertices
                    );
                }
                println!(
                    "  {}: {} of {} from vertex {}",
                    "Reached".cyan(),
                    info.visited_vertices,
                    info.vertices,
                    info.seed
                );
                println!("  {}: {}", "Triangles".cyan(), info.triangles);
            }
        }
    }

    Ok(())
}
