//! landmark-mesh tessellate command - build the triangle list for a capture.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use landmark_mesh::{Tessellator, pack_instances, save_obj, save_triangles_json};
use serde::Serialize;

use super::{first_snapshot, load_params, load_topology};
use crate::output::{self, WarningInfo};
use crate::{Cli, OutputFormat};

pub struct TessellateArgs<'a> {
    pub topology: &'a str,
    pub capture: &'a Path,
    pub output: &'a Path,
    pub obj: Option<&'a Path>,
    pub config: Option<&'a Path>,
    pub no_center: bool,
    pub stride: Option<usize>,
    pub instances: bool,
}

#[derive(Serialize)]
struct TessellateResult {
    output: String,
    triangles: usize,
    instances: usize,
    visited_vertices: usize,
    locally_flipped: usize,
    propagated_flips: usize,
    degenerate_faces: usize,
    unreachable_triangles: usize,
    warnings: Vec<WarningInfo>,
}

pub fn run(args: &TessellateArgs<'_>, cli: &Cli) -> Result<()> {
    let topology = load_topology(args.topology)?;
    let params = load_params(args.config, args.topology)?;
    let (capture, snapshot, stride) = first_snapshot(
        args.capture,
        &topology,
        args.topology,
        args.no_center,
        args.stride,
    )?;

    let result = Tessellator::new(&topology)?
        .with_params(params)
        .run(&snapshot)?;

    let instances = if args.instances {
        capture.instance_count(stride).max(1)
    } else {
        1
    };
    let triangles: Vec<_> = pack_instances(&result.triangles, instances, stride)?
        .into_iter()
        .flatten()
        .collect();
    save_triangles_json(args.output, &triangles)?;

    if let Some(obj) = args.obj {
        save_obj(obj, &snapshot, &result.triangles)?;
    }

    let summary = TessellateResult {
        output: args.output.display().to_string(),
        triangles: result.triangles.len(),
        instances,
        visited_vertices: result.stats.visited_vertices,
        locally_flipped: result.stats.locally_flipped,
        propagated_flips: result.stats.propagated_flips,
        degenerate_faces: result.stats.degenerate_faces,
        unreachable_triangles: result.stats.unreachable_triangles,
        warnings: result.warnings.iter().map(WarningInfo::from).collect(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&summary, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Tessellation".bold().underline());
                println!("  {}: {}", "Output".cyan(), summary.output);
                println!("  {}: {}", "Triangles".cyan(), summary.triangles);
                if summary.instances > 1 {
                    println!("  {}: {}", "Instances".cyan(), summary.instances);
                }
                println!(
                    "  {}: {} of {}",
                    "Vertices reached".cyan(),
                    summary.visited_vertices,
                    topology.vertex_count
                );
                println!(
                    "  {}: {} local, {} propagated",
                    "Flips".cyan(),
                    summary.locally_flipped,
                    summary.propagated_flips
                );

                if result.warnings.is_empty() {
                    println!("  {}: {}", "Status".cyan(), "Clean".green().bold());
                } else {
                    output::print_warnings(&result.warnings);
                }
            }
        }
    }

    Ok(())
}
