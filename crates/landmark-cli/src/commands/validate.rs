//! landmark-mesh validate command - check a triangle list against a capture.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use landmark_mesh::{
    MeshReport, MeshWarning, load_triangles_json,
    validate::{duplicate_warnings, inconsistent_edges},
};
use serde::Serialize;

use super::{frame_transform, load_capture, load_params, load_topology, subjects_spanned};
use crate::output::{self, WarningInfo};
use crate::{Cli, OutputFormat};

pub struct ValidateArgs<'a> {
    pub topology: &'a str,
    pub capture: &'a Path,
    pub triangles: &'a Path,
    pub config: Option<&'a Path>,
    pub no_center: bool,
    pub stride: Option<usize>,
}

#[derive(Serialize)]
struct ValidationResult {
    path: String,
    valid: bool,
    /// Subjects of the first frame the triangle list covers.
    subjects: usize,
    report: MeshReport,
    inconsistent_edges: Vec<(u32, u32)>,
    warnings: Vec<WarningInfo>,
    /// `DuplicateFace` warnings behind `warnings`, for text output.
    #[serde(skip)]
    duplicates: Vec<MeshWarning>,
}

/// Analyze the triangle list against every subject its indices reach.
///
/// Lists written with `tessellate --instances` address subjects back to back,
/// so the snapshot spans as many `stride`-landmark subjects as they need.
fn check(args: &ValidateArgs<'_>) -> Result<ValidationResult> {
    let topology = load_topology(args.topology)?;
    let params = load_params(args.config, args.topology)?;
    let (capture, stride) = load_capture(args.capture, &topology, args.stride)?;
    let triangles = load_triangles_json(args.triangles)
        .with_context(|| format!("Failed to load triangles from {:?}", args.triangles))?;

    let subjects = subjects_spanned(&triangles, stride);
    let span = subjects
        .checked_mul(stride)
        .context("triangle indices span more landmarks than fit in memory")?;
    let transform = frame_transform(&capture, args.topology, args.no_center);
    let snapshot = capture
        .first_frame_snapshot(&transform, 0, span)
        .with_context(|| {
            format!(
                "Failed to read {} subjects from the first frame of {:?}",
                subjects, args.capture
            )
        })?;

    let report = MeshReport::analyze(&triangles, &snapshot, &params)?;
    let duplicates = duplicate_warnings(&triangles);
    Ok(ValidationResult {
        path: args.triangles.display().to_string(),
        valid: report.is_consistent(),
        subjects,
        inconsistent_edges: inconsistent_edges(&triangles),
        report,
        warnings: duplicates.iter().map(WarningInfo::from).collect(),
        duplicates,
    })
}

pub fn run(args: &ValidateArgs<'_>, cli: &Cli) -> Result<()> {
    let result = check(args)?;

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Validation Report".bold().underline());
                println!("  {}: {}", "File".cyan(), result.path);
                if result.subjects > 1 {
                    println!("  {}: {}", "Subjects".cyan(), result.subjects);
                }
                if result.valid {
                    println!("  {}: {}", "Status".cyan(), "Consistent".green().bold());
                } else {
                    println!("  {}: {}", "Status".cyan(), "Issues found".red().bold());
                }
                println!("{}", result.report);
                if !result.inconsistent_edges.is_empty() {
                    println!("\n{}", "Inconsistent edges:".bold());
                    for (a, b) in &result.inconsistent_edges {
                        println!("  {} {}-{}", "✗".red(), a, b);
                    }
                }
                if !result.duplicates.is_empty() {
                    output::print_warnings(&result.duplicates);
                }
            }
        }
    }

    if !result.valid {
        std::process::exit(1);
    }

    Ok(())
}
