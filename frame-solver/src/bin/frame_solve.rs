//! Solve a structure described in a JSON file
//!
//! Usage: frame-solve <model.json>
//!
//! Prints a text summary per load case. Set `RUST_LOG=debug` for assembly
//! details.

use anyhow::{bail, Context, Result};
use log::info;
use std::env;

use frame_solver::json::{solve_all, ModelData};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        bail!("usage: {} <model.json>", args[0]);
    }

    let model = ModelData::from_file(&args[1]).with_context(|| format!("reading {}", args[1]))?;
    let mut structure = model.build().context("building structure")?;
    info!(
        "loaded {} nodes, {} members, {} load cases",
        structure.nodes().len(),
        structure.members().len(),
        structure.load_cases().len()
    );

    let reports = solve_all(&mut structure, &model.options)?;

    for report in &reports {
        println!("=== {} ===", report.load_case);
        println!(
            "  {:?}, {:?} scheme, {} free DOFs, residual {:.2e}, {:.3} ms",
            report.solver, report.scheme, report.free_dofs, report.residual, report.solve_time_ms
        );
        println!(
            "  Max displacement: {:.6} at {:?}",
            report.summary.max_displacement, report.summary.max_disp_node
        );
        println!(
            "  Max reaction: {:.3} at {:?}",
            report.summary.max_reaction, report.summary.max_reaction_node
        );
        println!(
            "  Max axial: {:.3} in {:?}",
            report.summary.max_axial, report.summary.max_axial_member
        );
        println!(
            "  Max moment: {:.3} in {:?}",
            report.summary.max_moment, report.summary.max_moment_member
        );
        for v in &report.violations {
            println!(
                "  Bound exceeded at node {} {:?}: {:.6} not in [{}, {}]",
                v.node.index(),
                v.axis,
                v.value,
                v.lower,
                v.upper
            );
        }
    }

    Ok(())
}
