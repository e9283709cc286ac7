//! Frame Solver Example - Portal Frame and Braced Truss

use anyhow::Result;
use frame_solver::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    portal_frame()?;
    println!();
    braced_truss()?;

    println!("\n=== Analysis Complete ===");
    Ok(())
}

fn portal_frame() -> Result<()> {
    println!("=== Portal Frame ===\n");

    // Create a simple portal frame
    //
    //     N1 -------- N3
    //     |          |
    //     |          |
    //     |          |
    //     N0        N2
    //     ^          ^
    //   Fixed     Fixed
    //
    let height = 4.0;
    let span = 6.0;

    // W12x26 (approximate properties)
    let section = Section::new(0.00494, 8.49e-5, 7.2e-6, 1.25e-7);
    let steel = Material::steel();

    let mut frame = Structure::new();
    let col1 = frame.add_member(MemberSpec::beam(
        [0.0, 0.0, 0.0],
        [0.0, height, 0.0],
        steel.clone(),
        section.clone(),
    ))?;
    let col2 = frame.add_member(MemberSpec::beam(
        [span, 0.0, 0.0],
        [span, height, 0.0],
        steel.clone(),
        section.clone(),
    ))?;
    let beam = frame.add_member(MemberSpec::beam(
        [0.0, height, 0.0],
        [span, height, 0.0],
        steel,
        section,
    ))?;

    frame.add_support([0.0, 0.0, 0.0], Support::fixed())?;
    frame.add_support([span, 0.0, 0.0], Support::fixed())?;

    // 20 kN/m on the beam, lumped to the top of the columns
    frame.add_load_case(LoadCase::dead())?;
    let half = -span * 20000.0 / 2.0;
    frame.add_point_load("Dead", [0.0, height, 0.0], NodeLoad::fy(half))?;
    frame.add_point_load("Dead", [span, height, 0.0], NodeLoad::fy(half))?;

    frame.add_load_case(LoadCase::with_description("Wind", "Lateral roof load"))?;
    let roof = frame.add_point_load("Wind", [0.0, height, 0.0], NodeLoad::fx(10000.0))?;
    frame.add_displacement_bound("Wind", DisplacementBound::symmetric(roof, Axis::Dx, height / 300.0))?;

    let cases: Vec<String> = frame.load_cases().iter().map(|c| c.name.clone()).collect();
    for case in &cases {
        let solution = frame.solve(case, &SolveOptions::default())?;
        println!(
            "--- {} ({} free DOFs, {:?}) ---\n",
            case,
            solution.n_free(),
            solution.solve_time
        );

        println!("Node Displacements:");
        for node in frame.nodes() {
            let disp = frame.node_displacement(node.id(), case)?;
            println!(
                "  N{}: DX={:.4}mm, DY={:.4}mm, RZ={:.6}rad",
                node.id().index(),
                disp.dx * 1000.0,
                disp.dy * 1000.0,
                disp.rz
            );
        }

        println!("\nSupport Reactions:");
        for (node, _) in frame.supports() {
            let rxn = frame.node_reactions(node, case)?;
            println!(
                "  N{}: FX={:.2}kN, FY={:.2}kN, MZ={:.2}kN·m",
                node.index(),
                rxn.fx / 1000.0,
                rxn.fy / 1000.0,
                rxn.mz / 1000.0
            );
        }

        println!("\nMember Forces:");
        for (name, id) in [("Col1", col1), ("Col2", col2), ("Beam", beam)] {
            let forces_i = frame.member_forces_i(id, case)?;
            let forces_j = frame.member_forces_j(id, case)?;
            println!(
                "  {}: P={:.2}kN, Vmax={:.2}kN, Mmax={:.2}kN·m",
                name,
                forces_i.axial / 1000.0,
                forces_i.shear_y.abs().max(forces_j.shear_y.abs()) / 1000.0,
                forces_i.moment_z.abs().max(forces_j.moment_z.abs()) / 1000.0
            );
        }

        for v in frame.bound_violations(case)? {
            println!(
                "\n  Limit exceeded at N{} {:?}: {:.4}mm outside [{:.4}, {:.4}]mm",
                v.node.index(),
                v.axis,
                v.value * 1000.0,
                v.lower * 1000.0,
                v.upper * 1000.0
            );
        }

        let summary = frame.summary(case)?;
        println!("\nSummary:");
        println!(
            "  Max displacement: {:.4}mm at {:?}",
            summary.max_displacement * 1000.0,
            summary.max_disp_node
        );
        println!(
            "  Max moment: {:.2}kN·m in {:?}",
            summary.max_moment / 1000.0,
            summary.max_moment_member
        );
        println!();
    }

    Ok(())
}

fn braced_truss() -> Result<()> {
    println!("=== Braced Truss (conjugate gradient) ===\n");

    //   N1 ------ N3
    //   |  \      |
    //   |    \    |
    //   N0 ------ N2
    let steel = Material::steel();
    let rod = Section::axial(5e-4);
    let pts = [[0.0, 0.0, 0.0], [0.0, 3.0, 0.0], [4.0, 0.0, 0.0], [4.0, 3.0, 0.0]];

    let mut truss = Structure::new();
    for (a, b) in [(0, 1), (0, 2), (1, 3), (2, 3), (1, 2)] {
        truss.add_member(MemberSpec::bar(pts[a], pts[b], steel.clone(), rod.clone()))?;
    }

    // Planar truss: restrain Z everywhere
    let planar = Support::with_restraints(false, false, true, false, false, false);
    for p in &pts {
        truss.add_support(*p, planar)?;
    }
    truss.add_support(pts[0], Support::pinned())?;
    truss.add_support(pts[2], Support::with_restraints(false, true, true, false, false, false))?;

    truss.add_load_case(LoadCase::new("Lateral"))?;
    truss.add_point_load("Lateral", pts[1], NodeLoad::fx(50000.0))?;

    let solution = truss.solve("Lateral", &SolveOptions::conjugate_gradient())?;
    println!(
        "Scheme {:?}, {} free DOFs, {} CG iterations, residual {:.2e}\n",
        solution.scheme,
        solution.n_free(),
        solution.iterations.unwrap_or(0),
        solution.residual
    );

    for member in truss.members() {
        let [i, j] = member.nodes();
        println!(
            "  N{}-N{}: N={:.2}kN",
            i.index(),
            j.index(),
            truss.member_axial_force(member.id(), "Lateral")? / 1000.0
        );
    }

    Ok(())
}
