use approx::assert_relative_eq;
use frame_solver::prelude::*;

const E: f64 = 210e9;
const AREA: f64 = 1e-4;

fn rod_material() -> Material {
    Material::isotropic(E, 0.3, 7850.0)
}

/// Two-node bar A=(0,0,0) fixed, B=(1,0,0) free along X, 1000 N at B
fn two_node_truss() -> (Structure, MemberId) {
    let mut s = Structure::new();
    let bar = s
        .add_member(MemberSpec::bar(
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            rod_material(),
            Section::axial(AREA),
        ))
        .unwrap();
    s.add_support([0.0, 0.0, 0.0], Support::fixed()).unwrap();
    // A lone bar has no transverse stiffness, so B is restrained in Y and Z
    s.add_support(
        [1.0, 0.0, 0.0],
        Support::with_restraints(false, true, true, false, false, false),
    )
    .unwrap();
    s.add_load_case(LoadCase::new("Axial")).unwrap();
    s.add_point_load("Axial", [1.0, 0.0, 0.0], NodeLoad::fx(1000.0))
        .unwrap();
    (s, bar)
}

fn sum_member_forces_at(s: &Structure, node: NodeId, case: &str) -> [f64; 6] {
    let mut total = [0.0; 6];
    for member in s.members() {
        let f = member.global_force(case).unwrap();
        let [i, j] = member.nodes();
        let offset = if i == node {
            0
        } else if j == node {
            6
        } else {
            continue;
        };
        for k in 0..6 {
            total[k] += f[offset + k];
        }
    }
    total
}

#[test]
fn analytic_bar_direct() {
    let (mut s, bar) = two_node_truss();
    let solution = s.solve("Axial", &SolveOptions::direct()).unwrap();

    let expected = 1000.0 / (E * AREA);
    assert_eq!(solution.scheme, DofScheme::Truss3);
    assert_eq!(solution.displacements.len(), 1);
    assert_relative_eq!(solution.displacements[0], expected, max_relative = 1e-9);
    assert_relative_eq!(expected, 4.7619e-5, max_relative = 1e-4);

    let disp = s.node_displacement(NodeId(1), "Axial").unwrap();
    assert_relative_eq!(disp.dx, expected, max_relative = 1e-9);
    assert_eq!(disp.dy, 0.0);
    assert_eq!(disp.rz, 0.0);

    assert_relative_eq!(s.member_axial_force(bar, "Axial").unwrap(), 1000.0, max_relative = 1e-9);
    let fj = s.member_forces_j(bar, "Axial").unwrap();
    assert_relative_eq!(fj.axial, 1000.0, max_relative = 1e-9);
    assert_eq!(fj.moment_z, 0.0);
}

#[test]
fn analytic_bar_conjugate_gradient() {
    let (mut s, bar) = two_node_truss();
    let options = SolveOptions::conjugate_gradient().with_tolerance(1e-12);
    let solution = s.solve("Axial", &options).unwrap();

    assert!(solution.iterations.unwrap() >= 1);
    assert!(solution.residual <= 1e-12);
    assert_relative_eq!(solution.displacements[0], 1000.0 / (E * AREA), max_relative = 1e-10);
    assert_relative_eq!(s.member_axial_force(bar, "Axial").unwrap(), 1000.0, max_relative = 1e-10);
}

#[test]
fn reaction_balances_applied_load() {
    let (mut s, _) = two_node_truss();
    s.solve("Axial", &SolveOptions::default()).unwrap();
    let rxn = s.node_reactions(NodeId(0), "Axial").unwrap();
    assert_relative_eq!(rxn.fx, -1000.0, max_relative = 1e-9);
    assert!(rxn.fy.abs() < 1e-9);
}

#[test]
fn unrestrained_transverse_translation_is_singular() {
    for options in [SolveOptions::direct(), SolveOptions::conjugate_gradient()] {
        let mut s = Structure::new();
        s.add_member(MemberSpec::bar([0.0; 3], [1.0, 0.0, 0.0], rod_material(), Section::axial(AREA)))
            .unwrap();
        s.add_support([0.0; 3], Support::fixed()).unwrap();
        s.add_load_case(LoadCase::new("Axial")).unwrap();
        s.add_point_load("Axial", [1.0, 0.0, 0.0], NodeLoad::fx(1000.0))
            .unwrap();

        let err = s.solve("Axial", &options).unwrap_err();
        assert!(matches!(err, FrameError::SingularMatrix { .. }), "{:?}", err);
        assert!(err.is_numerical());
        assert!(!s.is_solved("Axial"));
    }
}

#[test]
fn repeated_loads_accumulate() {
    let (mut single, _) = two_node_truss();
    let (mut split, _) = two_node_truss();
    split.add_load_case(LoadCase::new("Split")).unwrap();
    split.add_point_load("Split", [1.0, 0.0, 0.0], NodeLoad::fx(400.0)).unwrap();
    split.add_point_load("Split", [1.0, 0.0, 0.0], NodeLoad::fx(600.0)).unwrap();

    assert_eq!(split.loads("Split").unwrap(), single.loads("Axial").unwrap());

    let a = single.solve("Axial", &SolveOptions::default()).unwrap();
    let b = split.solve("Split", &SolveOptions::default()).unwrap();
    assert_relative_eq!(a.displacements[0], b.displacements[0], max_relative = 1e-12);
}

#[test]
fn tripod_equilibrium() {
    let apex = [0.0, 2.0, 0.0];
    let bases = [[1.0, 0.0, 0.0], [-1.0, 0.0, 1.0], [-1.0, 0.0, -1.0]];

    let mut s = Structure::new();
    for base in bases {
        s.add_member(MemberSpec::bar(base, apex, rod_material(), Section::axial(AREA)))
            .unwrap();
        s.add_support(base, Support::pinned()).unwrap();
    }
    s.add_load_case(LoadCase::new("Roof")).unwrap();
    let top = s
        .add_point_load("Roof", apex, NodeLoad::force(500.0, -3000.0, 200.0))
        .unwrap();

    for options in [SolveOptions::direct(), SolveOptions::conjugate_gradient()] {
        let solution = s.solve("Roof", &options).unwrap();
        assert_eq!(solution.displacements.len(), 3);

        // Member end forces at the free apex balance the applied load
        let f = sum_member_forces_at(&s, top, "Roof");
        assert_relative_eq!(f[0], 500.0, max_relative = 1e-8);
        assert_relative_eq!(f[1], -3000.0, max_relative = 1e-8);
        assert_relative_eq!(f[2], 200.0, max_relative = 1e-8);

        // Support reactions balance it too
        let mut total = [0.0; 3];
        for (node, _) in s.supports() {
            let r = s.node_reactions(node, "Roof").unwrap();
            total[0] += r.fx;
            total[1] += r.fy;
            total[2] += r.fz;
        }
        assert_relative_eq!(total[0], -500.0, max_relative = 1e-8);
        assert_relative_eq!(total[1], 3000.0, max_relative = 1e-8);
        assert_relative_eq!(total[2], -200.0, max_relative = 1e-8);
    }

    let summary = s.summary("Roof").unwrap();
    assert_eq!(summary.free_dofs, 3);
    assert_eq!(summary.total_dofs, 12);
}

#[test]
fn moments_ignored_without_rotational_dofs() {
    let (mut s, bar) = two_node_truss();
    s.add_point_load("Axial", [1.0, 0.0, 0.0], NodeLoad::moment(0.0, 0.0, 50.0))
        .unwrap();
    // A moment at the fixed end has no DOF to act on either
    s.add_point_load("Axial", [0.0, 0.0, 0.0], NodeLoad::moment(20.0, 0.0, 50.0))
        .unwrap();
    let solution = s.solve("Axial", &SolveOptions::default()).unwrap();
    assert_eq!(solution.scheme, DofScheme::Truss3);
    assert_relative_eq!(s.member_axial_force(bar, "Axial").unwrap(), 1000.0, max_relative = 1e-9);

    let rxn = s.node_reactions(NodeId(0), "Axial").unwrap();
    assert_relative_eq!(rxn.fx, -1000.0, max_relative = 1e-9);
    assert_eq!(rxn.mx, 0.0);
    assert_eq!(rxn.mz, 0.0);
}

/// Four-bar rectangle with no diagonal: every free DOF has stiffness but the
/// top chord can sway
fn unbraced_rectangle() -> Structure {
    let corners = [[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [4.0, 3.0, 0.0], [0.0, 3.0, 0.0]];
    let mut s = Structure::new();
    for k in 0..4 {
        s.add_member(MemberSpec::bar(corners[k], corners[(k + 1) % 4], rod_material(), Section::axial(AREA)))
            .unwrap();
    }
    s.add_support(corners[0], Support::pinned()).unwrap();
    s.add_support(corners[1], Support::with_restraints(false, true, true, false, false, false))
        .unwrap();
    for top in [corners[2], corners[3]] {
        s.add_support(top, Support::with_restraints(false, false, true, false, false, false))
            .unwrap();
    }
    s.add_load_case(LoadCase::new("Wind")).unwrap();
    for top in [corners[2], corners[3]] {
        s.add_point_load("Wind", top, NodeLoad::fx(5000.0)).unwrap();
    }
    s
}

#[test]
fn mechanism_with_positive_diagonal_fails_numerically() {
    let mut s = unbraced_rectangle();
    let k = s.stiffness_matrix().unwrap().unwrap();
    assert_eq!(k.nrows(), 5);
    for i in 0..k.nrows() {
        assert!(k[(i, i)] > 0.0);
    }

    let err = s.solve("Wind", &SolveOptions::direct()).unwrap_err();
    assert!(matches!(err, FrameError::SingularMatrix { .. }), "{:?}", err);
    assert!(!s.is_solved("Wind"));

    // The preconditioned load lies along the sway mode, so p.Ap vanishes
    let err = s.solve("Wind", &SolveOptions::conjugate_gradient()).unwrap_err();
    assert!(matches!(err, FrameError::IllConditioned(_)), "{:?}", err);
    assert!(err.is_numerical());
    assert!(!s.is_solved("Wind"));
    assert!(matches!(s.displacements("Wind"), Err(FrameError::NotAnalyzed(_))));
}

#[test]
fn bundled_json_model_solves() {
    use frame_solver::json::{solve_all, ModelData};

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/models/braced_truss.json");
    let model = ModelData::from_file(path).unwrap();
    assert_eq!(model.options.solver, SolverKind::ConjugateGradient);

    let mut s = model.build().unwrap();
    let reports = solve_all(&mut s, &model.options).unwrap();
    let report = &reports[0];
    assert_eq!(report.scheme, DofScheme::Truss3);
    assert_eq!(report.free_dofs, 5);

    let fx: f64 = report.reactions.iter().map(|r| r.reaction.fx).sum();
    let fy: f64 = report.reactions.iter().map(|r| r.reaction.fy).sum();
    assert_relative_eq!(fx, -50000.0, max_relative = 1e-8);
    assert!(fy.abs() < 1e-3);

    // Overturning couple 50 kN x 3 m over a 4 m base
    let right = s.find_node([4.0, 0.0, 0.0]).unwrap();
    assert_relative_eq!(s.node_reactions(right, "Lateral").unwrap().fy, 37500.0, max_relative = 1e-8);
}
