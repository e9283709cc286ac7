use approx::assert_relative_eq;
use frame_solver::prelude::*;

const L: f64 = 10.0;
const P: f64 = 10000.0;

fn cantilever(load: NodeLoad) -> (Structure, MemberId) {
    let mut s = Structure::new();
    let beam = s
        .add_member(MemberSpec::beam(
            [0.0, 0.0, 0.0],
            [L, 0.0, 0.0],
            Material::steel(),
            Section::rectangular(0.3, 0.5),
        ))
        .unwrap();
    s.add_support([0.0, 0.0, 0.0], Support::fixed()).unwrap();
    s.add_load_case(LoadCase::new("Tip")).unwrap();
    s.add_point_load("Tip", [L, 0.0, 0.0], load).unwrap();
    (s, beam)
}

fn portal_frame() -> Structure {
    let (h, w) = (4.0, 6.0);
    let steel = Material::steel();
    let column = Section::rectangular(0.3, 0.3);
    let girder = Section::rectangular(0.3, 0.5);

    let mut s = Structure::new();
    s.add_member(MemberSpec::beam([0.0, 0.0, 0.0], [0.0, h, 0.0], steel.clone(), column.clone()))
        .unwrap();
    s.add_member(MemberSpec::beam([w, 0.0, 0.0], [w, h, 0.0], steel.clone(), column))
        .unwrap();
    s.add_member(MemberSpec::beam([0.0, h, 0.0], [w, h, 0.0], steel, girder))
        .unwrap();
    s.add_support([0.0, 0.0, 0.0], Support::fixed()).unwrap();
    s.add_support([w, 0.0, 0.0], Support::fixed()).unwrap();

    s.add_load_case(LoadCase::new("Combined")).unwrap();
    s.add_point_load("Combined", [0.0, h, 0.0], NodeLoad::new(15000.0, -40000.0, 2000.0, 0.0, 0.0, 5000.0))
        .unwrap();
    s.add_point_load("Combined", [w, h, 0.0], NodeLoad::new(0.0, -40000.0, 0.0, 1000.0, 0.0, 0.0))
        .unwrap();
    s
}

fn braced_portal() -> Structure {
    let mut s = portal_frame();
    s.add_member(MemberSpec::bar(
        [0.0, 0.0, 0.0],
        [6.0, 4.0, 0.0],
        Material::steel(),
        Section::axial(2e-3),
    ))
    .unwrap();
    s
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[test]
fn cantilever_tip_deflection() {
    let (mut s, beam) = cantilever(NodeLoad::fy(-P));
    let solution = s.solve("Tip", &SolveOptions::direct()).unwrap();
    assert_eq!(solution.scheme, DofScheme::Frame6);
    assert_eq!(solution.n_free(), 6);

    let iz = 0.3 * 0.5_f64.powi(3) / 12.0;
    let expected = P * L.powi(3) / (3.0 * 200e9 * iz);
    assert_relative_eq!(expected, 5.333e-3, max_relative = 1e-3);

    let tip = s.node_displacement(NodeId(1), "Tip").unwrap();
    assert_relative_eq!(tip.dy, -expected, max_relative = 1e-9);
    assert_relative_eq!(tip.rz, -P * L * L / (2.0 * 200e9 * iz), max_relative = 1e-9);
    assert!(tip.dx.abs() < 1e-12);
    assert!(tip.dz.abs() < 1e-12);

    let root = s.member_forces_i(beam, "Tip").unwrap();
    assert_relative_eq!(root.moment_z.abs(), P * L, max_relative = 1e-9);
    assert_relative_eq!(root.shear_y.abs(), P, max_relative = 1e-9);
    assert_relative_eq!(s.member(beam).unwrap().max_moment("Tip").unwrap(), P * L, max_relative = 1e-9);
}

#[test]
fn cantilever_out_of_plane_uses_minor_axis() {
    let (mut s, _) = cantilever(NodeLoad::new(0.0, 0.0, P, 0.0, 0.0, 0.0));
    s.solve("Tip", &SolveOptions::default()).unwrap();

    let iy = 0.5 * 0.3_f64.powi(3) / 12.0;
    let tip = s.node_displacement(NodeId(1), "Tip").unwrap();
    assert_relative_eq!(tip.dz, P * L.powi(3) / (3.0 * 200e9 * iy), max_relative = 1e-9);
    assert!(tip.dy.abs() < 1e-12);
}

#[test]
fn cantilever_conjugate_gradient_matches_direct() {
    let (mut direct, _) = cantilever(NodeLoad::fy(-P));
    let (mut cg, _) = cantilever(NodeLoad::fy(-P));
    let a = direct.solve("Tip", &SolveOptions::direct()).unwrap();
    let b = cg
        .solve("Tip", &SolveOptions::conjugate_gradient().with_tolerance(1e-12))
        .unwrap();

    assert!(b.iterations.is_some());
    for (x, y) in a.displacements.iter().zip(&b.displacements) {
        assert_relative_eq!(*x, *y, epsilon = 1e-12, max_relative = 1e-8);
    }
}

#[test]
fn cantilever_reactions() {
    let (mut s, _) = cantilever(NodeLoad::fy(-P));
    s.solve("Tip", &SolveOptions::default()).unwrap();
    let rxn = s.node_reactions(NodeId(0), "Tip").unwrap();
    assert_relative_eq!(rxn.fy, P, max_relative = 1e-9);
    assert_relative_eq!(rxn.mz, P * L, max_relative = 1e-9);
    assert!(rxn.fx.abs() < 1e-6);

    // Unsupported node reports zeros
    assert_eq!(s.node_reactions(NodeId(1), "Tip").unwrap().as_array(), [0.0; 6]);
}

#[test]
fn free_node_equilibrium() {
    for options in [SolveOptions::direct(), SolveOptions::conjugate_gradient().with_tolerance(1e-12)] {
        let mut s = portal_frame();
        s.solve("Combined", &options).unwrap();
        let loads = s.loads("Combined").unwrap();

        for node in s.nodes().iter().filter(|n| !n.is_supported()) {
            let mut total = [0.0; 6];
            for member in s.members() {
                let f = member.global_force("Combined").unwrap();
                let [i, j] = member.nodes();
                let offset = if i == node.id() {
                    0
                } else if j == node.id() {
                    6
                } else {
                    continue;
                };
                for k in 0..6 {
                    total[k] += f[offset + k];
                }
            }
            for k in 0..6 {
                let applied = loads[node.id().index() * 6 + k];
                assert_relative_eq!(total[k], applied, epsilon = 1e-4);
            }
        }
    }
}

#[test]
fn reactions_balance_loads_and_moments() {
    let mut s = braced_portal();
    s.solve("Combined", &SolveOptions::default()).unwrap();
    let loads = s.loads("Combined").unwrap();

    let mut force = [0.0; 3];
    let mut moment = [0.0; 3];
    for node in s.nodes() {
        let r = node.coords();
        let idx = node.id().index() * 6;
        let mut applied = [0.0; 6];
        applied.copy_from_slice(&loads[idx..idx + 6]);
        let reaction = s.node_reactions(node.id(), "Combined").unwrap().as_array();

        for k in 0..6 {
            let total = applied[k] + reaction[k];
            if k < 3 {
                force[k] += total;
            } else {
                moment[k - 3] += total;
            }
        }
        let f = [applied[0] + reaction[0], applied[1] + reaction[1], applied[2] + reaction[2]];
        let arm = cross(r, f);
        for k in 0..3 {
            moment[k] += arm[k];
        }
    }

    for k in 0..3 {
        assert!(force[k].abs() < 1e-4, "force {:?}", force);
        assert!(moment[k].abs() < 1e-3, "moment {:?}", moment);
    }
}

#[test]
fn stiffness_matrix_is_symmetric() {
    for s in [portal_frame(), braced_portal()] {
        let k = s.stiffness_matrix().unwrap().unwrap();
        assert!(k.is_square());
        assert_eq!(k.nrows(), s.dof_map().n_free(DofScheme::Frame6));
        assert!(k.is_symmetric(1e-12));

        let full = s.global_stiffness_matrix().unwrap();
        assert_eq!(full.nrows(), 6 * s.nodes().len());
        assert!(full.is_symmetric(1e-12));
    }
}

#[test]
fn solving_twice_gives_identical_results() {
    let mut s = braced_portal();
    let first = s.solve("Combined", &SolveOptions::default()).unwrap();
    let disp_first = s.displacements("Combined").unwrap();
    let axial_first = s.member_axial_force(MemberId(3), "Combined").unwrap();

    let second = s.solve("Combined", &SolveOptions::default()).unwrap();
    assert_eq!(first.displacements, second.displacements);
    assert_eq!(disp_first, s.displacements("Combined").unwrap());
    assert_eq!(axial_first, s.member_axial_force(MemberId(3), "Combined").unwrap());
}

#[test]
fn dof_map_round_trip() {
    let configs = [
        vec![Support::fixed(), Support::new(), Support::pinned()],
        vec![Support::roller_y(), Support::rotations_only(), Support::new()],
        vec![Support::new(); 3],
        vec![Support::fixed(); 3],
    ];

    for config in configs {
        let fixities: Vec<[bool; 6]> = config.iter().map(|s| s.as_array()).collect();
        let map = DofMap::build(&fixities);
        assert_eq!(map.total_dofs(), 18);

        for scheme in [DofScheme::Truss3, DofScheme::Frame6] {
            let n = map.n_free(scheme);
            assert_eq!(map.free_dofs(scheme).len(), n);

            let reduced: Vec<f64> = (0..n).map(|i| i as f64 + 1.0).collect();
            let full = map.expand(scheme, &reduced).unwrap();
            assert_eq!(map.reduce(scheme, &full).unwrap(), reduced);

            for (node, axis) in map.free_dofs(scheme) {
                let idx = map.reduced_index(scheme, node, axis).unwrap();
                assert_eq!(full[node * 6 + axis], reduced[idx]);
            }
            for (i, fixed) in map.fixed_bitmap().iter().enumerate() {
                if *fixed {
                    assert_eq!(full[i], 0.0);
                }
            }
        }
    }
}

#[test]
fn fully_restrained_structure_skips_the_solve() {
    let mut s = Structure::new();
    s.add_member(MemberSpec::beam([0.0; 3], [3.0, 0.0, 0.0], Material::steel(), Section::rectangular(0.2, 0.2)))
        .unwrap();
    s.add_support([0.0; 3], Support::fixed()).unwrap();
    s.add_support([3.0, 0.0, 0.0], Support::fixed()).unwrap();
    s.add_load_case(LoadCase::new("Held")).unwrap();
    s.add_point_load("Held", [3.0, 0.0, 0.0], NodeLoad::fy(-500.0)).unwrap();

    assert!(s.stiffness_matrix().unwrap().is_none());

    let solution = s.solve("Held", &SolveOptions::default()).unwrap();
    assert!(solution.displacements.is_empty());
    assert_eq!(solution.n_free(), 0);
    assert!(s.is_solved("Held"));
    assert!(s.displacements("Held").unwrap().iter().all(|d| *d == 0.0));

    // Load goes straight into the support
    let rxn = s.node_reactions(NodeId(1), "Held").unwrap();
    assert_relative_eq!(rxn.fy, 500.0, max_relative = 1e-12);
}

#[test]
fn bar_only_node_needs_rotational_restraint() {
    let build = |support: Support| {
        let mut s = Structure::new();
        s.add_member(MemberSpec::beam([0.0; 3], [2.0, 0.0, 0.0], Material::steel(), Section::rectangular(0.2, 0.3)))
            .unwrap();
        s.add_member(MemberSpec::bar([2.0, 0.0, 0.0], [2.0, -2.0, 0.0], Material::steel(), Section::axial(1e-3)))
            .unwrap();
        s.add_support([0.0; 3], Support::fixed()).unwrap();
        s.add_support([2.0, -2.0, 0.0], support).unwrap();
        s.add_load_case(LoadCase::new("Tip")).unwrap();
        s.add_point_load("Tip", [2.0, 0.0, 0.0], NodeLoad::fy(-1000.0)).unwrap();
        s
    };

    let mut pinned = build(Support::pinned());
    assert_eq!(pinned.dof_scheme(), DofScheme::Frame6);
    let err = pinned.solve("Tip", &SolveOptions::direct()).unwrap_err();
    assert!(matches!(err, FrameError::SingularMatrix { .. }), "{:?}", err);

    let mut fixed = build(Support::fixed());
    fixed.solve("Tip", &SolveOptions::direct()).unwrap();
    let axial = fixed.member_axial_force(MemberId(1), "Tip").unwrap();
    // The post carries part of the tip load in compression
    assert!(axial < 0.0);
    let tip = fixed.node_displacement(NodeId(1), "Tip").unwrap();
    assert!(tip.dy < 0.0);
}

#[test]
fn section_change_takes_effect_on_next_solve() {
    let (mut s, beam) = cantilever(NodeLoad::fy(-P));
    s.solve("Tip", &SolveOptions::default()).unwrap();
    let before = s.node_displacement(NodeId(1), "Tip").unwrap().dy;

    s.set_member_section(beam, Section::rectangular(0.3, 1.0)).unwrap();
    // Cached results stay until the case is solved again
    assert!(s.is_solved("Tip"));
    assert_eq!(s.node_displacement(NodeId(1), "Tip").unwrap().dy, before);

    s.solve("Tip", &SolveOptions::default()).unwrap();
    let after = s.node_displacement(NodeId(1), "Tip").unwrap().dy;
    assert_relative_eq!(after, before / 8.0, max_relative = 1e-9);

    s.set_member_material(beam, Material::aluminum()).unwrap();
    s.solve("Tip", &SolveOptions::default()).unwrap();
    let soft = s.node_displacement(NodeId(1), "Tip").unwrap().dy;
    assert_relative_eq!(soft, after * 200e9 / 68.9e9, max_relative = 1e-9);
}
