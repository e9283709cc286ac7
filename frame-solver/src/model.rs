//! Structure - the aggregate root of a frame or truss model

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::analysis::SolveOptions;
use crate::assembly;
use crate::dof::{DofMap, DofScheme, DOFS_PER_NODE};
use crate::elements::{
    Material, Member, MemberId, MemberKind, MemberResult, MemberSpec, Node, NodeId, Section,
    Support,
};
use crate::error::{FrameError, FrameResult};
use crate::loads::{DisplacementBound, LoadCase, NodeLoad};
use crate::math::{MatrixDense, Vector};
use crate::results::{
    AnalysisSummary, BoundViolation, MemberForces, NodeDisplacement, Reactions, Solution,
};
use crate::solver::solver_for;
use crate::spatial::NodeGrid;

/// Structure-level settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Member end points closer than this share a node (m)
    pub node_tolerance: f64,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            node_tolerance: 1e-6,
        }
    }
}

/// A 3D structure of bars and beams
///
/// Nodes are created implicitly by [`Structure::add_member`] and addressed by
/// [`NodeId`]. Every support change recomputes the DOF numbering.
#[derive(Debug, Clone)]
pub struct Structure {
    config: StructureConfig,
    nodes: Vec<Node>,
    grid: NodeGrid,
    members: Vec<Member>,
    /// Unordered end-node pairs, smaller id first
    member_pairs: HashSet<(NodeId, NodeId)>,
    load_cases: Vec<LoadCase>,
    dofs: DofMap,
    solved: HashSet<String>,
}

impl Default for Structure {
    fn default() -> Self {
        Self::new()
    }
}

impl Structure {
    /// Create an empty structure with default settings
    pub fn new() -> Self {
        let config = StructureConfig::default();
        Self {
            config,
            nodes: Vec::new(),
            grid: NodeGrid::new(config.node_tolerance),
            members: Vec::new(),
            member_pairs: HashSet::new(),
            load_cases: Vec::new(),
            dofs: DofMap::default(),
            solved: HashSet::new(),
        }
    }

    pub fn with_config(config: StructureConfig) -> FrameResult<Self> {
        if !(config.node_tolerance > 0.0 && config.node_tolerance.is_finite()) {
            return Err(FrameError::Configuration(format!(
                "node tolerance must be positive and finite, got {}",
                config.node_tolerance
            )));
        }
        Ok(Self {
            config,
            grid: NodeGrid::new(config.node_tolerance),
            ..Self::new()
        })
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Insert a member, merging its end points with existing nodes
    ///
    /// Rejects members whose ends merge into one node and members joining a
    /// node pair that is already connected.
    pub fn add_member(&mut self, spec: MemberSpec) -> FrameResult<MemberId> {
        check_position(spec.start)?;
        check_position(spec.end)?;

        let i_found = self.grid.find(spec.start, &self.nodes);
        let j_found = self.grid.find(spec.end, &self.nodes);
        let i_pos = i_found.map_or(spec.start, |id| self.nodes[id.index()].coords());
        let j_pos = j_found.map_or(spec.end, |id| self.nodes[id.index()].coords());

        if (i_found.is_some() && i_found == j_found) || distance(i_pos, j_pos) <= self.config.node_tolerance {
            return Err(FrameError::InvalidGeometry(format!(
                "member from {:?} to {:?} has zero length",
                spec.start, spec.end
            )));
        }

        if let (Some(i), Some(j)) = (i_found, j_found) {
            let key = (i.min(j), i.max(j));
            if self.member_pairs.contains(&key) {
                return Err(FrameError::DuplicateMember(key.0.index(), key.1.index()));
            }
        }

        // Build the member before touching the node arena so a failure leaves no orphans
        let next = self.nodes.len();
        let i = i_found.unwrap_or(NodeId(next));
        let j = j_found.unwrap_or(NodeId(next + usize::from(i_found.is_none())));
        let id = MemberId(self.members.len());
        let member = Member::new(id, spec, i, j, i_pos, j_pos)?;

        if i_found.is_none() {
            self.push_node(i_pos);
        }
        if j_found.is_none() {
            self.push_node(j_pos);
        }

        debug!(
            "member {} ({:?}) joins nodes {} and {}, length {:.4}",
            id.index(),
            member.kind(),
            i.index(),
            j.index(),
            member.length()
        );

        self.member_pairs.insert((i.min(j), i.max(j)));
        self.members.push(member);
        self.refresh_dofs();
        Ok(id)
    }

    fn push_node(&mut self, position: [f64; 3]) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, position));
        self.grid.insert(position, id);
        id
    }

    /// Apply a support at the node at `position`, replacing earlier restraints
    pub fn add_support(&mut self, position: [f64; 3], support: Support) -> FrameResult<NodeId> {
        let id = self
            .find_node(position)
            .ok_or(FrameError::NodeNotFound(position[0], position[1], position[2]))?;
        self.add_support_at(id, support)?;
        Ok(id)
    }

    /// Apply a support at `node`, replacing earlier restraints
    pub fn add_support_at(&mut self, node: NodeId, support: Support) -> FrameResult<()> {
        self.node_mut(node)?.fixity = support.as_array();
        self.refresh_dofs();
        Ok(())
    }

    fn refresh_dofs(&mut self) {
        let fixities: Vec<[bool; 6]> = self.nodes.iter().map(|n| n.fixity).collect();
        self.dofs = DofMap::build(&fixities);
    }

    /// Register a load case
    pub fn add_load_case(&mut self, case: LoadCase) -> FrameResult<()> {
        LoadCase::validate_name(&case.name)?;
        if self.load_cases.iter().any(|c| c.name == case.name) {
            return Err(FrameError::DuplicateLoadCase(case.name));
        }
        if let Some(node) = case.referenced_nodes().find(|n| n.index() >= self.nodes.len()) {
            return Err(FrameError::NodeIndexOutOfRange(node.index()));
        }
        for bound in &case.displacement_bounds {
            check_bound(bound)?;
        }
        self.load_cases.push(case);
        Ok(())
    }

    /// Add a load at the node at `position`; loads at one node accumulate
    pub fn add_point_load(
        &mut self,
        case: &str,
        position: [f64; 3],
        load: NodeLoad,
    ) -> FrameResult<NodeId> {
        let id = self
            .find_node(position)
            .ok_or(FrameError::NodeNotFound(position[0], position[1], position[2]))?;
        self.add_point_load_at(case, id, load)?;
        Ok(id)
    }

    pub fn add_point_load_at(&mut self, case: &str, node: NodeId, load: NodeLoad) -> FrameResult<()> {
        self.node(node)?;
        self.load_case_mut(case)?.add_load(node, load);
        Ok(())
    }

    pub fn add_displacement_bound(&mut self, case: &str, bound: DisplacementBound) -> FrameResult<()> {
        self.node(bound.node)?;
        check_bound(&bound)?;
        self.load_case_mut(case)?.add_bound(bound);
        Ok(())
    }

    /// Replace a member's section; cached results are left as they are
    pub fn set_member_section(&mut self, id: MemberId, section: Section) -> FrameResult<()> {
        let member = self.member_mut(id)?;
        section.validate(member.kind == MemberKind::Beam)?;
        member.section = section;
        Ok(())
    }

    /// Replace a member's material; cached results are left as they are
    pub fn set_member_material(&mut self, id: MemberId, material: Material) -> FrameResult<()> {
        let member = self.member_mut(id)?;
        material.validate(member.kind == MemberKind::Beam)?;
        member.material = material;
        Ok(())
    }

    // ========================
    // Model Access Methods
    // ========================

    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> FrameResult<&Node> {
        self.nodes
            .get(id.index())
            .ok_or(FrameError::NodeIndexOutOfRange(id.index()))
    }

    fn node_mut(&mut self, id: NodeId) -> FrameResult<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .ok_or(FrameError::NodeIndexOutOfRange(id.index()))
    }

    /// Node within tolerance of `position`
    pub fn find_node(&self, position: [f64; 3]) -> Option<NodeId> {
        self.grid.find(position, &self.nodes)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, id: MemberId) -> FrameResult<&Member> {
        self.members
            .get(id.index())
            .ok_or(FrameError::MemberNotFound(id.index()))
    }

    fn member_mut(&mut self, id: MemberId) -> FrameResult<&mut Member> {
        self.members
            .get_mut(id.index())
            .ok_or(FrameError::MemberNotFound(id.index()))
    }

    /// Supported nodes and their restraints
    pub fn supports(&self) -> Vec<(NodeId, Support)> {
        self.nodes
            .iter()
            .filter(|n| n.is_supported())
            .map(|n| (n.id, Support::from_array(n.fixity)))
            .collect()
    }

    pub fn load_cases(&self) -> &[LoadCase] {
        &self.load_cases
    }

    pub fn load_case(&self, name: &str) -> FrameResult<&LoadCase> {
        self.load_cases
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| FrameError::LoadCaseNotFound(name.to_string()))
    }

    fn load_case_mut(&mut self, name: &str) -> FrameResult<&mut LoadCase> {
        self.load_cases
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| FrameError::LoadCaseNotFound(name.to_string()))
    }

    /// DOF numbering for the current supports
    pub fn dof_map(&self) -> &DofMap {
        &self.dofs
    }

    /// Scheme the next assembly will use
    pub fn dof_scheme(&self) -> DofScheme {
        assembly::select_scheme(&self.members)
    }

    /// Reduced stiffness matrix in the active scheme, `None` without free DOFs
    pub fn stiffness_matrix(&self) -> FrameResult<Option<MatrixDense>> {
        let scheme = self.dof_scheme();
        if self.dofs.n_free(scheme) == 0 {
            return Ok(None);
        }
        assembly::assemble_stiffness(&self.members, &self.dofs, scheme).map(Some)
    }

    /// Full 6n x 6n stiffness matrix, supports ignored
    pub fn global_stiffness_matrix(&self) -> FrameResult<MatrixDense> {
        assembly::assemble_full_stiffness(&self.members, self.nodes.len())
    }

    /// Accumulated loads of a case, 6 components per node
    pub fn loads(&self, case: &str) -> FrameResult<Vec<f64>> {
        assembly::full_load_vector(self.load_case(case)?, self.nodes.len())
    }

    // ========================
    // Analysis Methods
    // ========================

    /// Solve one load case
    ///
    /// Discards earlier results for the case, assembles and solves the
    /// reduced system, then caches node displacements, reactions and member
    /// end forces. Nothing is cached when the solve fails.
    pub fn solve(&mut self, case: &str, options: &SolveOptions) -> FrameResult<Solution> {
        let load_case = self.load_case(case)?;
        let case_name = load_case.name.clone();
        self.clear_results(&case_name);

        let scheme = self.dof_scheme();
        let n_free = self.dofs.n_free(scheme);
        debug!(
            "load case '{}': {} nodes, {} members, {:?} scheme, {} free DOFs",
            case_name,
            self.nodes.len(),
            self.members.len(),
            scheme,
            n_free
        );
        if scheme == DofScheme::Frame6 {
            self.warn_rotation_free_bar_nodes();
        }

        let solver = solver_for(options);
        let load_case = self.load_case(case)?;
        let (reduced, iterations, residual, elapsed) = if n_free == 0 {
            info!("load case '{}': no free DOFs, nothing to solve", case_name);
            (Vec::new(), None, 0.0, Duration::ZERO)
        } else {
            let k = assembly::assemble_stiffness(&self.members, &self.dofs, scheme)?;
            let f = assembly::assemble_loads(load_case, &self.dofs, scheme)?;

            let started = Instant::now();
            let sol = solver.solve(&k, &f)?;
            let elapsed = started.elapsed();
            (sol.x.into_vec(), sol.iterations, sol.residual, elapsed)
        };

        let full = self.dofs.expand(scheme, &reduced)?;
        let member_results = self
            .members
            .iter()
            .map(|m| recover_member(m, &full))
            .collect::<FrameResult<Vec<_>>>()?;
        let reactions = self.compute_reactions(load_case, scheme, &full)?;

        for node in &mut self.nodes {
            let base = node.id.index() * DOFS_PER_NODE;
            let mut d = [0.0; 6];
            d.copy_from_slice(&full[base..base + DOFS_PER_NODE]);
            node.displacements.insert(case_name.clone(), d);
        }
        for (id, r) in reactions {
            self.nodes[id.index()].reactions.insert(case_name.clone(), r);
        }
        for (member, result) in self.members.iter_mut().zip(member_results) {
            member.results.insert(case_name.clone(), result);
        }
        self.solved.insert(case_name.clone());

        info!(
            "load case '{}' solved: {} in {:?}, {} free DOFs, residual {:.3e}",
            case_name,
            solver.name(),
            elapsed,
            n_free,
            residual
        );

        Ok(Solution {
            load_case: case_name,
            scheme,
            displacements: reduced,
            solver: options.solver,
            solve_time: elapsed,
            iterations,
            residual,
        })
    }

    fn clear_results(&mut self, case: &str) {
        self.solved.remove(case);
        for node in &mut self.nodes {
            node.clear_results(case);
        }
        for member in &mut self.members {
            member.clear_results(case);
        }
    }

    /// Nodes touched only by bars have no rotational stiffness in the frame scheme
    fn warn_rotation_free_bar_nodes(&self) {
        let mut on_beam = vec![false; self.nodes.len()];
        for member in self.members.iter().filter(|m| m.kind() == MemberKind::Beam) {
            for n in member.nodes() {
                on_beam[n.index()] = true;
            }
        }
        for node in &self.nodes {
            if !on_beam[node.id.index()] && node.fixity[3..].iter().any(|f| !f) {
                warn!(
                    "node {} at {:?} connects only to bars but has free rotations; restrain them or the system is singular",
                    node.id.index(),
                    node.coords()
                );
            }
        }
    }

    /// R = K u - f on the restrained axes of supported nodes
    ///
    /// Under [`DofScheme::Truss3`] applied moments never enter the solve, so
    /// they are left out of the reactions as well.
    fn compute_reactions(
        &self,
        case: &LoadCase,
        scheme: DofScheme,
        full: &[f64],
    ) -> FrameResult<Vec<(NodeId, [f64; 6])>> {
        if !self.nodes.iter().any(|n| n.is_supported()) {
            return Ok(Vec::new());
        }

        let k_full = self.global_stiffness_matrix()?;
        let ku = k_full.mul_vec(&Vector::from_slice(full)?)?;
        let mut f = assembly::full_load_vector(case, self.nodes.len())?;
        if scheme == DofScheme::Truss3 {
            for node in 0..self.nodes.len() {
                let base = node * DOFS_PER_NODE;
                f[base + 3..base + DOFS_PER_NODE].fill(0.0);
            }
        }

        let mut reactions = Vec::new();
        for node in self.nodes.iter().filter(|n| n.is_supported()) {
            let base = node.id.index() * DOFS_PER_NODE;
            let mut r = [0.0; 6];
            for axis in 0..DOFS_PER_NODE {
                if node.fixity[axis] {
                    r[axis] = ku[base + axis] - f[base + axis];
                }
            }
            reactions.push((node.id, r));
        }
        Ok(reactions)
    }

    // ========================
    // Result Access Methods
    // ========================

    pub fn is_solved(&self, case: &str) -> bool {
        self.solved.contains(case)
    }

    fn require_solved(&self, case: &str) -> FrameResult<()> {
        self.load_case(case)?;
        if !self.is_solved(case) {
            return Err(FrameError::NotAnalyzed(case.to_string()));
        }
        Ok(())
    }

    /// Displacements of a solved case, 6 components per node
    pub fn displacements(&self, case: &str) -> FrameResult<Vec<f64>> {
        self.require_solved(case)?;
        let mut out = Vec::with_capacity(self.nodes.len() * DOFS_PER_NODE);
        for node in &self.nodes {
            let d = node
                .displacement(case)
                .ok_or_else(|| FrameError::NotAnalyzed(case.to_string()))?;
            out.extend_from_slice(&d);
        }
        Ok(out)
    }

    /// Get node displacement
    pub fn node_displacement(&self, id: NodeId, case: &str) -> FrameResult<NodeDisplacement> {
        self.require_solved(case)?;
        let disp = self
            .node(id)?
            .displacement(case)
            .ok_or_else(|| FrameError::NotAnalyzed(case.to_string()))?;
        Ok(NodeDisplacement::from_array(disp))
    }

    /// Get node reactions; zero at unsupported nodes
    pub fn node_reactions(&self, id: NodeId, case: &str) -> FrameResult<Reactions> {
        self.require_solved(case)?;
        let rxn = self.node(id)?.reaction(case).unwrap_or([0.0; 6]);
        Ok(Reactions::from_array(rxn))
    }

    /// Get member forces at i-node
    pub fn member_forces_i(&self, id: MemberId, case: &str) -> FrameResult<MemberForces> {
        self.require_solved(case)?;
        self.member(id)?
            .forces_i(case)
            .ok_or_else(|| FrameError::NotAnalyzed(case.to_string()))
    }

    /// Get member forces at j-node
    pub fn member_forces_j(&self, id: MemberId, case: &str) -> FrameResult<MemberForces> {
        self.require_solved(case)?;
        self.member(id)?
            .forces_j(case)
            .ok_or_else(|| FrameError::NotAnalyzed(case.to_string()))
    }

    /// Axial force, positive in tension
    pub fn member_axial_force(&self, id: MemberId, case: &str) -> FrameResult<f64> {
        self.require_solved(case)?;
        self.member(id)?
            .axial(case)
            .ok_or_else(|| FrameError::NotAnalyzed(case.to_string()))
    }

    /// Displacement bounds of a solved case that are exceeded
    pub fn bound_violations(&self, case: &str) -> FrameResult<Vec<BoundViolation>> {
        self.require_solved(case)?;
        let mut violations = Vec::new();
        for bound in &self.load_case(case)?.displacement_bounds {
            let disp = self.node_displacement(bound.node, case)?;
            let value = disp.as_array()[bound.axis.index()];
            if !bound.contains(value) {
                violations.push(BoundViolation {
                    node: bound.node,
                    axis: bound.axis,
                    value,
                    lower: bound.lower,
                    upper: bound.upper,
                });
            }
        }
        Ok(violations)
    }

    /// Get analysis summary
    pub fn summary(&self, case: &str) -> FrameResult<AnalysisSummary> {
        self.require_solved(case)?;

        let scheme = self.dof_scheme();
        let mut summary = AnalysisSummary {
            num_nodes: self.nodes.len(),
            num_members: self.members.len(),
            total_dofs: self.nodes.len() * scheme.dofs_per_node(),
            free_dofs: self.dofs.n_free(scheme),
            bound_violations: self.bound_violations(case)?.len(),
            ..Default::default()
        };

        for node in &self.nodes {
            if let Some(disp) = node.displacement(case) {
                let mag = NodeDisplacement::from_array(disp).translation_magnitude();
                if mag > summary.max_displacement {
                    summary.max_displacement = mag;
                    summary.max_disp_node = Some(node.id);
                }
            }
            if let Some(rxn) = node.reaction(case) {
                let mag = Reactions::from_array(rxn).force_magnitude();
                if mag > summary.max_reaction {
                    summary.max_reaction = mag;
                    summary.max_reaction_node = Some(node.id);
                }
            }
        }

        for member in &self.members {
            if let Some(axial) = member.axial(case) {
                if axial.abs() > summary.max_axial {
                    summary.max_axial = axial.abs();
                    summary.max_axial_member = Some(member.id);
                }
            }
            if let Some(moment) = member.max_moment(case) {
                if moment > summary.max_moment {
                    summary.max_moment = moment;
                    summary.max_moment_member = Some(member.id);
                }
            }
        }

        Ok(summary)
    }
}

fn check_position(p: [f64; 3]) -> FrameResult<()> {
    if p.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(FrameError::InvalidGeometry(format!("non-finite coordinate {:?}", p)))
    }
}

fn check_bound(bound: &DisplacementBound) -> FrameResult<()> {
    if bound.lower > bound.upper {
        return Err(FrameError::Configuration(format!(
            "displacement bound lower limit {} exceeds upper limit {}",
            bound.lower, bound.upper
        )));
    }
    Ok(())
}

fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2) + (b[2] - a[2]).powi(2)).sqrt()
}

/// End forces of one member from the full displacement vector
fn recover_member(member: &Member, full: &[f64]) -> FrameResult<MemberResult> {
    let [i, j] = member.nodes();
    let d_i = &full[i.index() * DOFS_PER_NODE..(i.index() + 1) * DOFS_PER_NODE];
    let d_j = &full[j.index() * DOFS_PER_NODE..(j.index() + 1) * DOFS_PER_NODE];

    let mut result = MemberResult {
        local_forces: [0.0; 12],
        global_forces: [0.0; 12],
        local_displacements: [0.0; 12],
    };

    match member.kind() {
        MemberKind::Bar => {
            let dir = member.direction();
            let axes = member.local_axes();
            let elongation: f64 = (0..3).map(|k| (d_j[k] - d_i[k]) * dir[k]).sum();
            let n = elongation * member.material().e * member.section().a / member.length();

            result.local_forces[0] = -n;
            result.local_forces[6] = n;
            for k in 0..3 {
                result.global_forces[k] = -n * dir[k];
                result.global_forces[6 + k] = n * dir[k];
            }
            for (r, axis) in axes.iter().enumerate() {
                result.local_displacements[r] = (0..3).map(|k| axis[k] * d_i[k]).sum();
                result.local_displacements[6 + r] = (0..3).map(|k| axis[k] * d_j[k]).sum();
            }
        }
        MemberKind::Beam => {
            let d_global = Vector::from_vec(d_i.iter().chain(d_j).copied().collect())?;
            let t = member.transformation()?;
            let d_local = t.mul_vec(&d_global)?;
            let f_local = member.local_stiffness()?.mul_vec(&d_local)?;
            let f_global = t.tr_mul_vec(&f_local)?;

            result.local_forces.copy_from_slice(f_local.as_slice());
            result.global_forces.copy_from_slice(f_global.as_slice());
            result.local_displacements.copy_from_slice(d_local.as_slice());
        }
    }

    Ok(result)
}
