//! JSON model description and per-case result report
//!
//! Members name their end points by position, so there is no separate node
//! table; supports, loads and bounds locate their node the same way.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::analysis::{SolveOptions, SolverKind};
use crate::dof::{Axis, DofScheme};
use crate::elements::{Material, MemberKind, MemberSpec, NodeId, Section, Support};
use crate::error::{FrameError, FrameResult};
use crate::loads::{DisplacementBound, LoadCase, NodeLoad};
use crate::model::{Structure, StructureConfig};
use crate::results::{AnalysisSummary, BoundViolation, MemberForces, NodeDisplacement, Reactions};

#[derive(Debug, Clone, Deserialize)]
pub struct ModelData {
    #[serde(default)]
    pub config: StructureConfig,
    #[serde(default)]
    pub options: SolveOptions,
    pub materials: Vec<MaterialData>,
    pub sections: Vec<SectionData>,
    pub members: Vec<MemberData>,
    #[serde(default)]
    pub supports: Vec<SupportData>,
    #[serde(default)]
    pub load_cases: Vec<LoadCaseData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialData {
    pub name: String,
    #[serde(flatten)]
    pub material: Material,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionData {
    pub name: String,
    #[serde(flatten)]
    pub section: Section,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberData {
    pub kind: MemberKind,
    pub start: [f64; 3],
    pub end: [f64; 3],
    pub material: String,
    pub section: String,
    #[serde(default)]
    pub rotation: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupportData {
    pub at: [f64; 3],
    #[serde(flatten)]
    pub support: Support,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadCaseData {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub loads: Vec<NodeLoadData>,
    #[serde(default)]
    pub bounds: Vec<BoundData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeLoadData {
    pub at: [f64; 3],
    #[serde(flatten)]
    pub load: NodeLoad,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoundData {
    pub at: [f64; 3],
    pub axis: Axis,
    pub lower: f64,
    pub upper: f64,
}

impl ModelData {
    pub fn from_json(text: &str) -> FrameResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> FrameResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Build the structure described by this model
    pub fn build(&self) -> FrameResult<Structure> {
        let materials: HashMap<&str, &Material> = self
            .materials
            .iter()
            .map(|m| (m.name.as_str(), &m.material))
            .collect();
        let sections: HashMap<&str, &Section> = self
            .sections
            .iter()
            .map(|s| (s.name.as_str(), &s.section))
            .collect();

        let mut structure = Structure::with_config(self.config)?;

        for member in &self.members {
            let material = materials.get(member.material.as_str()).ok_or_else(|| {
                FrameError::Configuration(format!("unknown material '{}'", member.material))
            })?;
            let section = sections.get(member.section.as_str()).ok_or_else(|| {
                FrameError::Configuration(format!("unknown section '{}'", member.section))
            })?;
            structure.add_member(MemberSpec {
                kind: member.kind,
                start: member.start,
                end: member.end,
                material: (*material).clone(),
                section: (*section).clone(),
                rotation: member.rotation,
            })?;
        }

        for sup in &self.supports {
            structure.add_support(sup.at, sup.support)?;
        }

        for case in &self.load_cases {
            let mut load_case = LoadCase::new(&case.name);
            load_case.description = case.description.clone();
            structure.add_load_case(load_case)?;

            for load in &case.loads {
                structure.add_point_load(&case.name, load.at, load.load)?;
            }
            for bound in &case.bounds {
                let node = structure
                    .find_node(bound.at)
                    .ok_or(FrameError::NodeNotFound(bound.at[0], bound.at[1], bound.at[2]))?;
                structure.add_displacement_bound(
                    &case.name,
                    DisplacementBound::new(node, bound.axis, bound.lower, bound.upper),
                )?;
            }
        }

        Ok(structure)
    }
}

#[derive(Debug, Clone)]
pub struct CaseReport {
    pub load_case: String,
    pub solver: SolverKind,
    pub scheme: DofScheme,
    pub free_dofs: usize,
    pub iterations: Option<usize>,
    pub residual: f64,
    pub solve_time_ms: f64,
    pub displacements: Vec<NodeResult>,
    pub reactions: Vec<ReactionResult>,
    pub members: Vec<MemberResultData>,
    pub violations: Vec<BoundViolation>,
    pub summary: AnalysisSummary,
}

#[derive(Debug, Clone)]
pub struct NodeResult {
    pub node: NodeId,
    pub position: [f64; 3],
    pub displacement: NodeDisplacement,
}

#[derive(Debug, Clone)]
pub struct ReactionResult {
    pub node: NodeId,
    pub position: [f64; 3],
    pub reaction: Reactions,
}

#[derive(Debug, Clone)]
pub struct MemberResultData {
    pub member: usize,
    pub kind: MemberKind,
    pub axial: f64,
    pub forces_i: MemberForces,
    pub forces_j: MemberForces,
}

/// Solve every load case in registration order and collect the results
pub fn solve_all(structure: &mut Structure, options: &SolveOptions) -> FrameResult<Vec<CaseReport>> {
    let names: Vec<String> = structure.load_cases().iter().map(|c| c.name.clone()).collect();
    let mut reports = Vec::with_capacity(names.len());

    for name in names {
        let solution = structure.solve(&name, options)?;

        let mut displacements = Vec::new();
        let mut reactions = Vec::new();
        for node in structure.nodes() {
            displacements.push(NodeResult {
                node: node.id(),
                position: node.coords(),
                displacement: structure.node_displacement(node.id(), &name)?,
            });
            if node.is_supported() {
                reactions.push(ReactionResult {
                    node: node.id(),
                    position: node.coords(),
                    reaction: structure.node_reactions(node.id(), &name)?,
                });
            }
        }

        let mut members = Vec::new();
        for member in structure.members() {
            members.push(MemberResultData {
                member: member.id().index(),
                kind: member.kind(),
                axial: structure.member_axial_force(member.id(), &name)?,
                forces_i: structure.member_forces_i(member.id(), &name)?,
                forces_j: structure.member_forces_j(member.id(), &name)?,
            });
        }

        reports.push(CaseReport {
            load_case: name.clone(),
            solver: solution.solver,
            scheme: solution.scheme,
            free_dofs: solution.n_free(),
            iterations: solution.iterations,
            residual: solution.residual,
            solve_time_ms: solution.solve_time.as_secs_f64() * 1000.0,
            displacements,
            reactions,
            members,
            violations: structure.bound_violations(&name)?,
            summary: structure.summary(&name)?,
        });
    }

    Ok(reports)
}
