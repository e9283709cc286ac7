//! Load cases, nodal loads and displacement bounds

mod bound;
mod load_case;
mod node_load;
mod point_load;

pub use bound::DisplacementBound;
pub use load_case::LoadCase;
pub use node_load::NodeLoad;
pub use point_load::PointLoad;
