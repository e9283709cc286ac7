//! Structural elements module

mod material;
mod member;
mod node;
mod section;
mod support;

pub use material::Material;
pub use member::{ElementStiffness, Member, MemberId, MemberKind, MemberResult, MemberSpec};
pub use node::{Node, NodeId};
pub use section::Section;
pub use support::Support;
