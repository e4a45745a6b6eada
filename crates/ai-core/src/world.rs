use crate::AgentId;

/// Read-only world access.
///
/// The core crate does not prescribe which queries a world must expose; subsystems (environment
/// queries, perception, ...) define extension traits on top of it.
pub trait WorldView {
    type Agent: AgentId;
}
