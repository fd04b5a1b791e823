//! Published access state and the synchronous predicates consulted by rendering code.

mod evaluator;
mod permission_set;
mod state;

pub use evaluator::{component_allowed, feature_allowed, AccessEvaluator, DEFAULT_ACTION};
pub use permission_set::{PermissionSet, WILDCARD};
pub use state::{LoadStatus, PermissionSource, ResolvedAccessState};
