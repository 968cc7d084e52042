//! Fuzzy identifier resolution: similarity scoring and the
//! exact-match-first resolver applied to operation requests.

mod call;
mod resolver;
pub mod similarity;

pub use call::resolve_request;
pub use resolver::{
    describe_candidates, NameResolver, ResolveOutcome, Resolution, ResolverConfig, ScoredCandidate,
};
