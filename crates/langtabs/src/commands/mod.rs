//! CLI command implementations.

pub(crate) mod apply;
pub(crate) mod inspect;

pub(crate) use apply::ApplyArgs;
pub(crate) use inspect::InspectArgs;
