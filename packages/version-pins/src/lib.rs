//! Empty crate pinning transitive alloy versions, see its manifest.
