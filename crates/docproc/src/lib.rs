//! Top-level facade crate for docproc.
//!
//! Re-exports the core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use docproc_core::*;
}

pub mod gateway {
    pub use docproc_gateway::*;
}
