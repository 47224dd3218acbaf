//! Shared types for the oracle reader.
//!
//! Field elements, the fixed asset key set, network identifiers, normalized
//! oracle readings and the per-query state machine used by every crate in the
//! workspace.

pub mod assets;
pub mod errors;
pub mod felt;
pub mod network;
pub mod query;
pub mod response;

pub use assets::*;
pub use errors::*;
pub use felt::*;
pub use network::*;
pub use query::*;
pub use response::*;
