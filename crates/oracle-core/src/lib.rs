//! Oracle price reading.
//!
//! [`OracleReader`] resolves the oracle deployment for the active network
//! and exposes the two reads the oracle offers: the shared decimals value
//! and the per-asset price. One-shot reads return a settled
//! [`GetValueResult`](oracle_types::GetValueResult); subscriptions publish
//! every intermediate state, so consumers can render loading and partial
//! readings while calls are in flight.

pub mod decode;
pub mod normalize;
pub mod query;
pub mod reader;
pub mod subscription;

#[cfg(test)]
pub(crate) mod test_support;

pub use normalize::{decode_decimals, normalize_value};
pub use query::ValueQuery;
pub use reader::OracleReader;
pub use subscription::ValueSubscription;
