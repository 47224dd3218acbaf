//! Per-asset query state and the views derived from it.

use crate::normalize::{decode_decimals, normalize_value};
use oracle_contract::RawResponse;
use oracle_types::{AssetKey, DecimalsReading, GetValueResult, QueryState};

/// The two independent calls behind one asset reading.
///
/// Raw words are kept as received; the published view is recomputed from
/// both states every time either changes, so a value that lands before
/// its decimals is corrected as soon as they arrive.
#[derive(Debug, Clone)]
pub struct ValueQuery {
	asset_key: AssetKey,
	pub(crate) decimals: QueryState<RawResponse>,
	pub(crate) value: QueryState<RawResponse>,
}

impl ValueQuery {
	pub fn new(asset_key: AssetKey) -> Self {
		Self {
			asset_key,
			decimals: QueryState::Idle,
			value: QueryState::Idle,
		}
	}

	pub fn asset_key(&self) -> AssetKey {
		self.asset_key
	}

	/// Starts a re-run of both calls.
	pub fn refresh(&mut self) {
		self.decimals.refresh();
		self.value.refresh();
	}

	/// Forgets every outcome, e.g. after the active network changed.
	pub fn reset(&mut self) {
		self.decimals.reset();
		self.value.reset();
	}

	pub fn decimals_reading(&self) -> DecimalsReading {
		decimals_reading(&self.decimals)
	}

	pub fn snapshot(&self) -> GetValueResult {
		let decimals = self.decimals.data().and_then(|raw| decode_decimals(raw));

		GetValueResult {
			oracle_response: self.value.data().map(|raw| normalize_value(raw, decimals)),
			loading: self.value.is_loading(),
			error: self.value.error().map(str::to_string),
		}
	}
}

pub(crate) fn decimals_reading(state: &QueryState<RawResponse>) -> DecimalsReading {
	DecimalsReading {
		decimals: state.data().and_then(|raw| decode_decimals(raw)),
		loading: state.is_loading(),
		error: state.error().map(str::to_string),
	}
}
