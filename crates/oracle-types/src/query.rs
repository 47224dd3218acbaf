//! Lifecycle of a single contract query.

/// State of one query: `Idle -> Pending -> Success | Failure`.
///
/// A query re-runs whenever its inputs change or its refresh interval
/// elapses. Re-runs that already hold data keep serving it until the new
/// outcome lands.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
	Idle,
	Pending,
	Success(T),
	Failure(String),
}

impl<T> Default for QueryState<T> {
	fn default() -> Self {
		QueryState::Idle
	}
}

impl<T> QueryState<T> {
	pub fn is_loading(&self) -> bool {
		matches!(self, QueryState::Pending)
	}

	pub fn data(&self) -> Option<&T> {
		match self {
			QueryState::Success(data) => Some(data),
			_ => None,
		}
	}

	pub fn error(&self) -> Option<&str> {
		match self {
			QueryState::Failure(error) => Some(error),
			_ => None,
		}
	}

	/// Marks the query as in flight, dropping any previous outcome.
	pub fn begin(&mut self) {
		*self = QueryState::Pending;
	}

	/// Marks a re-run: only queries without data go back to `Pending`.
	pub fn refresh(&mut self) {
		if !matches!(self, QueryState::Success(_)) {
			self.begin();
		}
	}

	/// Records the outcome of a call.
	///
	/// Returns `false` and leaves the state untouched for an `Idle` query,
	/// so results of a call issued before a reset are dropped.
	pub fn resolve(&mut self, outcome: Result<T, String>) -> bool {
		if matches!(self, QueryState::Idle) {
			return false;
		}
		*self = match outcome {
			Ok(data) => QueryState::Success(data),
			Err(error) => QueryState::Failure(error),
		};
		true
	}

	pub fn reset(&mut self) {
		*self = QueryState::Idle;
	}
}
