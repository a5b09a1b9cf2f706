use crate::api::FetchError;

/// Lifecycle of one observed query.
///
/// Transitions happen only on a parameter change or explicit refetch ([`begin`]) and on
/// network completion ([`settle`]). During a reload the previous data stays available
/// through [`data`] while [`is_loading`] is true.
///
/// [`begin`]: QueryState::begin
/// [`settle`]: QueryState::settle
/// [`data`]: QueryState::data
/// [`is_loading`]: QueryState::is_loading
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Never requested, or disabled by a false precondition.
    Idle,
    Loading { previous: Option<T> },
    Success(T),
    Error(FetchError),
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        QueryState::Idle
    }
}

impl<T> QueryState<T> {
    /// A request was issued. Existing data is carried over as `previous`.
    pub fn begin(self) -> Self {
        match self {
            QueryState::Success(data) => QueryState::Loading {
                previous: Some(data),
            },
            QueryState::Loading { previous } => QueryState::Loading { previous },
            QueryState::Idle | QueryState::Error(_) => QueryState::Loading { previous: None },
        }
    }

    /// A request finished.
    pub fn settle(self, result: Result<T, FetchError>) -> Self {
        match result {
            Ok(data) => QueryState::Success(data),
            Err(err) => QueryState::Error(err),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data),
            QueryState::Loading { previous } => previous.as_ref(),
            QueryState::Idle | QueryState::Error(_) => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, QueryState::Idle)
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            QueryState::Error(err) => Some(err),
            _ => None,
        }
    }
}
