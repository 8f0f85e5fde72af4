// 🔎 Search state machine
//
// Idle → Validating → Failed (bad input)
//                   → Requesting → Failed (not found / transport)
//                                → Presenting
//
// Failed and Presenting are resting states: the next submit starts over at
// Validating and drops whatever was shown before.

use crate::client::RegistryClient;
use crate::error::LookupError;
use crate::identifier::Cnpj;
use crate::presenter::{present, RecordView};
use crate::record::CompanyRecord;
use chrono::{DateTime, Utc};

/// A successful search, ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub cnpj: Cnpj,
    pub view: RecordView,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Validating { input: String },
    Requesting { cnpj: Cnpj },
    Presenting(SearchOutcome),
    Failed(LookupError),
}

#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// User pressed submit with this raw text
    Submit(String),
    /// Registry answered (or the transport gave up)
    ResponseReceived(Result<CompanyRecord, LookupError>),
}

impl SearchState {
    pub fn name(&self) -> &'static str {
        match self {
            SearchState::Idle => "Idle",
            SearchState::Validating { .. } => "Validating",
            SearchState::Requesting { .. } => "Requesting",
            SearchState::Presenting(_) => "Presenting",
            SearchState::Failed(_) => "Failed",
        }
    }

    /// Pure transition function. Events that make no sense in the current
    /// state leave it unchanged.
    pub fn transition(self, event: SearchEvent) -> SearchState {
        match (self, event) {
            // Any resting state accepts a new submission
            (SearchState::Idle, SearchEvent::Submit(input))
            | (SearchState::Presenting(_), SearchEvent::Submit(input))
            | (SearchState::Failed(_), SearchEvent::Submit(input)) => {
                SearchState::Validating { input }
            }

            (SearchState::Requesting { cnpj }, SearchEvent::ResponseReceived(result)) => match result {
                Ok(record) => SearchState::Presenting(SearchOutcome {
                    cnpj,
                    view: present(&record),
                    fetched_at: Utc::now(),
                }),
                Err(err) => SearchState::Failed(err),
            },

            (state, _) => state,
        }
    }

    /// Run validation. Only meaningful in `Validating`.
    pub fn validate(self) -> SearchState {
        match self {
            SearchState::Validating { input } => match Cnpj::parse(&input) {
                Ok(cnpj) => SearchState::Requesting { cnpj },
                Err(err) => SearchState::Failed(err),
            },
            state => state,
        }
    }

    pub fn outcome(&self) -> Option<&SearchOutcome> {
        match self {
            SearchState::Presenting(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LookupError> {
        match self {
            SearchState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

// ============================================================================
// SEARCH SESSION
// ============================================================================

/// Owns the current state and the registry client. One search at a time.
pub struct SearchSession<C: RegistryClient> {
    client: C,
    state: SearchState,
}

impl<C: RegistryClient> SearchSession<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: SearchState::Idle,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Drive one submission through to a resting state.
    ///
    /// `on_request` is called right before the network call, so a surface can
    /// draw a "searching" frame while the call blocks.
    pub fn submit_with<F>(&mut self, raw: &str, on_request: F) -> &SearchState
    where
        F: FnOnce(&Cnpj),
    {
        let state = std::mem::take(&mut self.state)
            .transition(SearchEvent::Submit(raw.to_string()))
            .validate();

        self.state = match state {
            SearchState::Requesting { cnpj } => {
                on_request(&cnpj);
                let result = self.client.fetch(&cnpj);
                if let Err(err) = &result {
                    tracing::warn!(cnpj = %cnpj.digits(), client = self.client.name(), code = err.code(), "lookup failed");
                } else {
                    tracing::info!(cnpj = %cnpj.digits(), client = self.client.name(), "lookup succeeded");
                }
                SearchState::Requesting { cnpj }.transition(SearchEvent::ResponseReceived(result))
            }
            other => {
                if let Some(err) = other.error() {
                    tracing::debug!(code = err.code(), "input rejected before request");
                }
                other
            }
        };

        &self.state
    }

    pub fn submit(&mut self, raw: &str) -> &SearchState {
        self.submit_with(raw, |_| {})
    }
}
