// CNPJ Lookup - Core Library
// Exposes all modules for use in the TUI, the web server, and tests

pub mod error;
pub mod identifier;  // Normalization + validation gate
pub mod format;      // CNPJ / CPF / CEP / currency display
pub mod record;      // Typed registry response
pub mod presenter;   // Record → display entries
pub mod client;      // Registry HTTP client
pub mod search;      // Search state machine
pub mod config;
pub mod telemetry;

// Re-export commonly used types
pub use error::{LookupError, LookupResult};
pub use identifier::{normalize, validate, Cnpj};
pub use format::{format_brl, format_cep, format_cnpj, format_cpf, format_masked_cpf};
pub use record::{CompanyRecord, PartnerEntry, SecondaryActivity, TaxRegimeEntry};
pub use presenter::{
    present, DisplayEntry, PartnerTaxId, PartnerView, RecordView, TaxIdKind,
    NOT_APPLICABLE, NO_PARTNERS, PLACEHOLDER,
};
pub use client::{decode_response, BrasilApiClient, RegistryClient};
pub use search::{SearchEvent, SearchOutcome, SearchSession, SearchState};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
