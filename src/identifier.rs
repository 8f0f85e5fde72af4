// 🔢 Identifier normalization + validation
// The only gate between user input and the registry

use crate::error::{LookupError, LookupResult};
use std::fmt;

/// Number of digits in a CNPJ
pub const CNPJ_LEN: usize = 14;

/// Number of digits in a CPF
pub const CPF_LEN: usize = 11;

/// Number of digits in a CEP
pub const CEP_LEN: usize = 8;

/// Keep only ASCII digits, in their original order.
///
/// "11.222.333/0001-81" → "11222333000181"
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Check that an already-normalized identifier is a full CNPJ.
pub fn validate(normalized: &str) -> LookupResult<()> {
    let len = normalized.chars().count();
    if len == CNPJ_LEN && normalized.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(LookupError::InvalidLength { len })
    }
}

// ============================================================================
// CNPJ
// ============================================================================

/// A validated 14-digit CNPJ.
///
/// Only `Cnpj::parse` builds one, so holding a `Cnpj` means the lookup is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cnpj(String);

impl Cnpj {
    /// Nothing typed → `EmptyInput`, otherwise normalize then validate.
    ///
    /// Whitespace counts as typed text: `"   "` normalizes to zero digits and
    /// fails as `InvalidLength`.
    pub fn parse(raw: &str) -> LookupResult<Self> {
        if raw.is_empty() {
            return Err(LookupError::EmptyInput);
        }

        let digits = normalize(raw);
        validate(&digits)?;
        Ok(Cnpj(digits))
    }

    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format_cnpj(&self.0))
    }
}
