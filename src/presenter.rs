// 🗂️ Record presenter - CompanyRecord → labeled display entries
//
// Presentation is resilient: a missing field becomes a placeholder, never an error.

use crate::format::{format_brl, format_cep, format_cnpj, format_cpf, format_masked_cpf};
use crate::identifier::{normalize, CEP_LEN, CNPJ_LEN, CPF_LEN};
use crate::record::{CompanyRecord, PartnerEntry};
use serde::Serialize;

/// Shown for any absent field
pub const PLACEHOLDER: &str = "-";

/// Shown when the company has no tax regime history
pub const NOT_APPLICABLE: &str = "N/A";

/// Shown in place of the partners section when the roster is empty
pub const NO_PARTNERS: &str = "No partners found.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayEntry {
    pub label: &'static str,
    pub value: String,
}

impl DisplayEntry {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self { label, value: value.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaxIdKind {
    Cnpj,
    Cpf,
    /// CPF with the registry's privacy mask, e.g. `***.220.050-**`
    MaskedCpf,
}

impl TaxIdKind {
    pub fn label(&self) -> &'static str {
        match self {
            TaxIdKind::Cnpj => "CNPJ",
            TaxIdKind::Cpf | TaxIdKind::MaskedCpf => "CPF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerTaxId {
    pub kind: TaxIdKind,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerView {
    pub name: String,
    pub qualification: String,
    /// None when the identifier is absent or has an unrecognized length
    pub tax_id: Option<PartnerTaxId>,
    pub age_group: String,
    pub entry_date: String,
}

/// Everything a display surface needs, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView {
    /// Left column
    pub company: Vec<DisplayEntry>,
    /// Right column
    pub registration: Vec<DisplayEntry>,
    pub partners: Vec<PartnerView>,
    pub main_activity: String,
    /// Empty means the section is omitted
    pub secondary_activities: Vec<String>,
}

impl RecordView {
    /// Value of the first entry with `label`, searching both columns
    pub fn field(&self, label: &str) -> Option<&str> {
        self.company
            .iter()
            .chain(self.registration.iter())
            .find(|e| e.label == label)
            .map(|e| e.value.as_str())
    }
}

// ============================================================================
// LABELS
// ============================================================================

pub const LABEL_LEGAL_NAME: &str = "Legal Name (Razão Social)";
pub const LABEL_TRADE_NAME: &str = "Trade Name (Nome Fantasia)";
pub const LABEL_CNPJ: &str = "CNPJ";
pub const LABEL_CAPITAL: &str = "Social Capital";
pub const LABEL_OPENING_DATE: &str = "Opening Date";
pub const LABEL_PHONES: &str = "Phones";
pub const LABEL_ADDRESS: &str = "Address";
pub const LABEL_CITY: &str = "City";
pub const LABEL_ZIP: &str = "ZIP Code (CEP)";
pub const LABEL_EMAIL: &str = "Email";
pub const LABEL_STATUS: &str = "Registration Status";
pub const LABEL_STATUS_DATE: &str = "Registration Status Date";
pub const LABEL_TAX_REGIME: &str = "Tax Regime";

// ============================================================================
// PRESENTER
// ============================================================================

pub fn present(record: &CompanyRecord) -> RecordView {
    let company = vec![
        DisplayEntry::new(LABEL_LEGAL_NAME, text(&record.razao_social)),
        DisplayEntry::new(LABEL_TRADE_NAME, text(&record.nome_fantasia)),
        DisplayEntry::new(LABEL_CNPJ, formatted_if_len(&record.cnpj, CNPJ_LEN, format_cnpj)),
        DisplayEntry::new(LABEL_CAPITAL, format_brl(record.capital_social.unwrap_or(0.0))),
        DisplayEntry::new(LABEL_OPENING_DATE, text(&record.data_inicio_atividade)),
        DisplayEntry::new(
            LABEL_PHONES,
            join_present(&[&record.ddd_telefone_1, &record.ddd_telefone_2], ", "),
        ),
    ];

    let registration = vec![
        DisplayEntry::new(LABEL_ADDRESS, street_line(record)),
        DisplayEntry::new(LABEL_CITY, city_line(record)),
        DisplayEntry::new(LABEL_ZIP, formatted_if_len(&record.cep, CEP_LEN, format_cep)),
        DisplayEntry::new(LABEL_EMAIL, text(&record.email)),
        DisplayEntry::new(LABEL_STATUS, text(&record.descricao_situacao_cadastral)),
        DisplayEntry::new(LABEL_STATUS_DATE, text(&record.data_situacao_cadastral)),
        DisplayEntry::new(LABEL_TAX_REGIME, tax_regime(record)),
    ];

    RecordView {
        company,
        registration,
        partners: record.qsa.iter().map(present_partner).collect(),
        main_activity: text(&record.cnae_fiscal_descricao),
        secondary_activities: record
            .cnaes_secundarios
            .iter()
            .map(|a| text(&a.descricao))
            .collect(),
    }
}

pub fn present_partner(partner: &PartnerEntry) -> PartnerView {
    PartnerView {
        name: text(&partner.nome_socio),
        qualification: text(&partner.qualificacao_socio),
        tax_id: partner.cnpj_cpf_do_socio.as_deref().and_then(classify_tax_id),
        age_group: text(&partner.faixa_etaria),
        entry_date: text(&partner.data_entrada_sociedade),
    }
}

/// Pick the identifier type from its digit count: 14 → CNPJ, 11 → CPF.
///
/// The registry masks partner CPFs as `***NNNNNN**`; those keep their mask.
pub fn classify_tax_id(raw: &str) -> Option<PartnerTaxId> {
    let digits = normalize(raw);

    let (kind, formatted) = match digits.len() {
        CNPJ_LEN => (TaxIdKind::Cnpj, format_cnpj(&digits)),
        CPF_LEN => (TaxIdKind::Cpf, format_cpf(&digits)),
        _ if is_masked_cpf(raw) => (TaxIdKind::MaskedCpf, format_masked_cpf(raw.trim())),
        _ => return None,
    };

    Some(PartnerTaxId { kind, formatted })
}

fn is_masked_cpf(raw: &str) -> bool {
    let raw = raw.trim();
    raw.chars().count() == CPF_LEN
        && raw.contains('*')
        && raw.chars().any(|c| c.is_ascii_digit())
        && raw.chars().all(|c| c == '*' || c.is_ascii_digit())
}

fn tax_regime(record: &CompanyRecord) -> String {
    match record.current_tax_regime() {
        Some(entry) => text(&entry.forma_de_tributacao),
        None => NOT_APPLICABLE.to_string(),
    }
}

fn street_line(record: &CompanyRecord) -> String {
    let street = [&record.descricao_tipo_de_logradouro, &record.logradouro]
        .iter()
        .filter_map(|v| present_str(v))
        .collect::<Vec<_>>()
        .join(" ");
    let street = if street.is_empty() { None } else { Some(street) };

    join_present(&[&street, &record.numero, &record.complemento], ", ")
}

fn city_line(record: &CompanyRecord) -> String {
    let area = join_present(&[&record.bairro, &record.municipio], ", ");

    match (present_str(&record.uf), area.as_str()) {
        (Some(uf), PLACEHOLDER) => uf.to_string(),
        (Some(uf), _) => format!("{} - {}", area, uf),
        (None, _) => area,
    }
}

/// Format with `formatter` only when the value has exactly `len` digits.
/// Otherwise show what the registry sent.
fn formatted_if_len(value: &Option<String>, len: usize, formatter: fn(&str) -> String) -> String {
    match present_str(value) {
        Some(raw) => {
            let digits = normalize(raw);
            if digits.len() == len {
                formatter(&digits)
            } else {
                raw.to_string()
            }
        }
        None => PLACEHOLDER.to_string(),
    }
}

/// Trimmed, non-empty value
fn present_str(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn text(value: &Option<String>) -> String {
    present_str(value).unwrap_or(PLACEHOLDER).to_string()
}

fn join_present(values: &[&Option<String>], sep: &str) -> String {
    let parts: Vec<&str> = values.iter().filter_map(|v| present_str(v)).collect();
    if parts.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        parts.join(sep)
    }
}
