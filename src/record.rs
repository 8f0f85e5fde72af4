// 🏢 Company record - typed shape of the registry response
//
// Every field is optional: the registry does not guarantee completeness, and a
// missing or mistyped field must never fail the whole decode.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Company record as returned by `GET /api/cnpj/v1/{cnpj}`.
///
/// Field names follow the registry JSON. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompanyRecord {
    // ========================================================================
    // IDENTITY
    // ========================================================================
    #[serde(deserialize_with = "lenient_string")]
    pub razao_social: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub nome_fantasia: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub cnpj: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub capital_social: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub data_inicio_atividade: Option<String>,

    // ========================================================================
    // CONTACT + ADDRESS
    // ========================================================================
    #[serde(deserialize_with = "lenient_string")]
    pub ddd_telefone_1: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub ddd_telefone_2: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub descricao_tipo_de_logradouro: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub logradouro: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub numero: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub complemento: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub bairro: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub municipio: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub uf: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub cep: Option<String>,

    // ========================================================================
    // STATUS
    // ========================================================================
    #[serde(deserialize_with = "lenient_string")]
    pub descricao_situacao_cadastral: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub data_situacao_cadastral: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub regime_tributario: Vec<TaxRegimeEntry>,

    // ========================================================================
    // PARTNERS (QSA) + ACTIVITIES
    // ========================================================================
    #[serde(deserialize_with = "lenient_list")]
    pub qsa: Vec<PartnerEntry>,
    #[serde(deserialize_with = "lenient_string")]
    pub cnae_fiscal_descricao: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub cnaes_secundarios: Vec<SecondaryActivity>,
}

/// One entry of the partner/shareholder roster
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartnerEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub nome_socio: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub qualificacao_socio: Option<String>,
    /// CNPJ (14 digits), CPF (11 digits, usually masked) or absent
    #[serde(deserialize_with = "lenient_string")]
    pub cnpj_cpf_do_socio: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub faixa_etaria: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub data_entrada_sociedade: Option<String>,
}

/// Yearly tax regime entry. The list is chronological; the last one is current.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaxRegimeEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub forma_de_tributacao: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SecondaryActivity {
    #[serde(deserialize_with = "lenient_string")]
    pub descricao: Option<String>,
}

impl CompanyRecord {
    /// Decode a registry response body
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// Most recent tax regime entry, if any
    pub fn current_tax_regime(&self) -> Option<&TaxRegimeEntry> {
        self.regime_tributario.last()
    }
}

/// Accept a string or a number. Anything else decodes as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accept a JSON number or a numeric string. Anything else decodes as absent.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// A list of entries. Null or a non-list is empty, and elements that are not
/// entries are skipped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_record() {
        let body = json!({
            "cnpj": "19131243000197",
            "razao_social": "OPEN KNOWLEDGE BRASIL",
            "nome_fantasia": "REDE PELO CONHECIMENTO LIVRE",
            "capital_social": 0,
            "cep": "01311902",
            "uf": "SP",
            "regime_tributario": [
                {"ano": 2020, "forma_de_tributacao": "LUCRO PRESUMIDO"},
                {"ano": 2021, "forma_de_tributacao": "IMUNE DO IRPJ"}
            ],
            "qsa": [
                {"nome_socio": "FERNANDA CAMPAGNUCCI PEREIRA", "cnpj_cpf_do_socio": "***690948**"}
            ],
            "cnaes_secundarios": [
                {"codigo": 9493600, "descricao": "Atividades de organizações associativas ligadas à cultura e à arte"}
            ],
            "porte": "DEMAIS"
        })
        .to_string();

        let record = CompanyRecord::from_json(&body).unwrap();
        assert_eq!(record.cnpj.as_deref(), Some("19131243000197"));
        assert_eq!(record.capital_social, Some(0.0));
        assert_eq!(record.qsa.len(), 1);
        assert_eq!(record.cnaes_secundarios.len(), 1);
        assert_eq!(
            record.current_tax_regime().and_then(|r| r.forma_de_tributacao.as_deref()),
            Some("IMUNE DO IRPJ")
        );
    }

    #[test]
    fn test_decode_empty_object() {
        let record = CompanyRecord::from_json("{}").unwrap();
        assert_eq!(record, CompanyRecord::default());
        assert!(record.current_tax_regime().is_none());
    }

    #[test]
    fn test_decode_nulls() {
        let body = json!({
            "razao_social": null,
            "capital_social": null,
            "qsa": null,
            "regime_tributario": null,
            "cnaes_secundarios": null
        })
        .to_string();

        let record = CompanyRecord::from_json(&body).unwrap();
        assert!(record.razao_social.is_none());
        assert!(record.capital_social.is_none());
        assert!(record.qsa.is_empty());
        assert!(record.regime_tributario.is_empty());
    }

    #[test]
    fn test_capital_as_string() {
        let record = CompanyRecord::from_json(r#"{"capital_social": "1500.50"}"#).unwrap();
        assert_eq!(record.capital_social, Some(1500.5));

        let record = CompanyRecord::from_json(r#"{"capital_social": "n/a"}"#).unwrap();
        assert_eq!(record.capital_social, None);
    }

    #[test]
    fn test_mistyped_fields_do_not_fail_decode() {
        let body = json!({
            "razao_social": "ACME",
            "numero": 1000,
            "cep": 1310100,
            "email": false,
            "nome_fantasia": {"unexpected": "object"},
            "regime_tributario": [{"ano": "2021", "forma_de_tributacao": "LUCRO REAL"}],
            "qsa": [{"nome_socio": "MARIA", "cnpj_cpf_do_socio": 12345678909i64}, "garbage"],
            "cnaes_secundarios": {"not": "a list"}
        })
        .to_string();

        let record = CompanyRecord::from_json(&body).unwrap();
        assert_eq!(record.razao_social.as_deref(), Some("ACME"));
        assert_eq!(record.numero.as_deref(), Some("1000"));
        assert_eq!(record.cep.as_deref(), Some("1310100"));
        assert!(record.email.is_none());
        assert!(record.nome_fantasia.is_none());
        assert_eq!(
            record.current_tax_regime().and_then(|r| r.forma_de_tributacao.as_deref()),
            Some("LUCRO REAL")
        );
        assert_eq!(record.qsa.len(), 1);
        assert_eq!(record.qsa[0].cnpj_cpf_do_socio.as_deref(), Some("12345678909"));
        assert!(record.cnaes_secundarios.is_empty());
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(CompanyRecord::from_json("[1, 2, 3]").is_err());
        assert!(CompanyRecord::from_json("not json").is_err());
    }
}
