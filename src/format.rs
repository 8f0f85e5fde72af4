// 🖋️ Display formatting
// Pure functions turning digit strings into the canonical Brazilian notation.
//
// Callers are expected to pass the right number of digits. On anything else the
// slices are clamped, so the result is malformed but never panics.

use crate::identifier::normalize;

/// Characters `start..end` of `s`, clamped to the string.
fn segment(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end.saturating_sub(start)).collect()
}

/// Everything from character `start` onwards.
fn rest(s: &str, start: usize) -> String {
    s.chars().skip(start).collect()
}

/// CNPJ: `DD.DDD.DDD/DDDD-DD`
pub fn format_cnpj(digits: &str) -> String {
    format!(
        "{}.{}.{}/{}-{}",
        segment(digits, 0, 2),
        segment(digits, 2, 5),
        segment(digits, 5, 8),
        segment(digits, 8, 12),
        segment(digits, 12, 14),
    )
}

/// CEP: `DDDDD-DDD`
pub fn format_cep(digits: &str) -> String {
    format!("{}-{}", segment(digits, 0, 5), rest(digits, 5))
}

/// CPF: `DDD.DDD.DDD-DD`. Strips non-digits first, unlike the other two.
pub fn format_cpf(raw: &str) -> String {
    let digits = normalize(raw);
    format!(
        "{}.{}.{}-{}",
        segment(&digits, 0, 3),
        segment(&digits, 3, 6),
        segment(&digits, 6, 9),
        rest(&digits, 9),
    )
}

/// Registry-masked CPF such as `***220050**` → `***.220.050-**`.
///
/// Grouping is applied to the raw characters so the mask stays in place.
pub fn format_masked_cpf(masked: &str) -> String {
    format!(
        "{}.{}.{}-{}",
        segment(masked, 0, 3),
        segment(masked, 3, 6),
        segment(masked, 6, 9),
        rest(masked, 9),
    )
}

/// Currency with two decimals and comma thousands separators: `R$ 1,234.50`
pub fn format_brl(value: f64) -> String {
    if !value.is_finite() {
        return "R$ 0.00".to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };

    format!("R$ {}{}.{}", sign, group_thousands(int_part), frac_part)
}

fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut grouped = String::with_capacity(len + len / 3);

    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// 11 digits with a run of separators after each one
    fn punctuated_cpf() -> impl Strategy<Value = (String, String)> {
        ("[0-9]{11}", prop::collection::vec("[ ./-]{0,2}", 11)).prop_map(|(digits, seps)| {
            let raw = digits
                .chars()
                .zip(seps.iter())
                .map(|(d, sep)| format!("{}{}", d, sep))
                .collect::<String>();
            (digits, raw)
        })
    }

    proptest! {
        #[test]
        fn prop_format_cnpj_matches_slices(d in "[0-9]{14}") {
            prop_assert_eq!(
                format_cnpj(&d),
                format!("{}.{}.{}/{}-{}", &d[0..2], &d[2..5], &d[5..8], &d[8..12], &d[12..14])
            );
        }

        #[test]
        fn prop_format_cep_matches_slices(d in "[0-9]{8}") {
            prop_assert_eq!(format_cep(&d), format!("{}-{}", &d[0..5], &d[5..8]));
        }

        #[test]
        fn prop_format_cpf_renormalizes((d, raw) in punctuated_cpf()) {
            prop_assert_eq!(
                format_cpf(&raw),
                format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
            );
        }

        #[test]
        fn prop_formatters_never_panic(s in "\\PC*") {
            let _ = format_cnpj(&s);
            let _ = format_cep(&s);
            let _ = format_cpf(&s);
            let _ = format_masked_cpf(&s);
        }

        #[test]
        fn prop_format_brl_always_prefixed(v in proptest::num::f64::ANY) {
            prop_assert!(format_brl(v).starts_with("R$ "));
        }
    }

    #[test]
    fn test_format_cnpj() {
        assert_eq!(format_cnpj("11222333000181"), "11.222.333/0001-81");
    }

    #[test]
    fn test_format_cnpj_wrong_length_does_not_panic() {
        assert_eq!(format_cnpj("123"), "12.3../-");
        assert_eq!(format_cnpj(""), "../-");
        // Extra characters past 14 are dropped
        assert_eq!(format_cnpj("1122233300018199"), "11.222.333/0001-81");
    }

    #[test]
    fn test_format_cep() {
        assert_eq!(format_cep("01310100"), "01310-100");
    }

    #[test]
    fn test_format_cep_short() {
        assert_eq!(format_cep("123"), "123-");
    }

    #[test]
    fn test_format_cpf() {
        assert_eq!(format_cpf("12345678909"), "123.456.789-09");
    }

    #[test]
    fn test_format_cpf_renormalizes() {
        assert_eq!(format_cpf("123.456.789-09"), "123.456.789-09");
        assert_eq!(format_cpf(" 111 222 333 44 "), "111.222.333-44");
    }

    #[test]
    fn test_format_masked_cpf() {
        assert_eq!(format_masked_cpf("***220050**"), "***.220.050-**");
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$ 0.00");
        assert_eq!(format_brl(12.5), "R$ 12.50");
        assert_eq!(format_brl(999.999), "R$ 1,000.00");
        assert_eq!(format_brl(1234567.891), "R$ 1,234,567.89");
        assert_eq!(format_brl(100000.0), "R$ 100,000.00");
    }

    #[test]
    fn test_format_brl_negative_and_non_finite() {
        assert_eq!(format_brl(-1500.0), "R$ -1,500.00");
        assert_eq!(format_brl(-0.001), "R$ 0.00");
        assert_eq!(format_brl(f64::NAN), "R$ 0.00");
    }
}
