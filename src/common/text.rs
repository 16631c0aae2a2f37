// src/common/text.rs
//
// Heurísticas de normalização de texto usadas pelo pipeline de importação
// e pelo resolvedor unidade -> regional.

use chrono::NaiveDate;
use unicode_normalization::UnicodeNormalization;

/// Chave canônica de comparação: minúsculas, sem acentos, só alfanuméricos.
/// "Hospital São José - Ala 2" e "HOSPITAL SAO JOSE ALA 2" geram a mesma chave.
pub fn normalize_key(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

// Faixa dos "combining diacritical marks" que a decomposição NFD produz.
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Extrai apenas os dígitos de um CPF (ou matrícula) vindo da planilha.
/// Retorna None quando o campo não tem nenhum dígito.
pub fn digits_only(input: &str) -> Option<String> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Datas do extrato do Alterdata chegam em dois formatos textuais:
/// ISO (`2020-01-10`) ou brasileiro (`10/01/2020`). Qualquer outra coisa
/// vira None (a coluna fica nula no upsert).
pub fn parse_date_flex(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_key_remove_acentos_e_pontuacao() {
        assert_eq!(normalize_key("Hospital São José - Ala 2"), "hospitalsaojoseala2");
        assert_eq!(normalize_key("HOSPITAL SAO JOSE ALA 2"), "hospitalsaojoseala2");
        assert_eq!(normalize_key("  UPA   Çentral!  "), "upacentral");
    }

    #[test]
    fn normalize_key_entrada_vazia() {
        assert_eq!(normalize_key(""), "");
        assert_eq!(normalize_key(" - / - "), "");
    }

    #[test]
    fn digits_only_limpa_mascara_de_cpf() {
        assert_eq!(digits_only("111.222.333-44"), Some("11122233344".to_string()));
        assert_eq!(digits_only("11122233344"), Some("11122233344".to_string()));
        assert_eq!(digits_only("sem numero"), None);
        assert_eq!(digits_only(""), None);
    }

    #[test]
    fn parse_date_flex_aceita_iso_e_br() {
        let esperado = NaiveDate::from_ymd_opt(2020, 1, 10).unwrap();
        assert_eq!(parse_date_flex("2020-01-10"), Some(esperado));
        assert_eq!(parse_date_flex("10/01/2020"), Some(esperado));
        assert_eq!(parse_date_flex(" 10/01/2020 "), Some(esperado));
    }

    #[test]
    fn parse_date_flex_cai_para_none() {
        assert_eq!(parse_date_flex(""), None);
        assert_eq!(parse_date_flex("10-01-2020"), None);
        assert_eq!(parse_date_flex("31/02/2020"), None);
        assert_eq!(parse_date_flex("amanhã"), None);
    }
}
