// src/common/spreadsheet.rs
//
// Leitura do arquivo enviado no upload (CSV ou XLSX) para uma lista de
// linhas chave -> valor textual. A primeira linha define as chaves.

use std::collections::BTreeMap;
use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::common::error::AppError;

/// Uma linha da planilha: cabeçalho -> valor, tudo como texto.
pub type SheetRow = BTreeMap<String, String>;

#[derive(Debug)]
pub struct ParsedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

/// Converte o arquivo enviado em linhas textuais. O formato é decidido pela
/// extensão e pela assinatura ZIP (XLSX é um pacote ZIP).
pub fn parse_upload(file_name: &str, bytes: &[u8]) -> Result<ParsedSheet, AppError> {
    if bytes.is_empty() {
        return Err(AppError::EmptySpreadsheet);
    }

    let lower = file_name.to_lowercase();
    let looks_like_xlsx = lower.ends_with(".xlsx")
        || lower.ends_with(".xlsm")
        || lower.ends_with(".xls")
        || bytes.starts_with(b"PK\x03\x04");

    let sheet = if looks_like_xlsx {
        parse_xlsx(bytes)?
    } else {
        parse_csv(bytes)?
    };

    if sheet.rows.is_empty() {
        return Err(AppError::EmptySpreadsheet);
    }
    Ok(sheet)
}

fn parse_csv(bytes: &[u8]) -> Result<ParsedSheet, AppError> {
    // Extratos do Alterdata alternam entre vírgula e ponto-e-vírgula.
    let delimiter = sniff_delimiter(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::InvalidSpreadsheet(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::InvalidSpreadsheet("cabeçalho ausente".to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::InvalidSpreadsheet(e.to_string()))?;
        let mut row = SheetRow::new();
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = record.get(i).unwrap_or("").trim().to_string();
            row.insert(header.clone(), value);
        }
        if row.values().any(|v| !v.is_empty()) {
            rows.push(row);
        }
    }

    Ok(ParsedSheet { headers, rows })
}

fn parse_xlsx(bytes: &[u8]) -> Result<ParsedSheet, AppError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| AppError::InvalidSpreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::InvalidSpreadsheet("nenhuma aba encontrada".to_string()))?
        .map_err(|e| AppError::InvalidSpreadsheet(e.to_string()))?;

    let mut lines = range.rows();
    let header_cells = lines
        .next()
        .ok_or(AppError::EmptySpreadsheet)?;

    let headers: Vec<String> = header_cells.iter().map(cell_to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::InvalidSpreadsheet("cabeçalho ausente".to_string()));
    }

    let mut rows = Vec::new();
    for cells in lines {
        let mut row = SheetRow::new();
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = cells.get(i).map(cell_to_string).unwrap_or_default();
            row.insert(header.clone(), value);
        }
        if row.values().any(|v| !v.is_empty()) {
            rows.push(row);
        }
    }

    Ok(ParsedSheet { headers, rows })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or(bytes);
    let semicolons = first_line.iter().filter(|b| **b == b';').count();
    let commas = first_line.iter().filter(|b| **b == b',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_com_virgula() {
        let csv = b"CPF,Colaborador,Fun\xc3\xa7\xc3\xa3o\n11122233344,Maria Silva,ENFERMEIRO\n";
        let sheet = parse_upload("extrato.csv", csv).unwrap();
        assert_eq!(sheet.headers, vec!["CPF", "Colaborador", "Função"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0]["CPF"], "11122233344");
        assert_eq!(sheet.rows[0]["Colaborador"], "Maria Silva");
    }

    #[test]
    fn csv_com_ponto_e_virgula() {
        let csv = b"CPF;Colaborador\n11122233344;Maria Silva\n";
        let sheet = parse_upload("extrato.csv", csv).unwrap();
        assert_eq!(sheet.rows[0]["Colaborador"], "Maria Silva");
    }

    #[test]
    fn linhas_em_branco_sao_descartadas() {
        let csv = b"CPF,Colaborador\n11122233344,Maria Silva\n,\n";
        let sheet = parse_upload("extrato.csv", csv).unwrap();
        assert_eq!(sheet.rows.len(), 1);
    }

    #[test]
    fn arquivo_vazio_e_rejeitado() {
        assert!(matches!(
            parse_upload("extrato.csv", b""),
            Err(AppError::EmptySpreadsheet)
        ));
    }

    #[test]
    fn so_cabecalho_e_rejeitado() {
        assert!(matches!(
            parse_upload("extrato.csv", b"CPF,Colaborador\n"),
            Err(AppError::EmptySpreadsheet)
        ));
    }

    #[test]
    fn xlsx_invalido_e_rejeitado() {
        // Assinatura ZIP mas conteúdo corrompido.
        let fake = b"PK\x03\x04nao-e-um-xlsx-de-verdade";
        assert!(matches!(
            parse_upload("extrato.xlsx", fake),
            Err(AppError::InvalidSpreadsheet(_))
        ));
    }
}
