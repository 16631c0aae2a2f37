// src/services/import_service.rs
//
// O pipeline de importação do extrato do Alterdata:
// planilha -> linhas brutas (staging JSONB) -> metadados do lote ->
// upsert normalizado em `employees` chaveado por (cpf, matrícula).
// Tudo numa única transação: ou o lote inteiro entra, ou nada entra.

use std::collections::BTreeSet;

use serde_json::json;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        spreadsheet::{parse_upload, SheetRow},
        text::{digits_only, normalize_key, parse_date_flex},
    },
    db::{AuditRepository, EmployeeRepository, ImportRepository, OrgRepository},
    models::{
        auth::Principal,
        import::{ExtractedEmployee, ImportSummary},
    },
};

#[derive(Clone)]
pub struct ImportService {
    import_repo: ImportRepository,
    employee_repo: EmployeeRepository,
    org_repo: OrgRepository,
    audit_repo: AuditRepository,
}

impl ImportService {
    pub fn new(
        import_repo: ImportRepository,
        employee_repo: EmployeeRepository,
        org_repo: OrgRepository,
        audit_repo: AuditRepository,
    ) -> Self {
        Self {
            import_repo,
            employee_repo,
            org_repo,
            audit_repo,
        }
    }

    pub async fn ingest<'e, E>(
        &self,
        executor: E,
        actor: &Principal,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<ImportSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let sheet = parse_upload(file_name, bytes)?;
        let batch_id = Uuid::new_v4();

        let mut tx = executor.begin().await?;

        self.import_repo
            .create_batch(&mut *tx, batch_id, file_name, sheet.rows.len() as i32)
            .await?;

        let mut upserted = 0usize;
        let mut skipped_missing_cpf = 0usize;
        let mut unmatched: BTreeSet<String> = BTreeSet::new();

        for (i, row) in sheet.rows.iter().enumerate() {
            // Camada opaca: a linha inteira vai para o staging, com ou sem CPF.
            let payload = serde_json::to_value(row)
                .map_err(|e| anyhow::anyhow!("falha ao serializar linha do lote: {e}"))?;
            self.import_repo
                .insert_row(&mut *tx, batch_id, (i + 1) as i32, &payload)
                .await?;

            // Passo de normalização: sem CPF não há chave de conflito,
            // a linha fica só no staging.
            let Some(extracted) = extract_employee(row) else {
                skipped_missing_cpf += 1;
                continue;
            };

            let unit_key = normalize_key(&extracted.unit_name);
            if !unit_key.is_empty() {
                let region = self
                    .org_repo
                    .find_region_name_by_unit_key(&mut *tx, &unit_key)
                    .await?;
                if region.is_none() {
                    unmatched.insert(extracted.unit_name.clone());
                }
            }

            self.employee_repo
                .upsert_from_import(&mut *tx, &extracted, &unit_key, batch_id)
                .await?;
            upserted += 1;
        }

        self.audit_repo
            .record(
                &mut *tx,
                actor,
                "import.upload",
                "import_batch",
                &batch_id.to_string(),
                json!({
                    "sourceFile": file_name,
                    "rawRows": sheet.rows.len(),
                    "upserted": upserted,
                }),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Lote {} importado: {} linhas brutas, {} colaboradores atualizados, {} sem CPF, {} unidades sem regional",
            batch_id,
            sheet.rows.len(),
            upserted,
            skipped_missing_cpf,
            unmatched.len()
        );

        Ok(ImportSummary {
            batch_id,
            source_file: file_name.to_string(),
            raw_rows: sheet.rows.len(),
            upserted,
            skipped_missing_cpf,
            unmatched_units: unmatched.into_iter().collect(),
        })
    }
}

/// Extrai os campos fixos de uma linha bruta pelos apelidos conhecidos de
/// cabeçalho (o Alterdata não é consistente entre extratos). Retorna None
/// quando a linha não tem CPF aproveitável.
pub fn extract_employee(row: &SheetRow) -> Option<ExtractedEmployee> {
    let field = |aliases: &[&str]| -> String {
        for (header, value) in row {
            let key = normalize_key(header);
            if aliases.contains(&key.as_str()) {
                return value.trim().to_string();
            }
        }
        String::new()
    };

    let cpf = digits_only(&field(&["cpf"]))?;
    let employee_number = digits_only(&field(&["matricula", "chapa", "numero"])).unwrap_or_default();

    Some(ExtractedEmployee {
        cpf,
        employee_number,
        name: field(&["colaborador", "nome", "funcionario"]),
        job_function: field(&["funcao", "cargo"]),
        unit_name: field(&["unidadehospitalar", "unidade", "lotacao", "local"]),
        admission_date: parse_date_flex(&field(&["admissao", "dataadmissao", "dtadmissao"])),
        termination_date: parse_date_flex(&field(&[
            "demissao",
            "datademissao",
            "dtdemissao",
            "rescisao",
        ])),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(pairs: &[(&str, &str)]) -> SheetRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // Cenário de referência do extrato: cabeçalho padrão do Alterdata.
    #[test]
    fn extrai_linha_padrao_do_alterdata() {
        let linha = row(&[
            ("CPF", "11122233344"),
            ("Colaborador", "Maria Silva"),
            ("Função", "ENFERMEIRO"),
            ("Unidade Hospitalar", "HOSPITAL CENTRAL"),
            ("Admissão", "2020-01-10"),
            ("Demissão", ""),
        ]);

        let extraido = extract_employee(&linha).unwrap();
        assert_eq!(extraido.cpf, "11122233344");
        assert_eq!(extraido.name, "Maria Silva");
        assert_eq!(extraido.job_function, "ENFERMEIRO");
        assert_eq!(extraido.unit_name, "HOSPITAL CENTRAL");
        assert_eq!(
            extraido.admission_date,
            Some(NaiveDate::from_ymd_opt(2020, 1, 10).unwrap())
        );
        assert_eq!(extraido.termination_date, None);
    }

    #[test]
    fn aceita_apelidos_de_cabecalho_e_cpf_com_mascara() {
        let linha = row(&[
            ("cpf", "111.222.333-44"),
            ("NOME", "João Souza"),
            ("Cargo", "TECNICO DE ENFERMAGEM"),
            ("Lotação", "UPA NORTE"),
            ("Data Admissão", "05/03/2019"),
        ]);

        let extraido = extract_employee(&linha).unwrap();
        assert_eq!(extraido.cpf, "11122233344");
        assert_eq!(extraido.job_function, "TECNICO DE ENFERMAGEM");
        assert_eq!(extraido.unit_name, "UPA NORTE");
        assert_eq!(
            extraido.admission_date,
            Some(NaiveDate::from_ymd_opt(2019, 3, 5).unwrap())
        );
    }

    #[test]
    fn linha_sem_cpf_fica_so_no_staging() {
        let linha = row(&[("CPF", ""), ("Colaborador", "Sem Documento")]);
        assert_eq!(extract_employee(&linha), None);

        let linha = row(&[("Colaborador", "Sem Coluna De CPF")]);
        assert_eq!(extract_employee(&linha), None);
    }

    // Invariante do lote: upsertados <= linhas brutas, com igualdade
    // apenas quando toda linha tem CPF.
    #[test]
    fn contagem_de_upsert_nunca_excede_linhas_brutas() {
        let linhas = vec![
            row(&[("CPF", "11122233344"), ("Colaborador", "A")]),
            row(&[("CPF", "sem numero"), ("Colaborador", "B")]),
            row(&[("CPF", "55566677788"), ("Colaborador", "C")]),
        ];

        let upsertaveis = linhas.iter().filter(|r| extract_employee(r).is_some()).count();
        assert_eq!(upsertaveis, 2);
        assert!(upsertaveis <= linhas.len());

        let todas_com_cpf = vec![
            row(&[("CPF", "11122233344")]),
            row(&[("CPF", "55566677788")]),
        ];
        let upsertaveis = todas_com_cpf
            .iter()
            .filter(|r| extract_employee(r).is_some())
            .count();
        assert_eq!(upsertaveis, todas_com_cpf.len());
    }

    #[test]
    fn data_invalida_vira_nulo() {
        let linha = row(&[("CPF", "11122233344"), ("Admissão", "2020/01/10")]);
        let extraido = extract_employee(&linha).unwrap();
        assert_eq!(extraido.admission_date, None);
    }
}
