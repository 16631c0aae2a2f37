// src/services/kit_service.rs
//
// Exportação e reimportação do mapeamento de kits em CSV
// (funcao,item,quantidade). Exportar e reimportar reproduz as mesmas
// triplas, porque o upsert é por (função, item).

use serde_json::json;
use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::{
        error::AppError,
        spreadsheet::{parse_upload, ParsedSheet},
        text::normalize_key,
    },
    db::{AuditRepository, KitRepository},
    models::{auth::Principal, kit::KitMappingRow},
};

pub const KIT_CSV_HEADERS: [&str; 3] = ["funcao", "item", "quantidade"];

#[derive(Clone)]
pub struct KitService {
    kit_repo: KitRepository,
    audit_repo: AuditRepository,
}

impl KitService {
    pub fn new(kit_repo: KitRepository, audit_repo: AuditRepository) -> Self {
        Self {
            kit_repo,
            audit_repo,
        }
    }

    pub async fn export_csv(&self) -> Result<String, AppError> {
        let rows = self.kit_repo.list_mappings().await?;
        mappings_to_csv(&rows)
    }

    /// Reimporta as triplas do CSV. Itens desconhecidos são criados no
    /// catálogo na hora, para que o round-trip não dependa da ordem de
    /// cadastro.
    pub async fn import_csv<'e, E>(
        &self,
        executor: E,
        actor: &Principal,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<usize, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let sheet = parse_upload(file_name, bytes)?;
        let rows = parse_kit_rows(&sheet)?;

        let mut tx = executor.begin().await?;

        for row in &rows {
            let item = match self.kit_repo.find_item_by_name(&mut *tx, &row.item_name).await? {
                Some(item) => item,
                None => self.kit_repo.create_item(&mut *tx, &row.item_name, None).await?,
            };
            self.kit_repo
                .upsert_mapping(&mut *tx, &row.job_function, item.id, row.quantity)
                .await?;
        }

        self.audit_repo
            .record(
                &mut *tx,
                actor,
                "kits.import",
                "kit_mapping",
                file_name,
                json!({ "rows": rows.len() }),
            )
            .await?;

        tx.commit().await?;
        Ok(rows.len())
    }
}

pub fn mappings_to_csv(rows: &[KitMappingRow]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(KIT_CSV_HEADERS)
        .map_err(|e| anyhow::anyhow!("falha ao escrever CSV: {e}"))?;
    for row in rows {
        writer
            .write_record([
                row.job_function.as_str(),
                row.item_name.as_str(),
                &row.quantity.to_string(),
            ])
            .map_err(|e| anyhow::anyhow!("falha ao escrever CSV: {e}"))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("falha ao finalizar CSV: {e}"))?;
    String::from_utf8(bytes).map_err(|e| anyhow::anyhow!("CSV não é UTF-8: {e}").into())
}

/// Lê as triplas (função, item, quantidade) de uma planilha já parseada.
pub fn parse_kit_rows(sheet: &ParsedSheet) -> Result<Vec<KitMappingRow>, AppError> {
    let mut rows = Vec::with_capacity(sheet.rows.len());

    for (i, row) in sheet.rows.iter().enumerate() {
        let field = |wanted: &str| -> String {
            for (header, value) in row {
                if normalize_key(header) == wanted {
                    return value.trim().to_string();
                }
            }
            String::new()
        };

        let job_function = field("funcao");
        let item_name = field("item");
        let quantity_raw = field("quantidade");

        if job_function.is_empty() || item_name.is_empty() {
            return Err(AppError::InvalidSpreadsheet(format!(
                "linha {}: função e item são obrigatórios",
                i + 1
            )));
        }

        let quantity: i32 = quantity_raw.parse().map_err(|_| {
            AppError::InvalidSpreadsheet(format!(
                "linha {}: quantidade inválida '{}'",
                i + 1,
                quantity_raw
            ))
        })?;
        if quantity < 1 {
            return Err(AppError::InvalidSpreadsheet(format!(
                "linha {}: quantidade deve ser pelo menos 1",
                i + 1
            )));
        }

        rows.push(KitMappingRow {
            job_function,
            item_name,
            quantity,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<KitMappingRow> {
        vec![
            KitMappingRow {
                job_function: "ENFERMEIRO".to_string(),
                item_name: "Luva de Procedimento".to_string(),
                quantity: 10,
            },
            KitMappingRow {
                job_function: "ENFERMEIRO".to_string(),
                item_name: "Máscara N95".to_string(),
                quantity: 2,
            },
            KitMappingRow {
                job_function: "TECNICO DE ENFERMAGEM".to_string(),
                item_name: "Avental Descartável".to_string(),
                quantity: 5,
            },
        ]
    }

    // Propriedade de round-trip: exportar e reler reproduz as mesmas triplas.
    #[test]
    fn exportar_e_reler_reproduz_as_triplas() {
        let rows = sample_rows();
        let csv = mappings_to_csv(&rows).unwrap();

        let sheet = parse_upload("kits.csv", csv.as_bytes()).unwrap();
        let relidas = parse_kit_rows(&sheet).unwrap();

        assert_eq!(relidas, rows);
    }

    #[test]
    fn quantidade_invalida_e_rejeitada() {
        let csv = "funcao,item,quantidade\nENFERMEIRO,Luva,zero\n";
        let sheet = parse_upload("kits.csv", csv.as_bytes()).unwrap();
        assert!(matches!(
            parse_kit_rows(&sheet),
            Err(AppError::InvalidSpreadsheet(_))
        ));

        let csv = "funcao,item,quantidade\nENFERMEIRO,Luva,0\n";
        let sheet = parse_upload("kits.csv", csv.as_bytes()).unwrap();
        assert!(matches!(
            parse_kit_rows(&sheet),
            Err(AppError::InvalidSpreadsheet(_))
        ));
    }

    #[test]
    fn funcao_ou_item_vazios_sao_rejeitados() {
        let csv = "funcao,item,quantidade\n,Luva,2\n";
        let sheet = parse_upload("kits.csv", csv.as_bytes()).unwrap();
        assert!(matches!(
            parse_kit_rows(&sheet),
            Err(AppError::InvalidSpreadsheet(_))
        ));
    }

    #[test]
    fn cabecalho_com_acento_e_aceito() {
        // "Função" normaliza para "funcao", igual ao cabeçalho canônico.
        let csv = "Função,Item,Quantidade\nENFERMEIRO,Luva,3\n";
        let sheet = parse_upload("kits.csv", csv.as_bytes()).unwrap();
        let rows = parse_kit_rows(&sheet).unwrap();
        assert_eq!(rows[0].quantity, 3);
    }
}
