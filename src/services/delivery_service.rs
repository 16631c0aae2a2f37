// src/services/delivery_service.rs

use chrono::NaiveDate;
use serde_json::json;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AuditRepository, DeliveryRepository},
    models::{
        auth::Principal,
        delivery::{DeliveryDetail, Pendency, PendencyStatus},
    },
};

/// Linha de entrega vinda do handler, já validada.
#[derive(Debug, Clone)]
pub struct DeliveryLine {
    pub item_id: Uuid,
    pub requested: i32,
    pub delivered: i32,
}

/// Falta = o que foi pedido menos o que foi entregue, nunca negativo.
pub fn shortfall(requested: i32, delivered: i32) -> i32 {
    (requested - delivered).max(0)
}

/// Só as linhas com falta real geram pendência.
pub fn open_pendency_lines(lines: &[DeliveryLine]) -> Vec<(Uuid, i32)> {
    lines
        .iter()
        .filter_map(|line| {
            let falta = shortfall(line.requested, line.delivered);
            (falta > 0).then_some((line.item_id, falta))
        })
        .collect()
}

#[derive(Clone)]
pub struct DeliveryService {
    delivery_repo: DeliveryRepository,
    audit_repo: AuditRepository,
}

impl DeliveryService {
    pub fn new(delivery_repo: DeliveryRepository, audit_repo: AuditRepository) -> Self {
        Self {
            delivery_repo,
            audit_repo,
        }
    }

    /// Entrega + itens + pendências num único commit: se qualquer inserção
    /// falhar, nada fica pela metade.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_delivery<'e, E>(
        &self,
        executor: E,
        actor: &Principal,
        employee_id: Uuid,
        unit_id: Option<Uuid>,
        delivered_at: NaiveDate,
        observation: Option<&str>,
        lines: &[DeliveryLine],
    ) -> Result<DeliveryDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Entregar mais do que foi pedido não tem semântica aqui.
        if lines.iter().any(|l| l.delivered > l.requested) {
            return Err(AppError::DeliveredExceedsRequested);
        }

        let mut tx = executor.begin().await?;

        let delivery = self
            .delivery_repo
            .insert_delivery(&mut *tx, employee_id, unit_id, delivered_at, observation, actor.id)
            .await?;

        let mut items = Vec::with_capacity(lines.len());
        let mut pendencies = Vec::new();

        for line in lines {
            let item = self
                .delivery_repo
                .insert_item(&mut *tx, delivery.id, line.item_id, line.requested, line.delivered)
                .await?;
            items.push(item);

            let falta = shortfall(line.requested, line.delivered);
            if falta > 0 {
                let pendency = self
                    .delivery_repo
                    .insert_pendency(&mut *tx, delivery.id, line.item_id, falta)
                    .await?;
                pendencies.push(pendency);
            }
        }

        self.audit_repo
            .record(
                &mut *tx,
                actor,
                "delivery.create",
                "delivery",
                &delivery.id.to_string(),
                json!({
                    "employeeId": employee_id,
                    "lines": lines.len(),
                    "pendencies": pendencies.len(),
                }),
            )
            .await?;

        tx.commit().await?;

        Ok(DeliveryDetail {
            delivery,
            items,
            pendencies,
        })
    }

    pub async fn close_pendency<'e, E>(
        &self,
        executor: E,
        actor: &Principal,
        pendency_id: Uuid,
        resolution: Option<&str>,
    ) -> Result<Pendency, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let pendency = self
            .delivery_repo
            .get_pendency_for_update(&mut *tx, pendency_id)
            .await?
            .ok_or(AppError::NotFound("Pendência"))?;

        if pendency.status == PendencyStatus::Closed {
            return Err(AppError::PendencyAlreadyClosed);
        }

        let closed = self
            .delivery_repo
            .close_pendency(&mut *tx, pendency_id, resolution)
            .await?;

        self.audit_repo
            .record(
                &mut *tx,
                actor,
                "pendency.close",
                "pendency",
                &pendency_id.to_string(),
                json!({ "resolution": resolution }),
            )
            .await?;

        tx.commit().await?;
        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falta_e_o_maximo_entre_zero_e_a_diferenca() {
        assert_eq!(shortfall(5, 3), 2);
        assert_eq!(shortfall(5, 5), 0);
        assert_eq!(shortfall(0, 0), 0);
        // delivered > requested é barrado antes, mas a função continua total.
        assert_eq!(shortfall(3, 5), 0);
    }

    // Propriedade: existe pendência se e somente se falta > 0.
    #[test]
    fn pendencia_existe_sse_falta_positiva() {
        let completo = Uuid::new_v4();
        let parcial = Uuid::new_v4();
        let nada = Uuid::new_v4();

        let lines = vec![
            DeliveryLine { item_id: completo, requested: 2, delivered: 2 },
            DeliveryLine { item_id: parcial, requested: 5, delivered: 3 },
            DeliveryLine { item_id: nada, requested: 1, delivered: 0 },
        ];

        let pendencies = open_pendency_lines(&lines);
        assert_eq!(pendencies, vec![(parcial, 2), (nada, 1)]);
    }

    #[test]
    fn entrega_completa_nao_gera_pendencia() {
        let lines = vec![DeliveryLine {
            item_id: Uuid::new_v4(),
            requested: 4,
            delivered: 4,
        }];
        assert!(open_pendency_lines(&lines).is_empty());
    }
}
