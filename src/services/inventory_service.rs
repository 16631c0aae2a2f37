// src/services/inventory_service.rs

use serde_json::json;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AuditRepository, InventoryRepository},
    models::{
        auth::Principal,
        inventory::{InventoryBalance, MovementKind},
    },
};

/// Delta com sinal: entrada soma, saída subtrai.
pub fn signed_delta(kind: MovementKind, quantity: i32) -> i32 {
    match kind {
        MovementKind::Entrada => quantity,
        MovementKind::Saida => -quantity,
    }
}

/// Saldo após o movimento, ou None quando a saída estouraria o saldo.
/// O saldo nunca fica negativo.
pub fn next_balance(current: i32, kind: MovementKind, quantity: i32) -> Option<i32> {
    let next = current + signed_delta(kind, quantity);
    (next >= 0).then_some(next)
}

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
    audit_repo: AuditRepository,
}

impl InventoryService {
    pub fn new(inventory_repo: InventoryRepository, audit_repo: AuditRepository) -> Self {
        Self {
            inventory_repo,
            audit_repo,
        }
    }

    /// Aplica um movimento com o saldo travado (FOR UPDATE): movimentos
    /// concorrentes no mesmo (unidade, item) serializam em vez de ler
    /// saldo defasado.
    pub async fn apply_movement<'e, E>(
        &self,
        executor: E,
        actor: &Principal,
        unit_id: Uuid,
        item_id: Uuid,
        kind: MovementKind,
        quantity: i32,
        note: Option<&str>,
    ) -> Result<InventoryBalance, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let current = self
            .inventory_repo
            .get_balance_for_update(&mut *tx, unit_id, item_id)
            .await?
            .map(|b| b.quantity)
            .unwrap_or(0);

        let Some(_) = next_balance(current, kind, quantity) else {
            return Err(AppError::InsufficientStock { available: current });
        };

        let balance = self
            .inventory_repo
            .upsert_balance(&mut *tx, unit_id, item_id, signed_delta(kind, quantity))
            .await?;

        self.inventory_repo
            .record_movement(&mut *tx, unit_id, item_id, kind, quantity, note, actor.id)
            .await?;

        self.audit_repo
            .record(
                &mut *tx,
                actor,
                "inventory.movement",
                "inventory_balance",
                &format!("{unit_id}/{item_id}"),
                json!({ "kind": kind, "quantity": quantity, "balance": balance.quantity }),
            )
            .await?;

        tx.commit().await?;
        Ok(balance)
    }

    pub async fn set_thresholds<'e, E>(
        &self,
        executor: E,
        actor: &Principal,
        unit_id: Uuid,
        item_id: Uuid,
        min_quantity: i32,
        max_quantity: Option<i32>,
    ) -> Result<InventoryBalance, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let balance = self
            .inventory_repo
            .set_thresholds(&mut *tx, unit_id, item_id, min_quantity, max_quantity)
            .await?;

        self.audit_repo
            .record(
                &mut *tx,
                actor,
                "inventory.thresholds",
                "inventory_balance",
                &format!("{unit_id}/{item_id}"),
                json!({ "min": min_quantity, "max": max_quantity }),
            )
            .await?;

        tx.commit().await?;
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entrada_soma_e_saida_subtrai() {
        assert_eq!(signed_delta(MovementKind::Entrada, 10), 10);
        assert_eq!(signed_delta(MovementKind::Saida, 10), -10);
    }

    #[test]
    fn saldo_pos_movimento() {
        assert_eq!(next_balance(5, MovementKind::Entrada, 3), Some(8));
        assert_eq!(next_balance(5, MovementKind::Saida, 3), Some(2));
        assert_eq!(next_balance(5, MovementKind::Saida, 5), Some(0));
    }

    #[test]
    fn saida_maior_que_saldo_e_rejeitada() {
        assert_eq!(next_balance(5, MovementKind::Saida, 6), None);
        assert_eq!(next_balance(0, MovementKind::Saida, 1), None);
    }
}
