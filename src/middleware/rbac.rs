// src/middleware/rbac.rs
//
// Os papéis vêm do provedor de identidade; o mapeamento papel -> permissão
// é estático no código (não há tabela de cargos local).

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, models::auth::{Principal, Role}};

/// O trait que define o que é uma permissão.
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// O extrator "guardião": falha com 403 quando o papel do principal
/// não carrega a permissão exigida.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<Principal>()
            .ok_or(AppError::InvalidToken)?;

        let required = T::slug();
        if !role_has_permission(principal.role, required) {
            return Err(AppError::MissingPermission(required));
        }

        Ok(RequirePermission(PhantomData))
    }
}

/// Leituras são liberadas para qualquer principal autenticado; as permissões
/// abaixo cobrem apenas escrita e auditoria.
pub fn role_has_permission(role: Role, slug: &str) -> bool {
    match role {
        Role::Admin => true,
        Role::Almoxarife => matches!(slug, "deliveries:write" | "inventory:write"),
        Role::Gestor => false,
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermImportWrite;
impl PermissionDef for PermImportWrite {
    fn slug() -> &'static str {
        "import:write"
    }
}

pub struct PermOrgWrite;
impl PermissionDef for PermOrgWrite {
    fn slug() -> &'static str {
        "org:write"
    }
}

pub struct PermKitWrite;
impl PermissionDef for PermKitWrite {
    fn slug() -> &'static str {
        "kits:write"
    }
}

pub struct PermDeliveryWrite;
impl PermissionDef for PermDeliveryWrite {
    fn slug() -> &'static str {
        "deliveries:write"
    }
}

pub struct PermInventoryWrite;
impl PermissionDef for PermInventoryWrite {
    fn slug() -> &'static str {
        "inventory:write"
    }
}

pub struct PermAuditRead;
impl PermissionDef for PermAuditRead {
    fn slug() -> &'static str {
        "audit:read"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_tem_todas_as_permissoes() {
        for slug in [
            "import:write",
            "org:write",
            "kits:write",
            "deliveries:write",
            "inventory:write",
            "audit:read",
        ] {
            assert!(role_has_permission(Role::Admin, slug));
        }
    }

    #[test]
    fn almoxarife_so_opera_estoque_e_entregas() {
        assert!(role_has_permission(Role::Almoxarife, "deliveries:write"));
        assert!(role_has_permission(Role::Almoxarife, "inventory:write"));
        assert!(!role_has_permission(Role::Almoxarife, "import:write"));
        assert!(!role_has_permission(Role::Almoxarife, "kits:write"));
        assert!(!role_has_permission(Role::Almoxarife, "audit:read"));
    }

    #[test]
    fn gestor_e_somente_leitura() {
        assert!(!role_has_permission(Role::Gestor, "deliveries:write"));
        assert!(!role_has_permission(Role::Gestor, "inventory:write"));
        assert!(!role_has_permission(Role::Gestor, "audit:read"));
    }
}
