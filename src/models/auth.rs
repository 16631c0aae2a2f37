// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Os papéis vêm prontos do provedor de identidade; não há cadastro local.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Almoxarife,
    Gestor,
}

// Estrutura de dados ("claims") dentro do JWT emitido pelo provedor externo.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,    // ID do usuário no provedor
    pub email: String,
    pub role: Role,
    pub iss: String,  // Emissor (verificado contra JWT_ISSUER)
    pub aud: String,  // Audiência (verificada contra JWT_AUDIENCE)
    pub exp: usize,   // Expiration time
    pub iat: usize,   // Issued At
}

// O principal autenticado que circula pelos handlers via extensions.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}
