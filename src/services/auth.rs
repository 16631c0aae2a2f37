// src/services/auth.rs
//
// A identidade é delegada: o provedor externo emite o JWT, nós só
// validamos assinatura, emissor e audiência. Não existe cadastro local.

use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::{
    common::error::AppError,
    models::auth::{Claims, Principal},
};

#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    issuer: String,
    audience: String,
}

impl AuthService {
    pub fn new(jwt_secret: String, issuer: String, audience: String) -> Self {
        Self {
            jwt_secret,
            issuer,
            audience,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Principal, AppError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;
        Ok(Principal {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    fn service() -> AuthService {
        AuthService::new(
            "segredo-de-teste".to_string(),
            "https://idp.example.org".to_string(),
            "epi-backend".to_string(),
        )
    }

    fn token(secret: &str, iss: &str, aud: &str, exp_offset_secs: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "maria@example.org".to_string(),
            role: Role::Almoxarife,
            iss: iss.to_string(),
            aud: aud.to_string(),
            exp: (now + exp_offset_secs) as usize,
            iat: now as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap()
    }

    #[test]
    fn aceita_token_valido_do_provedor() {
        let svc = service();
        let jwt = token("segredo-de-teste", "https://idp.example.org", "epi-backend", 3600);
        let principal = svc.validate_token(&jwt).unwrap();
        assert_eq!(principal.email, "maria@example.org");
        assert_eq!(principal.role, Role::Almoxarife);
    }

    #[test]
    fn rejeita_assinatura_errada() {
        let svc = service();
        let jwt = token("outro-segredo", "https://idp.example.org", "epi-backend", 3600);
        assert!(matches!(svc.validate_token(&jwt), Err(AppError::InvalidToken)));
    }

    #[test]
    fn rejeita_emissor_ou_audiencia_errados() {
        let svc = service();
        let jwt = token("segredo-de-teste", "https://outro.example.org", "epi-backend", 3600);
        assert!(matches!(svc.validate_token(&jwt), Err(AppError::InvalidToken)));

        let jwt = token("segredo-de-teste", "https://idp.example.org", "outra-api", 3600);
        assert!(matches!(svc.validate_token(&jwt), Err(AppError::InvalidToken)));
    }

    #[test]
    fn rejeita_token_expirado() {
        let svc = service();
        let jwt = token("segredo-de-teste", "https://idp.example.org", "epi-backend", -3600);
        assert!(matches!(svc.validate_token(&jwt), Err(AppError::InvalidToken)));
    }
}
