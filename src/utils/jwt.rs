use crate::entities::UserRole;
use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub outlet_id: String,
    pub username: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
    pub token_type: String, // "access" or "refresh"
}

/// 生成令牌所需的用户身份
#[derive(Debug, Clone)]
pub struct TokenSubject<'a> {
    pub user_id: Uuid,
    pub outlet_id: Uuid,
    pub username: &'a str,
    pub role: UserRole,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
    refresh_token_expires_in: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_expires_in: i64, refresh_expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in: access_expires_in,
            refresh_token_expires_in: refresh_expires_in,
        }
    }

    fn generate(&self, subject: &TokenSubject<'_>, expires_in: i64, token_type: &str) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(expires_in);

        let claims = Claims {
            sub: subject.user_id.to_string(),
            outlet_id: subject.outlet_id.to_string(),
            username: subject.username.to_string(),
            role: subject.role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: token_type.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn generate_access_token(&self, subject: &TokenSubject<'_>) -> AppResult<String> {
        self.generate(subject, self.access_token_expires_in, "access")
    }

    pub fn generate_refresh_token(&self, subject: &TokenSubject<'_>) -> AppResult<String> {
        self.generate(subject, self.refresh_token_expires_in, "refresh")
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)
    }

    pub fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.verify_token(token)?;

        if claims.token_type != "access" {
            return Err(AppError::AuthError("Invalid access token type".to_string()));
        }

        Ok(claims)
    }

    pub fn verify_refresh_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.verify_token(token)?;

        if claims.token_type != "refresh" {
            return Err(AppError::AuthError("Invalid refresh token type".to_string()));
        }

        Ok(claims)
    }

    pub fn get_access_token_expires_in(&self) -> i64 {
        self.access_token_expires_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> TokenSubject<'static> {
        TokenSubject {
            user_id: Uuid::new_v4(),
            outlet_id: Uuid::new_v4(),
            username: "cashier01",
            role: UserRole::Cashier,
        }
    }

    #[test]
    fn test_access_token_carries_outlet_and_role() {
        let jwt = JwtService::new("secret", 3600, 7200);
        let s = subject();
        let token = jwt.generate_access_token(&s).unwrap();
        let claims = jwt.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, s.user_id.to_string());
        assert_eq!(claims.outlet_id, s.outlet_id.to_string());
        assert_eq!(claims.role, UserRole::Cashier);
    }

    #[test]
    fn test_token_type_is_enforced() {
        let jwt = JwtService::new("secret", 3600, 7200);
        let refresh = jwt.generate_refresh_token(&subject()).unwrap();
        assert!(jwt.verify_access_token(&refresh).is_err());
        assert!(jwt.verify_refresh_token(&refresh).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtService::new("a", 3600, 7200)
            .generate_access_token(&subject())
            .unwrap();
        assert!(JwtService::new("b", 3600, 7200).verify_token(&token).is_err());
    }
}
