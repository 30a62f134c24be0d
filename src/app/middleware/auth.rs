pub use chirp_core::auth::auth_middleware;

use axum::http::StatusCode;
use chirp_core::auth::{AuthenticatableUser, Authenticator};
use chirp_core::db::DbHandle;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::app::entity::user;

/// The identity carried through a request once the bearer token checks out.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
}

impl AuthenticatableUser for AuthUser {
    type Id = i32;

    fn id(&self) -> i32 {
        self.id
    }

    fn username(&self) -> &str {
        &self.username
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Claims {
    sub: i32,
    username: String,
    exp: usize,
}

const TOKEN_TTL_HOURS: i64 = 24;

/// HS256 JWT strategy. Verification is stateless: the claims carry
/// everything a protected route needs, so no database round-trip happens per
/// request. Only `attempt` (login) touches the database.
#[derive(Clone)]
pub struct JwtAuthenticator {
    db: DbHandle,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtAuthenticator {
    pub fn new(db: DbHandle, secret: &str) -> Self {
        JwtAuthenticator {
            db,
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl Authenticator<AuthUser> for JwtAuthenticator {
    async fn attempt(&self, username: &str, password: &str) -> anyhow::Result<AuthUser> {
        let db = self.db.conn().await?;

        let Some(record) = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(db.as_ref())
            .await?
        else {
            anyhow::bail!("unknown username");
        };

        let user::Model {
            id,
            username,
            password: stored,
            ..
        } = record;

        // bcrypt is deliberately slow; keep it off the async workers.
        let password = password.to_owned();
        let verified =
            tokio::task::spawn_blocking(move || bcrypt::verify(&password, &stored)).await??;

        if !verified {
            anyhow::bail!("password mismatch");
        }

        Ok(AuthUser { id, username })
    }

    fn generate_token(&self, user: &AuthUser) -> anyhow::Result<String> {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp();

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            exp: exp as usize,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    fn verify(&self, token: &str) -> Result<AuthUser, StatusCode> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        Ok(AuthUser {
            id: data.claims.sub,
            username: data.claims.username,
        })
    }
}
