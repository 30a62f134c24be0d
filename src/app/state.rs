use chirp_core::db::DbHandle;

use crate::app::graphql::ChirpSchema;
use crate::app::middleware::auth::JwtAuthenticator;

/// Process-wide dependencies, built once in `main` and injected into the
/// router instead of living in globals.
#[derive(Clone)]
pub struct AppState {
    pub db: DbHandle,
    pub authenticator: JwtAuthenticator,
    pub schema: ChirpSchema,
    pub graphiql: bool,
}
