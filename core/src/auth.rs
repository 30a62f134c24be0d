use axum::{
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};

pub trait AuthenticatableUser {
    type Id;

    fn id(&self) -> Self::Id;
    fn username(&self) -> &str;
}

/// Token-based authentication strategy.
///
/// `attempt` is the login path (credentials in, user out), `generate_token`
/// mints the bearer credential for a user, `verify` checks a presented
/// credential on protected routes.
pub trait Authenticator<T>
where
    T: AuthenticatableUser,
{
    fn attempt(
        &self,
        username: &str,
        password: &str,
    ) -> impl std::future::Future<Output = anyhow::Result<T>> + Send;

    fn generate_token(&self, user: &T) -> anyhow::Result<String>;

    fn verify(&self, token: &str) -> Result<T, StatusCode>;
}

/// Require a valid `Authorization: Bearer <token>` credential.
///
/// The authenticator is looked up in request extensions, so it must be
/// installed as an `Extension` layer ahead of any route using this
/// middleware. On success the authenticated user is inserted into the
/// request extensions for the handler.
#[tracing::instrument(level = "debug", skip(request, next))]
pub async fn auth_middleware<A, U>(
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode>
where
    A: Authenticator<U> + Clone + Send + Sync + 'static,
    U: AuthenticatableUser + Send + Sync + Clone + 'static,
{
    let Some(authenticator) = request.extensions().get::<A>().cloned() else {
        tracing::error!("no authenticator extension available");

        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    };

    let Some(value) = request.headers().get(header::AUTHORIZATION) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let value = value.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(token) = value.strip_prefix("Bearer ") else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let user = authenticator.verify(token)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
