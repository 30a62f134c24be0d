use axum::Router;

/// A route group mountable under a path prefix.
pub trait Controller {
    type State: Clone + Send + Sync + 'static;

    fn router() -> Router<Self::State>;
}
