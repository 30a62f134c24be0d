use axum::{
    Json,
    extract::{Form, FromRequest, Request},
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

/// Request body parsed according to the declared content type.
///
/// `application/json` bodies become the deserialized JSON value and
/// `application/x-www-form-urlencoded` bodies become a flat object of string
/// values. Form keys are never expanded into nested structures: `a[b]=c`
/// yields the literal key `a[b]`. Any other (or missing) content type yields
/// `Value::Null` and the handler decides what to do with it.
///
/// Malformed bodies are rejected with a client error before the handler
/// runs.
pub struct ParsedBody(pub Value);

impl<S> FromRequest<S> for ParsedBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_owned();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;

            return Ok(ParsedBody(value));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;

            let mut object = Map::new();
            for (key, value) in pairs {
                object.insert(key, Value::String(value));
            }

            return Ok(ParsedBody(Value::Object(object)));
        }

        Ok(ParsedBody(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        routing::post,
    };
    use tower::ServiceExt;

    use super::*;

    fn echo_router() -> Router {
        Router::new().route(
            "/echo",
            post(|ParsedBody(value): ParsedBody| async move { Json(value) }),
        )
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn json_body_is_deserialized() {
        let response = echo_router()
            .oneshot(
                Request::post("/echo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"ada","tags":["a","b"]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"name": "ada", "tags": ["a", "b"]})
        );
    }

    #[tokio::test]
    async fn malformed_json_is_a_client_error() {
        let response = echo_router()
            .oneshot(
                Request::post("/echo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn urlencoded_body_stays_flat() {
        let response = echo_router()
            .oneshot(
                Request::post("/echo")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=ada&profile[name]=lovelace"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        // `profile[name]` must stay a literal flat key, never a nested object.
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"username": "ada", "profile[name]": "lovelace"})
        );
    }

    #[tokio::test]
    async fn unknown_content_type_yields_null() {
        let response = echo_router()
            .oneshot(
                Request::post("/echo")
                    .header(header::CONTENT_TYPE, "text/plain")
                    .body(Body::from("whatever"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, Value::Null);
    }
}
