//! `ValidatedJson<T>`: like `axum::Json<T>`, but also runs
//! `validator::Validate::validate()` on the body. Malformed JSON is a 400,
//! a body that parses but fails validation is a 422 listing every field.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiResponse;

pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    JsonError(JsonRejection),
    ValidationError(validator::ValidationErrors),
}

fn describe(errors: &validator::ValidationErrors) -> String {
    let mut field_errors: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, msg)
            })
        })
        .collect();
    // HashMap order is random
    field_errors.sort();

    if field_errors.is_empty() {
        "Validation failed".to_string()
    } else {
        field_errors.join("; ")
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid request body: {}", rejection));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::ValidationError(errors) => {
                let body = ApiResponse::<()>::error(describe(&errors));
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct PartyBody {
        #[validate(length(min = 1, message = "is required"))]
        customer_name: String,
        #[validate(range(min = 1, message = "must be a positive integer"))]
        party_size: i32,
    }

    async fn handler(ValidatedJson(body): ValidatedJson<PartyBody>) -> String {
        body.party_size.to_string()
    }

    async fn send(body: Body) -> axum::http::Response<Body> {
        use tower::Service;
        let mut svc = Router::new().route("/party", post(handler)).into_service();
        let req = Request::builder()
            .method("POST")
            .uri("/party")
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        svc.call(req).await.unwrap()
    }

    async fn error_of(resp: axum::http::Response<Body>) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: ApiResponse<()> = serde_json::from_slice(&bytes).unwrap();
        body.error.unwrap_or_default()
    }

    #[tokio::test]
    async fn valid_body_passes_through() {
        let body = serde_json::json!({"customer_name": "Ada", "party_size": 3});
        let resp = send(Body::from(serde_json::to_vec(&body).unwrap())).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let resp = send(Body::from("{party_size:")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn every_failing_field_is_listed() {
        let body = serde_json::json!({"customer_name": "", "party_size": 0});
        let resp = send(Body::from(serde_json::to_vec(&body).unwrap())).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            error_of(resp).await,
            "customer_name: is required; party_size: must be a positive integer"
        );
    }
}
