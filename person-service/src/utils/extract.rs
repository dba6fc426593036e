use axum::{
    extract::{FromRequest, Request},
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::de::DeserializeOwned;
use service_core::error::AppError;

/// JSON body extractor whose rejections use the service error body.
///
/// Syntax errors, wrong field types, and a missing `content-type` all become
/// `400 Bad request` instead of axum's default 415/422 plain-text responses.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Json parse error: {}", e.body_text()))
        })?;
        Ok(JsonBody(value))
    }
}

/// Parse a path identifier into an `ObjectId`.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::MalformedId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hex_object_ids() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn rejects_malformed_ids() {
        for raw in ["", "123", "not-an-id", "zzzzzzzzzzzzzzzzzzzzzzzz"] {
            assert!(matches!(
                parse_object_id(raw),
                Err(AppError::MalformedId(_))
            ));
        }
    }
}
