//! # JSONエクストラクタ
//!
//! `axum::Json` と同じだが、リジェクションを `GatewayError` に変換して
//! `{ "error": "..." }` 形式で返す。
//! ボディはJSONオブジェクトに限る（配列などは400）。

use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::GatewayError;

/// `GatewayError` でリジェクトするJSONオブジェクトボディ。
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = GatewayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) =
            axum::Json::<serde_json::Value>::from_request(req, state).await?;

        // serdeの構造体デシリアライズは配列も受け付けるため、先に形を確認する
        if !value.is_object() {
            return Err(GatewayError::BadRequest(
                "リクエストボディはJSONオブジェクトである必要があります".into(),
            ));
        }

        serde_json::from_value(value)
            .map(ApiJson)
            .map_err(|e| GatewayError::BadRequest(format!("リクエストボディの形式が不正: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use w3vault_types::UploadRequest;

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/upload")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_object_body_is_accepted() {
        let ApiJson(req) = ApiJson::<UploadRequest>::from_request(
            json_request(r#"{"recordId": "r1", "dataBase64": "aGVsbG8="}"#),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(req.record_id.as_deref(), Some("r1"));
        assert_eq!(req.data_base64.as_deref(), Some("aGVsbG8="));
    }

    /// 構造体のフィールド順に対応する配列も拒否される
    #[tokio::test]
    async fn test_non_object_bodies_are_rejected() {
        for body in [r#"["r1", null, "aGVsbG8="]"#, "\"r1\"", "42", "null"] {
            let result = ApiJson::<UploadRequest>::from_request(json_request(body), &()).await;
            assert!(
                matches!(result, Err(GatewayError::BadRequest(_))),
                "{body} は拒否されるべき"
            );
        }
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_bad_request() {
        let result = ApiJson::<UploadRequest>::from_request(
            json_request(r#"{"recordId": "r1", "dataBase64": 5}"#),
            &(),
        )
        .await;
        assert!(matches!(result, Err(GatewayError::BadRequest(_))));
    }
}
