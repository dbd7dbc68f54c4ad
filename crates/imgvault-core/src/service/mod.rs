//! Stateless transform services: fetch an asset, apply one transform, return bytes.
//!
//! Each call is two explicit steps. The fetch from storage happens first and
//! its failure short-circuits; only then is the codec work run, on the blocking
//! pool and under `limits.transform_timeout_ms`.

pub mod resize;
pub mod rotate;

pub use resize::{ResizeRequest, ResizeResponse, ResizeService};
pub use rotate::{RotateRequest, RotateResponse, RotateService};

use serde_json::{Map, Value};
use std::time::Duration;
use tokio::time::timeout;

use crate::asset::AssetView;
use crate::client::StorageClient;
use crate::config::{Config, LimitsConfig};
use crate::error::{FetchError, ServiceError, TransformError, TransformResult};
use crate::format::ImageFormatKind;

/// Shared dependencies of the transform services.
#[derive(Clone)]
pub struct TransformContext {
    client: StorageClient,
    default_format: ImageFormatKind,
    limits: LimitsConfig,
}

impl TransformContext {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Ok(Self {
            client: StorageClient::new(&config.client)?,
            default_format: config.images.default_format,
            limits: config.limits.clone(),
        })
    }

    /// Step one: fetch the source asset and decode its payload.
    ///
    /// Returns the raw bytes and the output format for the handler: the stored
    /// format when it can be encoded, otherwise the configured default.
    async fn fetch_source(&self, id: &str) -> Result<(Vec<u8>, ImageFormatKind), FetchError> {
        let view: AssetView = self.client.fetch(id).await?;
        let bytes = view
            .bytes()
            .map_err(|e| FetchError::Unavailable(format!("corrupt image payload: {e}")))?;
        let format = ImageFormatKind::parse(&view.format).unwrap_or(self.default_format);
        Ok((bytes, format))
    }

    /// Step two: run a codec transform off the async executor, with a timeout.
    async fn run_transform<F>(&self, work: F) -> TransformResult
    where
        F: FnOnce() -> TransformResult + Send + 'static,
    {
        let timeout_ms = self.limits.transform_timeout_ms;
        match timeout(
            Duration::from_millis(timeout_ms),
            tokio::task::spawn_blocking(work),
        )
        .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(TransformError::Encode {
                format: "unknown".to_string(),
                message: format!("Task join error: {e}"),
            }),
            Err(_) => Err(TransformError::Timeout { timeout_ms }),
        }
    }
}

/// Parse a request body into a JSON object.
pub(crate) fn parse_body(body: &[u8]) -> Result<Map<String, Value>, ServiceError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ServiceError::InvalidBody),
    }
}

/// Report the first mandatory parameter that is absent (or `null`).
pub(crate) fn check_mandatory(
    body: &Map<String, Value>,
    params: &[&'static str],
) -> Result<(), ServiceError> {
    match params
        .iter()
        .find(|p| body.get(**p).map_or(true, Value::is_null))
    {
        Some(missing) => Err(ServiceError::MissingParam(*missing)),
        None => Ok(()),
    }
}

/// Interpret a parameter as an integer.
///
/// Accepts JSON integers, floats (truncated toward zero) and strings holding
/// an integer.
pub(crate) fn int_param(body: &Map<String, Value>, name: &'static str) -> Result<i64, ServiceError> {
    let parsed = match body.get(name) {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or(ServiceError::InvalidParam(name))
}

/// Asset ids are opaque strings; numbers are accepted and stringified.
pub(crate) fn id_param(body: &Map<String, Value>, name: &'static str) -> Result<String, ServiceError> {
    match body.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Null) | None => Err(ServiceError::MissingParam(name)),
        Some(_) => Err(ServiceError::InvalidParam(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_parse_body_requires_object() {
        assert!(parse_body(br#"{"angle": 1}"#).is_ok());
        assert!(matches!(parse_body(b"[1]"), Err(ServiceError::InvalidBody)));
        assert!(matches!(parse_body(b"nope"), Err(ServiceError::InvalidBody)));
        assert!(matches!(parse_body(b""), Err(ServiceError::InvalidBody)));
    }

    #[test]
    fn test_check_mandatory_reports_one_missing_param() {
        let params = ["image_id", "width", "height"];
        let cases = [
            json!({}),
            json!({"image_id": "x"}),
            json!({"width": 1}),
            json!({"height": 1}),
            json!({"image_id": "x", "width": 1}),
            json!({"image_id": "x", "height": 1}),
            json!({"width": 1, "height": 1}),
            json!({"image_id": null, "width": 1, "height": 1}),
        ];
        for case in cases {
            let body = obj(case.clone());
            let err = check_mandatory(&body, &params).unwrap_err();
            let ServiceError::MissingParam(name) = err else {
                panic!("unexpected error for {case}");
            };
            assert!(params.contains(&name));
            assert!(body.get(name).map_or(true, Value::is_null));
        }
        let complete = obj(json!({"image_id": "x", "width": 1, "height": 1}));
        assert!(check_mandatory(&complete, &params).is_ok());
    }

    #[test]
    fn test_int_param_forms() {
        let body = obj(json!({"a": 90, "b": "45", "c": 12.9, "d": -3.7, "e": "x", "f": true}));
        assert_eq!(int_param(&body, "a").unwrap(), 90);
        assert_eq!(int_param(&body, "b").unwrap(), 45);
        assert_eq!(int_param(&body, "c").unwrap(), 12);
        assert_eq!(int_param(&body, "d").unwrap(), -3);
        assert!(matches!(int_param(&body, "e"), Err(ServiceError::InvalidParam("e"))));
        assert!(matches!(int_param(&body, "f"), Err(ServiceError::InvalidParam("f"))));
    }

    #[test]
    fn test_id_param() {
        let body = obj(json!({"s": "abc", "n": 42, "o": {}}));
        assert_eq!(id_param(&body, "s").unwrap(), "abc");
        assert_eq!(id_param(&body, "n").unwrap(), "42");
        assert!(matches!(id_param(&body, "o"), Err(ServiceError::InvalidParam("o"))));
        assert!(matches!(id_param(&body, "z"), Err(ServiceError::MissingParam("z"))));
    }
}
