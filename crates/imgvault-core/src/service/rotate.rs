//! `POST /rotate` service.

use serde::Serialize;

use super::{check_mandatory, id_param, int_param, parse_body, TransformContext};
use crate::error::ServiceError;
use crate::transform::{self, ImageHandle};

const MANDATORY: [&str; 2] = ["image_id", "angle"];

/// Validated rotate parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotateRequest {
    pub image_id: String,
    /// Degrees, counter-clockwise
    pub angle: i64,
}

impl RotateRequest {
    /// Parse and validate a JSON request body.
    pub fn from_body(body: &[u8]) -> Result<Self, ServiceError> {
        let body = parse_body(body)?;
        check_mandatory(&body, &MANDATORY)?;
        Ok(Self {
            image_id: id_param(&body, "image_id")?,
            angle: int_param(&body, "angle")?,
        })
    }
}

/// Payload of a successful rotation.
#[derive(Debug, Serialize)]
pub struct RotateResponse {
    /// Base64-encoded rotated image
    pub image: String,
}

/// Rotates stored assets.
#[derive(Clone)]
pub struct RotateService {
    ctx: TransformContext,
}

impl RotateService {
    pub fn new(ctx: TransformContext) -> Self {
        Self { ctx }
    }

    /// Handle a raw request body end to end.
    pub async fn handle(&self, body: &[u8]) -> Result<Vec<u8>, ServiceError> {
        let request = RotateRequest::from_body(body)?;
        self.rotate(&request).await
    }

    /// Fetch the asset, rotate it, and return the encoded result.
    pub async fn rotate(&self, request: &RotateRequest) -> Result<Vec<u8>, ServiceError> {
        let (bytes, format) = self.ctx.fetch_source(&request.image_id).await.map_err(|e| {
            tracing::warn!(id = %request.image_id, "Fetch failed: {e}");
            e
        })?;

        let angle = request.angle;
        let result = self
            .ctx
            .run_transform(move || {
                let handle = ImageHandle::from_bytes(&bytes, Some(format));
                transform::rotate(&handle, angle)
            })
            .await;

        result.map_err(|e| {
            tracing::warn!(id = %request.image_id, angle, "Rotation failed: {e}");
            ServiceError::Rotation
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_body() {
        let req = RotateRequest::from_body(br#"{"image_id": "abc", "angle": "90"}"#).unwrap();
        assert_eq!(
            req,
            RotateRequest {
                image_id: "abc".into(),
                angle: 90
            }
        );
    }

    #[test]
    fn test_missing_params() {
        let bodies: [&[u8]; 3] = [br#"{}"#, br#"{"image_id": "abc"}"#, br#"{"angle": 5}"#];
        for body in bodies {
            let err = RotateRequest::from_body(body).unwrap_err();
            let msg = err.to_string();
            assert!(
                msg == "Param 'image_id' is mandatory" || msg == "Param 'angle' is mandatory",
                "unexpected message {msg}"
            );
        }
    }

    #[test]
    fn test_non_integer_angle() {
        let err = RotateRequest::from_body(br#"{"image_id": "abc", "angle": "left"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Param 'angle' must be an integer");
    }
}
