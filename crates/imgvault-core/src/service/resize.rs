//! `POST /resize` service.

use serde::Serialize;

use super::{check_mandatory, id_param, int_param, parse_body, TransformContext};
use crate::error::{ServiceError, TransformError};
use crate::transform::{self, ImageHandle};

const MANDATORY: [&str; 3] = ["image_id", "width", "height"];

/// Validated resize parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeRequest {
    pub image_id: String,
    pub width: i64,
    pub height: i64,
}

impl ResizeRequest {
    /// Parse and validate a JSON request body.
    pub fn from_body(body: &[u8]) -> Result<Self, ServiceError> {
        let body = parse_body(body)?;
        check_mandatory(&body, &MANDATORY)?;
        Ok(Self {
            image_id: id_param(&body, "image_id")?,
            width: int_param(&body, "width")?,
            height: int_param(&body, "height")?,
        })
    }
}

/// Payload of a successful resize.
#[derive(Debug, Serialize)]
pub struct ResizeResponse {
    /// Base64-encoded resized image
    pub image: String,
}

/// Resizes stored assets to exact dimensions.
#[derive(Clone)]
pub struct ResizeService {
    ctx: TransformContext,
}

impl ResizeService {
    pub fn new(ctx: TransformContext) -> Self {
        Self { ctx }
    }

    /// Handle a raw request body end to end.
    pub async fn handle(&self, body: &[u8]) -> Result<Vec<u8>, ServiceError> {
        let request = ResizeRequest::from_body(body)?;
        self.resize(&request).await
    }

    /// Fetch the asset, resize it, and return the encoded result.
    pub async fn resize(&self, request: &ResizeRequest) -> Result<Vec<u8>, ServiceError> {
        let (bytes, format) = self.ctx.fetch_source(&request.image_id).await.map_err(|e| {
            tracing::warn!(id = %request.image_id, "Fetch failed: {e}");
            e
        })?;

        let (width, height) = (request.width, request.height);
        let max = i64::from(self.ctx.limits.max_image_dimension);
        let result = if width > max || height > max {
            Err(TransformError::InvalidDimensions { width, height })
        } else {
            self.ctx
                .run_transform(move || {
                    let handle = ImageHandle::from_bytes(&bytes, Some(format));
                    transform::resize(&handle, width, height)
                })
                .await
        };

        result.map_err(|e| {
            tracing::warn!(id = %request.image_id, width, height, "Resizing failed: {e}");
            ServiceError::Resizing
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_body() {
        let req =
            ResizeRequest::from_body(br#"{"image_id": "abc", "width": 100, "height": 50.0}"#)
                .unwrap();
        assert_eq!((req.width, req.height), (100, 50));
        assert_eq!(req.image_id, "abc");
    }

    #[test]
    fn test_every_missing_subset_names_a_missing_param() {
        let fields = [
            ("image_id", r#""abc""#),
            ("width", "100"),
            ("height", "50"),
        ];
        for mask in 0..7u8 {
            let present: Vec<String> = fields
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, (name, value))| format!(r#""{name}": {value}"#))
                .collect();
            let body = format!("{{{}}}", present.join(", "));
            let err = ResizeRequest::from_body(body.as_bytes()).unwrap_err();
            let ServiceError::MissingParam(name) = err else {
                panic!("expected a missing-param error for {body}");
            };
            assert!(!body.contains(&format!(r#""{name}""#)), "{name} is present in {body}");
        }
    }
}
