//! Routes of the transform services: `POST /rotate` and `POST /resize`.

use async_trait::async_trait;
use hyper::Method;

use super::{ApiRequest, Routes};
use crate::asset::encode_base64;
use crate::envelope::Envelope;
use crate::error::ServiceError;
use crate::service::{ResizeResponse, ResizeService, RotateResponse, RotateService};

fn is_post_to(request: &ApiRequest, path: &str) -> bool {
    request.method == Method::POST && request.path.trim_end_matches('/') == path
}

fn failure(err: ServiceError) -> Envelope {
    Envelope::failure(err.to_string())
}

pub struct RotateRoutes {
    service: RotateService,
}

impl RotateRoutes {
    pub fn new(service: RotateService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Routes for RotateRoutes {
    fn name(&self) -> &'static str {
        "rotation"
    }

    async fn dispatch(&self, request: ApiRequest) -> Option<Envelope> {
        if !is_post_to(&request, "/rotate") {
            return None;
        }
        let envelope = match self.service.handle(&request.body).await {
            Ok(bytes) => Envelope::ok(RotateResponse {
                image: encode_base64(&bytes),
            }),
            Err(e) => failure(e),
        };
        Some(envelope)
    }
}

pub struct ResizeRoutes {
    service: ResizeService,
}

impl ResizeRoutes {
    pub fn new(service: ResizeService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Routes for ResizeRoutes {
    fn name(&self) -> &'static str {
        "resizing"
    }

    async fn dispatch(&self, request: ApiRequest) -> Option<Envelope> {
        if !is_post_to(&request, "/resize") {
            return None;
        }
        let envelope = match self.service.handle(&request.body).await {
            Ok(bytes) => Envelope::ok(ResizeResponse {
                image: encode_base64(&bytes),
            }),
            Err(e) => failure(e),
        };
        Some(envelope)
    }
}
