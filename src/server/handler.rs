// src/server/handler.rs
use hyper::{Body, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;
use tower::Service;

use crate::server::AdminApp;

#[derive(Clone)]
pub struct RequestHandler {
    app: Arc<AdminApp>,
}

impl RequestHandler {
    pub fn new(app: Arc<AdminApp>) -> Self {
        Self { app }
    }
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let app = self.app.clone();
        Box::pin(async move {
            match app.handle(req).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    if e.status().is_server_error() {
                        tracing::error!(%e, "admin request failed");
                    } else {
                        tracing::debug!(%e, "admin request rejected");
                    }
                    Ok(e.into())
                }
            }
        })
    }
}
