//! Service container and shared middleware wiring.

use std::sync::Arc;

use axum::extract::FromRef;
use axum::{Router, middleware};
use shopkit_io_xlsx::XlsxExporter;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::JwtAuthenticator;
use crate::config::SharedConfig;
use crate::middleware::{gateway_guard_middleware, global_exception_middleware, handle_panic};

/// Services every platform service gets from this library.
///
/// Usable directly as router state; handlers pull the parts they need through
/// `FromRef`.
#[derive(Debug, Clone)]
pub struct SharedServices {
    pub authenticator: Arc<JwtAuthenticator>,
    pub exporter: Arc<XlsxExporter>,
}

impl SharedServices {
    pub fn new(config: &SharedConfig) -> Self {
        Self {
            authenticator: Arc::new(JwtAuthenticator::new(&config.jwt)),
            exporter: Arc::new(XlsxExporter::default()),
        }
    }
}

impl FromRef<SharedServices> for Arc<JwtAuthenticator> {
    fn from_ref(services: &SharedServices) -> Self {
        services.authenticator.clone()
    }
}

impl FromRef<SharedServices> for Arc<XlsxExporter> {
    fn from_ref(services: &SharedServices) -> Self {
        services.exporter.clone()
    }
}

/// Wrap `router` in the shared middleware stack.
///
/// Outermost first: tracing, exception rewrite, panic catcher, timeout, then
/// the gateway guard when enabled.
pub fn apply_shared_middlewares<S>(router: Router<S>, config: &SharedConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let router = if config.gateway.enabled {
        info!(header = %config.gateway.header_name, "API gateway guard enabled");
        router.layer(middleware::from_fn_with_state(
            config.gateway.clone(),
            gateway_guard_middleware,
        ))
    } else {
        router
    };

    #[allow(deprecated)]
    let timeout = TimeoutLayer::new(config.request_timeout);

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(global_exception_middleware))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(timeout),
    )
}
