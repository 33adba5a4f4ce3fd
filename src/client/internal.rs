//! In-process dispatch against the route table.

use tracing::{debug, warn};

use crate::http::Request;
use crate::routing::Router;

use super::{ClientFuture, ClientKind, DispatchError, RequestClient};

/// Resolves a request's URI against the route table and drives the matched
/// controller's lifecycle, all without a network hop.
///
/// The matched route's parameters are applied to the request before the
/// controller runs, so `request.param("action")` and friends are visible
/// from [`Controller::handle`](crate::controller::Controller::handle). The
/// controller is selected by the matched `controller` parameter, which must
/// name a controller registered on the [`Router`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalClient;

impl RequestClient for InternalClient {
    fn kind(&self) -> ClientKind {
        ClientKind::Internal
    }

    fn execute<'a>(&'a self, request: &'a mut Request, routes: &'a Router) -> ClientFuture<'a> {
        Box::pin(async move {
            let uri = request.uri().to_owned();

            let Some(matched) = routes.matches(&uri) else {
                warn!(uri = %uri, "no route matched");
                return Err(DispatchError::RouteNotFound { uri });
            };

            let route_name = matched.name.to_owned();
            let params = matched.params;

            let controller_name = params
                .get("controller")
                .map(str::to_owned)
                .ok_or_else(|| DispatchError::MissingController { uri: uri.clone() })?;

            let Some(controller) = routes.controller_named(&controller_name) else {
                warn!(uri = %uri, controller = %controller_name, "controller not registered");
                return Err(DispatchError::UnknownController {
                    name: controller_name,
                });
            };

            debug!(
                uri = %uri,
                route = %route_name,
                controller = %controller_name,
                "dispatching internal request"
            );

            request.apply_route(route_name, params);

            if let Some(response) = controller.before(request) {
                debug!(uri = %uri, "request short-circuited in before hook");
                return Ok(response);
            }

            let response = controller.handle(request).await;
            Ok(controller.after(request, response))
        })
    }
}
