use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::{TokenIssuer, VerifyError};
use crate::error::AppError;
use crate::store::users::UserStore;

/// Paths under the protected scope that stay public. Refresh and logout
/// authenticate with the refresh cookie, not a bearer token.
const PUBLIC_PATHS: [&str; 4] = [
    "/api/auth/register",
    "/api/auth/login",
    "/api/auth/refresh",
    "/api/auth/logout",
];

/// Access-control middleware for the `/api` scope.
///
/// Per request: extracts the bearer access token, verifies it against the
/// access secret (expiry reported distinctly from malformation), resolves the
/// subject to a live identity — a soft-deleted account fails here even with a
/// perfectly valid token — and inserts the public projection into request
/// extensions for [`crate::auth::extractors::CurrentUser`].
///
/// Stateless per request: never touches refresh tokens, never writes.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        if PUBLIC_PATHS.contains(&req.path()) {
            return Box::pin(async move { service.call(req).await });
        }

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_owned);

            let token = match token {
                Some(token) => token,
                None => {
                    return Err(
                        AppError::Unauthorized("Not authorized. Token missing.".into()).into(),
                    )
                }
            };

            let issuer = req
                .app_data::<web::Data<TokenIssuer>>()
                .ok_or_else(|| AppError::InternalServerError("Token issuer not configured".into()))?;

            let claims = match issuer.verify_access_token(&token) {
                Ok(claims) => claims,
                Err(VerifyError::Expired) => {
                    return Err(AppError::Unauthorized("Token expired".into()).into())
                }
                Err(VerifyError::Invalid) => {
                    return Err(AppError::Unauthorized("Invalid token".into()).into())
                }
            };

            let store = req
                .app_data::<web::Data<UserStore>>()
                .ok_or_else(|| AppError::InternalServerError("User store not configured".into()))?;

            // Live-identity check: a deleted account's tokens die with it
            let user = match store.find_active_by_id(claims.sub).await? {
                Some(user) => user,
                None => {
                    return Err(AppError::Unauthorized("User no longer exists".into()).into())
                }
            };

            req.extensions_mut().insert(user);
            service.call(req).await
        })
    }
}
