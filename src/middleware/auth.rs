use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::{Identity, TokenService, TOKEN_COOKIE};
use crate::utils::AppError;

/// Rejects requests without a valid `token` cookie (401) and attaches the
/// verified [`Identity`] to the request extensions otherwise.
#[derive(Clone)]
pub struct AccessGuard {
    tokens: TokenService,
}

impl AccessGuard {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGuardMiddleware {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct AccessGuardMiddleware<S> {
    service: S,
    tokens: TokenService,
}

impl<S> AccessGuardMiddleware<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<Identity, AppError> {
        let cookie = req.cookie(TOKEN_COOKIE).ok_or_else(|| {
            log::warn!("🔒 {} {} - missing token cookie", req.method(), req.path());
            AppError::Unauthorized
        })?;

        self.tokens.verify(cookie.value()).map_err(|e| {
            log::warn!("🔒 {} {} - invalid token", req.method(), req.path());
            e
        })
    }
}

impl<S, B> Service<ServiceRequest> for AccessGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.authenticate(&req) {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(e) => {
                let res = req.into_response(e.error_response()).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{cookie::Cookie, http::StatusCode, test, web, App, HttpResponse};

    async fn whoami(identity: web::ReqData<Identity>) -> HttpResponse {
        HttpResponse::Ok().body(identity.email.clone())
    }

    #[actix_web::test]
    async fn test_guard_attaches_identity() {
        let tokens = TokenService::hourly("guard-secret");
        let token = tokens.issue(&Identity::new("a@x.com")).unwrap();

        let app = test::init_service(
            App::new().service(
                web::resource("/me")
                    .wrap(AccessGuard::new(tokens))
                    .route(web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .cookie(Cookie::new(TOKEN_COOKIE, token))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "a@x.com");
    }

    #[actix_web::test]
    async fn test_guard_rejects_before_handler() {
        let tokens = TokenService::hourly("guard-secret");
        let app = test::init_service(
            App::new().service(
                web::resource("/me")
                    .wrap(AccessGuard::new(tokens))
                    .route(web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/me").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/me")
            .cookie(Cookie::new(TOKEN_COOKIE, "garbage"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Unauthorized access");
    }
}
