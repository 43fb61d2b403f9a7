//! Bearer-token identity extractor.
//!
//! Resolves the `Authorization: Bearer` header to a live account on every
//! request, so bans and deletions take effect immediately instead of at
//! token expiry. Handlers take an [`Identity`] parameter and actix rejects
//! unauthenticated calls before the handler body runs.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User};
use crate::inbound::http::state::HttpState;

/// The authenticated caller.
pub struct Identity(pub User);

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_owned())
        .filter(|token| !token.is_empty())
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("http state not configured"))?;
            let token = token.ok_or_else(|| Error::unauthorized("Missing bearer token"))?;
            let user = state.auth.authenticate(&token).await?;
            Ok(Self(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc.def.ghi", Some("abc.def.ghi"))]
    #[case("Bearer   spaced  ", Some("spaced"))]
    #[case("Bearer ", None)]
    #[case("Basic abc", None)]
    fn bearer_header_parsing(#[case] header: &str, #[case] expected: Option<&str>) {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, header))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), expected);
    }

    #[test]
    fn missing_header_yields_none() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&req), None);
    }
}
