use axum::response::{IntoResponse, Redirect, Response};

use crate::{
    error::RegistryError,
    resolver::{Outcome, Resolver},
};

/// Route visitors are sent to when a slug doesn't resolve.
pub const NOT_FOUND_ROUTE: &str = "/?error=notfound";

/// Environment side of the redirect view: what "go to the target" and "show
/// the not-found indicator" mean for the caller.
pub trait Navigator {
    type Output;

    fn redirect_to(&self, url: &str) -> Self::Output;

    fn not_found(&self) -> Self::Output;
}

/// Resolve `slug` and hand the outcome to `navigator`.
pub fn follow<N: Navigator>(
    resolver: &Resolver,
    slug: &str,
    navigator: &N,
) -> Result<N::Output, RegistryError> {
    Ok(match resolver.resolve(slug)? {
        Outcome::Redirect(url) => navigator.redirect_to(&url),
        Outcome::NotFound => navigator.not_found(),
    })
}

/// Navigation as HTTP redirects: 307 to the target, 303 to the error route.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpNavigator;

impl Navigator for HttpNavigator {
    type Output = Response;

    fn redirect_to(&self, url: &str) -> Response {
        Redirect::temporary(url).into_response()
    }

    fn not_found(&self) -> Response {
        Redirect::to(NOT_FOUND_ROUTE).into_response()
    }
}
