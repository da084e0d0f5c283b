use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName};
use axum::middleware::Next;
use axum::response::Response;
use fieldgate_core::{AppError, AppResult, RequestContext, RequestUser};
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

/// Attaches the caller's [`RequestContext`] to the request extensions.
///
/// The username is taken from a header set by the trusted proxy in front of
/// the API. Requests without the header are served as anonymous.
pub async fn resolve_request_context(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let context = request_context_from_headers(request.headers(), &state.user_header)?;
    debug!(
        authenticated = context.user().is_some_and(RequestUser::is_authenticated),
        "resolved request context"
    );

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

pub fn request_context_from_headers(
    headers: &HeaderMap,
    user_header: &HeaderName,
) -> AppResult<RequestContext> {
    let Some(value) = headers.get(user_header) else {
        return Ok(RequestContext::anonymous());
    };

    let username = value
        .to_str()
        .map_err(|_| AppError::Unauthorized(format!("header '{user_header}' is not valid text")))?
        .trim();

    if username.is_empty() {
        return Ok(RequestContext::anonymous());
    }

    Ok(RequestContext::for_user(RequestUser::authenticated(
        username, username, None,
    )))
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderName, HeaderValue};
    use fieldgate_core::AppError;

    use super::request_context_from_headers;

    fn user_header() -> HeaderName {
        HeaderName::from_static("x-forwarded-user")
    }

    #[test]
    fn missing_header_resolves_anonymous_user() {
        let context = request_context_from_headers(&HeaderMap::new(), &user_header());
        assert!(context.is_ok());
        let context = context.unwrap_or_default();
        assert!(context.user().is_some_and(|user| !user.is_authenticated()));
    }

    #[test]
    fn header_resolves_authenticated_user() {
        let mut headers = HeaderMap::new();
        headers.insert(user_header(), HeaderValue::from_static(" Album Artist "));

        let context = request_context_from_headers(&headers, &user_header());
        assert!(context.is_ok());
        let context = context.unwrap_or_default();
        assert!(context.user().is_some_and(|user| user.is_authenticated()));
        assert_eq!(
            context.user().map(|user| user.username().to_owned()),
            Some("Album Artist".to_owned())
        );
    }

    #[test]
    fn opaque_header_value_is_rejected() {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_bytes(&[0xfa, 0xfb]).unwrap_or_else(|_| unreachable!());
        headers.insert(user_header(), value);

        assert!(matches!(
            request_context_from_headers(&headers, &user_header()),
            Err(AppError::Unauthorized(_))
        ));
    }
}
