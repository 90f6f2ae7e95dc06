use tracing::{error, warn};

use super::{ClassifiedError, RequestContext};
use crate::errors::AppError;

/// Query parameters whose values are masked in the logged URL
const SENSITIVE_PARAMS: [&str; 4] = ["api_key", "token", "password", "secret"];

macro_rules! diagnostic {
    ($level:ident, $error:expr, $classified:expr, $context:expr) => {{
        let location = $error.location();
        $level!(
            category = %$classified.category,
            code = %$classified.code,
            status = $classified.status.as_u16(),
            method = %$context.method,
            url = %sanitize_url(&$context.url),
            user_agent = $context.user_agent.as_deref(),
            request_id = %$context.request_id,
            file = location.map(|l| l.file),
            line = location.map(|l| l.line),
            error = %$error,
            "Request failed"
        );
    }};
}

/// Emit the diagnostic record for a failed request.
///
/// Exactly one event per call: `warn` for client errors, `error` for
/// everything else. The record always carries the unredacted error.
pub fn report(err: &AppError, classified: &ClassifiedError, context: &RequestContext) {
    if classified.status.is_client_error() {
        diagnostic!(warn, err, classified, context);
    } else {
        diagnostic!(error, err, classified, context);
    }
}

/// Mask the values of sensitive query parameters
fn sanitize_url(url: &str) -> String {
    let Some((path, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let query = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if SENSITIVE_PARAMS.contains(&key) => format!("{}=***", key),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", path, query)
}
