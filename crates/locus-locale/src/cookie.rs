//! Minimal `Cookie` / `Set-Cookie` handling for the locale cookie.

/// Find the value of cookie `name` in a `Cookie` request header.
///
/// Pairs are separated by `;`; surrounding whitespace and optional double
/// quotes around the value are ignored. The first occurrence wins.
pub fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| {
            let value = value.trim();
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
        })
    })
}

/// Build a `Set-Cookie` header value persisting the locale.
///
/// The cookie is site-wide (`Path=/`) and has no `Expires`/`Max-Age`, so it
/// follows the browser's session persistence policy.
pub fn set_cookie_value(name: &str, locale: &str) -> String {
    format!("{name}={locale}; Path=/; SameSite=Lax")
}
