//! Input hygiene for anything that ends up on a browser's command line.
//!
//! Sanitizing only strips NUL bytes and surrounding whitespace; everything
//! else is decided by validation, which rejects rather than rewrites.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

/// Schemes a URL may carry; scheme-less input is also accepted
pub const ALLOWED_SCHEMES: [&str; 6] = ["http", "https", "file", "about", "chrome", "edge"];

lazy_static! {
    static ref DANGEROUS_CHARS: Regex = Regex::new(r"[;|`$(){}\[\]<>]").unwrap();
    static ref PROFILE_NAME: Regex = Regex::new(r"^[a-zA-Z0-9 ._\-]+$").unwrap();
}

/// Remove NUL bytes and trim surrounding whitespace
pub fn sanitize_url(url: &str) -> String {
    strip_nul_and_trim(url)
}

/// Remove NUL bytes and trim surrounding whitespace
pub fn sanitize_profile_name(profile: &str) -> String {
    strip_nul_and_trim(profile)
}

fn strip_nul_and_trim(input: &str) -> String {
    input.replace('\0', "").trim().to_string()
}

/// Accept scheme-less input or an allow-listed scheme, with no shell metacharacters
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    let scheme_ok = match Url::parse(url) {
        Ok(parsed) => ALLOWED_SCHEMES.contains(&parsed.scheme()),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        // Unparseable: only scheme-less shapes get the benefit of the doubt
        Err(_) => !url.contains("://"),
    };

    scheme_ok && !DANGEROUS_CHARS.is_match(url)
}

/// Letters, digits, space, `.`, `-` and `_` only
pub fn is_valid_profile_name(profile: &str) -> bool {
    PROFILE_NAME.is_match(profile)
}
