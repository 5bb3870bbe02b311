//! Turning what the user (or the desktop) passed on the command line into a
//! URL a browser will accept.

use picker_browser::sanitize::ALLOWED_SCHEMES;
use std::net::IpAddr;
use url::Url;

/// Longest URL shown verbatim in the picker header
pub const MAX_URL_DISPLAY_LENGTH: usize = 80;

/// Add a scheme to bare hosts.
///
/// Input that already names a scheme is returned unchanged. A bare
/// registrable domain gets `https://www.`; anything else that looks like a
/// host (a `www.` name, an IP address, `localhost`, a subdomain) gets
/// `https://`.
pub fn normalize_url(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() || input.contains("://") || has_allowed_scheme(input) {
        return input.to_string();
    }

    let host = host_of(input).to_ascii_lowercase();
    let prefix = if host.starts_with("www.") || host.parse::<IpAddr>().is_ok() || host == "localhost" {
        "https://"
    } else {
        match registrable_domain(&host) {
            Some(domain) if domain == host => "https://www.",
            _ => "https://",
        }
    };

    format!("{}{}", prefix, input)
}

fn has_allowed_scheme(input: &str) -> bool {
    Url::parse(input).is_ok_and(|url| ALLOWED_SCHEMES.contains(&url.scheme()))
}

/// Host part of a scheme-less URL, without userinfo or port
fn host_of(input: &str) -> &str {
    let authority = input.split(['/', '?', '#']).next().unwrap_or(input);
    let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    if let Some(bracketed) = authority.strip_prefix('[') {
        return bracketed.split(']').next().unwrap_or(bracketed);
    }

    match authority.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => authority,
    }
}

/// Registrable domain according to the Public Suffix List
fn registrable_domain(host: &str) -> Option<String> {
    let domain = psl::domain(host.as_bytes())?;
    Some(String::from_utf8_lossy(domain.as_bytes()).to_string())
}

/// Shorten long URLs to `scheme://host/...` for display
pub fn truncate_url(url: &str, max_len: usize) -> String {
    if url.chars().count() <= max_len {
        return url.to_string();
    }

    if let Ok(parsed) = Url::parse(url) {
        if let Some(host) = parsed.host_str() {
            return format!("{}://{}/...", parsed.scheme(), host);
        }
    }

    let mut shortened: String = url.chars().take(max_len.saturating_sub(3)).collect();
    shortened.push_str("...");
    shortened
}
