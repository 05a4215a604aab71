//! Client IP resolution.

use crate::request::CapturedRequest;

/// Proxy-forwarding header honored over the direct connection address.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Extract the client IP from request metadata.
///
/// A non-empty forwarding header wins: its first comma-separated entry is
/// the client-nearest hop in the proxy chain. Otherwise the direct
/// connection address is used. Returns `""` when neither is available —
/// callers treat the empty string as "no IP known", never a null.
pub fn client_ip(request: &CapturedRequest) -> String {
    match request.header(FORWARDED_FOR_HEADER) {
        Some(forwarded) if !forwarded.is_empty() => forwarded
            .split(',')
            .next()
            .unwrap_or("")
            .trim()
            .to_string(),
        _ => request.remote_addr.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(forwarded: Option<&str>, remote: Option<&str>) -> CapturedRequest {
        let mut req = CapturedRequest {
            remote_addr: remote.map(String::from),
            ..CapturedRequest::default()
        };
        if let Some(value) = forwarded {
            req.headers
                .insert(FORWARDED_FOR_HEADER.to_string(), value.to_string());
        }
        req
    }

    #[test]
    fn forwarding_header_wins_over_remote_addr() {
        let req = request(Some("203.0.113.7"), Some("10.0.0.1"));
        assert_eq!(client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn first_hop_of_proxy_chain_is_taken() {
        let req = request(Some(" 203.0.113.7 , 10.0.0.2, 10.0.0.3"), None);
        assert_eq!(client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_remote_addr() {
        let req = request(None, Some("10.0.0.1"));
        assert_eq!(client_ip(&req), "10.0.0.1");
    }

    #[test]
    fn empty_sentinel_when_nothing_is_known() {
        let req = request(None, None);
        assert_eq!(client_ip(&req), "");
    }
}
