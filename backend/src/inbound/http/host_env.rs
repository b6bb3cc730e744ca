//! Deployment environment detection from the request host.
//!
//! The capture notification variant is selected when the inbound `Host`
//! header names the local machine. The predicate is deliberately a small
//! fixed set rather than a general address parser: exactly `localhost`,
//! `127.0.0.1`, or `::1`, or any `localhost:<port>` value. Every other host
//! routes to the real mail transport.

use actix_web::HttpRequest;

use crate::domain::DeliveryChannel;

/// True when the host names the local development machine.
pub fn is_local_host(host: &str) -> bool {
    host == "localhost" || host == "127.0.0.1" || host == "::1" || host.starts_with("localhost:")
}

/// Select the notification channel for one request from its `Host` header.
///
/// A missing or non-UTF-8 header selects the transport variant: production
/// is the safe default when the environment cannot be recognised.
pub fn delivery_channel_for(req: &HttpRequest) -> DeliveryChannel {
    let host = req
        .headers()
        .get(actix_web::http::header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if is_local_host(host) {
        DeliveryChannel::Capture
    } else {
        DeliveryChannel::Transport
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    #[case("localhost", true)]
    #[case("localhost:8080", true)]
    #[case("127.0.0.1", true)]
    #[case("::1", true)]
    #[case("127.0.0.1:8080", false)]
    #[case("localhost.example.com", false)]
    #[case("app.syndica.example", false)]
    #[case("", false)]
    fn host_markers(#[case] host: &str, #[case] local: bool) {
        assert_eq!(is_local_host(host), local, "{host}");
    }

    #[rstest]
    #[case("localhost:3000", DeliveryChannel::Capture)]
    #[case("app.syndica.example", DeliveryChannel::Transport)]
    fn channel_follows_host_header(#[case] host: &str, #[case] expected: DeliveryChannel) {
        let req = TestRequest::default()
            .insert_header(("Host", host))
            .to_http_request();
        assert_eq!(delivery_channel_for(&req), expected);
    }

    #[rstest]
    fn missing_host_defaults_to_transport() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(delivery_channel_for(&req), DeliveryChannel::Transport);
    }
}
