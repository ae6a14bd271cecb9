pub mod client;
pub mod payload;
pub mod token;
pub mod transport;

pub use client::{CheckoutOutcome, GatewayClient, MAX_ATTEMPTS};
pub use payload::{Kyc, OnboardingPayload, TenantRecord};
pub use token::{GatewayToken, TokenCache};
pub use transport::{GatewayResponse, GatewayTransport, ReqwestTransport};

pub const LOGIN_PATH: &str = "/auth/login/";
pub const ONBOARDING_PATH: &str = "/thirdparty/onboarding/";
pub const USER_LOGIN_PATH: &str = "/thirdparty/user-login/";

/// path segment the API host uses
const API_SEGMENT: &str = "thirdparty";
/// path segment the redirect host expects instead
const REDIRECT_SEGMENT: &str = "third-party";

/// rewrite `thirdparty` path segments of a redirect url to `third-party`
///
/// The gateway hands back redirect urls spelled the way its API host spells
/// them, which its redirect host does not serve. Scheme, host, query and
/// fragment are left as they are, and a url already using `third-party`
/// comes back unchanged.
pub fn rewrite_redirect_url(url: &str) -> String {
    let suffix_at = url.find(|c: char| c == '?' || c == '#').unwrap_or(url.len());
    let (head, suffix) = url.split_at(suffix_at);

    let path_at = match head.find("://") {
        Some(scheme_end) => head[scheme_end + 3..]
            .find('/')
            .map(|i| scheme_end + 3 + i)
            .unwrap_or(head.len()),
        None => 0,
    };
    let (authority, path) = head.split_at(path_at);

    let path = path
        .split('/')
        .map(|segment| if segment == API_SEGMENT { REDIRECT_SEGMENT } else { segment })
        .collect::<Vec<_>>()
        .join("/");

    format!("{authority}{path}{suffix}")
}
