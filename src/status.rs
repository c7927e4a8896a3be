//! Outcome taxonomy shared by every provider and by the aggregated query
//!
//! Each provider call ends in one [`Status`]. The aggregator reduces the
//! per-provider statuses to one, and the engine returns that status as the
//! error of a failed query. Provider-specific codes are kept verbatim so the
//! message table below can explain them.

use crate::mt::error::TransportError;
use crate::mt::translator::ProviderId;

/// Closed set of outcomes for a provider call or a whole query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// At least one provider produced candidates without error
    Ok,
    /// Every provider succeeded but no usable candidate survived normalization
    EmptyResponse,
    /// A provider call exceeded its deadline
    NetworkTimeout,
    /// Any other transport failure (refused connection, bad HTTP status, ...)
    NetworkError,
    /// A provider reported an error in its own code space
    ProviderError { provider: ProviderId, code: i64 },
    /// Credential or token acquisition failed before any translation attempt
    AuthError { provider: ProviderId },
}

impl Status {
    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }

    /// Short, user-facing description of this status
    pub fn message(&self) -> String {
        match self {
            Status::Ok => String::new(),
            Status::EmptyResponse => "No result, try another phrase".to_string(),
            Status::NetworkTimeout => {
                "Connection timed out, check network and proxy settings".to_string()
            }
            Status::NetworkError => "Network error, check network and proxy settings".to_string(),
            Status::AuthError { provider } => format!("{}: access token error", provider),
            Status::ProviderError { provider, code } => match provider_message(*provider, *code) {
                Some(msg) => format!("{}: {}", provider, msg),
                None => format!("{}: error {}", provider, code),
            },
        }
    }
}

/// Known error codes of each provider family
fn provider_message(provider: ProviderId, code: i64) -> Option<&'static str> {
    let msg = match (provider, code) {
        (ProviderId::Youdao, 20) => "text to translate is too long",
        (ProviderId::Youdao, 30) => "unable to produce a valid translation",
        (ProviderId::Youdao, 40) => "unsupported language type",
        (ProviderId::Youdao, 50) => "invalid key",
        (ProviderId::Youdao, 60) => "no dictionary result",
        (ProviderId::Baidu, 52001) => "request timed out, check network and settings",
        (ProviderId::Baidu, 52002) => "system error, please retry",
        (ProviderId::Baidu, 52003) => "unauthorized user, check the appid",
        (ProviderId::Baidu, 54000) => "a required parameter is empty",
        (ProviderId::Baidu, 54001) => "signature error, check the secret key",
        (ProviderId::Baidu, 54003) => "access frequency limited, slow down",
        (ProviderId::Baidu, 54004) => "insufficient account balance",
        (ProviderId::Baidu, 54005) => "long queries sent too frequently",
        (ProviderId::Baidu, 58000) => "client IP address is not allowed",
        (ProviderId::Baidu, 58001) => "unsupported translation direction",
        (ProviderId::Microsoft, 999) => "access token error",
        _ => return None,
    };
    Some(msg)
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for Status {}

impl From<&TransportError> for Status {
    fn from(err: &TransportError) -> Self {
        match err {
            TransportError::Timeout => Status::NetworkTimeout,
            _ => Status::NetworkError,
        }
    }
}
