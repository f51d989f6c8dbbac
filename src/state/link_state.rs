/// Link status classification for fetched sitemap links
///
/// This module groups the outcome of a link fetch into broad HTTP status
/// classes so the report can show where the failures come from.
use serde::Serialize;
use std::fmt;

/// Broad class of a link fetch outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    /// 100-199
    Informational,

    /// 200-299
    Success,

    /// 300-399 (only seen when the redirect limit is hit or Location is missing)
    Redirect,

    /// 400-499
    ClientError,

    /// 500-599
    ServerError,

    /// Any status code outside the standard ranges
    Other,

    /// No response at all (DNS, connect, TLS or timeout failure)
    TransportError,
}

impl StatusClass {
    /// Classifies an optional HTTP status code
    ///
    /// `None` means the request never produced a response.
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            None => Self::TransportError,
            Some(100..=199) => Self::Informational,
            Some(200..=299) => Self::Success,
            Some(300..=399) => Self::Redirect,
            Some(400..=499) => Self::ClientError,
            Some(500..=599) => Self::ServerError,
            Some(_) => Self::Other,
        }
    }

    /// Human-readable label used in the rendered report
    pub fn label(&self) -> &'static str {
        match self {
            Self::Informational => "Informational responses",
            Self::Success => "Successful responses",
            Self::Redirect => "Redirects",
            Self::ClientError => "Client errors",
            Self::ServerError => "Server errors",
            Self::Other => "Non-standard statuses",
            Self::TransportError => "Transport errors",
        }
    }

    /// All classes, in report order
    pub fn all() -> [StatusClass; 7] {
        [
            Self::Informational,
            Self::Success,
            Self::Redirect,
            Self::ClientError,
            Self::ServerError,
            Self::Other,
            Self::TransportError,
        ]
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Count of checked links per status class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub informational: usize,
    pub success: usize,
    pub redirect: usize,
    pub client_error: usize,
    pub server_error: usize,
    pub other: usize,
    pub transport_error: usize,
}

impl StatusBreakdown {
    /// Records one link outcome
    pub fn record(&mut self, status: Option<u16>) {
        *self.slot_mut(StatusClass::from_status(status)) += 1;
    }

    /// Returns the count for one class
    pub fn get(&self, class: StatusClass) -> usize {
        match class {
            StatusClass::Informational => self.informational,
            StatusClass::Success => self.success,
            StatusClass::Redirect => self.redirect,
            StatusClass::ClientError => self.client_error,
            StatusClass::ServerError => self.server_error,
            StatusClass::Other => self.other,
            StatusClass::TransportError => self.transport_error,
        }
    }

    /// Total number of recorded outcomes
    pub fn total(&self) -> usize {
        StatusClass::all().iter().map(|class| self.get(*class)).sum()
    }

    /// Adds another breakdown into this one
    pub fn merge(&mut self, other: &StatusBreakdown) {
        for class in StatusClass::all() {
            *self.slot_mut(class) += other.get(class);
        }
    }

    fn slot_mut(&mut self, class: StatusClass) -> &mut usize {
        match class {
            StatusClass::Informational => &mut self.informational,
            StatusClass::Success => &mut self.success,
            StatusClass::Redirect => &mut self.redirect,
            StatusClass::ClientError => &mut self.client_error,
            StatusClass::ServerError => &mut self.server_error,
            StatusClass::Other => &mut self.other,
            StatusClass::TransportError => &mut self.transport_error,
        }
    }
}
