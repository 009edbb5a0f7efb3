//! Reservation request and allocation descriptor types.
//!
//! A `ReservationRequest` is immutable for the lifetime of one acquisition
//! call: the retry loop passes the same request to every attempt.

use serde::{Deserialize, Serialize};

/// Instance tenancy for the reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tenancy {
    /// Shared hardware.
    #[default]
    Default,
    /// Single-tenant hardware.
    Dedicated,
}

impl std::fmt::Display for Tenancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tenancy::Default => write!(f, "default"),
            Tenancy::Dedicated => write!(f, "dedicated"),
        }
    }
}

/// How instances are matched against the reservation once it is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchCriteria {
    /// Any instance with matching attributes counts against the reservation.
    Open,
    /// Only instances that explicitly target the reservation count.
    #[default]
    Targeted,
}

impl std::fmt::Display for MatchCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchCriteria::Open => write!(f, "open"),
            MatchCriteria::Targeted => write!(f, "targeted"),
        }
    }
}

/// Whether the reservation expires on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndDateType {
    /// Reservation persists until explicitly cancelled.
    #[default]
    Unlimited,
    /// Reservation is released at a provider-side end date.
    Limited,
}

/// Immutable description of the capacity wanted. Built once by the caller and
/// handed unchanged to every acquisition attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    /// Compute shape, e.g. "m5.xlarge".
    pub instance_type: String,
    /// OS platform string, e.g. "Linux/UNIX".
    pub platform: String,
    /// Placement zone, e.g. "us-east-1a".
    pub availability_zone: String,
    /// Shared or dedicated hardware.
    pub tenancy: Tenancy,
    /// Number of instances to reserve capacity for.
    pub instance_count: u32,
    /// Open or targeted matching.
    pub match_criteria: MatchCriteria,
    /// Unlimited or provider-expiring lifetime.
    pub end_date_type: EndDateType,
}

impl Default for ReservationRequest {
    fn default() -> Self {
        Self {
            instance_type: "m5.xlarge".to_string(),
            platform: "Linux/UNIX".to_string(),
            availability_zone: "us-east-1a".to_string(),
            tenancy: Tenancy::Default,
            instance_count: 1,
            match_criteria: MatchCriteria::Targeted,
            end_date_type: EndDateType::Unlimited,
        }
    }
}

/// Allocation descriptor returned by the provider on a successful attempt.
/// Echoes the request fields the provider confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Provider-assigned reservation identifier.
    pub id: String,
    pub instance_type: String,
    pub availability_zone: String,
    /// Instances the provider actually set aside.
    pub instance_count: u32,
    /// Provider-reported state, e.g. "active".
    pub state: String,
}
