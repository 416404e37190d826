use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TenantGateError};

use super::feature::is_feature_supported;

const SECS_PER_HOUR: u64 = 60 * 60;

/// Plan tier. Closed set, ordered by resource ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Starter,
    Production,
    Dedicated,
    Private,
}

impl Tier {
    /// All tiers, lowest ceiling first.
    pub const ALL: [Tier; 5] = [
        Tier::Free,
        Tier::Starter,
        Tier::Production,
        Tier::Dedicated,
        Tier::Private,
    ];

    /// Exact, case-sensitive lookup. Unknown names yield `None`, never a default tier.
    pub fn parse(name: &str) -> Option<Tier> {
        match name {
            "free" => Some(Tier::Free),
            "starter" => Some(Tier::Starter),
            "production" => Some(Tier::Production),
            "dedicated" => Some(Tier::Dedicated),
            "private" => Some(Tier::Private),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Starter => "starter",
            Tier::Production => "production",
            Tier::Dedicated => "dedicated",
            Tier::Private => "private",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource ceiling. Encoded as an integer on the wire, `-1` meaning unlimited.
///
/// `Unlimited` orders above every `Limited` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Quota {
    Limited(u32),
    Unlimited,
}

impl Quota {
    pub const UNLIMITED_SENTINEL: i64 = -1;

    pub const fn is_unlimited(self) -> bool {
        matches!(self, Quota::Unlimited)
    }

    /// Whether one more unit may be allocated with `in_use` already allocated.
    pub const fn permits(self, in_use: u32) -> bool {
        match self {
            Quota::Limited(n) => in_use < n,
            Quota::Unlimited => true,
        }
    }
}

impl TryFrom<i64> for Quota {
    type Error = String;

    fn try_from(v: i64) -> std::result::Result<Self, Self::Error> {
        if v == Self::UNLIMITED_SENTINEL {
            return Ok(Quota::Unlimited);
        }
        u32::try_from(v)
            .map(Quota::Limited)
            .map_err(|_| format!("invalid quota {v} (expected -1 or 0..={})", u32::MAX))
    }
}

impl From<Quota> for i64 {
    fn from(q: Quota) -> i64 {
        match q {
            Quota::Limited(n) => i64::from(n),
            Quota::Unlimited => Quota::UNLIMITED_SENTINEL,
        }
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quota::Limited(n) => write!(f, "{n}"),
            Quota::Unlimited => f.write_str("unlimited"),
        }
    }
}

/// Quota dimensions of a plan policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuotaKind {
    Topics,
    Namespaces,
    Producers,
    Consumers,
    Functions,
}

impl QuotaKind {
    pub const ALL: [QuotaKind; 5] = [
        QuotaKind::Topics,
        QuotaKind::Namespaces,
        QuotaKind::Producers,
        QuotaKind::Consumers,
        QuotaKind::Functions,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            QuotaKind::Topics => "topics",
            QuotaKind::Namespaces => "namespaces",
            QuotaKind::Producers => "producers",
            QuotaKind::Consumers => "consumers",
            QuotaKind::Functions => "functions",
        }
    }
}

/// Resource limits and licensed features of a plan.
///
/// Immutable once built; caches hand out clones. The hour-granular retention
/// seen on the wire is derived from `message_retention`, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "PlanPolicyWire", try_from = "PlanPolicyWire")]
pub struct PlanPolicy {
    /// Tier identifier. Persisted plans may carry custom names.
    pub name: String,
    pub num_of_topics: Quota,
    pub num_of_namespaces: Quota,
    pub message_retention: Duration,
    pub num_of_producers: Quota,
    pub num_of_consumers: Quota,
    pub functions: Quota,
    /// Comma-separated capability tokens, or `all-enabled` / `all-disabled`.
    pub feature_codes: String,
}

impl PlanPolicy {
    /// The tier this policy is named after, if any.
    pub fn tier(&self) -> Option<Tier> {
        Tier::parse(&self.name)
    }

    /// Retention in whole hours.
    pub fn message_hour_retention(&self) -> u64 {
        self.message_retention.as_secs() / SECS_PER_HOUR
    }

    pub fn quota(&self, kind: QuotaKind) -> Quota {
        match kind {
            QuotaKind::Topics => self.num_of_topics,
            QuotaKind::Namespaces => self.num_of_namespaces,
            QuotaKind::Producers => self.num_of_producers,
            QuotaKind::Consumers => self.num_of_consumers,
            QuotaKind::Functions => self.functions,
        }
    }

    /// Fails with `QuotaExceeded` when `in_use` already reaches the ceiling for `kind`.
    pub fn check_quota(&self, kind: QuotaKind, in_use: u32) -> Result<()> {
        match self.quota(kind) {
            q if q.permits(in_use) => Ok(()),
            Quota::Limited(limit) => Err(TenantGateError::QuotaExceeded {
                kind: kind.as_str(),
                limit,
            }),
            Quota::Unlimited => Ok(()),
        }
    }

    pub fn supports_feature(&self, feature: &str) -> bool {
        is_feature_supported(feature, &self.feature_codes)
    }
}

/// JSON shape shared with the tenant store. Field names are part of the
/// stored format, including the `numofProducers` spelling.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanPolicyWire {
    name: String,
    num_of_topics: Quota,
    num_of_namespaces: Quota,
    #[serde(default)]
    message_hour_retention: u64,
    /// Nanoseconds, signed like the store's duration type.
    #[serde(default)]
    message_retention: i64,
    #[serde(rename = "numofProducers")]
    num_of_producers: Quota,
    num_of_consumers: Quota,
    functions: Quota,
    #[serde(default)]
    feature_codes: String,
}

impl From<PlanPolicy> for PlanPolicyWire {
    fn from(p: PlanPolicy) -> Self {
        Self {
            message_hour_retention: p.message_hour_retention(),
            message_retention: i64::try_from(p.message_retention.as_nanos()).unwrap_or(i64::MAX),
            name: p.name,
            num_of_topics: p.num_of_topics,
            num_of_namespaces: p.num_of_namespaces,
            num_of_producers: p.num_of_producers,
            num_of_consumers: p.num_of_consumers,
            functions: p.functions,
            feature_codes: p.feature_codes,
        }
    }
}

impl TryFrom<PlanPolicyWire> for PlanPolicy {
    type Error = String;

    fn try_from(w: PlanPolicyWire) -> std::result::Result<Self, Self::Error> {
        // hour field only fills in for records that never stored the duration
        let message_retention = match w.message_retention {
            n if n > 0 => Duration::from_nanos(n.unsigned_abs()),
            0 => {
                let hours = w.message_hour_retention;
                let secs = hours
                    .checked_mul(SECS_PER_HOUR)
                    .ok_or_else(|| format!("messageHourRetention out of range: {hours}"))?;
                Duration::from_secs(secs)
            }
            n => return Err(format!("negative messageRetention: {n}")),
        };

        Ok(Self {
            name: w.name,
            num_of_topics: w.num_of_topics,
            num_of_namespaces: w.num_of_namespaces,
            message_retention,
            num_of_producers: w.num_of_producers,
            num_of_consumers: w.num_of_consumers,
            functions: w.functions,
            feature_codes: w.feature_codes,
        })
    }
}
