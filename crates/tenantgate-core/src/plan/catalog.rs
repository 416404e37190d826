//! Tier catalog: the policy bundle behind each plan tier.
//!
//! A catalog is an immutable value built once at process start and passed by
//! reference. `PlanCatalog::standard()` is the built-in table. Overrides are
//! applied with `replace` and the finished table checked once with
//! `validate`; `with_override` does both for a single tier.

use std::time::Duration;

use crate::error::{Result, TenantGateError};

use super::feature::{FEATURE_ALL_DISABLED, FEATURE_ALL_ENABLED};
use super::policy::{PlanPolicy, Quota, QuotaKind, Tier};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// One policy per tier, indexed by `Tier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCatalog {
    plans: [PlanPolicy; 5],
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl PlanCatalog {
    /// Built-in tier table.
    pub fn standard() -> Self {
        use Quota::{Limited, Unlimited};

        Self {
            plans: [
                tier_policy(
                    Tier::Free,
                    [Limited(5), Limited(1), Limited(3), Limited(5), Limited(1)],
                    2,
                    FEATURE_ALL_DISABLED,
                ),
                tier_policy(
                    Tier::Starter,
                    [Limited(20), Limited(2), Limited(30), Limited(50), Limited(10)],
                    7,
                    FEATURE_ALL_DISABLED,
                ),
                tier_policy(
                    Tier::Production,
                    [Limited(100), Limited(6), Limited(60), Limited(100), Limited(20)],
                    14,
                    FEATURE_ALL_DISABLED,
                ),
                tier_policy(
                    Tier::Dedicated,
                    [Limited(1000), Limited(500), Limited(300), Limited(500), Limited(30)],
                    21,
                    FEATURE_ALL_DISABLED,
                ),
                tier_policy(
                    Tier::Private,
                    [Limited(5000), Limited(1000), Unlimited, Unlimited, Unlimited],
                    28,
                    FEATURE_ALL_ENABLED,
                ),
            ],
        }
    }

    /// Policy for a tier.
    pub fn get(&self, tier: Tier) -> &PlanPolicy {
        &self.plans[tier.index()]
    }

    /// Policy for a tier name. Unknown names yield `None`.
    pub fn lookup(&self, plan: &str) -> Option<&PlanPolicy> {
        Tier::parse(plan).map(|t| self.get(t))
    }

    /// `(tier, policy)` pairs, lowest tier first.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &PlanPolicy)> {
        Tier::ALL.into_iter().zip(self.plans.iter())
    }

    /// Replace one tier's policy, renamed to the tier. The table is not
    /// validated; call `validate` once every replacement is in.
    pub fn replace(mut self, tier: Tier, mut policy: PlanPolicy) -> Self {
        policy.name = tier.as_str().to_string();
        self.plans[tier.index()] = policy;
        self
    }

    /// `replace` followed by `validate`.
    pub fn with_override(self, tier: Tier, policy: PlanPolicy) -> Result<Self> {
        let catalog = self.replace(tier, policy);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Ceilings must be non-decreasing from free to private in every dimension
    /// (retention included), and only the top tier may be unlimited.
    pub fn validate(&self) -> Result<()> {
        for (tier, p) in self.iter() {
            if p.name != tier.as_str() {
                return Err(TenantGateError::BadRequest(format!(
                    "catalog entry for tier {tier} is named {}",
                    p.name
                )));
            }
            if tier != Tier::Private {
                let unlimited = QuotaKind::ALL.into_iter().find(|k| p.quota(*k).is_unlimited());
                if let Some(kind) = unlimited {
                    return Err(TenantGateError::BadRequest(format!(
                        "tier {tier}: {} may only be unlimited on the private tier",
                        kind.as_str()
                    )));
                }
            }
        }

        for pair in self.plans.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            for kind in QuotaKind::ALL {
                if lower.quota(kind) > upper.quota(kind) {
                    return Err(TenantGateError::BadRequest(format!(
                        "tier {} {} ({}) exceeds tier {} ({})",
                        lower.name,
                        kind.as_str(),
                        lower.quota(kind),
                        upper.name,
                        upper.quota(kind)
                    )));
                }
            }
            if lower.message_retention > upper.message_retention {
                return Err(TenantGateError::BadRequest(format!(
                    "tier {} retention exceeds tier {}",
                    lower.name, upper.name
                )));
            }
        }
        Ok(())
    }
}

/// Quotas are ordered topics, namespaces, producers, consumers, functions.
fn tier_policy(
    tier: Tier,
    quotas: [Quota; 5],
    retention_days: u32,
    feature_codes: &str,
) -> PlanPolicy {
    let [topics, namespaces, producers, consumers, functions] = quotas;
    PlanPolicy {
        name: tier.as_str().to_string(),
        num_of_topics: topics,
        num_of_namespaces: namespaces,
        message_retention: DAY * retention_days,
        num_of_producers: producers,
        num_of_consumers: consumers,
        functions,
        feature_codes: feature_codes.to_string(),
    }
}
