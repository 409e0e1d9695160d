//! Plan entitlements.
//!
//! Pure lookup, total over the plan enumeration; unknown or absent plans
//! resolve to the empty record. No I/O here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Trial,
    Basic,
    Silver,
    Gold,
    Diamond,
}

impl Plan {
    pub fn as_str(self) -> &'static str {
        match self {
            Plan::Trial => "trial",
            Plan::Basic => "basic",
            Plan::Silver => "silver",
            Plan::Gold => "gold",
            Plan::Diamond => "diamond",
        }
    }

    /// Lenient parse for stored/CLI plan ids. Unknown ids are `None`, which
    /// resolves to the empty entitlement record.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().to_ascii_lowercase().parse().ok()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone)]
#[error("plan id `{raw}` is invalid")]
pub struct InvalidPlan {
    pub raw: String,
}

impl FromStr for Plan {
    type Err = InvalidPlan;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial" => Ok(Plan::Trial),
            "basic" => Ok(Plan::Basic),
            "silver" => Ok(Plan::Silver),
            "gold" => Ok(Plan::Gold),
            "diamond" => Ok(Plan::Diamond),
            _ => Err(InvalidPlan { raw: s.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Community {
    #[default]
    None,
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTier {
    #[default]
    Basic,
    Images,
    Advanced,
    Full,
}

/// Capability record unlocked by a plan tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub watermark: bool,
    pub community: Community,
    pub export: ExportTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<bool>,
}

/// Table-driven resolution. `None` (absent/unknown plan) yields the empty
/// record: watermark off, no community, basic export.
pub fn resolve(plan: Option<Plan>) -> Entitlement {
    match plan {
        Some(Plan::Trial) => Entitlement {
            watermark: true,
            community: Community::None,
            export: ExportTier::Basic,
            whitelist: None,
        },
        Some(Plan::Basic) => Entitlement {
            watermark: true,
            community: Community::Read,
            export: ExportTier::Images,
            whitelist: None,
        },
        Some(Plan::Silver) => Entitlement {
            watermark: false,
            community: Community::Read,
            export: ExportTier::Advanced,
            whitelist: None,
        },
        Some(Plan::Gold) => Entitlement {
            watermark: false,
            community: Community::Write,
            export: ExportTier::Advanced,
            whitelist: None,
        },
        Some(Plan::Diamond) => Entitlement {
            watermark: false,
            community: Community::Write,
            export: ExportTier::Full,
            whitelist: Some(true),
        },
        None => Entitlement::default(),
    }
}

/// Resolve a raw plan id as stored under `grid.plan`.
pub fn resolve_str(raw: &str) -> Entitlement {
    resolve(Plan::parse(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diamond_unlocks_everything() {
        let e = resolve_str("diamond");
        assert!(!e.watermark);
        assert_eq!(e.community, Community::Write);
        assert_eq!(e.export, ExportTier::Full);
        assert_eq!(e.whitelist, Some(true));
    }

    #[test]
    fn unknown_plan_resolves_to_empty_record() {
        assert_eq!(resolve_str("unknown_plan"), Entitlement::default());
        assert_eq!(resolve(None), Entitlement::default());
    }

    #[test]
    fn trial_is_watermarked_with_basic_export() {
        let e = resolve_str("trial");
        assert!(e.watermark);
        assert_eq!(e.community, Community::None);
        assert_eq!(e.export, ExportTier::Basic);
        assert_eq!(e.whitelist, None);
    }

    #[test]
    fn parse_is_case_and_whitespace_tolerant() {
        assert_eq!(Plan::parse("  Gold "), Some(Plan::Gold));
        assert_eq!(Plan::parse("platinum"), None);
    }
}
