//! Outbound report-configuration filtering
//!
//! Before a reporting configuration request is forwarded to the transport,
//! the owning cluster implementation may strike records for attributes the
//! device cannot actually report (a color-temperature-only controller
//! rejects CIE x/y configuration) or refuse the whole request (vendor
//! clusters that must never be bound). This is an allow/deny filter over
//! records, not a transform of values.

use zbquirk_model::AttributeId;

/// One record of a configure-reporting request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingRecord {
    pub attribute: AttributeId,
    pub min_interval: u16,
    pub max_interval: u16,
    pub reportable_change: u32,
}

/// Per-cluster policy applied to outbound reporting configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportingPolicy {
    /// Forward every record unchanged
    Forward,
    /// Strike records whose attribute is on the denylist
    Denylist(Vec<AttributeId>),
    /// Answer locally; nothing reaches the transport
    SuppressAll,
}

impl ReportingPolicy {
    pub fn filter(&self, records: Vec<ReportingRecord>) -> Vec<ReportingRecord> {
        match self {
            ReportingPolicy::Forward => records,
            ReportingPolicy::Denylist(denied) => {
                let (kept, struck): (Vec<_>, Vec<_>) = records
                    .into_iter()
                    .partition(|r| !denied.contains(&r.attribute));
                for record in &struck {
                    tracing::debug!(attribute = %record.attribute, "reporting record struck");
                }
                kept
            }
            ReportingPolicy::SuppressAll => {
                tracing::debug!("reporting configuration suppressed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(attribute: u16) -> ReportingRecord {
        ReportingRecord {
            attribute: AttributeId(attribute),
            min_interval: 0,
            max_interval: 300,
            reportable_change: 1,
        }
    }

    #[test]
    fn test_denylist_strikes_only_listed() {
        let policy = ReportingPolicy::Denylist(vec![AttributeId(0x0003), AttributeId(0x0004)]);
        let filtered = policy.filter(vec![record(0x0003), record(0x0007), record(0x0004)]);
        assert_eq!(filtered, vec![record(0x0007)]);
    }

    #[test]
    fn test_suppress_all_returns_empty() {
        let policy = ReportingPolicy::SuppressAll;
        assert!(policy.filter(vec![record(0x0000)]).is_empty());
    }

    #[test]
    fn test_forward_is_identity() {
        let records = vec![record(1), record(2)];
        assert_eq!(ReportingPolicy::Forward.filter(records.clone()), records);
    }
}
