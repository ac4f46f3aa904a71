//! Property-based tests for scan histories.
//!
//! Checks that derived totals, severity bounds and SCA de-duplication hold
//! across random inputs.

use proptest::prelude::*;
use scan_history::history::delta;
use scan_history::model::severity_array;
use scan_history::{FindingCounts, ScaComponent, ScaScanHistory, ScanHistory, SeverityLevel};
use std::collections::HashSet;

fn severity_counts() -> impl Strategy<Value = [i64; 6]> {
    prop::array::uniform6(-1000i64..1000)
}

fn history_with(net_change: [i64; 6]) -> ScanHistory {
    ScanHistory::builder()
        .policy("Policy", "Pass", "VL4")
        .net_change(net_change)
        .build()
        .expect("valid policy fields")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn totals_match_net_change(net in severity_counts()) {
        let history = history_with(net);
        let expected_net: i64 = net.iter().sum();
        let expected_new: i64 = net.iter().filter(|v| **v > 0).sum();

        prop_assert_eq!(history.total_net_change_count(), expected_net);
        prop_assert_eq!(history.total_new_flaws_count(), expected_new);
        prop_assert!(history.total_new_flaws_count() >= 0);
        prop_assert!(history.total_new_flaws_count() >= history.total_net_change_count());
    }

    #[test]
    fn totals_never_wrap(net in prop::array::uniform6(any::<i64>())) {
        let wide_net: i128 = net.iter().map(|&v| i128::from(v)).sum();
        let wide_new: i128 = net.iter().map(|&v| i128::from(v.max(0))).sum();
        let fits = i64::try_from(wide_net).is_ok() && i64::try_from(wide_new).is_ok();

        let result = ScanHistory::builder()
            .policy("Policy", "Pass", "VL4")
            .net_change(net)
            .build();
        match result {
            Ok(history) => {
                prop_assert!(fits);
                prop_assert_eq!(i128::from(history.total_net_change_count()), wide_net);
                prop_assert_eq!(i128::from(history.total_new_flaws_count()), wide_new);
            }
            Err(err) => {
                prop_assert!(!fits);
                prop_assert!(err.is_invalid_argument());
            }
        }
    }

    #[test]
    fn new_flaws_is_positive_part(net in severity_counts()) {
        let history = history_with(net);
        for (i, &value) in net.iter().enumerate() {
            let severity = i64::try_from(i).unwrap();
            prop_assert_eq!(history.new_flaws(severity).unwrap(), value.max(0));
            prop_assert_eq!(history.net_change(severity).unwrap(), value);
        }
    }

    #[test]
    fn severity_outside_range_is_rejected(severity in prop_oneof![i64::MIN..0i64, 6i64..i64::MAX]) {
        let history = history_with([0; 6]);
        prop_assert!(history.flaws_count(severity).is_err());
        prop_assert!(history.net_change(severity).is_err());
        prop_assert!(history.new_flaws(severity).is_err());
        prop_assert!(SeverityLevel::from_ordinal(severity).is_err());
    }

    #[test]
    fn net_change_restores_current(previous in severity_counts(), current in severity_counts()) {
        let net = delta::net_change(Some(&previous), &current).unwrap();
        for i in 0..6 {
            prop_assert_eq!(previous[i] + net[i], current[i]);
        }
    }

    #[test]
    fn severity_array_requires_six(values in prop::collection::vec(any::<i64>(), 0..12)) {
        let result = severity_array("flaws_count", &values);
        prop_assert_eq!(result.is_ok(), values.len() == 6);
    }

    #[test]
    fn first_finding_count_per_severity_wins(
        entries in prop::collection::vec((0usize..6, 0i64..100, -50i64..50), 0..20)
    ) {
        let counts: Vec<FindingCounts> = entries
            .iter()
            .map(|&(sev, count, net)| {
                FindingCounts::new(SeverityLevel::ALL[sev], count, net.max(0), net, false)
            })
            .collect();
        let sca = ScaScanHistory::full(0.0, 0, counts, Vec::new(), Vec::new()).unwrap();

        let mut seen = HashSet::new();
        let mut expected_total = 0;
        let mut expected_net = 0;
        for &(sev, count, net) in &entries {
            if seen.insert(sev) {
                expected_total += count;
                expected_net += net;
            }
        }
        prop_assert_eq!(sca.total_vul_count(), expected_total);
        prop_assert_eq!(sca.total_net_vul_count(), expected_net);
        prop_assert_eq!(sca.finding_counts().count(), seen.len());
    }

    #[test]
    fn components_deduplicate_by_name(names in prop::collection::vec("[a-d]{1,2}", 0..30)) {
        let components: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| ScaComponent::new(name.clone(), i % 2 == 0, false, false))
            .collect();
        let sca = ScaScanHistory::full(0.0, 0, Vec::<FindingCounts>::new(), components, Vec::new())
            .unwrap();

        let distinct: HashSet<_> = names.iter().collect();
        prop_assert_eq!(sca.component_count(), distinct.len());

        let mut copy = sca.sca_components();
        copy.clear();
        prop_assert_eq!(sca.sca_components().len(), distinct.len());
    }
}
