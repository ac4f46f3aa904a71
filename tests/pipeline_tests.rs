//! Pipeline and CLI integration tests.
//!
//! These tests exercise the full load → assemble → gate → report pipeline,
//! error handling paths, and CLI command handlers with real fixture files.

use scan_history::config::{AppConfig, BehaviorConfig, OutputConfig, SummarizeConfig, TrendConfig};
use scan_history::gate::{evaluate, GateFailure};
use scan_history::pipeline::{
    assemble, exit_codes, load_report, output_history_report, trend, write_output, AnalysisKind,
    OutputTarget,
};
use scan_history::reports::{create_reporter_with_options, ReportConfig, ReportFormat};
use scan_history::{HistoryError, ScaState, SeverityLevel};
use std::path::{Path, PathBuf};

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn static_history() -> scan_history::ScanHistory {
    let current = load_report(&fixture_path("static_current.json")).expect("load current");
    let previous = load_report(&fixture_path("static_previous.json")).expect("load previous");
    assemble(&current, Some(&previous)).expect("assemble should succeed")
}

// ============================================================================
// Load Stage Tests
// ============================================================================

mod load_stage {
    use super::*;

    #[test]
    fn load_static_fixture() {
        let report = load_report(&fixture_path("static_current.json")).expect("load");
        assert_eq!(report.build_id, "5569987");
        assert_eq!(report.analysis, AnalysisKind::Static);
        assert_eq!(report.flaws_count.len(), 6);
        assert!(report.sca.is_some());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_report(&fixture_path("does-not-exist.json")).unwrap_err();
        assert!(matches!(err, HistoryError::Io { path: Some(_), .. }));
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn load_malformed_fixture_is_parse_error() {
        let err = load_report(&fixture_path("malformed.json")).unwrap_err();
        match err {
            HistoryError::Parse { context, .. } => {
                assert!(context.contains("malformed.json"), "context was {context}");
            }
            other => panic!("Expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn short_severity_array_is_rejected() {
        let report = load_report(&fixture_path("short_array.json")).expect("load");
        let err = assemble(&report, None).unwrap_err();
        assert!(matches!(
            err,
            HistoryError::ArrayLength {
                expected: 6,
                actual: 5,
                ..
            }
        ));
        assert!(err.is_invalid_argument());
    }
}

// ============================================================================
// Assemble Stage Tests
// ============================================================================

mod assemble_stage {
    use super::*;

    #[test]
    fn static_deltas_against_previous() {
        let history = static_history();

        assert_eq!(history.build_id(), "5569987");
        assert_eq!(history.total_flaws_count(), 30);
        assert_eq!(history.net_change(3).unwrap(), 3);
        assert_eq!(history.net_change(4).unwrap(), -1);
        assert_eq!(history.new_flaws(4).unwrap(), 0);
        assert_eq!(history.total_new_flaws_count(), 4);
        assert_eq!(history.total_net_change_count(), 3);
        assert_eq!(history.policy_affection(5).unwrap(), 1);
        assert!(history.is_mitigated_at(SeverityLevel::Medium));
        assert_eq!(history.flaws_count_history().len(), 3);
        assert!(history.has_flaws_count_history());
    }

    #[test]
    fn static_sca_block() {
        let history = static_history();
        let sca = history.sca_history().unwrap().expect("sca present");

        assert_eq!(sca.state(), ScaState::Full);
        assert!((sca.max_cvss_score() - 9.8).abs() < f64::EPSILON);
        assert_eq!(sca.total_vul_count(), 8);
        assert_eq!(sca.total_new_vul_count(), 3);
        assert_eq!(sca.total_net_vul_count(), 2);

        let high = sca.count_by_severity(SeverityLevel::High).unwrap();
        assert!(high.is_mitigated());
        assert_eq!(high.net_count(), 0);

        let low = sca.count_by_ordinal(2).unwrap().unwrap();
        assert_eq!(low.net_count(), -1);
        assert_eq!(low.new_count(), 0);
    }

    #[test]
    fn components_deduplicated_and_marked_new() {
        let history = static_history();
        let sca = history.sca_history().unwrap().unwrap();
        let components = sca.sca_components();

        assert_eq!(components.len(), 3);
        let log4j = components
            .iter()
            .find(|c| c.name() == "log4j-core-2.14.1.jar")
            .unwrap();
        assert!(log4j.is_blacklisted(), "first occurrence wins");
        assert!(log4j.is_new());
        assert!(components
            .iter()
            .filter(|c| c.name() != "log4j-core-2.14.1.jar")
            .all(|c| !c.is_new()));
    }

    #[test]
    fn dynamic_fixture_has_no_sca() {
        let report = load_report(&fixture_path("dynamic.json")).expect("load");
        let history = assemble(&report, None).expect("assemble");

        assert!(history.is_dynamic());
        assert!(!history.has_sca_history());
        assert!(matches!(
            history.sca_history(),
            Err(HistoryError::ScaNotApplicable)
        ));
        assert_eq!(history.total_flaws_count(), 4);
        assert_eq!(history.total_new_flaws_count(), 4);
        assert!(history.has_flaws_count_history());
    }

    #[test]
    fn trend_across_fixtures() {
        let reports: Vec<_> = ["static_previous.json", "static_current.json", "dynamic.json"]
            .iter()
            .map(|name| load_report(&fixture_path(name)).expect("load"))
            .collect();
        let series = trend("Builds", &reports).expect("trend");

        assert_eq!(series.len(), 3);
        assert_eq!(
            series.points(),
            vec![
                ("2024-05-02".to_string(), 27),
                ("2024-05-16".to_string(), 30),
                ("5570110".to_string(), 4),
            ]
        );
    }
}

// ============================================================================
// Gate Tests
// ============================================================================

mod gate_stage {
    use super::*;

    #[test]
    fn strict_preset_fails_on_policy_first() {
        let history = static_history();
        let config = AppConfig::from_preset(scan_history::ConfigPreset::Strict);
        let verdict = evaluate(&history, &config.behavior);

        assert_eq!(verdict.exit_code(), exit_codes::POLICY_FAILED);
        assert_eq!(verdict.failures.len(), 3);
        assert_eq!(
            verdict.failures[2],
            GateFailure::BlacklistedComponents { count: 1 }
        );
    }

    #[test]
    fn max_new_flaws_allows_small_increase() {
        let history = static_history();
        let behavior = BehaviorConfig {
            max_new_flaws: Some(4),
            ..Default::default()
        };
        assert!(evaluate(&history, &behavior).passed());
    }
}

// ============================================================================
// Report & Output Tests
// ============================================================================

mod report_stage {
    use super::*;

    #[test]
    fn summary_report_mentions_key_figures() {
        let history = static_history();
        let reporter = create_reporter_with_options(ReportFormat::Summary, false);
        let report = reporter
            .generate_history_report(&history, &ReportConfig::with_history())
            .unwrap();

        assert!(report.contains("5569987"));
        assert!(report.contains("30 flaws, 4 new, net +3"));
        assert!(report.contains("log4j-core-2.14.1.jar (blacklisted, violates policy, new)"));
        assert!(report.contains("Vulnerability trend:"));
    }

    #[test]
    fn json_report_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("history.json");
        let output = OutputConfig {
            format: ReportFormat::Json,
            file: Some(out.clone()),
            no_color: true,
        };
        output_history_report(&static_history(), &output, &ReportConfig::default(), true)
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(value["history"]["build_id"], "5569987");
        assert_eq!(value["history"]["total_new_flaws_count"], 4);
        assert_eq!(value["history"]["outcome"]["sca_history"]["state"], "full");
    }

    #[test]
    fn write_output_reports_bad_path() {
        let target = OutputTarget::File(PathBuf::from("/nonexistent-dir/out.txt"));
        assert!(write_output("content", &target, true).is_err());
    }
}

// ============================================================================
// CLI Handler Tests
// ============================================================================

mod cli_handlers {
    use super::*;
    use scan_history::cli::{run_summarize, run_trend};

    fn json_output(dir: &Path, name: &str) -> OutputConfig {
        OutputConfig {
            format: ReportFormat::Json,
            file: Some(dir.join(name)),
            no_color: true,
        }
    }

    #[test]
    fn summarize_exit_code_follows_gate() {
        let dir = tempfile::tempdir().unwrap();
        let app = AppConfig::builder()
            .fail_on_blacklisted(true)
            .quiet(true)
            .build();
        let mut config = SummarizeConfig::from_app_config(
            fixture_path("static_current.json"),
            Some(fixture_path("static_previous.json")),
            app,
        );
        config.output = json_output(dir.path(), "summary.json");

        assert_eq!(
            run_summarize(config).unwrap(),
            exit_codes::BLACKLISTED_COMPONENTS
        );
        assert!(dir.path().join("summary.json").exists());
    }

    #[test]
    fn summarize_malformed_report_is_error() {
        let app = AppConfig::builder().quiet(true).build();
        let config =
            SummarizeConfig::from_app_config(fixture_path("malformed.json"), None, app);
        assert!(run_summarize(config).is_err());
    }

    #[test]
    fn trend_handler_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrendConfig {
            reports: vec![
                fixture_path("static_previous.json"),
                fixture_path("static_current.json"),
            ],
            label: "Static Analysis".to_string(),
            output: json_output(dir.path(), "trend.json"),
            quiet: true,
        };
        assert_eq!(run_trend(config).unwrap(), exit_codes::SUCCESS);
    }

    #[test]
    fn trend_handler_rejects_short_array() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrendConfig {
            reports: vec![
                fixture_path("static_previous.json"),
                fixture_path("short_array.json"),
            ],
            label: "Static Analysis".to_string(),
            output: json_output(dir.path(), "trend.json"),
            quiet: true,
        };
        assert!(run_trend(config).is_err());
        assert!(!dir.path().join("trend.json").exists());
    }
}
