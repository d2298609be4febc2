//! End-to-end tests of the `check_warranty` binary using entitlement
//! files, so no network access is needed.

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use chrono::{Duration, Utc};
use predicates::prelude::*;
use predicates::str::{contains, starts_with};
use serde_json::{json, Value};
use tempfile::TempDir;

struct Fixture {
    _tmp: TempDir,
    path: PathBuf,
}

impl Fixture {
    /// Entitlements as `(code, description, kind, days from now)`.
    fn new(entitlements: &[(Option<&str>, Option<&str>, &str, i64)]) -> Self {
        let now = Utc::now();
        let items: Vec<Value> = entitlements
            .iter()
            .map(|(code, desc, kind, days)| {
                json!({
                    "serviceLevelCode": code,
                    "serviceLevelDescription": desc,
                    "serviceProvider": "DELL",
                    "entitlementType": kind,
                    "startDate": (now - Duration::days(1000)).to_rfc3339(),
                    "endDate": (now + Duration::days(*days)).to_rfc3339(),
                })
            })
            .collect();
        Self::raw(&json!([{ "serviceTag": "ABC1234", "invalid": false, "entitlements": items }]).to_string())
    }

    fn raw(doc: &str) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("entitlements.json");
        fs::write(&path, doc).expect("write entitlements");
        Self { _tmp: tmp, path }
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("check_warranty");
        cmd.env_remove("WARRANTY_API_KEY")
            .arg("--servicetag")
            .arg("ABC1234")
            .arg("--entitlements-file")
            .arg(&self.path);
        cmd
    }
}

fn two_contracts() -> Fixture {
    Fixture::new(&[
        (Some("PR"), Some("ProSupport"), "Active", 100),
        (Some("ND"), Some("Next Business Day"), "Active", 20),
    ])
}

#[test]
fn aggregate_critical() {
    two_contracts()
        .cmd()
        .assert()
        .code(2)
        .stdout("CRITICAL: 1 of 2 service contracts are expiring (Next: 20 days)\n");
}

#[test]
fn distant_ignores_nearer_contract() {
    two_contracts()
        .cmd()
        .arg("--distant")
        .assert()
        .code(0)
        .stdout("OK: Longest service contract ends in 100 days\n");
}

#[test]
fn warning_exit_code() {
    Fixture::new(&[(Some("ND"), Some("Next Business Day"), "Active", 60)])
        .cmd()
        .assert()
        .code(1)
        .stdout(starts_with("WARNING: 1 of 1 service contracts are expiring (Next: 60 days)"));
}

#[test]
fn renewals_merge_into_one_service_level() {
    Fixture::new(&[
        (Some("ND"), Some("Next Business Day"), "INITIAL", 10),
        (Some("ND"), Some("Next Business Day"), "EXTENDED", 400),
        (Some("ND"), Some("Next Business Day"), "Expired", 4000),
    ])
    .cmd()
    .assert()
    .code(0)
    .stdout("OK: 0 of 1 service contracts are expiring (Next: 400 days)\n");
}

#[test]
fn verbose_lists_levels_in_end_order() {
    let out = two_contracts()
        .cmd()
        .args(["--verbose", "--link"])
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).expect("utf8 output");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "CRITICAL: 'Next Business Day' support ends in 20 days");
    assert_eq!(lines[2], "OK: 'ProSupport' support ends in 100 days");
    assert!(lines[3].starts_with("<a href="));
    assert!(lines[3].contains("ABC1234"));
}

#[test]
fn anonymous_levels_get_generic_label() {
    Fixture::new(&[(None, None, "Active", 200), (None, None, "Active", 200)])
        .cmd()
        .arg("-v")
        .assert()
        .code(0)
        .stdout(contains("0 of 2 service contracts").and(contains("'Unnamed service level'")));
}

#[test]
fn all_lapsed_reports_no_next_expiry() {
    Fixture::new(&[(Some("ND"), Some("Next Business Day"), "Active", -40)])
        .cmd()
        .assert()
        .code(2)
        .stdout("CRITICAL: 1 of 1 service contracts are expiring (Next: none)\n");
}

#[test]
fn critical_above_warning_is_unknown() {
    two_contracts()
        .cmd()
        .args(["--warning", "30", "--critical", "90"])
        .assert()
        .code(3)
        .stdout(starts_with("UNKNOWN: Configuration error: ").and(contains("Invalid thresholds")));
}

#[test]
fn link_uses_configured_support_url() {
    two_contracts()
        .cmd()
        .args(["--link", "--support-url", "https://support.example.com/tag/"])
        .assert()
        .code(2)
        .stdout(contains(
            r#"<a href="https://support.example.com/tag/ABC1234" target="_blank">Support for ABC1234</a>"#,
        ));
}

#[test]
fn negative_threshold_is_unknown() {
    two_contracts()
        .cmd()
        .args(["-w", "-5"])
        .assert()
        .code(3)
        .stdout(starts_with("UNKNOWN: "));
}

#[test]
fn missing_target_is_unknown() {
    cargo_bin_cmd!("check_warranty")
        .assert()
        .code(3)
        .stdout(contains("Must supply either a hostname or a service tag"));
}

#[test]
fn malformed_date_fails_whole_check() {
    Fixture::raw(
        r#"[{"serviceTag": "ABC1234", "entitlements": [
            {"serviceLevelCode": "ND", "entitlementType": "Active", "startDate": "2020-01-01", "endDate": "2099-01-01"},
            {"serviceLevelCode": "PR", "entitlementType": "Active", "startDate": "2020-01-01", "endDate": "not a date"}
        ]}]"#,
    )
    .cmd()
    .assert()
    .code(3)
    .stdout(starts_with("UNKNOWN: Malformed entitlement record"));
}

#[test]
fn json_output_is_single_line() {
    let out = two_contracts()
        .cmd()
        .args(["--format", "json"])
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).expect("utf8 output");
    assert_eq!(text.lines().count(), 1);

    let v: Value = serde_json::from_str(&text).expect("valid json output");
    assert_eq!(v["asset_id"], "ABC1234");
    assert_eq!(v["verdict"]["overall_severity"], "CRITICAL");
    assert_eq!(v["verdict"]["category_count"], 2);
    assert_eq!(v["verdict"]["next_expiry_days"], 20);
}

#[test]
fn help_is_available() {
    cargo_bin_cmd!("check_warranty")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--servicetag").and(contains("--distant")));
}
