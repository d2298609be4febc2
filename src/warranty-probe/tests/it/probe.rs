//! Library-level checks against file-backed sources.

use std::fs;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use warranty_core::Severity;
use warranty_probe::{
    AssetTarget, FileEntitlementSource, ProbeConfig, ProbeError, WarrantyProbe,
};

const DOC: &str = r#"[{
    "serviceTag": "7XK2LM2",
    "entitlements": [
        {"serviceLevelCode": "A", "entitlementType": "Active", "startDate": "2023-01-01", "endDate": "2024-06-11"},
        {"serviceLevelCode": "A", "entitlementType": "Active", "startDate": "2023-01-01", "endDate": "2024-06-06"}
    ]
}]"#;

fn probe_for(doc: &str, config: ProbeConfig) -> (TempDir, WarrantyProbe) {
    let tmp = TempDir::new().expect("create temp dir");
    let path = tmp.path().join("doc.json");
    fs::write(&path, doc).expect("write doc");
    let resolver = WarrantyProbe::snmp_resolver(&config);
    let probe = WarrantyProbe::new(
        config,
        Box::new(FileEntitlementSource::new(path)),
        Box::new(resolver),
    );
    (tmp, probe)
}

#[tokio::test]
async fn merged_code_keeps_latest_end() {
    let (_tmp, probe) = probe_for(DOC, ProbeConfig::default());
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    let verdict = probe.check("7XK2LM2", now).await.expect("check succeeds");
    assert_eq!(verdict.category_count, 1);
    assert_eq!(verdict.overall_severity, Severity::Critical);
    assert_eq!(verdict.next_expiry_days, Some(10));
}

#[tokio::test]
async fn unknown_tag_is_unknown_verdict() {
    let (_tmp, probe) = probe_for(
        r#"[{"serviceTag": "A"}, {"serviceTag": "B"}]"#,
        ProbeConfig {
            timeout: Duration::from_secs(1),
            ..ProbeConfig::default()
        },
    );
    let report = probe
        .run(&AssetTarget::ServiceTag("C".into()), Utc::now())
        .await;
    assert_eq!(report.verdict.overall_severity, Severity::Unknown);
    assert_eq!(report.verdict.exit_code(), 3);
}

#[tokio::test]
async fn check_errors_are_typed() {
    let (_tmp, probe) = probe_for("{}", ProbeConfig::default());
    let err = probe.check("A", Utc::now()).await.unwrap_err();
    assert!(matches!(err, ProbeError::Fetch { .. }));
}
