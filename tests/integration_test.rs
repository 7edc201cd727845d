//! Integration tests for run_analysis
//!
//! These tests drive the whole pipeline end to end from a manifest of dump
//! files in a temporary directory: parsing, decoding, classification,
//! aggregation, pairing, and export.

use std::io::Write;
use std::path::{Path, PathBuf};

use fabric_status::{run_analysis, Config, ExportFormat, LogFormat, LogLevel};
use tempfile::TempDir;

/// Helper to write one dump file into the test directory
fn write_dump(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create dump file");
    file.write_all(content.as_bytes()).expect("Failed to write dump");
    path
}

/// Helper to write the bundle manifest
fn write_manifest(dir: &Path, lines: &[String]) -> PathBuf {
    let path = dir.join("bundle.txt");
    let mut file = std::fs::File::create(&path).expect("Failed to create manifest");
    writeln!(file, "# test bundle").expect("Failed to write manifest");
    for line in lines {
        writeln!(file, "{}", line).expect("Failed to write manifest");
    }
    path
}

fn create_test_config(manifest: PathBuf) -> Config {
    Config {
        manifest,
        log_level: LogLevel::Error, // Reduce noise in tests
        log_format: LogFormat::Plain,
        max_workers: 4,
        ..Default::default()
    }
}

fn switch_dump(name: &str, wwn_octet: &str, device_hosts: &[(&str, &str)]) -> String {
    let mut dump = format!(
        "** SS CMD START ** switchshow\n\
         switchName: {name}\n\
         switchType: 162.0\n\
         switchMode: Native (Interop Mode 0)\n\
         switchWwn: 10:00:00:05:1e:00:00:{wwn_octet}\n"
    );
    for (i, _) in device_hosts.iter().enumerate() {
        dump.push_str(&format!(
            "  {i}    {i}   01{i:02x}00   id    N32   Online      FC  F-Port  10:00:00:10:9b:{wwn_octet}:00:{i:02x}\n"
        ));
    }
    dump.push_str("** SS CMD END **\n** SS CMD START ** nsshow\n");
    for (i, (host, os)) in device_hosts.iter().enumerate() {
        dump.push_str(&format!(
            " N    01{i:02x}00;      3;10:00:00:10:9b:{wwn_octet}:00:{i:02x};20:00:00:10:9b:{wwn_octet}:00:{i:02x}; na\n\
             \x20   PortSymb: [60] \"Emulex LPe32002-M2 FV12.8.351.47 DV14.0.326.12 HN:{host} OS:{os}\"\n"
        ));
    }
    dump.push_str("** SS CMD END **\n");
    dump
}

#[tokio::test]
async fn test_two_plane_fabric_end_to_end() {
    let dir = TempDir::new().unwrap();
    // Two redundant planes whose switches share most connected hosts
    let hosts_a: Vec<(&str, &str)> = vec![
        ("esx-01", "VMware"),
        ("esx-02", "VMware"),
        ("esx-03", "VMware"),
        ("ora-01", "Linux"),
    ];
    let hosts_b: Vec<(&str, &str)> = vec![
        ("esx-01", "VMware"),
        ("esx-02", "VMware"),
        ("esx-03", "VMware"),
        ("ora-02", "Linux"),
    ];
    let a = write_dump(dir.path(), "sw_a1.txt", &switch_dump("SW_PROD_A1", "01", &hosts_a));
    let b = write_dump(dir.path(), "sw_b1.txt", &switch_dump("SW_PROD_B1", "02", &hosts_b));
    let manifest = write_manifest(
        dir.path(),
        &[
            format!("PROD,A,{}", a.display()),
            format!("PROD,B,{}", b.display()),
        ],
    );

    let report = run_analysis(create_test_config(manifest)).await.unwrap();

    assert_eq!(report.fabric_count, 1);
    assert_eq!(report.switches_parsed, 2);
    assert_eq!(report.switches_skipped, 0);
    assert_eq!(report.ports.len(), 8);
    assert_eq!(report.devices.len(), 8);
    assert!(report.devices.iter().all(|d| d.device_class == "SRV"));

    // 3 of 4 hosts shared: device-overlap pairing in both directions
    assert_eq!(report.pairs.len(), 2);
    for pair in &report.pairs {
        assert!(pair.partner_wwn.is_some(), "{} unpaired", pair.switch_name);
        assert_eq!(
            pair.pairing_type.map(|t| t.as_str()),
            Some("device-overlap")
        );
        assert!((pair.confidence.unwrap() - 0.75).abs() < 1e-9);
    }
    let audit = &report.discrepancies.pairing_audits[0];
    assert_eq!(audit.ok, 2);
    assert_eq!(audit.absent, 0);
    assert_eq!(audit.duplicated, 0);
}

#[tokio::test]
async fn test_absent_mandatory_section_degrades_not_aborts() {
    let dir = TempDir::new().unwrap();
    // No nsshow at all: the switch still contributes its ports
    let text = "** SS CMD START ** switchshow\n\
                switchName: SW_LONE_A1\n\
                switchType: 118.0\n\
                switchWwn: 10:00:00:05:1e:00:00:09\n\
                  0    0   030000   id    N16   Online      FC  F-Port  10:00:00:10:9b:09:00:00\n\
                ** SS CMD END **\n\
                ** SS CMD START ** fabricshow\n\
                  1: fffc01 10:00:00:05:1e:00:00:09 10.1.1.1        0.0.0.0        >\"SW_LONE_A1\"\n\
                ** SS CMD END **\n";
    let path = write_dump(dir.path(), "sw_lone.txt", text);
    let manifest = write_manifest(dir.path(), &[format!("SOLO,A,{}", path.display())]);

    let report = run_analysis(create_test_config(manifest)).await.unwrap();

    assert_eq!(report.switches_parsed, 1);
    // Sections after the absent nsshow were still parsed
    assert_eq!(report.ports.len(), 1);
    assert_eq!(
        report.discrepancies.missing_sections.len(),
        1,
        "nsshow absence must be reported"
    );
    assert_eq!(report.discrepancies.missing_sections[0].section, "nsshow");
}

#[tokio::test]
async fn test_unreadable_dump_is_isolated() {
    let dir = TempDir::new().unwrap();
    let good = write_dump(
        dir.path(),
        "sw_good.txt",
        &switch_dump("SW_MIX_A1", "11", &[("host-1", "Linux")]),
    );
    let manifest = write_manifest(
        dir.path(),
        &[
            format!("MIX,A,{}", good.display()),
            format!("MIX,B,{}/missing.txt", dir.path().display()),
        ],
    );

    let report = run_analysis(create_test_config(manifest)).await.unwrap();

    assert_eq!(report.switches_parsed, 1);
    assert_eq!(report.switches_skipped, 1);
    assert_eq!(report.discrepancies.skipped_switches.len(), 1);
    assert_eq!(
        report.discrepancies.skipped_switches[0].reason,
        "Dump file unreadable"
    );
}

#[tokio::test]
async fn test_all_dumps_unreadable_is_fatal() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(
        dir.path(),
        &[format!("NONE,A,{}/missing.txt", dir.path().display())],
    );
    let result = run_analysis(create_test_config(manifest)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_missing_manifest_is_fatal() {
    let config = create_test_config(PathBuf::from("/nonexistent/bundle.txt"));
    assert!(run_analysis(config).await.is_err());
}

#[tokio::test]
async fn test_export_csv_tables() {
    let dir = TempDir::new().unwrap();
    let a = write_dump(
        dir.path(),
        "sw_a1.txt",
        &switch_dump("SW_EXP_A1", "21", &[("host-1", "Linux")]),
    );
    let manifest = write_manifest(dir.path(), &[format!("EXP,A,{}", a.display())]);
    let export_dir = dir.path().join("out");

    let mut config = create_test_config(manifest);
    config.export_dir = Some(export_dir.clone());
    config.export_format = ExportFormat::Csv;

    run_analysis(config).await.unwrap();

    for table in ["ports", "connected_devices", "isl_links", "switch_pairs"] {
        let path = export_dir.join(format!("{}.csv", table));
        assert!(path.exists(), "missing export {}", path.display());
    }
    let devices = std::fs::read_to_string(export_dir.join("connected_devices.csv")).unwrap();
    assert!(devices.contains("host-1"));
    assert!(devices.contains("EXP"));
}

#[tokio::test]
async fn test_undecoded_descriptors_reach_the_report() {
    let dir = TempDir::new().unwrap();
    let text = "** SS CMD START ** switchshow\n\
                switchName: SW_ODD_A1\n\
                switchWwn: 10:00:00:05:1e:00:00:31\n\
                  0    0   040000   id    N16   Online      FC  F-Port  10:00:00:de:ad:00:00:01\n\
                ** SS CMD END **\n\
                ** SS CMD START ** nsshow\n\
                 N    040000;      3;10:00:00:de:ad:00:00:01;20:00:00:de:ad:00:00:01; na\n\
                \x20   NodeSymb: [22] \"completely novel vendor\"\n\
                ** SS CMD END **\n";
    let path = write_dump(dir.path(), "sw_odd.txt", text);
    let manifest = write_manifest(dir.path(), &[format!("ODD,A,{}", path.display())]);

    let report = run_analysis(create_test_config(manifest)).await.unwrap();

    assert_eq!(report.discrepancies.undecoded_descriptors.len(), 1);
    let entry = &report.discrepancies.undecoded_descriptors[0];
    assert_eq!(entry.config_id, "sw_odd");
    assert_eq!(entry.node_symb, "completely novel vendor");
    // The device still classifies (UNKNOWN, not dropped)
    assert_eq!(report.devices.len(), 1);
    assert_eq!(report.devices[0].device_class, "UNKNOWN");
}
