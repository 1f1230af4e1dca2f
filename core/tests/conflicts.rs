//! End-to-end behaviour of the conflict engine on compose documents.

use std::collections::HashSet;

use portfix_core::scanner::scan;
use portfix_core::{detect_and_fix_port_conflicts, PortChange, UNKNOWN_SERVICE};

fn host_ports(content: &str) -> Vec<String> {
    scan(content).map(|m| m.host_port).collect()
}

#[test]
fn test_unique_ports_report_nothing() {
    let content = "\
services:
  service1:
    ports:
      - \"8080:8080\"
  service2:
    ports:
      - \"8081:8081\"";

    let outcome = detect_and_fix_port_conflicts(content);

    assert!(outcome.conflicts.is_none());
    assert_eq!(outcome.fixed_content, content);
}

#[test]
fn test_simple_conflict() {
    let content = "\
services:
  service1:
    ports:
      - \"8080:80\"
  service2:
    ports:
      - \"8080:80\"
";

    let outcome = detect_and_fix_port_conflicts(content);
    let report = outcome.conflicts.expect("conflict expected");

    assert_eq!(report.fixed_count, 1);
    assert_eq!(report.conflict_summaries.len(), 1);
    assert_eq!(
        report.conflict_summaries[0],
        "Port 8080 was used by: service1, service2\n  → Changed service2: 8080 → 8081"
    );

    let conflict = &report.detailed_conflicts[0];
    assert_eq!(conflict.port, "8080");
    assert_eq!(conflict.affected_services, vec!["service1", "service2"]);
    assert_eq!(conflict.kept_service, "service1");
    assert_eq!(
        conflict.changes,
        vec![PortChange::new("service2", "8080", "8081")]
    );

    assert_eq!(
        outcome.fixed_content,
        "\
services:
  service1:
    ports:
      - \"8080:80\"
  service2:
    ports:
      - \"8081:80\"
"
    );
}

#[test]
fn test_multiple_conflicting_ports() {
    let content = "\
services:
  service1:
    ports:
      - \"8080:8080\"
      - \"9090:9090\"
  service2:
    ports:
      - \"8080:8080\"
      - \"9090:9090\"";

    let outcome = detect_and_fix_port_conflicts(content);
    let report = outcome.conflicts.unwrap();

    assert_eq!(report.fixed_count, 2);
    assert_eq!(report.conflict_summaries.len(), 2);
    assert_eq!(report.detailed_conflicts[0].port, "8080");
    assert_eq!(report.detailed_conflicts[1].port, "9090");
    assert!(outcome.fixed_content.ends_with(
        "\
  service2:
    ports:
      - \"8081:8080\"
      - \"9091:9090\""
    ));
}

#[test]
fn test_three_services_share_a_port() {
    let content = "\
services:
  a:
    ports:
      - \"9000:80\"
  b:
    ports:
      - \"9000:80\"
  c:
    ports:
      - \"9000:80\"
";

    let outcome = detect_and_fix_port_conflicts(content);
    let report = outcome.conflicts.unwrap();

    assert_eq!(report.fixed_count, 2);
    assert!(report.conflict_summaries[0].starts_with("Port 9000 was used by: a, b, c"));
    assert_eq!(
        report.detailed_conflicts[0].changes,
        vec![
            PortChange::new("b", "9000", "9001"),
            PortChange::new("c", "9000", "9002"),
        ]
    );
    assert_eq!(host_ports(&outcome.fixed_content), vec!["9000", "9001", "9002"]);
}

#[test]
fn test_quoting_styles_are_preserved() {
    let content = "\
services:
  a:
    ports:
      - \"8080:8080\"
  b:
    ports:
      - '8080:8080'
  c:
    ports:
      - 8080:8080
";

    let outcome = detect_and_fix_port_conflicts(content);

    assert_eq!(outcome.fixed_count(), 2);
    assert_eq!(
        outcome.fixed_content,
        "\
services:
  a:
    ports:
      - \"8080:8080\"
  b:
    ports:
      - '8081:8080'
  c:
    ports:
      - 8082:8080
"
    );
}

#[test]
fn test_matching_container_ports_are_not_conflicts() {
    let content = "\
services:
  service1:
    ports:
      - \"8080:80\"
  service2:
    ports:
      - \"8081:80\"";

    let outcome = detect_and_fix_port_conflicts(content);
    assert!(outcome.conflicts.is_none());
    assert_eq!(outcome.fixed_content, content);
}

#[test]
fn test_service_with_multiple_ports() {
    let content = "\
services:
  service1:
    ports:
      - \"8080:8080\"
      - \"8081:8081\"
  service2:
    ports:
      - \"8082:8082\"
      - \"8081:443\"";

    let outcome = detect_and_fix_port_conflicts(content);
    let report = outcome.conflicts.unwrap();

    assert_eq!(report.fixed_count, 1);
    assert!(report.conflict_summaries[0].contains("Port 8081"));
    // 8082 belongs to service2 already.
    assert!(outcome.fixed_content.ends_with("- \"8083:443\""));
}

#[test]
fn test_reassignment_skips_ports_in_use_and_already_assigned() {
    // Service A holds 8080 and 8081; B collides on both.
    let content = "\
services:
  a:
    ports:
      - \"8080:80\"
      - \"8081:8081\"
  b:
    ports:
      - \"8080:80\"
      - \"8081:443\"
";

    let outcome = detect_and_fix_port_conflicts(content);
    let report = outcome.conflicts.unwrap();

    assert_eq!(
        report.detailed_conflicts[0].changes,
        vec![PortChange::new("b", "8080", "8082")]
    );
    assert_eq!(
        report.detailed_conflicts[1].changes,
        vec![PortChange::new("b", "8081", "8083")]
    );
    assert_eq!(
        host_ports(&outcome.fixed_content),
        vec!["8080", "8081", "8082", "8083"]
    );
}

#[test]
fn test_next_available_port_when_consecutive_taken() {
    let content = "\
services:
  service1:
    ports:
      - \"8080:8080\"
  service2:
    ports:
      - \"8081:8081\"
  service3:
    ports:
      - \"8080:80\"";

    let outcome = detect_and_fix_port_conflicts(content);

    assert!(outcome.conflicts.is_some());
    assert!(outcome.fixed_content.contains("\"8082:80\""));
    assert!(!outcome.fixed_content.contains("\"8081:80\""));
}

#[test]
fn test_comments_and_layout_survive() {
    let content = "\
# stack for local development
services:
  # Service 1 comment
  service1:
    image: nginx
    ports:
      - \"8080:80\"   # public

  # Service 2 comment
  service2:   # legacy
    image: httpd
    ports:
      - \"8080:80\"
volumes:
  data: {}
";

    let outcome = detect_and_fix_port_conflicts(content);

    assert_eq!(outcome.fixed_count(), 1);
    assert_eq!(
        outcome.fixed_content,
        content.replacen("      - \"8080:80\"\n", "      - \"8081:80\"\n", 1)
    );
}

#[test]
fn test_complex_compose_file() {
    let content = "\
services:
  web:
    image: nginx
    container_name: web
    environment:
      - NGINX_PORT=80
    ports:
      - \"80:80\"
      - \"443:443\"
  api:
    image: node:latest
    ports:
      - \"3000:3000\"
  database:
    image: postgres
    ports:
      - \"80:5432\"
    environment:
      - POSTGRES_PASSWORD=secret";

    let outcome = detect_and_fix_port_conflicts(content);
    let report = outcome.conflicts.unwrap();

    assert_eq!(report.detailed_conflicts.len(), 1);
    assert!(report.conflict_summaries[0].starts_with("Port 80 was used by: web, database"));
    assert!(outcome.fixed_content.contains("\"81:5432\""));
    assert!(outcome.fixed_content.contains("\"80:80\""));
}

#[test]
fn test_single_declaration_is_never_a_conflict() {
    let content = "\
services:
  web:
    ports:
      - \"8080:80\"
      - \"8080:443\"
";

    // Same service twice is not a conflict.
    let outcome = detect_and_fix_port_conflicts(content);
    assert!(outcome.conflicts.is_none());
    assert_eq!(outcome.fixed_content, content);
}

#[test]
fn test_no_services_header_detects_without_fixing() {
    let content = "\
ports:
  - \"8080:80\"
extra:
  - \"8080:80\"
";

    let outcome = detect_and_fix_port_conflicts(content);
    let report = outcome.conflicts.expect("conflict is still reported");

    assert_eq!(report.fixed_count, 0);
    let conflict = &report.detailed_conflicts[0];
    assert_eq!(conflict.affected_services, vec![UNKNOWN_SERVICE, UNKNOWN_SERVICE]);
    assert_eq!(conflict.kept_service, UNKNOWN_SERVICE);
    assert!(conflict.changes.is_empty());
    assert!(!conflict.is_resolved());
    assert_eq!(outcome.fixed_content, content);
}

#[test]
fn test_unknown_claimant_is_reported_but_not_rewritten() {
    let content = "\
services:
  web:
    ports:
      - \"8080:80\"
services:
    ports:
      - \"8080:80\"
";

    let outcome = detect_and_fix_port_conflicts(content);
    let report = outcome.conflicts.unwrap();

    assert_eq!(report.fixed_count, 0);
    assert_eq!(
        report.detailed_conflicts[0].affected_services,
        vec!["web", UNKNOWN_SERVICE]
    );
    assert_eq!(report.unresolved().count(), 1);
    assert_eq!(outcome.fixed_content, content);
}

#[test]
fn test_duplicate_occurrences_in_one_service_each_move() {
    let content = "\
services:
  a:
    ports:
      - \"8080:80\"
  b:
    ports:
      - \"8080:80\"
      - \"8080:443\"
";

    let outcome = detect_and_fix_port_conflicts(content);
    let report = outcome.conflicts.unwrap();

    assert_eq!(report.detailed_conflicts[0].affected_services, vec!["a", "b"]);
    assert_eq!(report.fixed_count, 2);
    assert_eq!(
        host_ports(&outcome.fixed_content),
        vec!["8080", "8081", "8082"]
    );
    assert!(detect_and_fix_port_conflicts(&outcome.fixed_content)
        .conflicts
        .is_none());
}

#[test]
fn test_keeper_is_first_in_document_order() {
    let content = "\
services:
  zeta:
    ports:
      - 5000:5000
  alpha:
    ports:
      - 5000:5000
";

    let report = detect_and_fix_port_conflicts(content).conflicts.unwrap();
    let conflict = &report.detailed_conflicts[0];

    assert_eq!(conflict.kept_service, "zeta");
    assert!(conflict.changes.iter().all(|c| c.service != "zeta"));
}

#[test]
fn test_crlf_documents() {
    let content = "services:\r\n  a:\r\n    ports:\r\n      - \"80:80\"\r\n  b:\r\n    ports:\r\n      - \"80:80\"\r\n";

    let outcome = detect_and_fix_port_conflicts(content);

    assert_eq!(outcome.fixed_count(), 1);
    assert_eq!(
        outcome.fixed_content,
        "services:\r\n  a:\r\n    ports:\r\n      - \"80:80\"\r\n  b:\r\n    ports:\r\n      - \"81:80\"\r\n"
    );
}

#[test]
fn test_fixed_documents_are_stable() {
    let documents = [
        "services:\n  a:\n    ports:\n      - 80:80\n  b:\n    ports:\n      - 80:80\n      - 81:81\n  c:\n    ports:\n      - 80:1\n      - 82:2\n",
        "services:\n  x:\n    ports:\n      - '7000:1'\n      - '7001:1'\n  y:\n    ports:\n      - '7001:2'\n      - '7000:2'\n",
    ];

    for content in documents {
        let outcome = detect_and_fix_port_conflicts(content);
        assert!(outcome.conflicts.is_some());

        // Every host port is now unique and a second pass has nothing to do.
        let ports = host_ports(&outcome.fixed_content);
        let unique: HashSet<_> = ports.iter().collect();
        assert_eq!(unique.len(), ports.len(), "duplicates in {:?}", ports);

        let again = detect_and_fix_port_conflicts(&outcome.fixed_content);
        assert!(again.conflicts.is_none());
        assert_eq!(again.fixed_content, outcome.fixed_content);
    }
}

#[test]
fn test_only_host_port_digits_change() {
    let content = "\
services:
  a:
    ports:
      - \"6000:6000/udp\" # metrics
  b:
    ports:
      - \"6000:6000/udp\" # metrics
";

    let outcome = detect_and_fix_port_conflicts(content);

    let before: Vec<_> = content.lines().collect();
    let after: Vec<_> = outcome.fixed_content.lines().collect();
    assert_eq!(before.len(), after.len());

    let differing: Vec<_> = before
        .iter()
        .zip(&after)
        .filter(|(b, a)| b != a)
        .collect();
    assert_eq!(differing.len(), 1);
    assert_eq!(*differing[0].1, "      - \"6001:6000/udp\" # metrics");
}
