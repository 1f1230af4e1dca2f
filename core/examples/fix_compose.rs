//! Example: Detect and fix port conflicts in a media-server stack.

use portfix_core::ConflictEngine;

const COMPOSE: &str = r#"services:
  jellyfin:
    image: jellyfin/jellyfin
    ports:
      - "8096:8096"
      - "7359:7359"
  plex:
    image: plexinc/pms-docker
    ports:
      - "32400:32400"
      - "8096:3005"
  emby:
    image: emby/embyserver
    ports:
      - "8096:8096"
      - "8920:8920"
"#;

fn main() {
    let outcome = ConflictEngine::new().fix(COMPOSE);

    println!("BEFORE:\n{}", COMPOSE);
    println!("AFTER:\n{}", outcome.fixed_content);

    let Some(report) = outcome.conflicts else {
        println!("No port conflicts.");
        return;
    };

    println!("Fixed {} conflict(s)", report.fixed_count);
    for conflict in &report.detailed_conflicts {
        println!("\n  Port {}:", conflict.port);
        println!(
            "    Affected services: {}",
            conflict.affected_services.join(", ")
        );
        println!("    Kept service: {}", conflict.kept_service);
        for change in &conflict.changes {
            println!("      - {}", change);
        }
    }
}
