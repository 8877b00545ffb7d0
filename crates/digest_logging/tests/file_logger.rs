use std::fs;

use digest_logging::{digest_debug, digest_info, digest_warn, initialize, LogDestination};
use log::LevelFilter;
use tempfile::TempDir;

#[test]
fn file_destination_receives_messages_at_or_above_level() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("digest.log");

    initialize(LogDestination::File(path.clone()), LevelFilter::Info);
    digest_info!("batch {} started", 1);
    digest_warn!("Failed to fetch category {}: {}", "sport", "timeout");
    digest_debug!("category={} articles={}", "news", 2);
    log::logger().flush();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("batch 1 started"), "{written}");
    assert!(written.contains("Failed to fetch category sport: timeout"), "{written}");
    assert!(!written.contains("category=news"), "{written}");
}
