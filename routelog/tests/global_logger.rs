use routelog::{FileParams, Level};
use uuid::Uuid;

// The process-wide logger is shared by every test in this binary, so the
// whole lifecycle is exercised in one sequential test.
#[test]
fn test_global_lifecycle() {
    assert!(!routelog::global().is_active());
    assert!(routelog::deinit_logger().is_ok());

    // First record installs the default console writer.
    let status = routelog::info!("lazily installed");
    assert_eq!(status.code(), 0);
    assert!(routelog::global().is_active());
    assert_eq!(routelog::global().min_level(), Some(Level::Trace));

    let path = format!("/tmp/routelog_global_{}.log", Uuid::new_v4());
    routelog::init_logger(FileParams::new(&path).with_module_name("main")).unwrap();
    routelog::error!("written to {}", "file");
    routelog::deinit_logger().unwrap();
    assert!(!routelog::global().is_active());
    assert!(routelog::deinit_logger().is_ok());

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("[E]main:"));
    let re = regex::Regex::new(r":test_global_lifecycle:\d+:written to file\n$").unwrap();
    assert!(re.is_match(&content), "unexpected content {content:?}");
}
