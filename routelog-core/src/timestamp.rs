use std::fmt;

use chrono::Local;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local wall-clock time, formatted lazily.
pub fn now() -> impl fmt::Display {
    Local::now().format(TIMESTAMP_FORMAT)
}

/// Line written by every writer once its destination is open.
pub fn banner() -> String {
    format!("\n----- Logging Started on {} -----\n", now())
}

#[test]
fn test_banner_shape() {
    let re = regex::Regex::new(
        r"^\n----- Logging Started on \d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} -----\n$",
    )
    .unwrap();
    assert!(re.is_match(&banner()));
}
