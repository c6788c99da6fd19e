#![no_main]

use libfuzzer_sys::fuzz_target;
use repolens_git::{parse_log_output, parse_status_output};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    let commits = parse_log_output(&text);
    assert!(commits.len() <= text.lines().count());

    let lines = parse_status_output(&text);
    assert_eq!(lines.len(), text.lines().count());
});
