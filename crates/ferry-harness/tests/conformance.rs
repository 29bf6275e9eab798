//! The full suite against the bundled counterparty.

use ferry_bridge::Bridge;
use ferry_harness::{fixture_surface, outstanding_buffers, run_cases, standard_cases};

#[test]
fn every_case_passes_and_no_buffer_leaks() {
    let baseline = outstanding_buffers();
    let bridge = Bridge::new(fixture_surface());
    let cases = standard_cases();
    let mut progress = Vec::new();

    let report = run_cases(&bridge, &cases, &mut progress).unwrap();

    assert!(report.all_passed(), "{report}");
    assert_eq!(report.summary.total, 20);
    assert_eq!(outstanding_buffers(), baseline);

    let text = String::from_utf8(progress).unwrap();
    assert_eq!(text.lines().count(), 20);
    assert!(text.starts_with("Running bool...  Passed\n"));
    assert!(text.ends_with("Running fallible-overflow...  Passed\n"));

    let json = report.to_json();
    assert_eq!(json["summary"]["passed"], 20);
    assert_eq!(json["cases"][19]["name"], "fallible-overflow");
}
