use handmade_core::time_source::TimeSource;

use time::OffsetDateTime;

/// Wall-clock time, used to pace the frame loop.
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn time_ns(&self) -> u64 {
        (OffsetDateTime::now_utc() - OffsetDateTime::UNIX_EPOCH).whole_nanoseconds() as u64
    }
}

#[test]
fn test_time_moves_forward() {
    let source = SystemTimeSource;
    let first = source.time_ns();
    std::thread::sleep(std::time::Duration::from_millis(2));
    assert!(source.time_ns() >= first + 1_000_000);
}
