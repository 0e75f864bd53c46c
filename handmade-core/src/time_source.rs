pub trait TimeSource {
    fn time_ns(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for Box<T> {
    fn time_ns(&self) -> u64 {
        (**self).time_ns()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTiming {
    pub elapsed_ns: u64,
    pub ms_per_frame: f64,
    pub frames_per_second: f64,
}

/// Measures the time between successive frame boundaries.
#[derive(Debug, Default)]
pub struct FrameTimer {
    last_ns: Option<u64>,
    frames: u64,
}

impl FrameTimer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn start(&mut self, now_ns: u64) {
        self.last_ns = Some(now_ns);
    }

    /// Marks the end of a frame. Returns `None` for the first frame boundary seen.
    pub fn tick(&mut self, now_ns: u64) -> Option<FrameTiming> {
        let last_ns = self.last_ns.replace(now_ns)?;
        self.frames += 1;

        let elapsed_ns = now_ns.saturating_sub(last_ns);
        let frames_per_second = if elapsed_ns == 0 {
            f64::INFINITY
        } else {
            1e9 / elapsed_ns as f64
        };
        Some(FrameTiming {
            elapsed_ns,
            ms_per_frame: elapsed_ns as f64 / 1e6,
            frames_per_second,
        })
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Time still left in the current frame for a loop targeting `frames_per_second`.
    pub fn remaining_ns(&self, now_ns: u64, frames_per_second: u32) -> u64 {
        let frame_ns = 1_000_000_000 / frames_per_second.max(1) as u64;
        match self.last_ns {
            Some(last_ns) => frame_ns.saturating_sub(now_ns.saturating_sub(last_ns)),
            None => 0,
        }
    }
}

#[test]
fn test_frame_timer() {
    let mut timer = FrameTimer::new();
    assert_eq!(timer.tick(1_000_000), None);

    let timing = timer.tick(17_666_666).unwrap();
    assert_eq!(timing.elapsed_ns, 16_666_666);
    assert!((timing.frames_per_second - 60.0).abs() < 0.01);
    assert!((timing.ms_per_frame - 16.666666).abs() < 1e-6);
    assert_eq!(timer.frames(), 1);
}

#[test]
fn test_remaining_frame_time() {
    let mut timer = FrameTimer::new();
    assert_eq!(timer.remaining_ns(5, 60), 0);

    timer.start(0);
    assert_eq!(timer.remaining_ns(6_666_666, 60), 10_000_000);
    assert_eq!(timer.remaining_ns(40_000_000, 60), 0);
}
