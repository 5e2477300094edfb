#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use slidekit_core::{
    CarouselConfig, CarouselController, Command, Input, NavKey, Point, RenderLog, RenderOp,
};
use web_time::{Duration, Instant};

#[derive(Debug, Arbitrary)]
struct Setup {
    slides: u8,
    is_rtl: bool,
    is_loop: bool,
    autoplay: bool,
    interval_ms: u16,
    threshold_pct: u8,
    speed_tenths: u8,
    min_ms: Option<u16>,
    max_ms: Option<u16>,
    ops: Vec<Op>,
}

#[derive(Debug, Arbitrary)]
enum Op {
    Down(i16, i16, u16),
    Move(i16, i16),
    Up(i16, i16),
    Cancel,
    Key(u8),
    Orientation,
    Resize(u16),
    ReducedMotion(bool),
    Paused(bool),
    Visible(bool),
    GoLeft,
    GoRight,
    GoTo(i32),
    TogglePlay,
    ToggleMaximized,
    SlideCount(u8),
    Wait(u16),
}

fn point(x: i16, y: i16) -> Point {
    Point::new(f32::from(x), f32::from(y))
}

fn input(op: &Op) -> Option<Input> {
    Some(match *op {
        Op::Down(x, y, width) => Input::PointerDown {
            at: point(x, y),
            container_width_px: f32::from(width),
        },
        Op::Move(x, y) => Input::PointerMove { at: point(x, y) },
        Op::Up(x, y) => Input::PointerUp { at: point(x, y) },
        Op::Cancel => Input::PointerCancel,
        Op::Key(k) => Input::Key {
            key: match k % 3 {
                0 => NavKey::ArrowLeft,
                1 => NavKey::ArrowRight,
                _ => NavKey::Escape,
            },
        },
        Op::Orientation => Input::OrientationChange,
        Op::Resize(width) => Input::Resize {
            container_width_px: f32::from(width),
        },
        Op::ReducedMotion(enabled) => Input::ReducedMotion { enabled },
        Op::Paused(paused) => Input::AutoplayPaused { paused },
        Op::Visible(visible) => Input::Visibility { visible },
        Op::GoLeft => Command::GoLeft.into(),
        Op::GoRight => Command::GoRight.into(),
        Op::GoTo(index) => Command::GoToIndex {
            index: index as isize,
        }
        .into(),
        Op::TogglePlay => Command::TogglePlay.into(),
        Op::ToggleMaximized => Command::ToggleMaximized.into(),
        Op::SlideCount(_) | Op::Wait(_) => return None,
    })
}

fuzz_target!(|setup: Setup| {
    let config = CarouselConfig {
        is_rtl: setup.is_rtl,
        is_loop: setup.is_loop,
        autoplay: setup.autoplay,
        autoplay_interval_ms: u64::from(setup.interval_ms),
        swipe_threshold: f32::from(setup.threshold_pct) / 255.0,
        transition_speed: f32::from(setup.speed_tenths) / 10.0,
        transition_duration_min_ms: setup.min_ms.map(u64::from),
        transition_duration_max_ms: setup.max_ms.map(u64::from),
        ..Default::default()
    };
    let max = config.transition_duration_max();

    // Invalid configurations and empty collections must be rejected, not panic.
    let Ok(mut carousel) =
        CarouselController::new(config, usize::from(setup.slides), 300.0, RenderLog::new())
    else {
        return;
    };

    let mut now = Instant::now();
    carousel.start(now);
    for op in setup.ops.iter().take(512) {
        match *op {
            Op::Wait(ms) => {
                now += Duration::from_millis(u64::from(ms));
                carousel.poll(now);
            }
            Op::SlideCount(n) => {
                let _ = carousel.set_slide_count(usize::from(n));
            }
            _ => {
                if let Some(input) = input(op) {
                    carousel.handle(input, now);
                }
            }
        }

        let state = carousel.state();
        assert!(state.current_index < state.slide_count, "index out of range");
        assert!(
            state.is_dragging || state.visual_offset_px == 0.0,
            "offset left behind after drag"
        );
        if state.is_playing {
            assert!(carousel.autoplay().suppression().is_empty());
        }
        for op in carousel.sink_mut().drain() {
            if let (RenderOp::Duration(d), Some(max)) = (op, max) {
                assert!(d <= max, "duration above max");
            }
        }
    }
});
