#![cfg(feature = "tracing")]

//! Log target and level checks.
//!
//! Captures every event emitted while driving a controller and verifies the
//! `slidekit.*` targets and level policy: commits and rollbacks at DEBUG,
//! timer fires at TRACE, refused toggles at WARN.
//!
//! Run:
//!   cargo test -p slidekit-core --features tracing --test tracing_targets

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use slidekit_core::*;
use tracing_subscriber::layer::SubscriberExt;
use web_time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> Option<&str> {
        self.fields.get("message").map(String::as_str)
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn capture(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: events.clone(),
    });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

#[test]
fn every_event_uses_a_slidekit_target() {
    let events = capture(|| {
        let t = Instant::now();
        let config = CarouselConfig {
            autoplay: true,
            autoplay_interval_ms: 500,
            ..Default::default()
        };
        let mut carousel = CarouselController::new(config, 4, 300.0, RenderLog::new()).unwrap();
        carousel.start(t);
        carousel.poll(t + Duration::from_millis(500));
        carousel.handle(Command::GoRight.into(), t + Duration::from_millis(600));
        carousel.handle(
            Input::PointerDown {
                at: Point::new(0.0, 0.0),
                container_width_px: 300.0,
            },
            t + Duration::from_secs(1),
        );
        carousel.handle(Input::PointerUp { at: Point::new(-5.0, 0.0) }, t + Duration::from_secs(1));
        carousel.dispose();
    });

    assert!(!events.is_empty());
    for event in &events {
        assert!(
            event.target.starts_with("slidekit."),
            "unexpected target {}",
            event.target
        );
    }
}

#[test]
fn commits_log_at_debug_with_indices() {
    let events = capture(|| {
        let t = Instant::now();
        let mut carousel =
            CarouselController::new(CarouselConfig::default(), 3, 300.0, RenderLog::new())
                .unwrap();
        carousel.start(t);
        carousel.go_right(t);
    });

    let commit = events
        .iter()
        .find(|e| e.message() == Some("index committed"))
        .expect("commit event");
    assert_eq!(commit.level, tracing::Level::DEBUG);
    assert_eq!(commit.target, "slidekit.controller");
    assert_eq!(commit.fields.get("from").map(String::as_str), Some("0"));
    assert_eq!(commit.fields.get("to").map(String::as_str), Some("1"));
    assert!(commit.fields.contains_key("duration_ms"));
}

#[test]
fn refused_toggle_warns() {
    let events = capture(|| {
        let t = Instant::now();
        let config = CarouselConfig {
            autoplay: true,
            prefers_reduced_motion: true,
            ..Default::default()
        };
        let mut carousel = CarouselController::new(config, 3, 300.0, RenderLog::new()).unwrap();
        carousel.start(t);
        carousel.toggle_play(t);
    });

    let refused: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(refused.len(), 1);
    assert_eq!(refused[0].target, "slidekit.autoplay");
    assert_eq!(refused[0].fields.get("suppressed").map(String::as_str), Some("2"));
}

#[test]
fn timer_fires_log_at_trace() {
    let events = capture(|| {
        let t = Instant::now();
        let config = CarouselConfig {
            autoplay: true,
            autoplay_interval_ms: 100,
            ..Default::default()
        };
        let mut carousel = CarouselController::new(config, 3, 300.0, RenderLog::new()).unwrap();
        carousel.start(t);
        carousel.poll(t + Duration::from_millis(100));
    });

    assert!(events.iter().any(|e| e.level == tracing::Level::TRACE
        && e.target == "slidekit.autoplay"
        && e.message() == Some("autoplay tick")));
}
