use flowgate_core::mocks::{FailingFeed, ManualClock, StaticFeed};
use flowgate_core::{FeedLoader, SessionCfg, SessionContext};
use flowgate_core::record::ParamDefaults;
use std::time::Duration;

const FEED: &str = "\
Date,Flow Sensor,Client ID,Interval,Tariff
09/03/2024 12:30:00,2.5,esp32-client-7,5000,2000
";

fn session(clock: &ManualClock) -> SessionContext<ManualClock> {
    let cfg = SessionCfg {
        refresh_interval: Duration::from_secs(10),
        cache_ttl: Duration::from_secs(10),
    };
    SessionContext::new(clock.clone(), cfg, ParamDefaults::fallback())
}

#[test]
fn serves_cached_rows_within_ttl() {
    let clock = ManualClock::new();
    let mut session = session(&clock);
    let feed = StaticFeed::new(FEED);
    let mut loader = FeedLoader::new(feed.clone(), "feed.csv");

    assert_eq!(session.rows(&mut loader).expect("first load").len(), 1);
    clock.advance(Duration::from_secs(3));
    assert_eq!(session.rows(&mut loader).expect("cached").len(), 1);
    clock.advance(Duration::from_secs(3));
    let _ = session.rows(&mut loader).expect("still cached");

    assert_eq!(feed.fetches(), 1, "within TTL and interval: one fetch total");
}

#[test]
fn gate_elapse_forces_a_refetch() {
    let clock = ManualClock::new();
    let mut session = session(&clock);
    let feed = StaticFeed::new(FEED);
    let mut loader = FeedLoader::new(feed.clone(), "feed.csv");

    let _ = session.rows(&mut loader).expect("first load");
    clock.advance(Duration::from_secs(11));
    let _ = session.rows(&mut loader).expect("reload");
    assert_eq!(feed.fetches(), 2);
}

#[test]
fn ttl_expiry_forces_a_refetch_without_gate_elapse() {
    let clock = ManualClock::new();
    let cfg = SessionCfg {
        refresh_interval: Duration::from_secs(60),
        cache_ttl: Duration::from_secs(5),
    };
    let mut session = SessionContext::new(clock.clone(), cfg, ParamDefaults::fallback());
    let feed = StaticFeed::new(FEED);
    let mut loader = FeedLoader::new(feed.clone(), "feed.csv");

    let _ = session.rows(&mut loader).expect("first load");
    clock.advance(Duration::from_secs(6));
    let _ = session.rows(&mut loader).expect("reload");
    assert_eq!(feed.fetches(), 2, "whichever of gate/TTL expires first wins");
}

#[test]
fn defaults_track_the_cached_latest_row() {
    let clock = ManualClock::new();
    let mut session = session(&clock);
    let mut loader = FeedLoader::new(StaticFeed::new(FEED), "feed.csv");

    assert_eq!(session.defaults(), ParamDefaults::fallback(), "nothing cached yet");

    let _ = session.rows(&mut loader).expect("load");
    let d = session.defaults();
    assert_eq!(d.client_id, "esp32-client-7");
    assert_eq!(d.interval, 5000);
    assert_eq!(d.tariff, 2000);
}

#[test]
fn fetch_failure_propagates_and_next_call_retries() {
    let clock = ManualClock::new();
    let mut session = session(&clock);
    let mut loader = FeedLoader::new(FailingFeed, "feed.csv");

    let err = session.rows(&mut loader).expect_err("transport must fail");
    assert!(format!("{err:#}").contains("unreachable feed"));

    // No retry policy: the failure left nothing cached, the next call simply
    // tries again.
    assert_eq!(session.cached_len(), 0);
    let _ = session.rows(&mut loader).expect_err("still failing");
}

#[test]
fn empty_feed_keeps_fallback_defaults() {
    let clock = ManualClock::new();
    let mut session = session(&clock);
    let mut loader = FeedLoader::new(
        StaticFeed::new("Date,Flow Sensor,Client ID,Interval,Tariff\n"),
        "feed.csv",
    );

    assert!(session.rows(&mut loader).expect("empty feed parses").is_empty());
    assert_eq!(session.defaults(), ParamDefaults::fallback());
}
