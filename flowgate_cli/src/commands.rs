//! Command implementations: config mapping, transport assembly, dispatch.

use crate::cli::ValveArg;
use eyre::WrapErr;
use flowgate_config::Config;
use flowgate_core::{
    CommandDispatcher, ControlEvent, Dashboard, FeedLoader, SessionCfg, SessionContext, Snapshot,
    Topics, ValveState, params_payload,
};
use flowgate_net::{MqttPublisher, SimPublisher, transport_for};
use flowgate_traits::{FeedTransport, MonotonicClock, Publisher};
use std::time::Duration;

fn publisher_for(cfg: &Config, dry_run: bool) -> Box<dyn Publisher> {
    if dry_run {
        Box::new(SimPublisher::new())
    } else {
        Box::new(MqttPublisher::new(
            cfg.broker.host.clone(),
            cfg.broker.port,
            cfg.broker.client_id.clone(),
            Duration::from_millis(cfg.broker.publish_timeout_ms),
        ))
    }
}

fn session_and_loader(
    cfg: &Config,
) -> eyre::Result<(
    SessionContext<MonotonicClock>,
    FeedLoader<Box<dyn FeedTransport>>,
)> {
    let transport = transport_for(&cfg.feed.url).wrap_err("build feed transport")?;
    let session = SessionContext::new(
        MonotonicClock::new(),
        (&cfg.feed).into(),
        (&cfg.fallback).into(),
    );
    Ok((session, FeedLoader::new(transport, cfg.feed.url.clone())))
}

fn valve_state(arg: ValveArg) -> ValveState {
    match arg {
        ValveArg::On => ValveState::On,
        ValveArg::Off => ValveState::Off,
    }
}

pub fn run(
    cfg: &Config,
    refresh_secs: Option<u64>,
    iterations: Option<u64>,
    dry_run: bool,
    json: bool,
) -> eyre::Result<()> {
    let mut session_cfg: SessionCfg = (&cfg.feed).into();
    if let Some(secs) = refresh_secs {
        session_cfg.refresh_interval = Duration::from_secs(secs.max(1));
    }

    let transport = transport_for(&cfg.feed.url).wrap_err("build feed transport")?;
    let session = SessionContext::new(MonotonicClock::new(), session_cfg, (&cfg.fallback).into());
    let loader = FeedLoader::new(transport, cfg.feed.url.clone());
    let dispatcher = CommandDispatcher::new(publisher_for(cfg, dry_run), (&cfg.broker).into());
    let mut dashboard = Dashboard::new(session, loader, dispatcher);

    let (tx, rx) = crossbeam_channel::unbounded();
    ctrlc::set_handler(move || {
        let _ = tx.send(ControlEvent::Shutdown);
    })
    .wrap_err("install Ctrl-C handler")?;

    tracing::info!(
        source = %cfg.feed.url,
        refresh_secs = session_cfg.refresh_interval.as_secs(),
        dry_run,
        "dashboard starting"
    );
    dashboard.run(
        &rx,
        session_cfg.refresh_interval,
        iterations,
        &mut |snap| print_snapshot(snap, json),
    )
}

fn print_snapshot(snap: &Snapshot, json: bool) {
    if json {
        if let Ok(line) = serde_json::to_string(snap) {
            println!("{line}");
        }
        return;
    }
    match &snap.status {
        Some(status) => println!("{status}"),
        None => {
            let valve = snap
                .valve
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "rows={} client={} interval={} tariff={} valve={}",
                snap.rows,
                snap.defaults.client_id,
                snap.defaults.interval,
                snap.defaults.tariff,
                valve,
            );
        }
    }
}

pub fn fetch(cfg: &Config, limit: usize, json: bool) -> eyre::Result<()> {
    let (mut session, mut loader) = session_and_loader(cfg)?;
    let rows = session.rows(&mut loader)?;

    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
    } else {
        let start = rows.len().saturating_sub(limit);
        for r in &rows[start..] {
            println!(
                "{}  flow={} tariff={} total={} month={}",
                r.timestamp, r.flow, r.tariff, r.total_cost, r.month
            );
        }
    }

    let defaults = session.defaults();
    if !json {
        println!(
            "{} rows; defaults: client={} interval={} tariff={}",
            session.cached_len(),
            defaults.client_id,
            defaults.interval,
            defaults.tariff,
        );
    }
    Ok(())
}

pub fn valve(cfg: &Config, state: ValveArg, dry_run: bool) -> eyre::Result<()> {
    let mut dispatcher =
        CommandDispatcher::new(publisher_for(cfg, dry_run), Topics::from(&cfg.broker));
    let state = valve_state(state);
    dispatcher.set_valve(state)?;
    println!("Valve: {state}");
    Ok(())
}

pub fn send_params(cfg: &Config, interval: i64, tariff: i64, dry_run: bool) -> eyre::Result<()> {
    let mut dispatcher =
        CommandDispatcher::new(publisher_for(cfg, dry_run), Topics::from(&cfg.broker));
    dispatcher.send_params(interval, tariff)?;
    println!(
        "Parameters sent to {}: {}",
        cfg.broker.params_topic,
        params_payload(interval, tariff)
    );
    Ok(())
}

pub fn self_check(cfg: &Config) -> eyre::Result<()> {
    let (mut session, mut loader) = session_and_loader(cfg)?;
    let rows = session.rows(&mut loader).wrap_err("feed check failed")?;
    println!("self-check ok ({} rows)", rows.len());
    Ok(())
}
