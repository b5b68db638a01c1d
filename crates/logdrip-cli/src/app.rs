//! Mode dispatch: timed replay or synthetic generation

use crate::burst::BurstHandle;
use crate::config::Config;
use crate::generate::run_steady;
use crate::sink::SharedSink;
use logdrip_core::{
    Error, LinePicker, LineRng, RecordingPacer, ReplayReport, ReplaySpeed, Replayer, Result,
    SystemClock,
};
use std::sync::PoisonError;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// What a run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Lines were replayed once with their recorded timing
    Replayed(ReplayReport),
    /// Lines were generated until the limit or shutdown
    Generated { steady: u64, burst: u64 },
}

/// Run whichever mode `config` selects over `lines`
pub async fn run(
    config: &Config,
    lines: Vec<String>,
    sink: SharedSink,
    shutdown: watch::Receiver<bool>,
) -> Result<Outcome> {
    match config.replay_speed() {
        Some(speed) => {
            info!(speed = speed.factor(), lines = lines.len(), "replaying");
            replay(config, speed, lines, sink).await.map(Outcome::Replayed)
        }
        None => {
            info!(lines = lines.len(), "generating");
            generate(config, lines, sink, shutdown).await
        }
    }
}

async fn replay(
    config: &Config,
    speed: ReplaySpeed,
    lines: Vec<String>,
    sink: SharedSink,
) -> Result<ReplayReport> {
    let max_wait = config.replay.max_wait();
    let dry_run = config.replay.dry_run;

    // The engine sleeps in-line, so keep it off the async workers
    let report = tokio::task::spawn_blocking(move || {
        let mut out = sink.lock().unwrap_or_else(PoisonError::into_inner);
        if dry_run {
            let mut replayer = Replayer::with_parts(speed, RecordingPacer::new(), SystemClock)
                .with_max_wait(max_wait);
            debug!(speed = replayer.speed().factor(), "dry run, recording waits");
            replayer.replay(&lines, &mut *out)
        } else {
            let mut replayer = Replayer::new(speed).with_max_wait(max_wait);
            debug!(
                speed = replayer.speed().factor(),
                max_wait = ?replayer.max_wait(),
                "replaying"
            );
            replayer.replay(&lines, &mut *out)
        }
    })
    .await
    .map_err(std::io::Error::other)??;

    info!(
        emitted = report.emitted,
        parsed = report.parsed,
        total_wait = ?report.total_wait,
        dry_run,
        "replay finished"
    );
    Ok(report)
}

async fn generate(
    config: &Config,
    lines: Vec<String>,
    sink: SharedSink,
    shutdown: watch::Receiver<bool>,
) -> Result<Outcome> {
    if lines.is_empty() {
        warn!(source = ?config.source, "nothing to generate from");
        return Err(Error::EmptySource);
    }

    let mut rng = match config.seed {
        Some(seed) => LineRng::new(seed),
        None => LineRng::from_clock(),
    };
    info!(seed = rng.state(), selection = ?config.selection, "line picker seeded");

    let mut picker = LinePicker::new(lines, rng.fork(), config.selection);
    let burst = config
        .burst
        .map(|burst| BurstHandle::spawn(picker.fork(), sink.clone(), burst));

    let steady = run_steady(picker, sink, config.interval(), config.count, shutdown).await;
    let burst = match burst {
        Some(handle) => handle.stop().await?,
        None => 0,
    };

    Ok(Outcome::Generated {
        steady: steady?,
        burst,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Captured, LineSink};
    use logdrip_core::SourceKind;
    use std::time::Duration;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_dry_run_replay() {
        let config = Config::from_ron("(replay: (speed: 1.0, dry_run: true))").unwrap();
        let captured = Captured::default();
        let sink = LineSink::from_writer(captured.clone()).shared();
        let (_tx, rx) = watch::channel(false);

        let input = lines(&[
            "2024-01-01T00:00:00Z start",
            "2024-01-01T00:01:00Z a minute later",
        ]);
        let outcome = run(&config, input, sink, rx).await.unwrap();

        assert_eq!(captured.text(), "start\n(1) a minute later\n");
        match outcome {
            Outcome::Replayed(report) => {
                assert_eq!(report.emitted, 2);
                assert_eq!(report.total_wait, Duration::from_secs(10));
            }
            other => panic!("expected replay, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_real_replay_sleeps() {
        let config = Config::from_ron("(replay: (speed: 10.0))").unwrap();
        let captured = Captured::default();
        let sink = LineSink::from_writer(captured.clone()).shared();
        let (_tx, rx) = watch::channel(false);

        let input = lines(&["2024-01-01T00:00:00Z a", "2024-01-01T00:00:01Z b"]);
        let started = std::time::Instant::now();
        run(&config, input, sink, rx).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(100));
        assert_eq!(captured.text(), "a\n(1) b\n");
    }

    #[tokio::test]
    async fn test_replay_empty_input() {
        let config = Config::from_ron("(replay: (speed: 1.0))").unwrap();
        let captured = Captured::default();
        let sink = LineSink::from_writer(captured.clone()).shared();
        let (_tx, rx) = watch::channel(false);

        let outcome = run(&config, Vec::new(), sink, rx).await.unwrap();
        assert_eq!(outcome, Outcome::Replayed(ReplayReport::default()));
        assert!(captured.text().is_empty());
    }

    #[tokio::test]
    async fn test_generate_with_count() {
        let mut config = Config::default();
        config.source = SourceKind::Numbered(3);
        config.seed = Some(42);
        config.interval_ms = 1;
        config.count = Some(5);

        let captured = Captured::default();
        let sink = LineSink::from_writer(captured.clone()).shared();
        let (_tx, rx) = watch::channel(false);

        let outcome = run(&config, logdrip_core::numbered_lines(3), sink, rx)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Generated { steady: 5, burst: 0 });
        assert!(captured.text().lines().all(|l| l.starts_with("line ")));
    }

    #[tokio::test]
    async fn test_generate_same_seed_same_output() {
        let mut config = Config::default();
        config.seed = Some(7);
        config.interval_ms = 1;
        config.count = Some(8);

        let mut outputs = Vec::new();
        for _ in 0..2 {
            let captured = Captured::default();
            let sink = LineSink::from_writer(captured.clone()).shared();
            let (_tx, rx) = watch::channel(false);
            run(&config, logdrip_core::lorem_lines(), sink, rx)
                .await
                .unwrap();
            outputs.push(captured.text());
        }
        assert_eq!(outputs[0], outputs[1]);
    }

    #[tokio::test]
    async fn test_generate_empty_source() {
        let config = Config::default();
        let sink = LineSink::from_writer(Captured::default()).shared();
        let (_tx, rx) = watch::channel(false);

        let err = run(&config, Vec::new(), sink, rx).await.unwrap_err();
        assert!(matches!(err, Error::EmptySource));
    }
}
