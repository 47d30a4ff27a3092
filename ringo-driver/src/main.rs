//! Ringo Driver - runs publishers against a leader/follower pipeline.
//!
//! Usage: ringo-driver [--name NAME] [--ring-size N] [--messages N] [--publishers N] [--debug]
//! Features: --features tracy (Tracy profiler)

use std::sync::atomic::{ AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering };
use std::sync::Arc;
use std::thread;
use std::time::{ Duration, Instant, SystemTime, UNIX_EPOCH };

use ringo::{ FanInPipeline, PipelineConfig, Result, RingoError, DEFAULT_RING_SIZE };
use serde::Serialize;
use tracing::{ debug, info, warn };

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DRAIN_POLL: Duration = Duration::from_millis(10);

const USAGE: &str =
    "Usage: ringo-driver [options]

Options:
  --name NAME        instance name reported in info (default: ringo)
  --ring-size N      pipeline ring size, power of two (default: 4096)
  --messages N       slots to publish in total, 0 runs until Ctrl-C (default: 1000000)
  --publishers N     publisher threads on the leader (default: 1)
  --debug            verbose logging
  --version          print version and exit
  --help             print this message and exit";

#[derive(Debug, Clone)]
struct Options {
    name: String,
    ring_size: usize,
    messages: u64,
    publishers: usize,
    debug: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            name: "ringo".to_string(),
            ring_size: DEFAULT_RING_SIZE,
            messages: 1_000_000,
            publishers: 1,
            debug: false,
        }
    }
}

enum Command {
    Run(Options),
    Version,
    Help,
}

#[derive(Debug, Serialize)]
struct Info<'a> {
    version: &'a str,
    name: &'a str,
    ring_size: usize,
    publishers: usize,
    debug: bool,
}

#[derive(Debug, Serialize)]
struct Stats {
    start_time: u64,
    uptime_ms: u64,
    published: u64,
    consumed: u64,
    checksum: i64,
    leader: ringo::MetricsSnapshot,
    follower: ringo::MetricsSnapshot,
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut options = Options::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                return Ok(Command::Help);
            }
            "--version" | "-v" => {
                return Ok(Command::Version);
            }
            "--debug" | "-d" => {
                options.debug = true;
            }
            "--name" => {
                options.name = value(&mut iter, arg)?.to_string();
            }
            "--ring-size" => {
                options.ring_size = number(value(&mut iter, arg)?, arg)?;
            }
            "--messages" => {
                options.messages = number(value(&mut iter, arg)?, arg)?;
            }
            "--publishers" => {
                options.publishers = number(value(&mut iter, arg)?, arg)?;
            }
            other => {
                return Err(RingoError::config(format!("unknown option {}", other)));
            }
        }
    }

    if options.publishers == 0 {
        return Err(RingoError::config("--publishers must be at least 1"));
    }
    Ok(Command::Run(options))
}

fn value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a str> {
    iter.next()
        .map(|s| s.as_str())
        .ok_or_else(|| RingoError::config(format!("{} requires a value", flag)))
}

fn number<T: std::str::FromStr>(raw: &str, flag: &str) -> Result<T> {
    raw.parse().map_err(|_| RingoError::config(format!("{} expects a number, got {:?}", flag, raw)))
}

fn init_logging(debug: bool) {
    let level = if debug { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let _ = tracing_subscriber::fmt().with_max_level(level).with_target(false).try_init();
}

fn run(options: &Options, running: Arc<AtomicBool>) -> Result<Stats> {
    let config = PipelineConfig::new(options.ring_size)?;
    let pipeline = FanInPipeline::from_config(&config)?;
    let (leader, follower) = pipeline.into_parts();
    let payload: Arc<Box<[AtomicI64]>> = Arc::new(
        (0..config.ring_size).map(|_| AtomicI64::new(0)).collect()
    );

    let start_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let started = Instant::now();

    let published = Arc::new(AtomicU64::new(0));
    let finished = Arc::new(AtomicUsize::new(0));
    let quota = Arc::new(AtomicU64::new(options.messages));
    let unbounded = options.messages == 0;

    let publishers: Vec<_> = (0..options.publishers)
        .map(|id| {
            let leader = leader.clone();
            let payload = payload.clone();
            let running = running.clone();
            let published = published.clone();
            let finished = finished.clone();
            let quota = quota.clone();

            thread::spawn(move || {
                debug!(publisher = id, "publisher started");
                while running.load(Ordering::Relaxed) {
                    if !unbounded && !take_one(&quota) {
                        break;
                    }
                    let index = leader.reserve(1);
                    payload[leader.slot(index)].store(index, Ordering::Relaxed);
                    leader.commit(index, index);
                    published.fetch_add(1, Ordering::Relaxed);
                }
                finished.fetch_add(1, Ordering::Release);
                debug!(publisher = id, "publisher stopped");
            })
        })
        .collect();

    let drain = {
        let follower = follower.clone();
        let payload = payload.clone();
        let published = published.clone();
        let finished = finished.clone();
        let total = options.publishers;

        thread::spawn(move || {
            let mut consumed = 0u64;
            let mut checksum = 0i64;
            loop {
                match follower.reserve_timeout(1, DRAIN_POLL) {
                    Ok(index) => {
                        let value = payload[follower.slot(index)].load(Ordering::Relaxed);
                        checksum = checksum.wrapping_add(value);
                        follower.commit(index, index);
                        consumed += 1;
                    }
                    Err(_) => {
                        let done = finished.load(Ordering::Acquire) == total;
                        if done && consumed >= published.load(Ordering::Relaxed) {
                            break;
                        }
                    }
                }
            }
            (consumed, checksum)
        })
    };

    for handle in publishers {
        if handle.join().is_err() {
            warn!("publisher thread panicked");
        }
    }
    let (consumed, checksum) = drain
        .join()
        .map_err(|_| RingoError::config("drain thread panicked"))?;

    Ok(Stats {
        start_time,
        uptime_ms: started.elapsed().as_millis() as u64,
        published: published.load(Ordering::Relaxed),
        consumed,
        checksum,
        leader: leader.metrics(),
        follower: follower.metrics(),
    })
}

/// Claim one unit from the shared publish quota.
fn take_one(quota: &AtomicU64) -> bool {
    quota.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |left| left.checked_sub(1)).is_ok()
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let options = match parse_args(&args) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Version) => {
            println!("ringo-driver {}", VERSION);
            return;
        }
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return;
        }
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    init_logging(options.debug);
    if let Err(e) = ringo::insights::init_tracy() {
        warn!("tracy unavailable: {}", e);
    }

    let info = Info {
        version: VERSION,
        name: &options.name,
        ring_size: options.ring_size,
        publishers: options.publishers,
        debug: options.debug,
    };
    match serde_json::to_string(&info) {
        Ok(json) => println!("{}", json),
        Err(e) => warn!("info not serializable: {}", e),
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)) {
        warn!("ctrl-c handler not installed: {}", e);
    }

    info!(name = %options.name, ring_size = options.ring_size, "driver started");
    let stats = match run(&options, running) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("ringo-driver: {}", e);
            std::process::exit(1);
        }
    };
    info!(published = stats.published, consumed = stats.consumed, "driver stopped");

    match serde_json::to_string_pretty(&stats) {
        Ok(json) => println!("{}", json),
        Err(e) => warn!("stats not serializable: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("ringo-driver")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_defaults() {
        let Ok(Command::Run(options)) = parse_args(&args(&[])) else {
            panic!("expected run");
        };
        assert_eq!(options.ring_size, DEFAULT_RING_SIZE);
        assert_eq!(options.publishers, 1);
        assert!(!options.debug);
    }

    #[test]
    fn test_parse_options() {
        let parsed = parse_args(
            &args(&["--name", "edge", "--ring-size", "64", "--messages", "10", "--publishers", "3", "--debug"])
        );
        let Ok(Command::Run(options)) = parsed else {
            panic!("expected run");
        };
        assert_eq!(options.name, "edge");
        assert_eq!(options.ring_size, 64);
        assert_eq!(options.messages, 10);
        assert_eq!(options.publishers, 3);
        assert!(options.debug);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["--ring-size"])).is_err());
        assert!(parse_args(&args(&["--ring-size", "big"])).is_err());
        assert!(parse_args(&args(&["--publishers", "0"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(matches!(parse_args(&args(&["--version"])), Ok(Command::Version)));
    }

    #[test]
    fn test_run_drains_every_message() {
        let options = Options {
            ring_size: 64,
            messages: 10_000,
            publishers: 3,
            ..Options::default()
        };
        let stats = run(&options, Arc::new(AtomicBool::new(true))).unwrap();

        assert_eq!(stats.published, 10_000);
        assert_eq!(stats.consumed, 10_000);
        // Every sequence 0..10_000 passes through exactly once.
        assert_eq!(stats.checksum, (0..10_000i64).sum::<i64>());
        assert_eq!(stats.follower.slots_committed, 10_000);
    }

    #[test]
    fn test_run_rejects_bad_ring_size() {
        let options = Options { ring_size: 100, ..Options::default() };
        assert!(run(&options, Arc::new(AtomicBool::new(true))).is_err());
    }
}
