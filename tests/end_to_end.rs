//! End-to-end tuning sessions against a synthetic scorer over real sockets

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use afinar::config::{ReportFormat, RetryConfig};
use afinar::transport::TransportError;
use afinar::{Error, StrategyKind, TuneConfig, TuneReport, Tuner, TunerState};
use serde_json::{json, Value};

/// Reserve an ephemeral port for the tuner to listen on
fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

fn connect_with_retry(port: u16) -> TcpStream {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        match TcpStream::connect(("127.0.0.1", port)) {
            Ok(stream) => return stream,
            Err(_) if Instant::now() < deadline => thread::sleep(Duration::from_millis(10)),
            Err(e) => panic!("tuner never started listening: {e}"),
        }
    }
}

/// Scorer peer: declares a space, then scores candidates until the tuner hangs up
///
/// Returns every candidate it received, in order.
fn spawn_scorer(
    listen_port: u16,
    candidates: TcpListener,
    initial: Value,
    score: fn(&Value) -> f64,
) -> thread::JoinHandle<Vec<Value>> {
    thread::spawn(move || {
        let mut scores = connect_with_retry(listen_port);
        writeln!(scores, "{initial}").expect("send initial data");

        let (inbound, _) = candidates.accept().expect("tuner connects back");
        let mut reader = BufReader::new(inbound);
        let mut received = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let candidate: Value =
                        serde_json::from_str(line.trim()).expect("candidate is JSON");
                    let reply = json!({"score": score(&candidate)});
                    received.push(candidate);
                    if writeln!(scores, "{reply}").is_err() {
                        break;
                    }
                }
            }
        }
        received
    })
}

fn session_config(strategy: StrategyKind) -> (TuneConfig, TcpListener) {
    let candidates = TcpListener::bind("127.0.0.1:0").expect("bind scorer listener");
    let mut config = TuneConfig { strategy, ..TuneConfig::default() };
    config.network.host = "127.0.0.1".to_string();
    config.network.listen_port = free_port();
    config.network.send_port = candidates.local_addr().expect("local addr").port();
    config.retry = RetryConfig {
        bind_backoff_ms: 5,
        read_backoff_ms: 2,
        max_bind_attempts: Some(200),
        max_idle_reads: Some(5000),
    };
    (config, candidates)
}

fn fixpoint_score(candidate: &Value) -> f64 {
    match candidate["fixpoint"].as_str() {
        Some("A") => -0.9,
        Some("B") => -0.3,
        Some("C") => -0.6,
        _ => -10.0,
    }
}

#[test]
fn test_exhaustive_session_visits_each_value_in_order() {
    let (config, candidates) = session_config(StrategyKind::Auto);
    let initial = json!({"score": -1.0, "possible_values": {"fixpoint": ["A", "B", "C"]}});
    let scorer = spawn_scorer(config.network.listen_port, candidates, initial, fixpoint_score);

    let mut tuner = Tuner::new(config);
    let outcome = tuner.run().expect("session should complete");
    let received = scorer.join().expect("scorer thread");

    assert_eq!(
        received,
        vec![json!({"fixpoint": "A"}), json!({"fixpoint": "B"}), json!({"fixpoint": "C"})]
    );
    assert_eq!(outcome.strategy, "exhaustive");
    assert_eq!(outcome.iterations(), 3);
    let best = outcome.best.expect("best observation");
    assert_eq!(best.assignment["fixpoint"].as_str(), Some("B"));
    assert_eq!(best.score, -0.3);
}

#[test]
fn test_random_session_stops_after_first_good_score() {
    let (mut config, candidates) = session_config(StrategyKind::Random);
    config.random.seed = Some(11);
    let initial = json!({
        "score": -1.0,
        "possible_values": {"fixpoint": ["A", "B", "C"], "mode": [1, 2]}
    });
    let scorer = spawn_scorer(config.network.listen_port, candidates, initial, |_| -0.1);

    let outcome = Tuner::new(config).run().expect("session should complete");
    let received = scorer.join().expect("scorer thread");

    assert_eq!(received.len(), 1);
    assert!(matches!(received[0]["mode"].as_str(), Some("1") | Some("2")));
    assert_eq!(outcome.best.map(|b| b.score), Some(-0.1));
}

#[test]
fn test_surrogate_session_sends_numbers_for_continuous_parameters() {
    let (mut config, candidates) = session_config(StrategyKind::Auto);
    config.surrogate.n_calls = 6;
    config.surrogate.n_initial_points = 3;
    config.surrogate.n_candidates = 50;
    let initial = json!({
        "score": -1.0,
        "possible_values": {"fixpoint": ["A", "B"], "weight": {"normalizedValue": true}}
    });
    let scorer = spawn_scorer(config.network.listen_port, candidates, initial, |c| {
        -(c["weight"].as_f64().unwrap_or(10.0) - 0.5).abs()
    });

    let dir = tempfile::tempdir().expect("tempdir");
    let report_path = dir.path().join("report.yaml");
    config.report.output = Some(report_path.clone());
    config.report.format = ReportFormat::Yaml;

    let outcome = Tuner::new(config.clone()).run().expect("session should complete");
    let received = scorer.join().expect("scorer thread");

    assert_eq!(received.len(), 6);
    for candidate in &received {
        let w = candidate["weight"].as_f64().expect("weight is a JSON number");
        assert!((0.0..=1.0).contains(&w));
        assert!(matches!(candidate["fixpoint"].as_str(), Some("A") | Some("B")));
    }
    assert_eq!(outcome.strategy, "surrogate");

    let report = TuneReport::from_outcome(&outcome);
    report.write(&report_path, config.report.format).expect("write report");
    let text = std::fs::read_to_string(&report_path).expect("read report");
    assert!(text.contains("strategy: surrogate"));
    assert!(text.contains("kind: continuous"));
}

#[test]
fn test_peer_disconnect_mid_run_fails_the_session() {
    let (mut config, candidates) = session_config(StrategyKind::Exhaustive);
    config.retry.max_idle_reads = None;
    let listen_port = config.network.listen_port;
    let scorer = thread::spawn(move || {
        let mut scores = connect_with_retry(listen_port);
        let initial = json!({"score": -1.0, "possible_values": {"fixpoint": ["A", "B", "C"]}});
        writeln!(scores, "{initial}").expect("send initial data");
        let (inbound, _) = candidates.accept().expect("tuner connects back");
        let mut line = String::new();
        BufReader::new(inbound).read_line(&mut line).expect("first candidate");
        line
    });

    let mut tuner = Tuner::new(config);
    let err = tuner.run().expect_err("a vanished scorer must end the session");
    let first = scorer.join().expect("scorer thread");

    assert_eq!(serde_json::from_str::<Value>(first.trim()).unwrap(), json!({"fixpoint": "A"}));
    assert!(matches!(err, Error::Transport(TransportError::PeerClosed)), "got {err}");
    assert_eq!(tuner.state(), TunerState::Running);
}
