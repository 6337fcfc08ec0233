use meshsnr::analysis::summarize;
use meshsnr::domain::{FailureStatus, LinkError, NodeId, ReachabilityError};
use meshsnr::link::RadioLink;
use meshsnr::preflight::run_preflight_checks;
use meshsnr::scheduler::{ProbeConfig, ProbeScheduler, TokioSleeper};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

const NODES: &str = include_str!("fixtures/nodes.txt");
const TRACE_DIRECT: &str = include_str!("fixtures/trace_direct.txt");
const TRACE_RELAYED: &str = include_str!("fixtures/trace_relayed.txt");

/// Replays canned collaborator output, one script entry per traceroute.
struct ScriptedLink {
    table: String,
    traces: RefCell<VecDeque<Result<String, LinkError>>>,
    calls: Cell<usize>,
}

impl ScriptedLink {
    fn new(traces: Vec<Result<String, LinkError>>) -> Self {
        Self { table: NODES.to_string(), traces: RefCell::new(traces.into()), calls: Cell::new(0) }
    }
}

impl RadioLink for ScriptedLink {
    async fn node_table(&self) -> Result<String, LinkError> {
        Ok(self.table.clone())
    }

    async fn traceroute(&self, _target: &NodeId) -> Result<String, LinkError> {
        self.calls.set(self.calls.get() + 1);
        self.traces.borrow_mut().pop_front().unwrap_or_else(|| Ok(String::new()))
    }
}

fn back_route(db: f64) -> Result<String, LinkError> {
    Ok(format!("Route traced back to us:\n!ba4bf9d0 --> !aaaa1111 ({db:?}dB)\n"))
}

fn config(repeat: u32) -> ProbeConfig {
    ProbeConfig { repeat, delay: Duration::ZERO, quiet: false }
}

#[tokio::test]
async fn test_failed_probe_does_not_stop_run() {
    let link = ScriptedLink::new(vec![
        back_route(1.0),
        Err(LinkError::TimedOut { program: "meshtastic".to_string(), timeout: Duration::from_secs(90) }),
        back_route(3.0),
    ]);

    let mut out = Vec::new();
    let history = ProbeScheduler::new(&link, TokioSleeper, config(3))
        .run(&NodeId::from("!ba4bf9d0"), &mut out)
        .await
        .unwrap();

    assert_eq!(history.samples(), &[1.0, 3.0]);
    assert_eq!(history.failures().get(&FailureStatus::RouteLost), Some(&1));

    let summary = summarize(&history).unwrap();
    assert_eq!(format!("{:.2}", summary.inbound_mean.db()), "2.00");

    let report = String::from_utf8(out).unwrap();
    assert!(report.contains("Trace 2/3: FAILED (route lost or timed out)"));
    assert!(report.contains("Trace 3/3: OK: 3.0dB"));
}

#[tokio::test]
async fn test_invocation_count_matches_repeat() {
    for repeat in [1, 2, 5] {
        let link = ScriptedLink::new(Vec::new());
        ProbeScheduler::new(&link, TokioSleeper, config(repeat))
            .run(&NodeId::from("!ba4bf9d0"), &mut std::io::sink())
            .await
            .unwrap();
        assert_eq!(link.calls.get(), repeat as usize);
    }
}

#[tokio::test]
async fn test_quiet_run_prints_nothing() {
    let link = ScriptedLink::new(vec![back_route(-2.0)]);
    let mut out = Vec::new();
    let quiet = ProbeConfig { quiet: true, ..config(1) };

    let history = ProbeScheduler::new(&link, TokioSleeper, quiet)
        .run(&NodeId::from("!ba4bf9d0"), &mut out)
        .await
        .unwrap();

    assert!(out.is_empty());
    assert_eq!(history.samples(), &[-2.0]);
}

#[tokio::test]
async fn test_fixture_traces() {
    let link = ScriptedLink::new(vec![
        Ok(TRACE_DIRECT.to_string()),
        Ok(TRACE_RELAYED.to_string()),
    ]);

    let history = ProbeScheduler::new(&link, TokioSleeper, config(2))
        .run(&NodeId::from("!ba4bf9d0"), &mut std::io::sink())
        .await
        .unwrap();

    assert_eq!(history.samples(), &[-7.0]);
    assert_eq!(history.outbound_samples(), &[6.25]);
    assert_eq!(history.failures().get(&FailureStatus::NotDirect), Some(&1));
}

#[tokio::test]
async fn test_all_failures_give_no_summary() {
    let link = ScriptedLink::new(vec![Ok("Timed out".to_string()), Ok(TRACE_RELAYED.to_string())]);

    let history = ProbeScheduler::new(&link, TokioSleeper, config(2))
        .run(&NodeId::from("!ba4bf9d0"), &mut std::io::sink())
        .await
        .unwrap();

    assert!(summarize(&history).is_none());
    assert_eq!(history.attempts(), 2);
}

#[tokio::test]
async fn test_preflight_accepts_direct_neighbor() {
    let link = ScriptedLink::new(Vec::new());
    let target = run_preflight_checks(&link, &NodeId::from("BA4BF9D0"), |_| {}).await.unwrap();

    assert_eq!(target.id, NodeId::from("!ba4bf9d0"));
    assert_eq!(target.record.get("User"), Some("Pepper Hill"));
    assert_eq!(target.record.get("SNR"), Some("6.25 dB"));
    assert_eq!(link.calls.get(), 0);
}

#[tokio::test]
async fn test_preflight_rejections() {
    let link = ScriptedLink::new(Vec::new());

    let err = run_preflight_checks(&link, &NodeId::from("!deadbeef"), |_| {}).await.unwrap_err();
    assert!(matches!(err, ReachabilityError::TargetNotFound(_)));

    let err = run_preflight_checks(&link, &NodeId::from("!c0ffee01"), |_| {}).await.unwrap_err();
    assert!(matches!(err, ReachabilityError::NotDirect { hops: 2, .. }));

    let err = run_preflight_checks(&link, &NodeId::from("!0badcafe"), |_| {}).await.unwrap_err();
    assert!(matches!(err, ReachabilityError::MalformedHops { .. }));

    assert_eq!(link.calls.get(), 0);
}

#[tokio::test]
async fn test_preflight_shows_row_before_verifying() {
    let link = ScriptedLink::new(Vec::new());
    let seen = RefCell::new(Vec::new());

    let err = run_preflight_checks(&link, &NodeId::from("!c0ffee01"), |record| {
        seen.borrow_mut().push(serde_json::to_string(record).unwrap());
    })
    .await
    .unwrap_err();

    assert!(matches!(err, ReachabilityError::NotDirect { hops: 2, .. }));
    assert_eq!(seen.borrow().len(), 1);
    assert!(seen.borrow()[0].contains(r#""ID":"!c0ffee01""#));
}

#[tokio::test]
async fn test_preflight_unknown_target_shows_nothing() {
    let link = ScriptedLink::new(Vec::new());
    let mut shown = false;

    let err = run_preflight_checks(&link, &NodeId::from("!deadbeef"), |_| shown = true)
        .await
        .unwrap_err();

    assert!(matches!(err, ReachabilityError::TargetNotFound(_)));
    assert!(!shown);
}
