//! Behavioral tests for the buffered executor: timeout policy, output
//! accumulation under load, and the partial-results contract.

use redscan_core::{CommandExecutor, ExecConfig};
use std::time::Duration;

fn executor() -> CommandExecutor {
    CommandExecutor::new(ExecConfig::default())
}

#[tokio::test]
async fn timeout_with_output_salvages_partial_results() {
    let outcome = executor()
        .execute(
            "echo early-finding; sleep 5",
            Some(Duration::from_millis(400)),
        )
        .await
        .unwrap();

    assert!(outcome.timed_out);
    assert!(outcome.partial_results);
    assert!(outcome.success, "partial output still counts as usable");
    assert_eq!(outcome.return_code, -1);
    assert!(outcome.stdout.contains("early-finding"));
}

#[tokio::test]
async fn timeout_without_output_is_a_failure() {
    let outcome = executor()
        .execute("sleep 5", Some(Duration::from_millis(400)))
        .await
        .unwrap();

    assert!(outcome.timed_out);
    assert!(!outcome.partial_results);
    assert!(!outcome.success);
    assert_eq!(outcome.return_code, -1);
    assert!(outcome.stdout.is_empty());
    assert!(outcome.stderr.is_empty());
}

#[tokio::test]
async fn stderr_only_output_also_counts_as_partial() {
    let outcome = executor()
        .execute("echo warn 1>&2; sleep 5", Some(Duration::from_millis(400)))
        .await
        .unwrap();

    assert!(outcome.timed_out);
    assert!(outcome.partial_results);
    assert!(outcome.success);
    assert!(outcome.stdout.is_empty());
    assert!(outcome.stderr.contains("warn"));
}

#[tokio::test]
async fn per_stream_line_order_is_preserved() {
    let outcome = executor()
        .execute(
            "for i in 1 2 3 4 5; do echo out-$i; echo err-$i 1>&2; done",
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.stdout, "out-1\nout-2\nout-3\nout-4\nout-5\n");
    assert_eq!(outcome.stderr, "err-1\nerr-2\nerr-3\nerr-4\nerr-5\n");
    assert!(outcome.success);
}

// A child that pushes well past the OS pipe buffer on both streams must not
// deadlock: both pipes are drained concurrently while the child runs.
#[tokio::test]
async fn large_output_on_both_streams_does_not_deadlock() {
    let line = "x".repeat(120);
    let command = format!(
        "for i in $(seq 1 2000); do echo {line}; echo {line} 1>&2; done"
    );

    let outcome = executor()
        .execute(&command, Some(Duration::from_secs(60)))
        .await
        .unwrap();

    assert!(outcome.success);
    assert!(!outcome.timed_out);
    assert_eq!(outcome.stdout.len(), 2000 * (line.len() + 1));
    assert_eq!(outcome.stderr.len(), 2000 * (line.len() + 1));
}

#[tokio::test]
async fn process_group_descendants_are_killed_on_timeout() {
    // The subshell spawns a grandchild sleeper; the whole group must die at
    // the deadline, otherwise the drain tasks would hang on the open pipe
    // and this test would run for the full 30 seconds.
    let started = std::time::Instant::now();
    let outcome = executor()
        .execute("(sleep 30 &); sleep 30", Some(Duration::from_millis(500)))
        .await
        .unwrap();

    assert!(outcome.timed_out);
    assert!(
        started.elapsed() < Duration::from_secs(10),
        "kill must reach the grandchild holding the pipe open"
    );
}
