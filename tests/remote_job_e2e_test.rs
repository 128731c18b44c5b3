//! End-to-end tests of the full remote path: descriptor → wire → worker →
//! wire → result, over an in-memory duplex transport.

use std::sync::Arc;

use pawl_core::NullLogSink;
use pawl_execution::{
    serve, CancellationSignal, ExecutionError, JobExecutor, RemoteJobExecutor, StubEngine,
};
use pawl_ipc::{duplex_pair, DuplexTransport, JobDescriptor};

fn spawn_worker() -> (
    RemoteJobExecutor<DuplexTransport>,
    tokio::task::JoinHandle<Result<(), ExecutionError>>,
) {
    let (client_side, mut worker_side) = duplex_pair(64 * 1024);
    let worker = tokio::spawn(async move {
        serve(StubEngine::new(), &mut worker_side, Arc::new(NullLogSink)).await
    });
    (RemoteJobExecutor::new(client_side), worker)
}

#[tokio::test]
async fn full_round_trip_with_variables_and_exit_code() {
    let (mut executor, worker) = spawn_worker();

    let mut descriptor = JobDescriptor::new(
        "Write-Output \"deploying to $Target\"\n$Status = \"done\"\nexit 0",
    );
    descriptor.collect_output = true;
    descriptor.variables.insert("Target", "staging");
    descriptor.push_out_variable("Status");
    descriptor.push_out_variable("Missing");

    let result = executor
        .execute_job(&descriptor, CancellationSignal::never())
        .await
        .unwrap();

    assert_eq!(result.exit_code, Some(0));
    assert_eq!(result.output, vec!["deploying to staging"]);
    assert_eq!(result.out_variables.value("Status"), Some("done"));
    // Requested but never set: absent after the round trip, not empty
    assert_eq!(result.out_variables.get("Missing"), Some(&None));

    executor.close().await.unwrap();
    worker.await.unwrap().unwrap();
}

#[tokio::test]
async fn exit_code_absent_when_script_never_exits() {
    let (mut executor, worker) = spawn_worker();

    let result = executor
        .execute_job(
            &JobDescriptor::new("Write-Output quiet"),
            CancellationSignal::never(),
        )
        .await
        .unwrap();
    assert_eq!(result.exit_code, None);

    executor.close().await.unwrap();
    worker.await.unwrap().unwrap();
}

#[tokio::test]
async fn output_not_collected_unless_requested() {
    let (mut executor, worker) = spawn_worker();

    let mut descriptor = JobDescriptor::new("Write-Output invisible");
    descriptor.collect_output = false;
    descriptor.log_output = true;

    let result = executor
        .execute_job(&descriptor, CancellationSignal::never())
        .await
        .unwrap();
    assert!(result.output.is_empty());

    executor.close().await.unwrap();
    worker.await.unwrap().unwrap();
}

#[tokio::test]
async fn serial_jobs_share_one_connection() {
    let (mut executor, worker) = spawn_worker();

    for i in 0..5 {
        let mut descriptor = JobDescriptor::new(format!("exit {i}"));
        descriptor.collect_output = true;
        let result = executor
            .execute_job(&descriptor, CancellationSignal::never())
            .await
            .unwrap();
        assert_eq!(result.exit_code, Some(i));
    }

    executor.close().await.unwrap();
    worker.await.unwrap().unwrap();
}

#[tokio::test]
async fn script_errors_still_yield_a_result() {
    let (mut executor, worker) = spawn_worker();

    let mut descriptor = JobDescriptor::new("Not-A-Command\n$After = \"survived\"");
    descriptor.push_out_variable("After");

    let result = executor
        .execute_job(&descriptor, CancellationSignal::never())
        .await
        .unwrap();
    assert_eq!(result.out_variables.value("After"), Some("survived"));

    executor.close().await.unwrap();
    worker.await.unwrap().unwrap();
}

#[tokio::test]
async fn prompt_violation_kills_the_worker_connection() {
    let (mut executor, worker) = spawn_worker();

    // The worker treats a rejected interactive prompt as fatal: no result
    // frame comes back and the connection drops.
    let outcome = executor
        .execute_job(
            &JobDescriptor::new("Read-Host secret"),
            CancellationSignal::never(),
        )
        .await;
    assert!(outcome.is_err());

    let worker_outcome = worker.await.unwrap();
    assert!(matches!(worker_outcome, Err(ExecutionError::Engine(_))));
}

#[tokio::test]
async fn unicode_survives_the_wire() {
    let (mut executor, worker) = spawn_worker();

    let mut descriptor = JobDescriptor::new("Write-Output \"héllo wörld ✓ $Emoji\"");
    descriptor.collect_output = true;
    descriptor.variables.insert("Emoji", "🚀");

    let result = executor
        .execute_job(&descriptor, CancellationSignal::never())
        .await
        .unwrap();
    assert_eq!(result.output, vec!["héllo wörld ✓ 🚀"]);

    executor.close().await.unwrap();
    worker.await.unwrap().unwrap();
}
