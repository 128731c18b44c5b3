//! Spawns the real `pawl worker` binary and drives jobs through it

use std::sync::Arc;

use pawl_core::NullLogSink;
use pawl_execution::{
    CancellationSignal, JobExecutor, LocalJobExecutor, ProcessExecutorConfig, ProcessJobExecutor,
    StubEngine,
};
use pawl_ipc::JobDescriptor;

fn worker_config() -> ProcessExecutorConfig {
    let mut config = ProcessExecutorConfig::new(env!("CARGO_BIN_EXE_pawl"));
    config.args = vec!["worker".to_string()];
    config
}

#[tokio::test]
async fn jobs_round_trip_through_a_real_worker_process() {
    let mut executor = ProcessJobExecutor::new(worker_config());
    executor.start().await.unwrap();

    let mut descriptor = JobDescriptor::new("Write-Output \"from $Where\"\nexit 0");
    descriptor.collect_output = true;
    descriptor.variables.insert("Where", "the child process");

    let result = executor
        .execute_job(&descriptor, CancellationSignal::never())
        .await
        .unwrap();
    assert_eq!(result.output, vec!["from the child process"]);
    assert_eq!(result.exit_code, Some(0));

    // Second job on the same worker
    let mut second = JobDescriptor::new("$Answer = \"42\"");
    second.push_out_variable("Answer");
    let result = executor
        .execute_job(&second, CancellationSignal::never())
        .await
        .unwrap();
    assert_eq!(result.out_variables.value("Answer"), Some("42"));

    executor.stop().await.unwrap();
    assert!(!executor.is_running());
}

#[tokio::test]
async fn process_and_local_executors_agree() {
    let script = "Write-Output one\nWrite-Output two\nexit 7";
    let mut descriptor = JobDescriptor::new(script);
    descriptor.collect_output = true;

    let mut local = LocalJobExecutor::new(StubEngine::new(), Arc::new(NullLogSink));
    let local_result = local
        .execute_job(&descriptor, CancellationSignal::never())
        .await
        .unwrap();

    let mut process = ProcessJobExecutor::new(worker_config());
    process.start().await.unwrap();
    let process_result = process
        .execute_job(&descriptor, CancellationSignal::never())
        .await
        .unwrap();
    process.stop().await.unwrap();

    assert_eq!(local_result, process_result);
}
