//! Drives `rspec` suites from a `#[test]` function.

use std::io;
use std::sync::Arc;

use rspec::block::Suite;
use rspec::report::Report;
use rspec::runner::RunnerObserver;
use rspec::{ConfigurationBuilder, Logger, Runner};

/// Runs `suite` one example at a time and fails the calling test when any
/// example failed, so the harness reports it instead of the process
/// exiting from inside the runner.
pub fn run_serial<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + std::fmt::Debug,
{
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|e| panic!("rspec configuration failed: {e}"));
    let logger: Arc<dyn RunnerObserver> = Arc::new(Logger::new(io::stdout()));
    let report = Runner::new(config, vec![logger]).run(suite);
    assert!(
        report.is_success(),
        "{} of {} examples failed",
        report.get_failed(),
        report.get_passed() + report.get_failed()
    );
}
