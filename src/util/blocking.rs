//! Run a future to completion from synchronous code.

use std::future::Future;
use std::thread;

use crate::error::Result;

/// Block the current thread until `future` completes.
///
/// Outside a tokio runtime a current-thread runtime is built for this call and
/// dropped afterwards. Inside a runtime, where nested `block_on` would panic,
/// the future runs on a scoped helper thread with its own runtime while the
/// caller waits.
pub fn block_on<F>(future: F) -> Result<F::Output>
where
    F: Future + Send,
    F::Output: Send,
{
    if tokio::runtime::Handle::try_current().is_err() {
        return run_on_fresh_runtime(future);
    }

    thread::scope(|scope| {
        scope
            .spawn(|| run_on_fresh_runtime(future))
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    })
}

fn run_on_fresh_runtime<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}
