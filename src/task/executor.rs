// src/task/executor.rs

//! The unit-of-work contract invoked by the engine for runnable tasks.
//!
//! Like the rest of the crate this avoids `async-trait`: an executor returns
//! a boxed future directly. Two adapters cover the common cases:
//! - [`FnExecutor`] wraps a synchronous closure,
//! - [`AsyncFnExecutor`] wraps a closure that returns a future.

use std::future::Future;
use std::pin::Pin;

use super::context::TaskContext;

/// Future returned by [`Executor::execute`]. Any error means the task failed.
pub type TaskFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

pub trait Executor: Send + Sync {
    /// Run the task body. The context is fresh for this invocation.
    fn execute(&self, ctx: TaskContext) -> TaskFuture<'_>;
}

/// Executor backed by a synchronous closure.
pub struct FnExecutor<F>(pub F);

impl<F> Executor for FnExecutor<F>
where
    F: Fn(&mut TaskContext) -> anyhow::Result<()> + Send + Sync,
{
    fn execute(&self, mut ctx: TaskContext) -> TaskFuture<'_> {
        Box::pin(async move { (self.0)(&mut ctx) })
    }
}

/// Executor backed by a closure returning a future.
pub struct AsyncFnExecutor<F>(pub F);

impl<F, Fut> Executor for AsyncFnExecutor<F>
where
    F: Fn(TaskContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    fn execute(&self, ctx: TaskContext) -> TaskFuture<'_> {
        Box::pin((self.0)(ctx))
    }
}
