//! Suspending-or-blocking execution of handlers and callbacks

use std::sync::Arc;

use futures_util::future::BoxFuture;

use errmap_core::MappedError;

/// Side-effect callback invoked with the raised error, after resolution
/// and before translation
pub type OnError = Work<Arc<dyn MappedError>, ()>;

/// One unit of handler or callback execution
///
/// The scheduling capability is fixed at construction: a suspending unit
/// runs inline on the calling task, a blocking unit is dispatched to the
/// tokio blocking pool so it never stalls the event loop. Handlers and
/// `on_error` callbacks share this one dispatch path.
pub enum Work<In, Out> {
    /// Natively suspending, run inline
    Suspending(Arc<dyn Fn(In) -> BoxFuture<'static, Out> + Send + Sync>),
    /// Blocking, dispatched via `tokio::task::spawn_blocking`
    Blocking(Arc<dyn Fn(In) -> Out + Send + Sync>),
}

impl<In, Out> Clone for Work<In, Out> {
    fn clone(&self) -> Self {
        match self {
            Self::Suspending(f) => Self::Suspending(Arc::clone(f)),
            Self::Blocking(f) => Self::Blocking(Arc::clone(f)),
        }
    }
}

impl<In, Out> Work<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    /// Wrap a natively suspending function
    pub fn suspending<F, Fut>(f: F) -> Self
    where
        F: Fn(In) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Out> + Send + 'static,
    {
        Self::Suspending(Arc::new(move |input| Box::pin(f(input))))
    }

    /// Wrap a blocking function
    pub fn blocking<F>(f: F) -> Self
    where
        F: Fn(In) -> Out + Send + Sync + 'static,
    {
        Self::Blocking(Arc::new(f))
    }

    /// Run the unit once
    ///
    /// Suspending work is awaited inline; blocking work is dispatched to
    /// the blocking pool and its completion awaited.
    ///
    /// # Panics
    ///
    /// A panic inside dispatched blocking work is resumed on the awaiting
    /// task. Panics if the runtime shuts down before dispatched work
    /// completes.
    pub async fn call(&self, input: In) -> Out {
        match self {
            Self::Suspending(f) => f(input).await,
            Self::Blocking(f) => {
                let f = Arc::clone(f);
                match tokio::task::spawn_blocking(move || f(input)).await {
                    Ok(out) => out,
                    Err(join_error) => match join_error.try_into_panic() {
                        Ok(payload) => std::panic::resume_unwind(payload),
                        Err(join_error) => panic!("blocking work failed: {join_error}"),
                    },
                }
            }
        }
    }
}
