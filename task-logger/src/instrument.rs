//! # Instrumentation
//!
//! Wraps callables so that every invocation is logged to a [`LogSink`]:
//!
//! ```text
//! Start -> info entry -> target -> Ok  -> success entry [-> timing entry] -> value
//!                                -> Err -> classify -> error entry -> Failure
//! ```
//!
//! Errors whose kind is in the classification table are returned unchanged
//! as [`Failure::Mapped`]. Anything else is logged with its full trace and
//! returned as the single [`Failure::Unknown`] kind; the original kind only
//! survives as text in [`UnknownError::kind`].
//!
//! The wrapper holds no mutable state. Concurrent calls share only the
//! immutable configuration and the sink.

use crate::config::{InstrumentOptions, InstrumentationConfig, LogLabel};
use crate::error::{Failure, UnknownError};
use crate::traits::{Classify, Level, LogSink, Target};
use crate::utils::name::callable_name;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Label of the entries reporting elapsed time.
pub const TIMER_LABEL: &str = "task_logger.timer";

/// Message prefix of the entry logged for unclassified errors.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Instrumentation factory: options plus the sink they log to.
///
/// One factory can wrap any number of callables; each wrapped callable gets
/// its own frozen copy of the options and its own label.
pub struct Instrument<K> {
    options: InstrumentOptions<K>,
    sink: Arc<dyn LogSink>,
}

impl<K: Clone> Clone for Instrument<K> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<K> Instrument<K> {
    pub fn new(options: InstrumentOptions<K>, sink: Arc<dyn LogSink>) -> Self {
        Self { options, sink }
    }

    pub fn options(&self) -> &InstrumentOptions<K> {
        &self.options
    }

    /// Wraps `target`. The label suffix defaults to the target's name.
    pub fn wrap<F>(&self, target: F) -> Instrumented<F, K> {
        let config = self.options.resolve(callable_name::<F>());
        Instrumented {
            config: Arc::new(config),
            sink: Arc::clone(&self.sink),
            target,
        }
    }

    /// Runs a one-off closure through the logging protocol under `name`.
    pub fn run<T, E, F>(&self, name: &str, target: F) -> Result<T, Failure<E>>
    where
        F: FnOnce() -> Result<T, E>,
        K: Eq + Hash + fmt::Debug,
        E: Classify<Kind = K> + std::error::Error + Send + Sync + 'static,
    {
        let config = self.options.resolve(name);
        let call = Call::new(&config, self.sink.as_ref());
        call.start();
        let started = Instant::now();
        let outcome = target();
        call.finish(outcome, started.elapsed())
    }

    pub async fn run_async<T, E, Fut>(&self, name: &str, target: Fut) -> Result<T, Failure<E>>
    where
        Fut: Future<Output = Result<T, E>>,
        K: Eq + Hash + fmt::Debug,
        E: Classify<Kind = K> + std::error::Error + Send + Sync + 'static,
    {
        let config = self.options.resolve(name);
        let call = Call::new(&config, self.sink.as_ref());
        call.start();
        let started = Instant::now();
        let outcome = target.await;
        call.finish(outcome, started.elapsed())
    }
}

/// A callable bound to its instrumentation config and sink.
///
/// Arguments are passed as a tuple: a target `fn(i64, i64)` is called with
/// `wrapped.call((10, 2))`, a zero-argument target with `wrapped.call(())`.
pub struct Instrumented<F, K> {
    config: Arc<InstrumentationConfig<K>>,
    sink: Arc<dyn LogSink>,
    target: F,
}

impl<F: Clone, K> Clone for Instrumented<F, K> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            sink: Arc::clone(&self.sink),
            target: self.target.clone(),
        }
    }
}

impl<F, K> Instrumented<F, K> {
    pub fn label(&self) -> &LogLabel {
        self.config.label()
    }

    pub fn config(&self) -> &InstrumentationConfig<K> {
        &self.config
    }

    pub fn call<A, T, E>(&self, args: A) -> Result<T, Failure<E>>
    where
        F: Target<A, Output = Result<T, E>>,
        K: Eq + Hash + fmt::Debug,
        E: Classify<Kind = K> + std::error::Error + Send + Sync + 'static,
    {
        let call = Call::new(&self.config, self.sink.as_ref());
        call.start();
        let started = Instant::now();
        let outcome = self.target.invoke(args);
        call.finish(outcome, started.elapsed())
    }

    /// Same protocol for targets returning a future. The wrapper adds no
    /// suspension point of its own.
    pub async fn call_async<A, T, E, Fut>(&self, args: A) -> Result<T, Failure<E>>
    where
        F: Target<A, Output = Fut>,
        Fut: Future<Output = Result<T, E>>,
        K: Eq + Hash + fmt::Debug,
        E: Classify<Kind = K> + std::error::Error + Send + Sync + 'static,
    {
        let call = Call::new(&self.config, self.sink.as_ref());
        call.start();
        let started = Instant::now();
        let outcome = self.target.invoke(args).await;
        call.finish(outcome, started.elapsed())
    }
}

/// Wraps `target` with the given options.
pub fn instrument<F, K>(
    options: InstrumentOptions<K>,
    sink: Arc<dyn LogSink>,
    target: F,
) -> Instrumented<F, K> {
    Instrument::new(options, sink).wrap(target)
}

/// Like [`instrument`], with an extra elapsed-time entry after each success.
pub fn instrument_timed<F, K>(
    options: InstrumentOptions<K>,
    sink: Arc<dyn LogSink>,
    target: F,
) -> Instrumented<F, K> {
    Instrument::new(options.with_timing(true), sink).wrap(target)
}

// A single invocation. Lives on the caller's stack only.
struct Call<'a, K> {
    config: &'a InstrumentationConfig<K>,
    sink: &'a dyn LogSink,
}

impl<'a, K> Call<'a, K> {
    fn new(config: &'a InstrumentationConfig<K>, sink: &'a dyn LogSink) -> Self {
        Self { config, sink }
    }

    fn label(&self) -> &str {
        self.config.label().as_str()
    }

    fn start(&self) {
        self.sink
            .emit(Level::Info, self.label(), self.config.info_message());
    }

    fn finish<T, E>(&self, outcome: Result<T, E>, elapsed: Duration) -> Result<T, Failure<E>>
    where
        K: Eq + Hash + fmt::Debug,
        E: Classify<Kind = K> + std::error::Error + Send + Sync + 'static,
    {
        match outcome {
            Ok(value) => {
                self.sink
                    .emit(Level::Success, self.label(), self.config.success_message());
                if self.config.is_timed() {
                    self.sink.emit(
                        Level::Info,
                        TIMER_LABEL,
                        &format!(
                            "{} executed in {:.3} ms",
                            self.label(),
                            elapsed.as_secs_f64() * 1000.0
                        ),
                    );
                }
                Ok(value)
            }
            Err(err) => Err(self.classify(err)),
        }
    }

    fn classify<E>(&self, err: E) -> Failure<E>
    where
        K: Eq + Hash + fmt::Debug,
        E: Classify<Kind = K> + std::error::Error + Send + Sync + 'static,
    {
        let kind = err.kind();
        if let Some(message) = self.config.exceptions().get(&kind) {
            self.sink.emit(Level::Error, self.label(), message);
            return Failure::Mapped(err);
        }

        let trace = format!("{:?}", anyhow::Error::new(err));
        self.sink.emit(
            Level::Error,
            self.label(),
            &format!("{}:\n{}", UNKNOWN_ERROR_MESSAGE, trace),
        );
        Failure::Unknown(UnknownError {
            label: self.label().to_string(),
            kind: format!("{:?}", kind),
            trace,
        })
    }
}
