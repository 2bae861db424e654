use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Severity of a single log event handed to a [`LogSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Success,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Success => "SUCCESS",
            Level::Error => "ERROR",
        }
    }

    /// Info and success land on the info channel, errors on the error channel.
    pub fn is_error(&self) -> bool {
        matches!(self, Level::Error)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for instrumentation log events.
///
/// One `emit` call is made per event. Implementations are shared between
/// threads and must serialize their own appends.
pub trait LogSink: Send + Sync {
    fn emit(&self, level: Level, label: &str, message: &str);
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn emit(&self, level: Level, label: &str, message: &str) {
        (**self).emit(level, label, message)
    }
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn emit(&self, level: Level, label: &str, message: &str) {
        (**self).emit(level, label, message)
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn emit(&self, level: Level, label: &str, message: &str) {
        (**self).emit(level, label, message)
    }
}

/// Maps an error value to its kind, the key of a classification table.
///
/// The kind is usually a fieldless enum mirroring the error's variants:
///
/// ```
/// use task_logger::Classify;
///
/// #[derive(Debug)]
/// enum FetchError {
///     Timeout { after_ms: u64 },
///     NotFound(String),
/// }
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum FetchErrorKind {
///     Timeout,
///     NotFound,
/// }
///
/// impl Classify for FetchError {
///     type Kind = FetchErrorKind;
///
///     fn kind(&self) -> FetchErrorKind {
///         match self {
///             FetchError::Timeout { .. } => FetchErrorKind::Timeout,
///             FetchError::NotFound(_) => FetchErrorKind::NotFound,
///         }
///     }
/// }
///
/// assert_eq!(FetchError::NotFound("a".into()).kind(), FetchErrorKind::NotFound);
/// ```
pub trait Classify {
    type Kind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;
}

/// A callable that can be driven with its arguments packed in a tuple.
///
/// Implemented for every `Fn` of up to eight arguments, so `fn(a, b)` is
/// invoked as `target.invoke((a, b))` and a zero-argument closure as
/// `target.invoke(())`.
pub trait Target<Args> {
    type Output;

    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_target {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg,)*> Target<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn invoke(&self, ($($arg,)*): ($($arg,)*)) -> Out {
                (self)($($arg),*)
            }
        }
    };
}

impl_target!();
impl_target!(A1);
impl_target!(A1, A2);
impl_target!(A1, A2, A3);
impl_target!(A1, A2, A3, A4);
impl_target!(A1, A2, A3, A4, A5);
impl_target!(A1, A2, A3, A4, A5, A6);
impl_target!(A1, A2, A3, A4, A5, A6, A7);
impl_target!(A1, A2, A3, A4, A5, A6, A7, A8);
