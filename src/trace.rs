//! Operation-level tracing hooks (zero-cost when the feature is disabled).
//!
//! The kernel entry points hold a `trace_scope!` guard for the duration of
//! an operation and report counters through `trace_count!`. With the
//! `tracing` feature enabled the scope macro yields an entered span guard
//! and the counter macro emits an info event; without it the scope yields a
//! unit guard and the counter values are referenced once and discarded, so
//! both builds see the same unused-value diagnostics.

#[cfg(feature = "tracing")]
macro_rules! trace_scope {
    ($name:expr, $($field:tt)+) => {
        tracing::info_span!($name, $($field)+).entered()
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_scope {
    ($name:expr, $($field:tt)+) => {
        ()
    };
}

#[cfg(feature = "tracing")]
macro_rules! trace_count {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_count {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {{
        $(let _ = &$value;)+
    }};
}

pub(crate) use trace_count;
pub(crate) use trace_scope;
