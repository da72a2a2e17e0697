//! Host-facing log channel for loader events.

/// Fire-and-forget sink the loader reports skips and caught failures on.
///
/// Any `Fn(&str)` closure is a sink, so embedders can route messages into
/// their own logging with no adapter type.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message)
    }
}

/// Default sink forwarding loader messages to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: &str) {
        tracing::info!("{message}");
    }
}
