use std::time::Duration;

use http::Extensions;
use tokio_util::sync::CancellationToken;

/// The options accompanying a single call.
///
/// An `Options` travels next to the url through the request phase, into the
/// dispatched call, and is handed to every hook as context. It has a fixed
/// shape: an optional deadline, an optional cancellation token, and a typed
/// grab bag of [`Extensions`] for anything the underlying call or the
/// installed interceptors want to smuggle through.
///
/// # Deadline
///
/// `timeout` is advisory. When it is set, dispatching through a
/// [`Chain`][crate::Chain] routes the call through the deadline wrapper,
/// which cancels the call's token once the duration elapses and then keeps
/// waiting; see the [`timeout`][crate::timeout] module. `Some(Duration::ZERO)`
/// arms a timer that fires immediately, while `None` arms no timer at all.
///
/// # Cancellation
///
/// `signal` lets a caller abort the call from outside. The deadline wrapper
/// replaces it with a child token, so the token an underlying call observes
/// is cancelled by *either* the caller's signal or the deadline, and
/// cancelling the child never propagates back out to the caller's token.
#[derive(Clone, Debug, Default)]
pub struct Options {
    timeout: Option<Duration>,
    signal: Option<CancellationToken>,
    extensions: Extensions,
}

impl Options {
    /// Constructs empty options: no deadline, no signal, no extensions.
    #[inline]
    pub fn new() -> Options {
        Options::default()
    }

    /// Get the timeout.
    #[inline]
    pub fn timeout(&self) -> Option<&Duration> {
        self.timeout.as_ref()
    }

    /// Get a mutable reference to the timeout.
    #[inline]
    pub fn timeout_mut(&mut self) -> &mut Option<Duration> {
        &mut self.timeout
    }

    /// Get the cancellation token.
    #[inline]
    pub fn signal(&self) -> Option<&CancellationToken> {
        self.signal.as_ref()
    }

    /// Get a mutable reference to the cancellation token.
    #[inline]
    pub fn signal_mut(&mut self) -> &mut Option<CancellationToken> {
        &mut self.signal
    }

    /// Get the extensions.
    #[inline]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Get a mutable reference to the extensions.
    #[inline]
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Set an advisory deadline for the call.
    pub fn with_timeout(mut self, timeout: Duration) -> Options {
        self.timeout = Some(timeout);
        self
    }

    /// Set a token the caller can cancel to abort the call.
    pub fn with_signal(mut self, signal: CancellationToken) -> Options {
        self.signal = Some(signal);
        self
    }
}
