//! An advisory deadline around one dispatched call.
//!
//! A timeout here does not race the call against a timer and synthesize an
//! error when the timer wins. It cancels the call's token when the duration
//! elapses and then keeps waiting: the outcome of a timed-out call is
//! whatever the call itself settles with. A callee that honors its token
//! rejects promptly, conventionally with [`Aborted`][crate::Aborted] in its
//! source chain; one that ignores it simply runs to completion as if no
//! deadline existed.
//!
//! # Composing with a caller's signal
//!
//! When the options already carry a cancellation token, the wrapper hands
//! the callee a child of it. Cancelling the caller's token cancels the
//! child, while the deadline cancelling the child leaves the caller's token
//! untouched. Either way the callee watches exactly one token.

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::fetch::Fetch;
use crate::options::Options;

/// Dispatch `fetch` once, cancelling its token if `options.timeout()`
/// elapses first.
///
/// The timeout stays visible to the callee through its options; only the
/// signal is replaced, by the composed token described in the
/// [module docs][self]. With no timeout set this still installs the
/// composed token and then just awaits the call.
///
/// The timer arms at most one cancellation. Once it has fired, or once the
/// call settles, it is disarmed for good.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use waylay::{fetch_fn, timeout, Aborted, Error, Options, Url};
///
/// # async fn run() {
/// let fetch = fetch_fn(|_url, options: Options| async move {
///     let signal = options.signal().cloned().expect("wrapper installs a token");
///     tokio::select! {
///         _ = signal.cancelled() => Err(Error::fetch(Aborted)),
///         _ = tokio::time::sleep(Duration::from_secs(60)) => Ok("slow"),
///     }
/// });
///
/// let url = Url::parse("http://example.com").unwrap();
/// let options = Options::new().with_timeout(Duration::from_millis(100));
/// let err = timeout::fetch_with_timeout(&fetch, url, options)
///     .await
///     .unwrap_err();
/// assert!(err.is_aborted());
/// # }
/// ```
pub async fn fetch_with_timeout<F>(
    fetch: &F,
    url: Url,
    mut options: Options,
) -> crate::Result<F::Output>
where
    F: Fetch + ?Sized,
{
    let timeout = options.timeout().copied();

    // One token for the callee to watch: a child of the caller's signal
    // when there is one, so an external abort propagates in but an expired
    // deadline never propagates out.
    let cancel = match options.signal() {
        Some(external) => external.child_token(),
        None => CancellationToken::new(),
    };
    *options.signal_mut() = Some(cancel.clone());

    let fut = fetch.fetch(url, options);
    tokio::pin!(fut);

    let Some(deadline) = timeout else {
        return fut.await;
    };

    let sleep = tokio::time::sleep(deadline);
    tokio::pin!(sleep);

    let mut fired = false;
    loop {
        tokio::select! {
            outcome = &mut fut => return outcome,
            () = &mut sleep, if !fired => {
                fired = true;
                log::debug!("deadline of {deadline:?} elapsed, cancelling in-flight call");
                cancel.cancel();
            }
        }
    }
}
