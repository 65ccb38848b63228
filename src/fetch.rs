use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower_service::Service;
use url::Url;

use crate::chain::Chain;
use crate::into_url::IntoUrl;
use crate::options::Options;

/// Alias for the `Future` type returned by a [`Fetch`].
pub type Fetching<T> = Pin<Box<dyn Future<Output = crate::Result<T>> + Send>>;

/// Trait for the underlying call a chain wraps.
pub trait Fetch: Send + Sync {
    /// The value a successful call resolves with.
    type Output: Send + 'static;

    /// Dispatch one call to `url` with the given options.
    ///
    /// It differs from `tower_service::Service<(Url, Options)>` in several
    /// ways:
    ///  * It is assumed that `fetch` will always be ready to poll.
    ///  * It does not need a mutable reference to `self`.
    ///  * Since trait objects cannot make use of generic methods, it
    ///    requires wrapping the returned `Future` with `Box`.
    ///
    /// Implementations that can stop early should watch
    /// `options.signal()` and reject with an error whose source chain
    /// contains [`Aborted`][crate::Aborted] when the token fires. Honoring
    /// the token is cooperative: the chain never drops a dispatched future
    /// on cancellation, it keeps waiting for the call to settle.
    fn fetch(&self, url: Url, options: Options) -> Fetching<Self::Output>;
}

/// Adapt a closure into a [`Fetch`].
///
/// # Example
///
/// ```rust
/// use waylay::{fetch_fn, Options};
///
/// let fetch = fetch_fn(|url, _options: Options| async move {
///     Ok::<_, waylay::Error>(format!("called {url}"))
/// });
/// ```
pub fn fetch_fn<F, Fut, T>(func: F) -> FetchFn<F>
where
    F: Fn(Url, Options) -> Fut + Send + Sync,
    Fut: Future<Output = crate::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    FetchFn(func)
}

/// A [`Fetch`] backed by a closure, created by [`fetch_fn()`].
#[derive(Clone, Copy)]
pub struct FetchFn<F>(F);

impl<F, Fut, T> Fetch for FetchFn<F>
where
    F: Fn(Url, Options) -> Fut + Send + Sync,
    Fut: Future<Output = crate::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    type Output = T;

    fn fetch(&self, url: Url, options: Options) -> Fetching<T> {
        Box::pin((self.0)(url, options))
    }
}

impl<F> fmt::Debug for FetchFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FetchFn")
    }
}

/// A [`Fetch`] bound to the [`Chain`] it dispatches through, created by
/// [`Chain::bind()`].
///
/// Every call made through an `Intercepted` runs the chain's request phase,
/// the underlying call (routed through the deadline wrapper when a timeout
/// is set), and the chain's response phase. The chain stays shared:
/// interceptors registered after the bind apply to later calls made through
/// this value.
pub struct Intercepted<F: Fetch> {
    chain: Chain<F::Output>,
    fetch: F,
}

// ===== impl Intercepted =====

impl<F: Fetch> Intercepted<F> {
    pub(crate) fn new(chain: Chain<F::Output>, fetch: F) -> Intercepted<F> {
        Intercepted { chain, fetch }
    }

    /// Run one call through the chain.
    pub async fn fetch(&self, url: impl IntoUrl, options: Options) -> crate::Result<F::Output> {
        self.chain.execute(&self.fetch, url.into_url()?, options).await
    }

    /// Get the chain calls are dispatched through.
    pub fn chain(&self) -> &Chain<F::Output> {
        &self.chain
    }

    /// Get a reference to the underlying call.
    pub fn get_ref(&self) -> &F {
        &self.fetch
    }
}

impl<F: Fetch + Clone> Clone for Intercepted<F> {
    fn clone(&self) -> Intercepted<F> {
        Intercepted {
            chain: self.chain.clone(),
            fetch: self.fetch.clone(),
        }
    }
}

impl<F: Fetch> fmt::Debug for Intercepted<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intercepted")
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}

impl<F> Service<(Url, Options)> for Intercepted<F>
where
    F: Fetch + Clone + 'static,
{
    type Response = F::Output;
    type Error = crate::Error;
    type Future = Fetching<F::Output>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, (url, options): (Url, Options)) -> Self::Future {
        let intercepted = self.clone();
        Box::pin(async move {
            intercepted
                .chain
                .execute(&intercepted.fetch, url, options)
                .await
        })
    }
}
