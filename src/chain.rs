use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use url::Url;

use crate::fetch::{Fetch, Intercepted};
use crate::interceptor::Interceptor;
use crate::options::Options;
use crate::timeout;

/// An ordered collection of [`Interceptor`]s around calls that resolve with
/// a `T`.
///
/// A `Chain` is cheap to clone; clones share the same registry, so an
/// interceptor registered through one handle applies to calls executed
/// through any of them. Mutating the registry while a call is in flight is
/// fine: each call works off the registrations it saw when it started.
///
/// # Example
///
/// ```rust
/// use waylay::{fetch_fn, Chain, Interceptor, Options};
///
/// # async fn run() -> Result<(), waylay::Error> {
/// let chain: Chain<String> = Chain::new();
///
/// chain.register(
///     Interceptor::new().on_response(|body: String, _url, _options| async move {
///         Ok(body.to_uppercase())
///     }),
/// );
///
/// let client = chain.bind(fetch_fn(|url, _options| async move {
///     Ok::<_, waylay::Error>(format!("hello from {url}"))
/// }));
///
/// let body = client.fetch("http://example.com", Options::new()).await?;
/// assert_eq!(body, "HELLO FROM HTTP://EXAMPLE.COM/");
/// # Ok(())
/// # }
/// ```
pub struct Chain<T> {
    inner: Arc<ChainRef<T>>,
}

struct ChainRef<T> {
    interceptors: Mutex<Vec<Arc<Interceptor<T>>>>,
}

/// A handle to one registration in a [`Chain`], returned by
/// [`Chain::register()`].
///
/// Dropping the handle does *not* unregister the interceptor; call
/// [`remove()`][Registration::remove] to do that.
pub struct Registration<T> {
    chain: Weak<ChainRef<T>>,
    interceptor: Arc<Interceptor<T>>,
}

// ===== impl Chain =====

impl<T> Chain<T> {
    /// Constructs a chain with no interceptors.
    pub fn new() -> Chain<T> {
        Chain {
            inner: Arc::new(ChainRef {
                interceptors: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Append an interceptor to the chain.
    ///
    /// Interceptors run in registration order, in both the request and the
    /// response phase.
    pub fn register(&self, interceptor: Interceptor<T>) -> Registration<T> {
        let interceptor = Arc::new(interceptor);
        self.inner
            .interceptors
            .lock()
            .unwrap()
            .push(Arc::clone(&interceptor));
        Registration {
            chain: Arc::downgrade(&self.inner),
            interceptor,
        }
    }

    /// Remove every registered interceptor.
    ///
    /// Calls already in flight keep the interceptors they started with.
    pub fn clear(&self) {
        self.inner.interceptors.lock().unwrap().clear();
    }

    fn snapshot(&self) -> Vec<Arc<Interceptor<T>>> {
        self.inner.interceptors.lock().unwrap().clone()
    }

    /// Run one call through the chain.
    ///
    /// The set of interceptors is snapshotted on entry, so registrations
    /// and removals while the call is in flight apply only to later calls.
    /// Three stages then run in sequence:
    ///
    /// 1. **Request phase.** Every interceptor's request hooks, in
    ///    registration order, threading a `(Url, Options)` pair along the
    ///    success rail and an [`Error`][crate::Error] along the failure
    ///    rail.
    /// 2. **Dispatch.** If the request phase settled on the success rail,
    ///    the underlying call runs, routed through
    ///    [`timeout::fetch_with_timeout`] when a timeout is set. The call
    ///    receives the *original* url and options, not the pair the request
    ///    phase produced: request-hook transformations are visible to later
    ///    request hooks and to nothing else. A request phase that settled
    ///    on the failure rail skips dispatch entirely.
    /// 3. **Response phase.** Every interceptor's response hooks, again in
    ///    registration order (not reversed), threading the pending outcome.
    ///
    /// The original url and options are also the context handed to every
    /// error hook and every response hook.
    pub async fn execute<F>(&self, fetch: &F, url: Url, options: Options) -> crate::Result<T>
    where
        F: Fetch<Output = T> + ?Sized,
    {
        let interceptors = self.snapshot();
        log::trace!("executing {} interceptor(s) for {url}", interceptors.len());

        // Request phase. The success rail threads the transformed pair;
        // error hooks get the original one as context.
        let mut rail: crate::Result<(Url, Options)> = Ok((url.clone(), options.clone()));
        for interceptor in &interceptors {
            rail = match rail {
                Ok((current_url, current_options)) => match interceptor.request {
                    Some(ref hook) => hook(current_url, current_options).await,
                    None => Ok((current_url, current_options)),
                },
                Err(error) => match interceptor.request_error {
                    Some(ref hook) => hook(error, url.clone(), options.clone()).await,
                    None => Err(error),
                },
            };
        }

        // Dispatch, always with the original pair. The transformed pair
        // only ever mattered to the request hooks themselves.
        let mut outcome = match rail {
            Ok(_) => {
                if options.timeout().is_some() {
                    timeout::fetch_with_timeout(fetch, url.clone(), options.clone()).await
                } else {
                    fetch.fetch(url.clone(), options.clone()).await
                }
            }
            Err(error) => Err(error),
        };

        // Response phase.
        for interceptor in &interceptors {
            outcome = match outcome {
                Ok(response) => match interceptor.response {
                    Some(ref hook) => hook(response, url.clone(), options.clone()).await,
                    None => Ok(response),
                },
                Err(error) => match interceptor.response_error {
                    Some(ref hook) => hook(error, url.clone(), options.clone()).await,
                    None => Err(error),
                },
            };
        }

        outcome
    }

    /// Bind an underlying call to this chain, yielding an invoker that
    /// routes every call through it.
    ///
    /// The chain is shared, not copied: interceptors registered afterwards
    /// apply to calls made through the returned [`Intercepted`] too.
    pub fn bind<F>(&self, fetch: F) -> Intercepted<F>
    where
        F: Fetch<Output = T>,
    {
        Intercepted::new(self.clone(), fetch)
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Chain<T> {
        Chain::new()
    }
}

impl<T> Clone for Chain<T> {
    fn clone(&self) -> Chain<T> {
        Chain {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("interceptors", &self.inner.interceptors.lock().unwrap().len())
            .finish()
    }
}

// ===== impl Registration =====

impl<T> Registration<T> {
    /// Unregister the interceptor this handle was returned for.
    ///
    /// Removing twice, or removing after [`Chain::clear()`], is a no-op.
    /// Calls already in flight keep running the interceptor; it only stops
    /// applying to calls that start afterwards.
    pub fn remove(&self) {
        let Some(chain) = self.chain.upgrade() else {
            return;
        };
        let mut interceptors = chain.interceptors.lock().unwrap();
        if let Some(index) = interceptors
            .iter()
            .position(|other| Arc::ptr_eq(other, &self.interceptor))
        {
            interceptors.remove(index);
        }
    }
}

impl<T> fmt::Debug for Registration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").finish_non_exhaustive()
    }
}
