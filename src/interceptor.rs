use std::fmt;
use std::future::Future;
use std::pin::Pin;

use url::Url;

use crate::error::Error;
use crate::options::Options;

type Handling<T> = Pin<Box<dyn Future<Output = crate::Result<T>> + Send>>;

pub(crate) type RequestHook = Box<dyn Fn(Url, Options) -> Handling<(Url, Options)> + Send + Sync>;

pub(crate) type RequestErrorHook =
    Box<dyn Fn(Error, Url, Options) -> Handling<(Url, Options)> + Send + Sync>;

pub(crate) type ResponseHook<T> = Box<dyn Fn(T, Url, Options) -> Handling<T> + Send + Sync>;

pub(crate) type ResponseErrorHook<T> = Box<dyn Fn(Error, Url, Options) -> Handling<T> + Send + Sync>;

/// A set of hooks that run around every call dispatched through a
/// [`Chain`][crate::Chain].
///
/// All four hooks are optional. An interceptor with none installed is legal
/// and completely transparent. Hooks for a phase the interceptor doesn't
/// participate in simply pass the in-flight value along unchanged.
///
/// # Rails
///
/// Each phase carries either a success value or an [`Error`]. The plain
/// hooks ([`on_request`][Self::on_request], [`on_response`][Self::on_response])
/// only run while the phase is on the success rail; the error hooks
/// ([`on_request_error`][Self::on_request_error],
/// [`on_response_error`][Self::on_response_error]) only run on the failure
/// rail, and returning `Ok` from one converts the phase back to the success
/// rail for the interceptors after it.
///
/// An interceptor's own error hook never observes an error raised by its own
/// plain hook in the same phase. Only an interceptor registered *later* can
/// handle it.
pub struct Interceptor<T> {
    pub(crate) request: Option<RequestHook>,
    pub(crate) request_error: Option<RequestErrorHook>,
    pub(crate) response: Option<ResponseHook<T>>,
    pub(crate) response_error: Option<ResponseErrorHook<T>>,
}

// ===== impl Interceptor =====

impl<T> Interceptor<T> {
    /// Constructs an interceptor with no hooks installed.
    pub fn new() -> Interceptor<T> {
        Interceptor {
            request: None,
            request_error: None,
            response: None,
            response_error: None,
        }
    }

    /// Run a hook before the call is dispatched.
    ///
    /// The hook receives the url and options as left by the previous
    /// request hook, and the pair it resolves with is what the next request
    /// hook sees. Note that the *dispatched call* still receives the
    /// original pair; see [`Chain::execute`][crate::Chain::execute].
    ///
    /// Resolving with `Err` switches the request phase onto the failure
    /// rail.
    ///
    /// # Example
    ///
    /// ```rust
    /// # fn with_interceptor(interceptor: waylay::Interceptor<String>) -> waylay::Interceptor<String> {
    /// interceptor.on_request(|mut url, options| async move {
    ///     url.set_path("/v2");
    ///     Ok((url, options))
    /// })
    /// # }
    /// ```
    pub fn on_request<F, Fut>(mut self, hook: F) -> Interceptor<T>
    where
        F: Fn(Url, Options) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<(Url, Options)>> + Send + 'static,
    {
        self.request = Some(Box::new(
            move |url: Url, options: Options| -> Handling<(Url, Options)> {
                Box::pin(hook(url, options))
            },
        ));
        self
    }

    /// Run a hook when the request phase is on the failure rail.
    ///
    /// The hook receives the error raised by an *earlier* interceptor's
    /// request hook, together with the original url and options of the call
    /// for context. Resolving with `Ok` puts the phase back on the success
    /// rail; resolving with `Err` passes a failure on to the next
    /// interceptor.
    pub fn on_request_error<F, Fut>(mut self, hook: F) -> Interceptor<T>
    where
        F: Fn(Error, Url, Options) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<(Url, Options)>> + Send + 'static,
    {
        self.request_error = Some(Box::new(
            move |error: Error, url: Url, options: Options| -> Handling<(Url, Options)> {
                Box::pin(hook(error, url, options))
            },
        ));
        self
    }

    /// Run a hook over the value the call resolved with.
    ///
    /// The hook receives the response as left by the previous response hook,
    /// plus the original url and options for context, and may replace it.
    /// Resolving with `Err` switches the response phase onto the failure
    /// rail.
    pub fn on_response<F, Fut>(mut self, hook: F) -> Interceptor<T>
    where
        F: Fn(T, Url, Options) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<T>> + Send + 'static,
    {
        self.response = Some(Box::new(
            move |response: T, url: Url, options: Options| -> Handling<T> {
                Box::pin(hook(response, url, options))
            },
        ));
        self
    }

    /// Run a hook when the response phase is on the failure rail.
    ///
    /// The failure may have come from the dispatched call itself, from the
    /// request phase settling on the failure rail with nobody recovering
    /// it, or from an earlier response hook. Resolving with `Ok` converts
    /// the failure into a response for the interceptors after this one;
    /// resolving with `Err` passes a failure along.
    pub fn on_response_error<F, Fut>(mut self, hook: F) -> Interceptor<T>
    where
        F: Fn(Error, Url, Options) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<T>> + Send + 'static,
    {
        self.response_error = Some(Box::new(
            move |error: Error, url: Url, options: Options| -> Handling<T> {
                Box::pin(hook(error, url, options))
            },
        ));
        self
    }
}

impl<T> Default for Interceptor<T> {
    fn default() -> Interceptor<T> {
        Interceptor::new()
    }
}

impl<T> fmt::Debug for Interceptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("request", &self.request.is_some())
            .field("request_error", &self.request_error.is_some())
            .field("response", &self.response.is_some())
            .field("response_error", &self.response_error.is_some())
            .finish()
    }
}
