use std::error::Error as StdError;
use std::fmt;
use std::io;

use crate::Url;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// The errors that may occur when running a call through a chain.
///
/// An `Error` knows which stage produced it: building the call, a
/// request-phase interceptor, the dispatched call itself, or a
/// response-phase interceptor. The chain never rewraps an error on its way
/// to the caller, so the value a hook or a [`Fetch`][crate::Fetch]
/// implementation constructed is the value the caller sees.
pub struct Error {
    inner: Box<Inner>,
}

/// A `Result` alias where the `Err` case is `waylay::Error`.
pub type Result<T> = std::result::Result<T, Error>;

struct Inner {
    kind: Kind,
    source: Option<BoxError>,
    url: Option<Url>,
}

impl Error {
    pub(crate) fn new(kind: Kind, source: Option<BoxError>) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source,
                url: None,
            }),
        }
    }

    /// Construct an error from building the call, before anything ran.
    pub fn builder<E: Into<BoxError>>(source: E) -> Error {
        Error::new(Kind::Builder, Some(source.into()))
    }

    /// Construct an error raised by a request-phase interceptor.
    pub fn request<E: Into<BoxError>>(source: E) -> Error {
        Error::new(Kind::Request, Some(source.into()))
    }

    /// Construct an error raised by the dispatched call itself.
    ///
    /// This is the constructor [`Fetch`][crate::Fetch] implementations use
    /// for their native failures, including an abort observed on the
    /// cancellation token (see [`Aborted`]).
    pub fn fetch<E: Into<BoxError>>(source: E) -> Error {
        Error::new(Kind::Fetch, Some(source.into()))
    }

    /// Construct an error raised by a response-phase interceptor.
    pub fn response<E: Into<BoxError>>(source: E) -> Error {
        Error::new(Kind::Response, Some(source.into()))
    }

    /// Attach a url related to this error.
    pub fn with_url(mut self, url: Url) -> Error {
        self.inner.url = Some(url);
        self
    }

    /// Returns a possible URL related to this error.
    pub fn url(&self) -> Option<&Url> {
        self.inner.url.as_ref()
    }

    /// Returns a mutable reference to the URL related to this error.
    ///
    /// This is useful if you need to remove sensitive parts of the url such
    /// as the password.
    pub fn url_mut(&mut self) -> Option<&mut Url> {
        self.inner.url.as_mut()
    }

    /// Returns true if the error originated while building the call.
    pub fn is_builder(&self) -> bool {
        matches!(self.inner.kind, Kind::Builder)
    }

    /// Returns true if the error was raised by a request-phase interceptor.
    pub fn is_request(&self) -> bool {
        matches!(self.inner.kind, Kind::Request)
    }

    /// Returns true if the error came from the dispatched call.
    pub fn is_fetch(&self) -> bool {
        matches!(self.inner.kind, Kind::Fetch)
    }

    /// Returns true if the error was raised by a response-phase interceptor.
    pub fn is_response(&self) -> bool {
        matches!(self.inner.kind, Kind::Response)
    }

    /// Returns true if the error's source chain contains an [`Aborted`]
    /// marker, meaning the underlying call stopped because its cancellation
    /// token fired.
    ///
    /// A deadline expiry and an externally signalled abort cancel the same
    /// token, so the two are indistinguishable here. That is why this is
    /// `is_aborted` and not `is_timeout`.
    pub fn is_aborted(&self) -> bool {
        let mut source = self.source();
        while let Some(err) = source {
            if err.is::<Aborted>() {
                return true;
            }
            // io::Error::source() returns the payload's source, not the
            // payload itself, so look for the marker there directly.
            if let Some(io) = err.downcast_ref::<io::Error>() {
                if let Some(inner) = io.get_ref() {
                    if inner.is::<Aborted>() {
                        return true;
                    }
                }
            }
            source = err.source();
        }
        false
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("waylay::Error");

        builder.field("kind", &self.inner.kind);

        if let Some(ref url) = self.inner.url {
            builder.field("url", &url.as_str());
        }

        if let Some(ref source) = self.inner.source {
            builder.field("source", source);
        }

        builder.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.kind {
            Kind::Builder => f.write_str("builder error")?,
            Kind::Request => f.write_str("request interceptor error")?,
            Kind::Fetch => f.write_str("error dispatching call")?,
            Kind::Response => f.write_str("response interceptor error")?,
        };

        if let Some(ref url) = self.inner.url {
            write!(f, " for url ({url})")?;
        }

        if let Some(ref source) = self.inner.source {
            write!(f, ": {source}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Kind {
    Builder,
    Request,
    Fetch,
    Response,
}

/// A marker error for a call that stopped because its cancellation token
/// fired.
///
/// [`Fetch`][crate::Fetch] implementations that honor an abort are expected
/// to surface this in the source chain of the error they reject with, so
/// [`Error::is_aborted`] can recognize the outcome. The deadline wrapper
/// never constructs one itself: a cancelled call still settles with
/// whatever outcome the call surfaced.
#[derive(Debug, Clone, Copy)]
pub struct Aborted;

impl fmt::Display for Aborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("operation aborted")
    }
}

impl StdError for Aborted {}

// Url parsed fine but is unusable as the target of a call, e.g. `file://`.
#[derive(Debug)]
pub(crate) struct BadScheme;

impl fmt::Display for BadScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("URL scheme is not allowed")
    }
}

impl StdError for BadScheme {}

pub(crate) fn url_bad_scheme(url: Url) -> Error {
    Error::builder(BadScheme).with_url(url)
}
