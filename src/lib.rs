#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

//! # waylay
//!
//! The `waylay` crate wraps an asynchronous call, HTTP or otherwise, with
//! the two things clients keep rebuilding around one: an ordered
//! interceptor [`Chain`] and an advisory per-call deadline.
//!
//! It stays out of the call itself. You bring the function that talks to
//! the network; waylay runs your hooks around it and cancels its token
//! when told to.
//!
//! - Request and response hooks with explicit success and failure rails
//! - Advisory deadlines that cancel, never abandon, the call
//! - Caller-supplied cancellation composed with the deadline into one token
//! - A [`tower_service::Service`] impl on the bound invoker
//!
//! ## Intercepting a call
//!
//! Register [`Interceptor`]s on a [`Chain`], then either bind the chain to
//! an underlying call with [`Chain::bind()`] or run one-off calls with
//! [`Chain::execute()`].
//!
//! ```rust
//! use std::time::Duration;
//!
//! use waylay::{fetch_fn, Chain, Interceptor, Options};
//!
//! # async fn run() -> Result<(), waylay::Error> {
//! let chain: Chain<String> = Chain::new();
//!
//! chain.register(
//!     Interceptor::new()
//!         .on_request(|url, options| async move {
//!             log::debug!("calling {url}");
//!             Ok((url, options))
//!         })
//!         .on_response_error(|error, _url, _options| async move {
//!             if error.is_aborted() {
//!                 Ok(String::from("fallback"))
//!             } else {
//!                 Err(error)
//!             }
//!         }),
//! );
//!
//! let client = chain.bind(fetch_fn(|url, _options| async move {
//!     Ok::<_, waylay::Error>(format!("hello from {url}"))
//! }));
//!
//! let body = client
//!     .fetch(
//!         "http://example.com",
//!         Options::new().with_timeout(Duration::from_secs(2)),
//!     )
//!     .await?;
//! # drop(body);
//! # Ok(())
//! # }
//! ```
//!
//! ## Deadlines and cancellation
//!
//! A timeout in [`Options`] never produces a synthetic timeout error. The
//! deadline wrapper cancels the token the callee watches and keeps
//! waiting, so the outcome of a timed-out call is always the call's own;
//! see the [`timeout`] module. A caller-supplied token set with
//! [`Options::with_signal()`] composes with the deadline, and
//! [`Error::is_aborted()`] recognizes the conventional rejection for both.

mod chain;
mod error;
mod fetch;
mod interceptor;
mod into_url;
mod options;
pub mod timeout;

pub use url::Url;

pub use self::chain::{Chain, Registration};
pub use self::error::{Aborted, Error, Result};
pub use self::fetch::{fetch_fn, Fetch, FetchFn, Fetching, Intercepted};
pub use self::interceptor::Interceptor;
pub use self::into_url::IntoUrl;
pub use self::options::Options;
