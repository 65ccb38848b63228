#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use waylay::{fetch_fn, Fetch, Options, Url};

/// Records the order hooks and dispatches ran in, across tasks.
#[derive(Clone, Default)]
pub struct Events(Arc<Mutex<Vec<&'static str>>>);

impl Events {
    pub fn new() -> Events {
        Events::default()
    }

    pub fn push(&self, name: &'static str) {
        self.0.lock().unwrap().push(name);
    }

    pub fn recorded(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

/// A fetch that resolves immediately with `body`.
pub fn ok_fetch(body: &'static str) -> impl Fetch<Output = String> + Clone {
    fetch_fn(move |_url, _options| async move { Ok::<_, waylay::Error>(body.to_owned()) })
}

/// A fetch that resolves with `body` and records every `(url, options)`
/// pair it was dispatched with.
pub fn recording_fetch(
    body: &'static str,
) -> (
    impl Fetch<Output = String> + Clone,
    Arc<Mutex<Vec<(Url, Options)>>>,
) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&calls);
    let fetch = fetch_fn(move |url: Url, options: Options| {
        let seen = Arc::clone(&seen);
        async move {
            seen.lock().unwrap().push((url, options));
            Ok::<_, waylay::Error>(body.to_owned())
        }
    });
    (fetch, calls)
}
