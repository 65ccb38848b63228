#![deny(warnings)]

//! `cargo run --example simple`

use std::time::Duration;

use waylay::{fetch_fn, Chain, Error, Interceptor, Options};

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let chain: Chain<String> = Chain::new();

    chain.register(
        Interceptor::new()
            .on_request(|url, options| async move {
                println!("-> {url}");
                Ok((url, options))
            })
            .on_response(|body: String, _url, _options| async move { Ok(body.to_uppercase()) }),
    );

    // Stands in for a real network call: sleeps a little, honors its token.
    let client = chain.bind(fetch_fn(|url, options: Options| async move {
        let nap = tokio::time::sleep(Duration::from_millis(50));
        match options.signal() {
            Some(signal) => {
                tokio::select! {
                    _ = signal.cancelled() => return Err(Error::fetch(waylay::Aborted)),
                    _ = nap => {}
                }
            }
            None => nap.await,
        }
        Ok(format!("response from {url}"))
    }));

    let body = client.fetch("http://example.com", Options::new()).await?;
    println!("{body}");

    let err = client
        .fetch(
            "http://example.com/slow",
            Options::new().with_timeout(Duration::from_millis(10)),
        )
        .await
        .unwrap_err();
    println!("timed out: {err} (aborted: {})", err.is_aborted());

    Ok(())
}
