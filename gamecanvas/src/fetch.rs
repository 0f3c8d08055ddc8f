//! Background downloads for the web cache.
//!
//! Requests go over a channel to a worker thread running its own runtime, one
//! task per download. Results come back over a second channel and are handed
//! to the cache once per frame by [`Deliveries::drain_into`], on the frame thread.

use gamecanvas_core::cache::{Fetcher, Kind, WebCache};

const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(20);

#[derive(thiserror::Error, Debug)]
enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("not a readable image: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Request {
    Image(String),
    Text(String),
}

#[derive(Debug)]
pub enum Fetched {
    Image { url: String, image: image::RgbaImage },
    Text { url: String, text: String },
    Failed { kind: Kind, url: String, reason: String },
}

/// Sends requests to the worker. Dropping it stops the worker.
pub struct HttpFetcher {
    requests: tokio::sync::mpsc::UnboundedSender<Request>,
}
impl HttpFetcher {
    pub fn spawn() -> anyhow::Result<(Self, Deliveries)> {
        let client = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let (send_request, mut requests) = tokio::sync::mpsc::unbounded_channel();
        let (send_result, results) = crossbeam::channel::unbounded();

        std::thread::Builder::new()
            .name("Fetch worker".to_owned())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        log::error!("Fetch runtime failed to start, downloads disabled:\n{e:?}");
                        return;
                    }
                };
                // Downloads interleave on this one thread. They're all waiting on the network anyway.
                runtime.block_on(async move {
                    while let Some(request) = requests.recv().await {
                        let client = client.clone();
                        let results: crossbeam::channel::Sender<Fetched> = send_result.clone();
                        tokio::spawn(async move {
                            // Receiver gone means we're shutting down.
                            let _ = results.send(fetch(&client, request).await);
                        });
                    }
                    log::trace!("fetch worker exiting");
                });
            })?;

        Ok((
            Self {
                requests: send_request,
            },
            Deliveries { results },
        ))
    }
    fn send(&self, request: Request) {
        if let Err(e) = self.requests.send(request) {
            log::warn!("fetch worker is gone, dropping request for {:?}", e.0);
        }
    }
}
impl Fetcher for HttpFetcher {
    fn request_image(&self, url: &str) {
        log::debug!("requesting image {url}");
        self.send(Request::Image(url.to_owned()));
    }
    fn request_text(&self, url: &str) {
        log::debug!("requesting text {url}");
        self.send(Request::Text(url.to_owned()));
    }
}

async fn fetch(client: &reqwest::Client, request: Request) -> Fetched {
    match try_fetch(client, &request).await {
        Ok(fetched) => fetched,
        Err(e) => {
            let (kind, url) = match request {
                Request::Image(url) => (Kind::Image, url),
                Request::Text(url) => (Kind::Text, url),
            };
            Fetched::Failed {
                kind,
                url,
                reason: e.to_string(),
            }
        }
    }
}
async fn try_fetch(client: &reqwest::Client, request: &Request) -> Result<Fetched, FetchError> {
    match request {
        Request::Image(url) => {
            let bytes = client.get(url).send().await?.error_for_status()?.bytes().await?;
            let image = image::load_from_memory(&bytes)?.into_rgba8();
            Ok(Fetched::Image {
                url: url.clone(),
                image,
            })
        }
        Request::Text(url) => {
            let text = client.get(url).send().await?.error_for_status()?.text().await?;
            Ok(Fetched::Text {
                url: url.clone(),
                text,
            })
        }
    }
}

/// Finished downloads waiting to be handed to the cache.
pub struct Deliveries {
    results: crossbeam::channel::Receiver<Fetched>,
}
impl Deliveries {
    /// Move every finished download into `cache`, images by way of the global texture store.
    /// Returns how many were delivered.
    pub fn drain_into(&self, cache: &mut WebCache) -> usize {
        let mut delivered = 0;
        for fetched in self.results.try_iter() {
            delivered += 1;
            match fetched {
                Fetched::Image { url, image } => {
                    let info = crate::global::textures().write().insert(image);
                    log::debug!("downloaded {url}, {}x{}", info.width, info.height);
                    cache.resolve_image(&url, info);
                }
                Fetched::Text { url, text } => {
                    log::debug!("downloaded {url}, {} bytes", text.len());
                    cache.resolve_text(&url, text);
                }
                Fetched::Failed { kind, url, reason } => cache.fail(kind, &url, reason),
            }
        }
        delivered
    }
}
