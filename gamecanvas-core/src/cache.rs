//! URL-keyed cache of downloaded images and text.
//!
//! Images and text are cached separately, so the same URL may be held once as
//! each. Lookups never block. The first lookup of a URL records it as pending and
//! asks the [`Fetcher`] for it; the owner later reports the outcome through
//! [`WebCache::resolve_image`], [`WebCache::resolve_text`] or [`WebCache::fail`].

use crate::assets::ImageInfo;
use std::sync::Arc;

/// Something that can download in the background.
/// Calls must return immediately.
pub trait Fetcher {
    fn request_image(&self, url: &str);
    fn request_text(&self, url: &str);
}

/// Drops every request. Entries stay pending forever.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoFetcher;
impl Fetcher for NoFetcher {
    fn request_image(&self, url: &str) {
        log::debug!("no fetcher available, dropping image request for {url}");
    }
    fn request_text(&self, url: &str) {
        log::debug!("no fetcher available, dropping text request for {url}");
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CacheEntry {
    Pending,
    Image(ImageInfo),
    Text(Arc<str>),
    /// Kept so the reason can be inspected. The next lookup retries.
    Failed(Arc<str>),
}

/// What a URL was requested as.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Image,
    Text,
}

pub struct WebCache {
    images: hashbrown::HashMap<String, CacheEntry>,
    texts: hashbrown::HashMap<String, CacheEntry>,
    fetcher: Box<dyn Fetcher>,
}
impl std::fmt::Debug for WebCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebCache")
            .field("images", &self.images)
            .field("texts", &self.texts)
            .finish_non_exhaustive()
    }
}
impl Default for WebCache {
    fn default() -> Self {
        Self::new(Box::new(NoFetcher))
    }
}
impl WebCache {
    #[must_use]
    pub fn new(fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            images: hashbrown::HashMap::new(),
            texts: hashbrown::HashMap::new(),
            fetcher,
        }
    }
    fn entries(&self, kind: Kind) -> &hashbrown::HashMap<String, CacheEntry> {
        match kind {
            Kind::Image => &self.images,
            Kind::Text => &self.texts,
        }
    }
    fn entries_mut(&mut self, kind: Kind) -> &mut hashbrown::HashMap<String, CacheEntry> {
        match kind {
            Kind::Image => &mut self.images,
            Kind::Text => &mut self.texts,
        }
    }
    /// Current state of `url` as `kind`, without requesting anything.
    #[must_use]
    pub fn get(&self, kind: Kind, url: &str) -> Option<&CacheEntry> {
        self.entries(kind).get(url)
    }
    /// Ready image for `url`, if downloaded. Starts a download if nothing is known
    /// or the last attempt failed.
    pub fn image(&mut self, url: &str) -> Option<ImageInfo> {
        match self.touch(url, Kind::Image) {
            Some(CacheEntry::Image(info)) => Some(*info),
            _ => None,
        }
    }
    /// Ready text for `url`, if downloaded. Same request rules as [`Self::image`].
    pub fn text(&mut self, url: &str) -> Option<Arc<str>> {
        match self.touch(url, Kind::Text) {
            Some(CacheEntry::Text(text)) => Some(text.clone()),
            _ => None,
        }
    }
    /// Ready image for `url` without requesting.
    #[must_use]
    pub fn peek_image(&self, url: &str) -> Option<ImageInfo> {
        match self.images.get(url) {
            Some(CacheEntry::Image(info)) => Some(*info),
            _ => None,
        }
    }
    fn touch(&mut self, url: &str, kind: Kind) -> Option<&CacheEntry> {
        let request = match self.entries(kind).get(url) {
            None | Some(CacheEntry::Failed(_)) => true,
            Some(_) => false,
        };
        if request {
            self.entries_mut(kind).insert(url.to_owned(), CacheEntry::Pending);
            match kind {
                Kind::Image => self.fetcher.request_image(url),
                Kind::Text => self.fetcher.request_text(url),
            }
        }
        self.entries(kind).get(url)
    }
    /// Report a finished image download.
    pub fn resolve_image(&mut self, url: &str, info: ImageInfo) {
        self.resolve(Kind::Image, url, CacheEntry::Image(info));
    }
    /// Report a finished text download.
    pub fn resolve_text(&mut self, url: &str, text: impl Into<Arc<str>>) {
        self.resolve(Kind::Text, url, CacheEntry::Text(text.into()));
    }
    /// Report a failed download.
    pub fn fail(&mut self, kind: Kind, url: &str, reason: impl Into<Arc<str>>) {
        let reason = reason.into();
        log::warn!("download of {url} failed: {reason}");
        self.resolve(kind, url, CacheEntry::Failed(reason));
    }
    fn resolve(&mut self, kind: Kind, url: &str, entry: CacheEntry) {
        if let Some(slot) = self.entries_mut(kind).get_mut(url) {
            *slot = entry;
        } else {
            // Cleared while in flight.
            log::debug!("dropping {kind:?} result for {url}, no longer requested");
        }
    }
    pub fn clear(&mut self) {
        self.images.clear();
        self.texts.clear();
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len() + self.texts.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.texts.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::{CacheEntry, Fetcher, Kind, WebCache};
    use crate::assets::{ImageInfo, TextureHandle};
    use std::{cell::RefCell, rc::Rc};

    /// Records every request made.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingFetcher(pub Rc<RefCell<Vec<String>>>);
    impl Fetcher for RecordingFetcher {
        fn request_image(&self, url: &str) {
            self.0.borrow_mut().push(format!("image {url}"));
        }
        fn request_text(&self, url: &str) {
            self.0.borrow_mut().push(format!("text {url}"));
        }
    }

    const INFO: ImageInfo = ImageInfo {
        handle: TextureHandle(3),
        width: 16,
        height: 8,
    };

    #[test]
    fn pending_then_ready() {
        let fetcher = RecordingFetcher::default();
        let mut cache = WebCache::new(Box::new(fetcher.clone()));
        let url = "https://example.com/a.png";
        assert_eq!(cache.image(url), None);
        assert_eq!(cache.image(url), None);
        // In-flight lookups don't re-request.
        assert_eq!(fetcher.0.borrow().len(), 1);
        assert_eq!(cache.get(Kind::Image, url), Some(&CacheEntry::Pending));
        assert_eq!(cache.get(Kind::Text, url), None);

        cache.resolve_image(url, INFO);
        assert_eq!(cache.image(url), Some(INFO));
        assert_eq!(cache.peek_image(url), Some(INFO));
        assert_eq!(fetcher.0.borrow().len(), 1);
    }
    #[test]
    fn failure_retries() {
        let fetcher = RecordingFetcher::default();
        let mut cache = WebCache::new(Box::new(fetcher.clone()));
        let url = "https://example.com/b.txt";
        assert_eq!(cache.text(url), None);
        cache.fail(Kind::Text, url, "404");
        assert!(matches!(cache.get(Kind::Text, url), Some(CacheEntry::Failed(_))));
        assert_eq!(cache.text(url), None);
        assert_eq!(fetcher.0.borrow().len(), 2);
        cache.resolve_text(url, "hello");
        assert_eq!(cache.text(url).as_deref(), Some("hello"));
    }
    #[test]
    fn stale_results_are_dropped() {
        let mut cache = WebCache::default();
        cache.image("https://example.com/c.png");
        cache.clear();
        cache.resolve_image("https://example.com/c.png", INFO);
        assert!(cache.is_empty());
    }
    #[test]
    fn same_url_as_text_and_image() {
        let fetcher = RecordingFetcher::default();
        let mut cache = WebCache::new(Box::new(fetcher.clone()));
        let url = "https://example.com/d";
        assert_eq!(cache.text(url), None);
        cache.resolve_text(url, "not a picture");
        assert_eq!(cache.text(url).as_deref(), Some("not a picture"));

        // Asking for an image afterwards makes its own request.
        assert_eq!(cache.image(url), None);
        assert_eq!(*fetcher.0.borrow(), vec![format!("text {url}"), format!("image {url}")]);
        assert_eq!(cache.len(), 2);
        cache.resolve_image(url, INFO);
        assert_eq!(cache.image(url), Some(INFO));
        assert_eq!(cache.text(url).as_deref(), Some("not a picture"));

        // Failing one kind leaves the other alone.
        cache.fail(Kind::Image, url, "gone");
        assert_eq!(cache.text(url).as_deref(), Some("not a picture"));
        assert_eq!(cache.peek_image(url), None);
    }
}
