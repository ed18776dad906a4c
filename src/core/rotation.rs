//! Hero slide rotation.
//!
//! [`HeroRotation`] is the pure state machine over (video, media) index
//! pairs. [`HeroCarousel`] drives it from a timer task that is aborted when
//! the carousel is dropped. A carousel built with [`HeroCarousel::follow`]
//! also picks up the video list whenever the store's videos change.

use crate::core::fallback::{HERO_FALLBACK_IMAGE, HERO_PLACEHOLDER_DOTS};
use crate::core::store::Store;
use crate::domain::model::Video;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

fn media_counts(videos: &[Video]) -> Vec<usize> {
    videos.iter().map(Video::media_count).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroRotation {
    media_counts: Vec<usize>,
    video: usize,
    media: usize,
    placeholder: usize,
}

impl HeroRotation {
    pub fn new(media_counts: Vec<usize>) -> Self {
        Self {
            media_counts,
            video: 0,
            media: 0,
            placeholder: 0,
        }
    }

    pub fn from_videos(videos: &[Video]) -> Self {
        Self::new(media_counts(videos))
    }

    pub fn position(&self) -> (usize, usize) {
        (self.video, self.media)
    }

    pub fn is_empty(&self) -> bool {
        self.media_counts.is_empty()
    }

    fn last_media(&self, video: usize) -> usize {
        self.media_counts
            .get(video)
            .copied()
            .unwrap_or(0)
            .saturating_sub(1)
    }

    /// Next media item of the current video, or the first item of the next video.
    pub fn advance(&mut self) {
        if self.is_empty() {
            return;
        }
        if self.media < self.last_media(self.video) {
            self.media += 1;
        } else {
            self.video = (self.video + 1) % self.media_counts.len();
            self.media = 0;
        }
    }

    /// Previous media item, wrapping to the last item of the previous video.
    pub fn previous(&mut self) {
        if self.is_empty() {
            return;
        }
        if self.media > 0 {
            self.media -= 1;
        } else {
            let count = self.media_counts.len();
            self.video = (self.video + count - 1) % count;
            self.media = self.last_media(self.video);
        }
    }

    pub fn select_video(&mut self, video: usize) {
        if video < self.media_counts.len() {
            self.video = video;
            self.media = 0;
        }
    }

    /// Jumps to a media item of the current video. Out-of-range indices are ignored.
    pub fn select_media(&mut self, media: usize) {
        if media < self.media_counts.get(self.video).copied().unwrap_or(0) {
            self.media = media;
        }
    }

    /// `(current, total)` for the "n / total" badge, shown only when the
    /// current video has more than one media item.
    pub fn media_counter(&self) -> Option<(usize, usize)> {
        let total = self.media_counts.get(self.video).copied().unwrap_or(0);
        (total > 1).then_some((self.media + 1, total))
    }

    /// Indicator dots shown for the video list; placeholders when empty.
    pub fn indicator_count(&self) -> usize {
        if self.is_empty() {
            HERO_PLACEHOLDER_DOTS
        } else {
            self.media_counts.len()
        }
    }

    /// Selecting a placeholder dot only moves the local display index.
    pub fn select_placeholder(&mut self, index: usize) {
        if self.is_empty() && index < HERO_PLACEHOLDER_DOTS {
            self.placeholder = index;
        }
    }

    pub fn placeholder_index(&self) -> usize {
        self.placeholder
    }

    /// Swaps in a new video list, restarting at (0, 0) when the current
    /// position no longer exists.
    pub fn set_media_counts(&mut self, media_counts: Vec<usize>) {
        self.media_counts = media_counts;
        let valid = self.video < self.media_counts.len()
            && self.media <= self.last_media(self.video);
        if !valid {
            self.video = 0;
            self.media = 0;
        }
    }
}

/// What the hero paints behind the headline for a given position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideBackground {
    Video { url: String, mime: String },
    Image { url: String, alt: String },
    Fallback(&'static str),
}

pub fn slide_background(
    videos: &[Video],
    (video, media): (usize, usize),
    resolve: impl Fn(Option<&str>) -> Option<String>,
) -> SlideBackground {
    let Some(current) = videos.get(video) else {
        return SlideBackground::Fallback(HERO_FALLBACK_IMAGE);
    };
    let Some(item) = current.background.get(media) else {
        return SlideBackground::Fallback(HERO_FALLBACK_IMAGE);
    };
    let Some(url) = resolve(Some(item.url.as_str())) else {
        return SlideBackground::Fallback(HERO_FALLBACK_IMAGE);
    };

    if item.is_video() {
        SlideBackground::Video {
            url,
            mime: item.mime.clone(),
        }
    } else {
        let alt = item
            .alternative_text
            .clone()
            .or_else(|| current.title.clone())
            .unwrap_or_else(|| "Background".to_string());
        SlideBackground::Image { url, alt }
    }
}

fn lock(rotation: &Mutex<HeroRotation>) -> MutexGuard<'_, HeroRotation> {
    rotation.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A running hero rotation. Every `period` without a manual change the
/// slide advances; manual navigation restarts the wait. Dropping the
/// carousel cancels the timer task.
pub struct HeroCarousel {
    rotation: Arc<Mutex<HeroRotation>>,
    restart: Arc<Notify>,
    task: JoinHandle<()>,
    follower: Option<JoinHandle<()>>,
}

impl HeroCarousel {
    pub fn start(rotation: HeroRotation, period: Duration) -> Self {
        let rotation = Arc::new(Mutex::new(rotation));
        let restart = Arc::new(Notify::new());

        let task = {
            let rotation = rotation.clone();
            let restart = restart.clone();
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = tokio::time::sleep(period) => {
                            let mut guard = lock(&rotation);
                            guard.advance();
                            tracing::trace!("hero advanced to {:?}", guard.position());
                        }
                        _ = restart.notified() => {}
                    }
                }
            })
        };

        Self {
            rotation,
            restart,
            task,
            follower: None,
        }
    }

    /// Starts over the store's current videos and keeps following them:
    /// when the video list changes the rotation is resized and the wait
    /// restarts.
    pub fn follow(store: &Store, period: Duration) -> Self {
        let mut videos = store.subscribe();
        let mut last = media_counts(&videos.borrow_and_update().videos.items);
        let mut carousel = Self::start(HeroRotation::new(last.clone()), period);

        let rotation = carousel.rotation.clone();
        let restart = carousel.restart.clone();
        carousel.follower = Some(tokio::spawn(async move {
            while videos.changed().await.is_ok() {
                let counts = media_counts(&videos.borrow_and_update().videos.items);
                if counts == last {
                    continue;
                }
                tracing::debug!("hero now rotating {} videos", counts.len());
                lock(&rotation).set_media_counts(counts.clone());
                restart.notify_one();
                last = counts;
            }
        }));
        carousel
    }

    pub fn position(&self) -> (usize, usize) {
        lock(&self.rotation).position()
    }

    pub fn snapshot(&self) -> HeroRotation {
        lock(&self.rotation).clone()
    }

    fn manual(&self, change: impl FnOnce(&mut HeroRotation)) {
        {
            let mut guard = lock(&self.rotation);
            change(&mut *guard);
        }
        self.restart.notify_one();
    }

    pub fn next(&self) {
        self.manual(HeroRotation::advance);
    }

    pub fn previous(&self) {
        self.manual(HeroRotation::previous);
    }

    pub fn select_video(&self, video: usize) {
        self.manual(|r| r.select_video(video));
    }

    pub fn select_media(&self, media: usize) {
        self.manual(|r| r.select_media(media));
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for HeroCarousel {
    fn drop(&mut self) {
        self.task.abort();
        if let Some(follower) = self.follower.take() {
            follower.abort();
        }
    }
}
