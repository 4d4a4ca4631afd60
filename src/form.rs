//! Form state held on behalf of the front end: the selected images, the
//! description, the mode switches and the slot the generated prompt lands in.
//!
//! Every selected image carries a [`PreviewHandle`], the stand-in for a
//! browser object URL. Handles release themselves on drop, so replacing,
//! clearing or resetting an image releases its preview exactly once.

use crate::models::{ImageAsset, ModeFlags};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Tracks preview handles handed out to the form.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl PreviewRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn acquire(self: &Arc<Self>) -> PreviewHandle {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        let handle = PreviewHandle {
            id: Uuid::new_v4(),
            registry: Arc::clone(self),
        };
        log::trace!("Acquired preview {}", handle.id);
        handle
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.acquired() - self.released()
    }
}

/// A temporary preview resource tied to one selected image.
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    registry: Arc<PreviewRegistry>,
}

impl PreviewHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> String {
        format!("preview://{}", self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.released.fetch_add(1, Ordering::SeqCst);
        log::trace!("Released preview {}", self.id);
    }
}

#[derive(Debug)]
pub struct SelectedImage {
    pub asset: ImageAsset,
    pub preview: PreviewHandle,
}

/// Identifies one submission so that late results from an older one can be
/// recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

#[derive(Debug)]
pub struct FormState {
    registry: Arc<PreviewRegistry>,
    style: Option<SelectedImage>,
    person: Option<SelectedImage>,
    group: Vec<SelectedImage>,
    description: String,
    flags: ModeFlags,
    generated_prompt: Option<String>,
    latest_submission: u64,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::with_registry(PreviewRegistry::new())
    }

    pub fn with_registry(registry: Arc<PreviewRegistry>) -> Self {
        Self {
            registry,
            style: None,
            person: None,
            group: Vec::new(),
            description: String::new(),
            flags: ModeFlags::default(),
            generated_prompt: None,
            latest_submission: 0,
        }
    }

    pub fn registry(&self) -> &Arc<PreviewRegistry> {
        &self.registry
    }

    fn hold(&self, asset: ImageAsset) -> SelectedImage {
        SelectedImage {
            asset,
            preview: self.registry.acquire(),
        }
    }

    pub fn select_style(&mut self, asset: ImageAsset) {
        self.style = Some(self.hold(asset));
        self.generated_prompt = None;
    }

    /// Returns false (and keeps nothing) unless single-person composite mode
    /// is active.
    pub fn select_person(&mut self, asset: ImageAsset) -> bool {
        if !self.flags.composite_person || self.flags.group_mode {
            log::warn!("Ignoring person image: single-person composite mode is off");
            return false;
        }
        self.person = Some(self.hold(asset));
        self.generated_prompt = None;
        true
    }

    /// Replaces the whole group. An empty selection leaves the form untouched.
    pub fn select_group(&mut self, assets: Vec<ImageAsset>) -> bool {
        if assets.is_empty() {
            return false;
        }
        if !self.flags.is_group() {
            log::warn!("Ignoring {} group image(s): group mode is off", assets.len());
            return false;
        }
        let held: Vec<SelectedImage> = assets.into_iter().map(|a| self.hold(a)).collect();
        self.group = held;
        self.generated_prompt = None;
        true
    }

    pub fn clear_group(&mut self) {
        self.group.clear();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn toggle_composite(&mut self) {
        self.flags.composite_person = !self.flags.composite_person;
        self.flags.group_mode = false;
        if !self.flags.composite_person {
            self.person = None;
            self.group.clear();
        }
    }

    /// Flipping group mode starts the person selection over.
    pub fn toggle_group(&mut self) {
        if !self.flags.composite_person {
            return;
        }
        self.flags.group_mode = !self.flags.group_mode;
        self.person = None;
        self.group.clear();
        self.generated_prompt = None;
    }

    /// Drops every held image (releasing its preview) and clears all fields.
    pub fn reset(&mut self) {
        self.style = None;
        self.person = None;
        self.group.clear();
        self.description.clear();
        self.flags = ModeFlags::default();
        self.generated_prompt = None;
    }

    pub fn begin_submission(&mut self) -> SubmissionTicket {
        self.latest_submission += 1;
        SubmissionTicket(self.latest_submission)
    }

    /// Stores a result if it belongs to the most recent submission.
    pub fn complete(&mut self, ticket: SubmissionTicket, prompt: String) -> bool {
        if ticket.0 != self.latest_submission {
            log::debug!(
                "Discarding result of submission {} (latest is {})",
                ticket.0,
                self.latest_submission
            );
            return false;
        }
        self.generated_prompt = Some(prompt);
        true
    }

    pub fn style(&self) -> Option<&ImageAsset> {
        self.style.as_ref().map(|s| &s.asset)
    }

    pub fn person(&self) -> Option<&ImageAsset> {
        self.person.as_ref().map(|s| &s.asset)
    }

    pub fn group(&self) -> impl Iterator<Item = &ImageAsset> + '_ {
        self.group.iter().map(|s| &s.asset)
    }

    pub fn group_len(&self) -> usize {
        self.group.len()
    }

    pub fn previews(&self) -> Vec<String> {
        self.style
            .iter()
            .chain(self.person.iter())
            .chain(self.group.iter())
            .map(|s| s.preview.url())
            .collect()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn flags(&self) -> ModeFlags {
        self.flags
    }

    pub fn generated_prompt(&self) -> Option<&str> {
        self.generated_prompt.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;

    fn jpeg(tag: u8) -> ImageAsset {
        ImageAsset::new(vec![0xFF, 0xD8, tag], MediaType::Jpeg)
    }

    #[test]
    fn test_replacing_style_releases_previous_preview_once() {
        let mut form = FormState::new();
        form.select_style(jpeg(1));
        form.select_style(jpeg(2));

        let registry = form.registry();
        assert_eq!(registry.acquired(), 2);
        assert_eq!(registry.released(), 1);
        assert_eq!(form.style(), Some(&jpeg(2)));
    }

    #[test]
    fn test_reset_releases_everything() {
        let registry = PreviewRegistry::new();
        let mut form = FormState::with_registry(Arc::clone(&registry));
        form.select_style(jpeg(1));
        form.toggle_composite();
        form.toggle_group();
        form.select_group(vec![jpeg(2), jpeg(3), jpeg(4)]);
        form.set_description("poster");
        assert_eq!(registry.live(), 4);

        form.reset();
        assert_eq!(registry.live(), 0);
        assert_eq!(registry.released(), 4);
        assert_eq!(form.flags(), ModeFlags::default());
        assert!(form.description().is_empty());

        // a second reset has nothing left to release
        form.reset();
        assert_eq!(registry.released(), 4);
    }

    #[test]
    fn test_turning_composite_off_drops_people() {
        let mut form = FormState::new();
        form.toggle_composite();
        assert!(form.select_person(jpeg(1)));
        form.toggle_composite();

        assert!(form.person().is_none());
        assert!(!form.flags().composite_person);
        assert!(!form.flags().group_mode);
        assert_eq!(form.registry().live(), 0);
    }

    #[test]
    fn test_turning_composite_off_clears_group_mode() {
        let mut form = FormState::new();
        form.toggle_composite();
        form.toggle_group();
        form.select_group(vec![jpeg(1), jpeg(2)]);
        form.toggle_composite();

        assert_eq!(form.flags(), ModeFlags::default());
        assert_eq!(form.group_len(), 0);
        assert_eq!(form.registry().live(), 0);
    }

    #[test]
    fn test_group_toggle_needs_composite() {
        let mut form = FormState::new();
        form.toggle_group();
        assert!(!form.flags().group_mode);
    }

    #[test]
    fn test_person_ignored_in_group_mode() {
        let mut form = FormState::new();
        form.toggle_composite();
        form.toggle_group();

        assert!(!form.select_person(jpeg(1)));
        assert!(form.person().is_none());
        assert_eq!(form.registry().acquired(), 0);
        assert_eq!(form.flags(), ModeFlags::group_composite());
    }

    #[test]
    fn test_person_ignored_without_composite() {
        let mut form = FormState::new();
        assert!(!form.select_person(jpeg(1)));
        assert!(form.person().is_none());
        assert_eq!(form.registry().acquired(), 0);
    }

    #[test]
    fn test_select_group_replaces_and_keeps_order() {
        let mut form = FormState::new();
        form.toggle_composite();
        form.toggle_group();
        form.select_group(vec![jpeg(1), jpeg(2)]);
        form.select_group(vec![jpeg(7), jpeg(8), jpeg(9)]);

        let tags: Vec<u8> = form.group().map(|a| a.bytes()[2]).collect();
        assert_eq!(tags, vec![7, 8, 9]);
        assert_eq!(form.registry().released(), 2);

        assert!(!form.select_group(Vec::new()));
        assert_eq!(form.group_len(), 3);
    }

    #[test]
    fn test_new_image_clears_generated_prompt() {
        let mut form = FormState::new();
        let ticket = form.begin_submission();
        assert!(form.complete(ticket, "a prompt".into()));
        assert_eq!(form.generated_prompt(), Some("a prompt"));

        form.select_style(jpeg(1));
        assert!(form.generated_prompt().is_none());
    }

    #[test]
    fn test_stale_submission_is_discarded() {
        let mut form = FormState::new();
        let first = form.begin_submission();
        let second = form.begin_submission();

        assert!(form.complete(second, "newer".into()));
        assert!(!form.complete(first, "older".into()));
        assert_eq!(form.generated_prompt(), Some("newer"));
    }

    #[test]
    fn test_previews_are_distinct() {
        let mut form = FormState::new();
        form.select_style(jpeg(1));
        form.toggle_composite();
        form.select_person(jpeg(2));

        let previews = form.previews();
        assert_eq!(previews.len(), 2);
        assert_ne!(previews[0], previews[1]);
        assert!(previews[0].starts_with("preview://"));
    }
}
