use super::ImageAsset;

/// Which optional inputs the user has switched on. `group_mode` only means
/// something while `composite_person` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeFlags {
    pub composite_person: bool,
    pub group_mode: bool,
}

impl ModeFlags {
    pub fn style_only() -> Self {
        Self::default()
    }

    pub fn single_composite() -> Self {
        Self {
            composite_person: true,
            group_mode: false,
        }
    }

    pub fn group_composite() -> Self {
        Self {
            composite_person: true,
            group_mode: true,
        }
    }

    pub fn is_group(&self) -> bool {
        self.composite_person && self.group_mode
    }
}

/// A validated generation request. Built once at submission time; the variant
/// decides which template and which images are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    StyleOnly {
        style: ImageAsset,
        description: String,
    },
    SingleComposite {
        style: ImageAsset,
        description: String,
        person: ImageAsset,
    },
    GroupComposite {
        style: ImageAsset,
        description: String,
        people: Vec<ImageAsset>,
    },
}

impl GenerationRequest {
    pub fn style(&self) -> &ImageAsset {
        match self {
            GenerationRequest::StyleOnly { style, .. }
            | GenerationRequest::SingleComposite { style, .. }
            | GenerationRequest::GroupComposite { style, .. } => style,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            GenerationRequest::StyleOnly { description, .. }
            | GenerationRequest::SingleComposite { description, .. }
            | GenerationRequest::GroupComposite { description, .. } => description,
        }
    }

    /// Person images in upload order; empty for style-only requests.
    pub fn people(&self) -> &[ImageAsset] {
        match self {
            GenerationRequest::StyleOnly { .. } => &[],
            GenerationRequest::SingleComposite { person, .. } => std::slice::from_ref(person),
            GenerationRequest::GroupComposite { people, .. } => people,
        }
    }

    pub fn image_count(&self) -> usize {
        1 + self.people().len()
    }

    pub fn mode_label(&self) -> &'static str {
        match self {
            GenerationRequest::StyleOnly { .. } => "style-only",
            GenerationRequest::SingleComposite { .. } => "single-composite",
            GenerationRequest::GroupComposite { .. } => "group-composite",
        }
    }
}
