use serde::{Deserialize, Serialize};

/// Id of the per-category entry meaning "no constraint".
pub const NONE_PRESET_ID: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetIcon {
    Slash,
    Camera,
    Sun,
    CubeTransparent,
    Wand,
    Layers,
    User,
}

impl PresetIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            PresetIcon::Slash => "∅",
            PresetIcon::Camera => "◉",
            PresetIcon::Sun => "☀",
            PresetIcon::CubeTransparent => "▣",
            PresetIcon::Wand => "✦",
            PresetIcon::Layers => "≡",
            PresetIcon::User => "☺",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub metadata: &'static str,
    pub icon: PresetIcon,
}

impl Preset {
    pub fn is_none(&self) -> bool {
        self.id == NONE_PRESET_ID
    }
}

/// The capability the selection helpers need from a catalog entry.
pub trait PresetLike {
    fn id(&self) -> &str;
    fn name(&self) -> &str;

    fn is_none_sentinel(&self) -> bool {
        self.id() == NONE_PRESET_ID
    }
}

impl PresetLike for Preset {
    fn id(&self) -> &str {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Camera,
    Lighting,
    Mockup,
    Manipulation,
    ProductRetouch,
    PeopleRetouch,
}

impl Category {
    /// Fixed order used by the prompt composer and listings.
    pub const ALL: [Category; 6] = [
        Category::Mockup,
        Category::Camera,
        Category::Lighting,
        Category::Manipulation,
        Category::ProductRetouch,
        Category::PeopleRetouch,
    ];

    pub fn is_single_select(self) -> bool {
        matches!(self, Category::Camera | Category::Mockup)
    }

    /// Key used for this category in serialized settings.
    pub fn label(self) -> &'static str {
        match self {
            Category::Camera => "Camera",
            Category::Lighting => "Lighting",
            Category::Mockup => "Mockup",
            Category::Manipulation => "Manipulation",
            Category::ProductRetouch => "Product Retouch",
            Category::PeopleRetouch => "People Retouch",
        }
    }

    pub fn from_keyword(value: &str) -> Option<Category> {
        match value.trim().to_lowercase().as_str() {
            "camera" => Some(Category::Camera),
            "lighting" | "light" => Some(Category::Lighting),
            "mockup" | "scene" => Some(Category::Mockup),
            "manipulation" | "fx" => Some(Category::Manipulation),
            "retouch" | "product-retouch" | "product_retouch" => Some(Category::ProductRetouch),
            "people" | "people-retouch" | "people_retouch" => Some(Category::PeopleRetouch),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    #[serde(rename = "9:16")]
    Story,
    #[serde(rename = "4:5")]
    Portrait,
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:2")]
    Classic,
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Story => "9:16",
            AspectRatio::Portrait => "4:5",
            AspectRatio::Square => "1:1",
            AspectRatio::Classic => "3:2",
            AspectRatio::Landscape => "16:9",
        }
    }

    pub fn parse(value: &str) -> Option<AspectRatio> {
        match value.trim() {
            "9:16" => Some(AspectRatio::Story),
            "4:5" => Some(AspectRatio::Portrait),
            "1:1" => Some(AspectRatio::Square),
            "3:2" => Some(AspectRatio::Classic),
            "16:9" => Some(AspectRatio::Landscape),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub aspect_ratio: AspectRatio,
    pub transparent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpscaleTarget {
    Hd,
    FourK,
}

impl UpscaleTarget {
    pub fn parse(value: &str) -> Option<UpscaleTarget> {
        match value.trim().to_lowercase().as_str() {
            "hd" | "2k" => Some(UpscaleTarget::Hd),
            "4k" => Some(UpscaleTarget::FourK),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UpscaleTarget::Hd => "HD",
            UpscaleTarget::FourK => "4K",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotCategory {
    Angle,
    Environment,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DirectorShot {
    pub id: &'static str,
    pub label: &'static str,
    pub category: ShotCategory,
}

#[derive(Debug)]
pub struct KeywordGroup {
    pub category: &'static str,
    pub keywords: &'static [&'static str],
}
