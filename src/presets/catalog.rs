//! Static preset tables. Every catalog lists its "none" sentinel first.

use crate::presets::types::{
    AspectRatio, Category, DirectorShot, KeywordGroup, Preset, PresetIcon, ShotCategory,
    NONE_PRESET_ID,
};

pub static CAMERA_PRESETS: &[Preset] = &[
    Preset {
        id: "none",
        name: "None",
        description: "No specific camera instructions. The AI will decide the best angle.",
        metadata: "",
        icon: PresetIcon::Slash,
    },
    Preset {
        id: "hero-45",
        name: "45° Hero",
        description: "Highlights depth and logo. Great for main posts and thumbnails.",
        metadata: "35–50mm lens, pitch −5°, camera height 20–40cm, aperture 4.0-8.0",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "worms-eye",
        name: "Worm’s-Eye",
        description: "Upward shot giving power to tall products (bottles, cans).",
        metadata: "14–24mm lens, pitch +35°, aperture 2.8-5.6",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "lay-flat-top-down",
        name: "Lay-Flat Top-Down",
        description: "90° top-down with graphic composition. Trendy for Instagram.",
        metadata: "24–35mm lens, pitch −90°, height 80-120cm",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "macro-edge-detail",
        name: "Macro Edge Detail",
        description: "Extreme close-up on an edge or texture for detail shots.",
        metadata: "90-105mm lens, aperture 2.8-4.0",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "dutch-tilt",
        name: "Dutch Tilt",
        description: "10–20° camera roll for a dynamic, energetic feel. Ideal for Reels.",
        metadata: "24–35mm lens, roll 15°",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "product-portrait",
        name: "Product Portrait",
        description: "Eye-level shot with split light to highlight shape and logo.",
        metadata: "50–85mm lens, eye-level, height 15cm",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "negative-space",
        name: "Negative Space",
        description: "Small product in a large empty space, perfect for ad copy.",
        metadata: "35–50mm lens, aperture 8.0-11.0",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "in-hand-pov",
        name: "In-Hand POV",
        description: "Perspective of a hand holding the product for a realistic feel.",
        metadata: "24–35mm lens, pitch −10°",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "levitation",
        name: "Levitation",
        description: "Floating product with a contact shadow for a dynamic post.",
        metadata: "35mm lens, shutter 250",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "mirror-reflection",
        name: "Mirror Reflection",
        description: "Smooth reflective surface with a soft, faded reflection for a premium feel.",
        metadata: "35–50mm lens",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "corner-clamp",
        name: "Corner Clamp",
        description: "Product clamped to the corner of a wall or cube. Trendy and minimal.",
        metadata: "24–35mm lens",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "exploded-view",
        name: "Exploded View",
        description: "Deconstructed layers of the product on a vertical axis.",
        metadata: "24–35mm lens, pitch −15°",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "backlit-flare",
        name: "Backlit Flare",
        description: "Strong backlighting with a powerful rim light for a neon/tech mood.",
        metadata: "24–35mm lens",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "diagonal-shelf",
        name: "Diagonal Shelf",
        description: "Product placed on a diagonal line to create movement and flow.",
        metadata: "35mm lens, roll 10°",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "swatch-tiles",
        name: "Swatch Tiles",
        description: "Color/flavor tiles surrounding the product from a top-down view.",
        metadata: "Top-down, 24–35mm lens, pitch -90",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "splash-pour",
        name: "Splash & Pour",
        description: "Captures liquid movement around or from the product.",
        metadata: "35–50mm lens, shutter 1000",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "light-sweep",
        name: "Light Sweep",
        description: "A diagonal light sweep with motion blur. Great for short videos.",
        metadata: "24–35mm lens, shutter 15",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "behind-the-glass",
        name: "Behind-the-Glass",
        description: "Shot from behind a wet or smudged glass pane for a dramatic mood.",
        metadata: "35–50mm lens",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "geometric-top",
        name: "Geometric Top",
        description: "Simple 3D shapes around the product from a top-down view. Graphic style.",
        metadata: "Top-down, 24–35mm lens, pitch -90",
        icon: PresetIcon::Camera,
    },
    Preset {
        id: "cross-section",
        name: "Cross-Section",
        description: "Half of the product is cut away to show the inside.",
        metadata: "35–50mm lens",
        icon: PresetIcon::Camera,
    },
];

pub static LIGHTING_PRESETS: &[Preset] = &[
    Preset {
        id: "none",
        name: "None",
        description: "No specific lighting instructions. The AI will decide the best setup.",
        metadata: "",
        icon: PresetIcon::Slash,
    },
    Preset {
        id: "day-01",
        name: "Day-01: Window Soft + Negative Fill",
        description: "Soft, premium mood for skincare/matte packaging. Uses wide window light and a black flag to boost contrast.",
        metadata: "temp 5400K, intensity 70%, hardness 10%",
        icon: PresetIcon::Sun,
    },
    Preset {
        id: "day-02",
        name: "Day-02: Golden Back Rim",
        description: "Creates a warm glow and edge for glass/liquids, using a low sun backlight and a golden front reflector.",
        metadata: "temp 4800K, intensity 90%, hardness 60%",
        icon: PresetIcon::Sun,
    },
    Preset {
        id: "day-03",
        name: "Day-03: Overcast Catalog",
        description: "Very soft shadows, consistent for catalogs. Simulates an overcast sky as a giant softbox with a white bounce.",
        metadata: "temp 6000K, intensity 60%, hardness 5%",
        icon: PresetIcon::Sun,
    },
    Preset {
        id: "night-01",
        name: "Night-01: Low-Key Double Strip",
        description: "Luxurious mood for metal/perfumes. Uses stripboxes with grids for rim lighting against a dark background.",
        metadata: "temp 5200K, intensity 85%, hardness 30%",
        icon: PresetIcon::Sun,
    },
    Preset {
        id: "night-02",
        name: "Night-02: Dark-Field Glass",
        description: "Clearly defines glass edges using out-of-frame white panels against a black background to create strong rim lights.",
        metadata: "temp 5500K, intensity 95%, hardness 80%",
        icon: PresetIcon::Sun,
    },
    Preset {
        id: "night-03",
        name: "Night-03: Bright-Field Liquid",
        description: "Highlights internal purity of liquids. Places the product before a lit backdrop, using black flags to define edges.",
        metadata: "temp 5600K, intensity 75%, hardness 15%",
        icon: PresetIcon::Sun,
    },
    Preset {
        id: "night-04",
        name: "Night-04: Parabolic Hard Specular",
        description: "Creates a strong, crisp metallic shine for items like watches. Uses a focused deep parabolic reflector.",
        metadata: "temp 5000K, intensity 100%, hardness 95%",
        icon: PresetIcon::Sun,
    },
    Preset {
        id: "night-05",
        name: "Night-05: RGB Neo-Rim",
        description: "Trendy neon mood for drinks/tech, using complementary colored lights like cyan and magenta for key and rim.",
        metadata: "temp 5000K, intensity 90%, hardness 50%",
        icon: PresetIcon::Sun,
    },
    Preset {
        id: "night-06",
        name: "Night-06: Fresnel Logo Punch",
        description: "Dramatic, cinematic mood. A tightly focused fresnel spotlight highlights a logo or specific detail.",
        metadata: "temp 4800K, intensity 95%, hardness 85%",
        icon: PresetIcon::Sun,
    },
    Preset {
        id: "night-07",
        name: "Night-07: Top Gradient Table",
        description: "Ideal for clean packshots. A feathered top softbox creates a smooth gradient on the background surface.",
        metadata: "temp 5500K, intensity 65%, hardness 20%",
        icon: PresetIcon::Sun,
    },
    Preset {
        id: "night-08",
        name: "Night-08: Cross-Polarized Clean",
        description: "Essential for electronics and glossy surfaces. Matched polarizers on the light and lens cut out unwanted glare.",
        metadata: "temp 5400K, intensity 80%, hardness 25%",
        icon: PresetIcon::Sun,
    },
    Preset {
        id: "night-09",
        name: "Gobo Patterns (Cut Shadows)",
        description: "Storytelling mood for social media. An LED with a gobo projects shapes (window, leaves) as shadows.",
        metadata: "temp 4500K, intensity 70%, hardness 75%",
        icon: PresetIcon::Sun,
    },
    Preset {
        id: "night-10",
        name: "Caustics Water Map",
        description: "Luxurious water effect for beverages. A light source shines through rippling water to project caustics on the scene.",
        metadata: "temp 5800K, intensity 85%, hardness 65%",
        icon: PresetIcon::Sun,
    },
];

pub static MOCKUP_PRESETS: &[Preset] = &[
    Preset {
        id: "none",
        name: "None (Plain Backdrop)",
        description: "Product on a simple studio background.",
        metadata: "",
        icon: PresetIcon::Slash,
    },
    Preset {
        id: "shelf",
        name: "Supermarket Shelf",
        description: "Realistic in-store environment.",
        metadata: "",
        icon: PresetIcon::CubeTransparent,
    },
    Preset {
        id: "cafe",
        name: "Cafe Table",
        description: "Lifestyle shot in a cozy cafe.",
        metadata: "",
        icon: PresetIcon::CubeTransparent,
    },
    Preset {
        id: "billboard",
        name: "Urban Billboard",
        description: "Large-scale outdoor advertising in a city.",
        metadata: "",
        icon: PresetIcon::CubeTransparent,
    },
    Preset {
        id: "tshirt",
        name: "T-Shirt Model",
        description: "Product design on a clothing mockup.",
        metadata: "",
        icon: PresetIcon::CubeTransparent,
    },
    Preset {
        id: "forest",
        name: "Nature Scene",
        description: "Product in a natural, outdoor setting.",
        metadata: "",
        icon: PresetIcon::CubeTransparent,
    },
    Preset {
        id: "beach",
        name: "Beach Sunset",
        description: "On wet sand with a dramatic sunset.",
        metadata: "",
        icon: PresetIcon::CubeTransparent,
    },
    Preset {
        id: "mountain",
        name: "Mountain Peak",
        description: "On a rock with a majestic mountain vista.",
        metadata: "",
        icon: PresetIcon::CubeTransparent,
    },
    Preset {
        id: "garden",
        name: "Lush Garden",
        description: "Amongst flowers and foliage.",
        metadata: "",
        icon: PresetIcon::CubeTransparent,
    },
    Preset {
        id: "podium",
        name: "Marble Podium",
        description: "On a clean, minimalist marble block.",
        metadata: "",
        icon: PresetIcon::CubeTransparent,
    },
    Preset {
        id: "bookshelf",
        name: "Bookshelf Display",
        description: "Product placed naturally on a stylish bookshelf.",
        metadata: "",
        icon: PresetIcon::CubeTransparent,
    },
    Preset {
        id: "pedestal",
        name: "Minimalist Pedestal",
        description: "Product featured on a simple, elegant pedestal or plinth.",
        metadata: "",
        icon: PresetIcon::CubeTransparent,
    },
    Preset {
        id: "outdoor_billboard",
        name: "Outdoor Billboard",
        description: "Product advertised on a large billboard in a natural or highway setting.",
        metadata: "",
        icon: PresetIcon::CubeTransparent,
    },
];

pub static MANIPULATION_PRESETS: &[Preset] = &[
    Preset {
        id: "none",
        name: "None",
        description: "No specific manipulations. AI will perform basic compositing.",
        metadata: "",
        icon: PresetIcon::Slash,
    },
    Preset {
        id: "smart-masking",
        name: "Smart Masking Suite",
        description: "Advanced masking with hair/edge refinement and depth mattes.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "frequency-separation",
        name: "Frequency Separation (Product-Safe)",
        description: "Separates texture and color for non-destructive retouching on artificial surfaces.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "displacement-map",
        name: "Displacement / Normal Maps",
        description: "Project logos or patterns realistically onto curved surfaces.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "perspective-match",
        name: "Perspective Match",
        description: "Syncs product perspective and vanishing lines with the background.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "shadow-synthesis",
        name: "Shadow Catch & Synthesis",
        description: "Generate realistic shadows on new surfaces, simulating studio lighting.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "ibl-match",
        name: "IBL / HDR Match",
        description: "Matches the product's lighting environment to the background HDR.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "texture-projection",
        name: "Texture Projection",
        description: "Project textures (stone, fabric, etc.) with correct perspective and blending.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "liquid-fx",
        name: "Liquid/Splash FX",
        description: "Add realistic liquid splashes with motion blur and droplets.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "atmospheric-fx",
        name: "Fog/Haze/Particles",
        description: "Introduce atmospheric depth with subtle fog, haze, or dust particles.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "tilt-shift",
        name: "Tilt-Shift / DoF Craft",
        description: "Apply a selective focus effect to draw attention to the brand.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "glitch-fx",
        name: "Glitch/Scanline (Subtle)",
        description: "Subtle glitch and scanline effects for a tech mood without degrading the brand.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "exploded-cutaway",
        name: "Exploded & Cutaway",
        description: "Deconstruct layers or create cutaway views with accurate shadows.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "cloth-warp",
        name: "Cloth/Label Warp",
        description: "Realistically warp labels or designs onto fabric or packaging.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "gradient-map",
        name: "Gradient Map Look",
        description: "Apply a fast, editable, and unified color mood using gradient maps.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "chromatic-aberration",
        name: "Chromatic Aberration (Micro)",
        description: "Adds subtle chromatic aberration at edges for a realistic lens effect.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "grain-halation",
        name: "Grain & Halation",
        description: "Apply fine grain and highlight halation for a filmic style.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "motion-trails",
        name: "Motion Trails / Swipe",
        description: "Create subtle motion trails or swipes to convey speed and dynamism.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "reflection-compositing",
        name: "Reflection Compositing",
        description: "Composite realistic reflections with accurate perspective and opacity.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
    Preset {
        id: "neon-rim",
        name: "Neon Rim Pack",
        description: "Add controlled neon rim lighting with bloom and color dodge effects.",
        metadata: "",
        icon: PresetIcon::Layers,
    },
];

pub static RETOUCH_PRESETS: &[Preset] = &[
    Preset {
        id: "none",
        name: "None",
        description: "No specific retouching. AI will perform basic cleanup.",
        metadata: "",
        icon: PresetIcon::Slash,
    },
    Preset {
        id: "cleanup",
        name: "Clean-Up & Dust Removal",
        description: "Remove dust, lint, fine scratches, and fix label imperfections.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "edge-refine",
        name: "Edge Refinement",
        description: "Soften or sharpen edges, remove clipping halos, and apply anti-aliasing.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "specular-control",
        name: "Specular Control",
        description: "Adjust highlights: reduce burnout, enhance metal/glass reflections.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "texture-pop",
        name: "Texture Pop",
        description: "Enhance matte, leather, or rubber textures with micro-contrast.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "micro-detail-preservation",
        name: "Micro-Detail Preservation",
        description: "Uses advanced techniques to protect and retain fine textures (fabric weave, brushed metal, skin pores) during all retouching and manipulation steps.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "polish",
        name: "Plastic/Metal Polish",
        description: "Reduce micro-scratches and unify surface glossiness.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "label-warp",
        name: "Label Warp Fix",
        description: "Correct sticker distortions, perspective, and cylindrical curvature.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "color-master",
        name: "Color Mastering",
        description: "Apply correct white balance, general toning, and match Pantone/Brand colors.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "variant-gen",
        name: "Variant Generator",
        description: "Create color/flavor variations using smart masks on specific parts.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "shadows",
        name: "Shadow Types",
        description: "Generate shadow types: Contact, Drop, Ambient, or Floating.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "reflection-builder",
        name: "Reflection Builder",
        description: "Create soft mirror, graded glass, or 15-40% subtle reflections.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "relight",
        name: "Relight (AI/Depth)",
        description: "Relight using a depth map for soft rim, key, or fill lights.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "deband-denoise",
        name: "De-Band & De-Noise",
        description: "Remove gradient banding and correct high ISO noise.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "glass-fx",
        name: "Glass Bloom & Caustics",
        description: "Add a subtle glow to glass/liquids and generate artificial caustics.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "liquid-cleanup",
        name: "Liquid Cleanup",
        description: "Remove unwanted bubbles/pools and unify liquid viscosity.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "print-proof",
        name: "Print-Ready Proof",
        description: "Perform gamut check, TAC, and apply print-specific sharpening.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
    Preset {
        id: "upscale",
        name: "Upscale & Detail",
        description: "AI upscaling with smart sharpening for web or outdoor media.",
        metadata: "",
        icon: PresetIcon::Wand,
    },
];

pub static PEOPLE_RETOUCH_PRESETS: &[Preset] = &[
    Preset {
        id: "none",
        name: "None",
        description: "No specific retouching for people.",
        metadata: "",
        icon: PresetIcon::User,
    },
    Preset {
        id: "natural-skin",
        name: "Natural Skin",
        description: "Subtle blemish removal and skin tone evening. Preserves skin texture.",
        metadata: "",
        icon: PresetIcon::User,
    },
    Preset {
        id: "frequency-separation-skin",
        name: "Frequency Separation (Skin)",
        description: "Advanced skin retouching. Smooths tones while preserving natural texture like pores. Reduces wrinkles.",
        metadata: "",
        icon: PresetIcon::User,
    },
    Preset {
        id: "dodge-burn",
        name: "Dodge & Burn",
        description: "Non-destructive contouring to enhance facial features and add dimension.",
        metadata: "",
        icon: PresetIcon::User,
    },
    Preset {
        id: "eye-enhance",
        name: "Eye Enhancement",
        description: "Brightens sclera, enhances iris color, and sharpens eyelashes.",
        metadata: "",
        icon: PresetIcon::User,
    },
    Preset {
        id: "hair-cleanup",
        name: "Hair Cleanup",
        description: "Removes distracting flyaway hairs and refines the hairline.",
        metadata: "",
        icon: PresetIcon::User,
    },
    Preset {
        id: "clothing-retouch",
        name: "Clothing & Fabric Retouch",
        description: "Removes wrinkles, lint, and stains from clothing. Fixes fabric shape and texture.",
        metadata: "",
        icon: PresetIcon::User,
    },
    Preset {
        id: "glamour-glow",
        name: "Glamour Glow",
        description: "Adds a soft, diffused glow to skin highlights for a high-fashion effect.",
        metadata: "",
        icon: PresetIcon::User,
    },
];

pub static EXPORT_ASPECT_RATIOS: &[(AspectRatio, &str)] = &[
    (AspectRatio::Story, "Story / Mobile"),
    (AspectRatio::Portrait, "Portrait"),
    (AspectRatio::Square, "Square"),
    (AspectRatio::Classic, "Classic Photo"),
    (AspectRatio::Landscape, "Landscape (HD)"),
];

pub static PROMPT_ENHANCER_KEYWORDS: &[KeywordGroup] = &[
    KeywordGroup {
        category: "Style & Medium",
        keywords: &[
            "Photorealistic",
            "Digital Painting",
            "Concept Art",
            "Oil Painting",
            "Watercolor",
            "Illustration",
            "Anime",
            "Manga",
            "Vector Art",
            "Pixel Art",
            "Low Poly",
            "Claymation",
        ],
    },
    KeywordGroup {
        category: "Quality & Detail",
        keywords: &[
            "Highly Detailed",
            "8K",
            "4K",
            "Intricate Details",
            "Sharp Focus",
            "Unreal Engine",
            "Octane Render",
            "Masterpiece",
            "Award-Winning Photography",
        ],
    },
    KeywordGroup {
        category: "Lighting",
        keywords: &[
            "Cinematic Lighting",
            "Golden Hour",
            "Blue Hour",
            "Dramatic Lighting",
            "Studio Lighting",
            "Soft Light",
            "Hard Light",
            "Rim Lighting",
            "Backlight",
            "Neon",
            "Volumetric Lighting",
        ],
    },
    KeywordGroup {
        category: "Composition & Angle",
        keywords: &[
            "Wide Angle Shot",
            "Macro Shot",
            "Close-up",
            "Portrait",
            "Full Body Shot",
            "Dynamic Angle",
            "Low Angle",
            "High Angle",
            "Birds-eye view",
        ],
    },
    KeywordGroup {
        category: "Atmosphere & Mood",
        keywords: &[
            "Ethereal",
            "Moody",
            "Nostalgic",
            "Serene",
            "Chaotic",
            "Mysterious",
            "Energetic",
            "Whimsical",
            "Dreamlike",
        ],
    },
];

pub static DIRECTOR_SHOTS: &[DirectorShot] = &[
    DirectorShot { id: "close-up", label: "Close Up / Macro", category: ShotCategory::Angle },
    DirectorShot { id: "top-down", label: "Top Down Shot", category: ShotCategory::Angle },
    DirectorShot { id: "high-angle", label: "High Angle", category: ShotCategory::Angle },
    DirectorShot { id: "low-angle", label: "Low Angle / Hero", category: ShotCategory::Angle },
    DirectorShot { id: "eye-level", label: "Eye Level", category: ShotCategory::Angle },
    DirectorShot { id: "marble", label: "On a Marble Surface", category: ShotCategory::Environment },
    DirectorShot { id: "travel-bag", label: "In a Travel Bag", category: ShotCategory::Environment },
    DirectorShot { id: "sandy-beach", label: "On a Sandy Beach", category: ShotCategory::Environment },
    DirectorShot { id: "wooden-table", label: "On a Wooden Table", category: ShotCategory::Environment },
    DirectorShot { id: "studio-grey", label: "Clean Studio Grey", category: ShotCategory::Environment },
    DirectorShot { id: "neon-city", label: "Neon City Street", category: ShotCategory::Environment },
    DirectorShot { id: "sunlight-shadows", label: "Hard Sunlight Shadows", category: ShotCategory::Environment },
    DirectorShot { id: "floating", label: "Floating / Levitation", category: ShotCategory::Environment },
    DirectorShot { id: "splash", label: "Water Splash Shot", category: ShotCategory::Environment },
];

pub fn catalog(category: Category) -> &'static [Preset] {
    match category {
        Category::Camera => CAMERA_PRESETS,
        Category::Lighting => LIGHTING_PRESETS,
        Category::Mockup => MOCKUP_PRESETS,
        Category::Manipulation => MANIPULATION_PRESETS,
        Category::ProductRetouch => RETOUCH_PRESETS,
        Category::PeopleRetouch => PEOPLE_RETOUCH_PRESETS,
    }
}

/// The sentinel entry of a catalog, looked up by id rather than position.
pub fn none_preset(category: Category) -> &'static Preset {
    let presets = catalog(category);
    presets
        .iter()
        .find(|preset| preset.id == NONE_PRESET_ID)
        .unwrap_or(&presets[0])
}

pub fn find_by_id(category: Category, id: &str) -> Option<&'static Preset> {
    let id = id.trim();
    catalog(category).iter().find(|preset| preset.id == id)
}

pub fn find_by_name(category: Category, name: &str) -> Option<&'static Preset> {
    catalog(category).iter().find(|preset| preset.name == name)
}

pub fn find_shot(id: &str) -> Option<&'static DirectorShot> {
    DIRECTOR_SHOTS.iter().find(|shot| shot.id == id.trim())
}

/// Names of the real (non-sentinel) presets per category, keyed like `ChosenSettings`.
pub fn control_schema() -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for category in [
        Category::Camera,
        Category::Lighting,
        Category::Mockup,
        Category::Manipulation,
        Category::ProductRetouch,
        Category::PeopleRetouch,
    ] {
        let names = catalog(category)
            .iter()
            .filter(|preset| !preset.is_none())
            .map(|preset| serde_json::Value::String(preset.name.to_string()))
            .collect::<Vec<_>>();
        map.insert(category.label().to_string(), serde_json::Value::Array(names));
    }
    serde_json::Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_catalog_has_exactly_one_sentinel_listed_first() {
        for category in Category::ALL {
            let presets = catalog(category);
            assert_eq!(presets[0].id, NONE_PRESET_ID, "{}", category.label());
            let sentinels = presets.iter().filter(|preset| preset.is_none()).count();
            assert_eq!(sentinels, 1, "{}", category.label());
        }
    }

    #[test]
    fn preset_ids_and_names_are_unique_within_a_category() {
        for category in Category::ALL {
            let presets = catalog(category);
            let ids: HashSet<_> = presets.iter().map(|preset| preset.id).collect();
            let names: HashSet<_> = presets.iter().map(|preset| preset.name).collect();
            assert_eq!(ids.len(), presets.len());
            assert_eq!(names.len(), presets.len());
        }
    }

    #[test]
    fn multi_select_names_never_contain_commas() {
        for category in Category::ALL.into_iter().filter(|c| !c.is_single_select()) {
            for preset in catalog(category) {
                assert!(!preset.name.contains(','), "{}", preset.name);
            }
        }
    }

    #[test]
    fn control_schema_excludes_sentinels() {
        let schema = control_schema();
        let cameras = schema["Camera"].as_array().unwrap();
        assert_eq!(cameras.len(), CAMERA_PRESETS.len() - 1);
        assert!(cameras.iter().all(|name| name != "None"));
        let mockups = schema["Mockup"].as_array().unwrap();
        assert!(mockups.iter().all(|name| name != "None (Plain Backdrop)"));
    }
}
