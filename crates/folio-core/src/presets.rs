//! Channel sets and triggers for the site's panel types.

use crate::constants::{
    HORIZONTAL_SCRUB_SEC, PANEL_SCRUB_SEC, PORTFOLIO_PANEL_SCRUB_SEC, PORTFOLIO_PANEL_WIDTH_VW,
    PORTFOLIO_PIN_VH_PER_PANEL, PORTFOLIO_SCRUB_SEC, PORTFOLIO_SNAP_DURATION_MAX_SEC,
    PORTFOLIO_SNAP_DURATION_MIN_SEC, SECTION_HEIGHT_PER_SIX_PANELS, TIMELINE_DEFAULT_DURATION,
    WORD_STAGGER_DELAY, WORD_STAGGER_SPEED, WORD_STAGGER_WIDTH,
};
use crate::easing::Easing;
use crate::error::Result;
use crate::geometry::{Axis, Viewport};
use crate::orchestrator::{PanelConfig, PanelOrchestrator, SnapConfig, TrackLayout};
use crate::reveal::{ChannelSet, ChannelSpec, Property, Quantity, Stagger};
use crate::tracker::TriggerSpec;

pub mod parts {
    pub const CONTENT: &str = "content";
    pub const BACKGROUND: &str = "bg";
    pub const WORD: &str = "word";
    pub const PARAGRAPH: &str = "paragraph";
    pub const EMAIL: &str = "email";
    pub const BUTTON: &str = "button";
    pub const IMAGE: &str = "image";
    pub const TEXT: &str = "text";
    pub const HEADING: &str = "heading";
    pub const GRID: &str = "grid";
    pub const CONTAINER: &str = "container";
    pub const BACKDROP: &str = "backdrop";
    pub const LIGHT_IMAGE: &str = "light";
    pub const DARK_IMAGE: &str = "dark";
}

/// Custom property driven on the hero backdrop (0 light, 1 dark).
pub const HERO_DARKNESS_VAR: &str = "hero-dark";

/// Which optional parts a scroll panel actually has.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelShape {
    pub title_words: usize,
    pub has_email: bool,
    pub has_image: bool,
}

fn px(from: f32, to: f32) -> (Quantity, Quantity) {
    (Quantity::px(from), Quantity::px(to))
}

fn unitless(from: f32, to: f32) -> (Quantity, Quantity) {
    (Quantity::unitless(from), Quantity::unitless(to))
}

fn spec(part: &str, property: Property, (from, to): (Quantity, Quantity)) -> ChannelSpec {
    ChannelSpec::new(part, property).from_to(from, to)
}

pub fn scroll_panel_trigger() -> Result<TriggerSpec> {
    TriggerSpec::parse(Axis::Horizontal, "left 70%", "left 30%")
}

/// The long-form panel of the horizontal section: sliding content, a
/// parallax background and a word-by-word title reveal.
pub fn scroll_panel(shape: PanelShape) -> Result<ChannelSet> {
    use parts::*;

    let words = Stagger::scaled(WORD_STAGGER_SPEED, WORD_STAGGER_DELAY, WORD_STAGGER_WIDTH)?;
    let mut builder = ChannelSet::builder()
        .channel(spec(CONTENT, Property::TranslateX, px(-80.0, 0.0)))
        .channel(spec(BACKGROUND, Property::TranslateX, px(-10.0, 10.0)))
        .staggered(
            shape.title_words,
            words,
            &[
                ChannelSpec::opacity(WORD),
                spec(WORD, Property::TranslateY, px(36.0, 0.0)),
            ],
        )
        .channel(ChannelSpec::opacity(PARAGRAPH).window(0.1, 0.45));
    if shape.has_email {
        builder = builder.channel(ChannelSpec::opacity(EMAIL).window(0.16, 0.46));
    }
    builder = builder
        .channel(ChannelSpec::opacity(BUTTON).window(0.2, 0.5))
        .channel(spec(BUTTON, Property::Scale, unitless(0.96, 1.0)).window(0.2, 0.5));
    if shape.has_image {
        builder = builder
            .channel(spec(IMAGE, Property::Scale, unitless(1.06, 1.0)).window(0.02, 0.42))
            .channel(ChannelSpec::opacity(IMAGE).window(0.02, 0.42));
    }
    builder.build()
}

pub fn content_panel() -> Result<ChannelSet> {
    use parts::*;
    ChannelSet::builder()
        .channel(ChannelSpec::opacity(TEXT))
        .channel(spec(TEXT, Property::TranslateX, px(48.0, 0.0)))
        .channel(ChannelSpec::opacity(IMAGE))
        .channel(spec(IMAGE, Property::Scale, unitless(0.98, 1.0)))
        .build()
}

pub fn work_panel() -> Result<ChannelSet> {
    use parts::*;
    ChannelSet::builder()
        .channel(ChannelSpec::opacity(HEADING))
        .channel(spec(HEADING, Property::TranslateY, px(24.0, 0.0)))
        .channel(ChannelSpec::opacity(GRID))
        .channel(spec(GRID, Property::TranslateY, px(16.0, 0.0)))
        .build()
}

pub fn footer_panel() -> Result<ChannelSet> {
    use parts::*;
    ChannelSet::builder()
        .channel(ChannelSpec::opacity(CONTENT))
        .channel(spec(CONTENT, Property::TranslateY, px(32.0, 0.0)))
        .build()
}

/// Panel types found in the horizontal sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelKind {
    Scroll(PanelShape),
    Content,
    Work,
    Footer,
}

impl PanelKind {
    /// Recognize a `data-panel` annotation; scroll panels need their shape
    /// and are built with [`PanelKind::Scroll`] directly.
    pub fn from_annotation(value: &str) -> Option<Self> {
        match value.trim() {
            "content" => Some(PanelKind::Content),
            "work" => Some(PanelKind::Work),
            "footer" => Some(PanelKind::Footer),
            _ => None,
        }
    }

    pub fn trigger(self) -> Result<TriggerSpec> {
        let (start, end) = match self {
            PanelKind::Scroll(_) => return scroll_panel_trigger(),
            PanelKind::Content | PanelKind::Footer => ("left 80%", "left 20%"),
            PanelKind::Work => ("left 85%", "left 15%"),
        };
        TriggerSpec::parse(Axis::Horizontal, start, end)
    }

    pub fn channels(self) -> Result<ChannelSet> {
        match self {
            PanelKind::Scroll(shape) => scroll_panel(shape),
            PanelKind::Content => content_panel(),
            PanelKind::Work => work_panel(),
            PanelKind::Footer => footer_panel(),
        }
    }

    pub fn config(self, id: impl Into<String>) -> Result<PanelConfig> {
        Ok(PanelConfig::new(id, self.trigger()?, self.channels()?))
    }
}

/// Wrapper height that keeps a sticky inner pinned for `pin_vh` viewport
/// heights of scroll: the pinned length plus the viewport the inner occupies.
pub fn pinned_section_height(pin_vh: f32, viewport: Viewport) -> f32 {
    viewport.height * (pin_vh + 1.0)
}

fn pinned_trigger(pin_vh: f32) -> Result<TriggerSpec> {
    TriggerSpec::parse(Axis::Vertical, "top top", &format!("+={}%", pin_vh * 100.0))
}

/// Viewport heights of scroll the home section stays pinned for.
pub fn horizontal_pin_vh(panel_count: usize) -> f32 {
    SECTION_HEIGHT_PER_SIX_PANELS * panel_count as f32 / 6.0
}

/// Wrapper height of the home section with `panel_count` panels.
pub fn horizontal_section_height(panel_count: usize, viewport: Viewport) -> f32 {
    pinned_section_height(horizontal_pin_vh(panel_count), viewport)
}

/// Section trigger: pinned from `top top` for its pinned length.
pub fn horizontal_section_trigger(panel_count: usize) -> Result<TriggerSpec> {
    pinned_trigger(horizontal_pin_vh(panel_count))
}

pub fn portfolio_pin_vh(panel_count: usize) -> f32 {
    PORTFOLIO_PIN_VH_PER_PANEL * panel_count as f32
}

/// Everything needed to mount a horizontal section.
#[derive(Clone, Debug)]
pub struct SectionPreset {
    pub trigger: TriggerSpec,
    pub scrub: f32,
    /// Viewport heights of scroll the section stays pinned for.
    pub pin_vh: f32,
    pub orchestrator: PanelOrchestrator,
}

impl SectionPreset {
    pub fn height(&self, viewport: Viewport) -> f32 {
        pinned_section_height(self.pin_vh, viewport)
    }
}

struct SectionTuning {
    scrub: f32,
    panel_scrub: f32,
    pin_vh: f32,
    track: TrackLayout,
    snap: SnapConfig,
}

fn section(
    panels: Vec<(String, PanelKind)>,
    tuning: SectionTuning,
    viewport: Viewport,
) -> Result<SectionPreset> {
    let trigger = pinned_trigger(tuning.pin_vh)?;
    let mut builder = PanelOrchestrator::builder()
        .track(tuning.track)
        .snap(tuning.snap)
        .panel_scrub(tuning.panel_scrub);
    for (id, kind) in panels {
        builder = builder.panel(kind.config(id)?);
    }
    Ok(SectionPreset {
        trigger,
        scrub: tuning.scrub,
        pin_vh: tuning.pin_vh,
        orchestrator: builder.build(viewport)?,
    })
}

/// The scroll-panel section on the home page.
pub fn horizontal_section(
    panels: Vec<(String, PanelKind)>,
    viewport: Viewport,
) -> Result<SectionPreset> {
    let tuning = SectionTuning {
        scrub: HORIZONTAL_SCRUB_SEC,
        panel_scrub: PANEL_SCRUB_SEC,
        pin_vh: horizontal_pin_vh(panels.len()),
        track: TrackLayout::default(),
        snap: SnapConfig::default(),
    };
    section(panels, tuning, viewport)
}

/// The portfolio variant: full-bleed panels, one viewport of scroll per
/// panel, quicker scrub and shorter snaps with no settle delay.
pub fn portfolio_section(
    panels: Vec<(String, PanelKind)>,
    viewport: Viewport,
) -> Result<SectionPreset> {
    let tuning = SectionTuning {
        scrub: PORTFOLIO_SCRUB_SEC,
        panel_scrub: PORTFOLIO_PANEL_SCRUB_SEC,
        pin_vh: portfolio_pin_vh(panels.len()),
        track: TrackLayout::new(PORTFOLIO_PANEL_WIDTH_VW, 0.0, 0.0)?,
        snap: SnapConfig::new(
            PORTFOLIO_SNAP_DURATION_MIN_SEC,
            PORTFOLIO_SNAP_DURATION_MAX_SEC,
            Easing::POWER2_IN_OUT,
        )?
        .with_delay(0.0),
    };
    section(panels, tuning, viewport)
}

// ---------------- Hero ----------------

const HERO_TIMELINE: f32 = 0.85;

/// Activation window of a timeline tween placed at `at`.
fn timeline_window(at: f32) -> (f32, f32) {
    (
        at / HERO_TIMELINE,
        (at + TIMELINE_DEFAULT_DURATION) / HERO_TIMELINE,
    )
}

pub fn hero_trigger() -> Result<TriggerSpec> {
    TriggerSpec::parse(Axis::Vertical, "top top", "+=100%")
}

/// Hero: the container slides one viewport to the left while the backdrop
/// darkens and the light image crossfades into the dark one.
pub fn hero_section() -> Result<ChannelSet> {
    use parts::*;

    let (slide_start, slide_end) = timeline_window(0.0);
    let (dark_start, dark_end) = timeline_window(0.25);
    let (light_start, light_end) = timeline_window(0.2);
    let (in_start, in_end) = timeline_window(0.35);

    ChannelSet::builder()
        .channel(
            ChannelSpec::new(CONTAINER, Property::TranslateX)
                .from_to(Quantity::vw(0.0), Quantity::vw(-100.0))
                .window(slide_start, slide_end),
        )
        .channel(
            ChannelSpec::new(BACKDROP, Property::custom(HERO_DARKNESS_VAR))
                .window(dark_start, dark_end)
                .easing(Easing::POWER1_IN_OUT),
        )
        .channel(
            spec(LIGHT_IMAGE, Property::Opacity, unitless(1.0, 0.0))
                .window(light_start, light_end)
                .easing(Easing::POWER2_OUT),
        )
        .channel(
            ChannelSpec::new(LIGHT_IMAGE, Property::XPercent)
                .from_to(Quantity::percent(0.0), Quantity::percent(-20.0))
                .window(light_start, light_end)
                .easing(Easing::POWER2_OUT),
        )
        .channel(
            ChannelSpec::opacity(DARK_IMAGE)
                .window(in_start, in_end)
                .easing(Easing::POWER2_OUT),
        )
        .channel(
            ChannelSpec::new(DARK_IMAGE, Property::XPercent)
                .from_to(Quantity::percent(20.0), Quantity::percent(0.0))
                .window(in_start, in_end)
                .easing(Easing::POWER2_OUT),
        )
        .build()
}
