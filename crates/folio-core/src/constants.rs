// Shared motion tuning constants used by the web front-end and the presets.

// Magnetic cursor
pub const MAGNETIC_RADIUS_PX: f32 = 80.0; // full pull inside this distance from the target center
pub const MAGNETIC_STRENGTH: f32 = 0.2; // fraction of the pointer-to-center gap closed at full pull
pub const MIN_POINTER_DISTANCE_PX: f32 = 1.0; // guards the pull against division by zero

// Cursor ring spring (follows the magnetic position)
pub const CURSOR_SPRING_STIFFNESS: f32 = 180.0;
pub const CURSOR_SPRING_DAMPING: f32 = 24.0;
pub const CURSOR_MAX_STEP_SEC: f32 = 1.0 / 30.0; // integrate long frames in slices no larger than this

// Cursor ring sizes (px)
pub const CURSOR_RING_IDLE_PX: f32 = 32.0;
pub const CURSOR_RING_BUTTON_PX: f32 = 48.0;
pub const CURSOR_RING_LABELED_PX: f32 = 72.0;

// Horizontal track geometry (viewport-width units)
pub const PANEL_WIDTH_VW: f32 = 90.0;
pub const PANEL_GAP_VW: f32 = 4.0;
pub const TRACK_PADDING_VW: f32 = 4.0;
pub const PORTFOLIO_PANEL_WIDTH_VW: f32 = 100.0; // portfolio panels are full-bleed, no gap or padding

// Pinned scroll length: this many viewport heights per six panels (home), one per panel (portfolio)
pub const SECTION_HEIGHT_PER_SIX_PANELS: f32 = 3.1;
pub const PORTFOLIO_PIN_VH_PER_PANEL: f32 = 1.0;

// Scrub lag (seconds for displayed progress to catch up with the scrollbar)
pub const HORIZONTAL_SCRUB_SEC: f32 = 2.2;
pub const PORTFOLIO_SCRUB_SEC: f32 = 1.25;
pub const HERO_SCRUB_SEC: f32 = 2.0;
pub const PANEL_SCRUB_SEC: f32 = 1.5; // per-panel reveal lag on top of the section scrub
pub const PORTFOLIO_PANEL_SCRUB_SEC: f32 = 1.0;

// Displayed progress covers ~95% of the gap to the scrollbar after one scrub lag
pub const SCRUB_TIME_CONSTANTS: f32 = 3.0;

// Snap settling
pub const SNAP_DURATION_MIN_SEC: f32 = 0.3;
pub const SNAP_DURATION_MAX_SEC: f32 = 0.8;
pub const SNAP_SETTLE_DELAY_SEC: f32 = 0.02;
pub const PORTFOLIO_SNAP_DURATION_MIN_SEC: f32 = 0.2;
pub const PORTFOLIO_SNAP_DURATION_MAX_SEC: f32 = 0.6;
pub const SETTLE_EPSILON: f32 = 1e-4; // displayed progress this close to target counts as settled

// Section theme
pub const INVERT_THRESHOLD: f32 = 0.25; // section switches to the inverted palette past this progress
pub const PROGRESS_INV_GAIN: f32 = 2.0; // --scroll-p-inv = min(1, p * gain)

// Below this viewport width the horizontal track collapses into a stacked layout
pub const MOBILE_BREAKPOINT_PX: f32 = 1024.0;

// Title word stagger: word i reveals over clamp((p * SPEED - i * DELAY) / WIDTH)
pub const WORD_STAGGER_SPEED: f32 = 1.15;
pub const WORD_STAGGER_DELAY: f32 = 0.07;
pub const WORD_STAGGER_WIDTH: f32 = 0.3;

// Timeline tween length used by the hero section when no duration is given
pub const TIMELINE_DEFAULT_DURATION: f32 = 0.5;
