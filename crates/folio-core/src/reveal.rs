//! Progress → per-channel visual values.
//!
//! A [`ChannelSet`] is built once per panel and validated up front; after
//! that, resolving it is a pure function of the progress value, so scrubbing
//! backwards retraces exactly the same states.

use std::fmt;
use std::rc::Rc;

use fnv::FnvHashSet;
use smallvec::SmallVec;

use crate::easing::Easing;
use crate::error::{ConfigurationError, Result};
use crate::tracker::sanitize_unit;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    None,
    Px,
    Percent,
    Vw,
    Vh,
}

impl Unit {
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::None => "",
            Unit::Px => "px",
            Unit::Percent => "%",
            Unit::Vw => "vw",
            Unit::Vh => "vh",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quantity {
    pub value: f32,
    pub unit: Unit,
}

impl Quantity {
    pub const fn unitless(value: f32) -> Self {
        Self {
            value,
            unit: Unit::None,
        }
    }

    pub const fn px(value: f32) -> Self {
        Self {
            value,
            unit: Unit::Px,
        }
    }

    pub const fn percent(value: f32) -> Self {
        Self {
            value,
            unit: Unit::Percent,
        }
    }

    pub const fn vw(value: f32) -> Self {
        Self {
            value,
            unit: Unit::Vw,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// The visual property a channel drives.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Opacity,
    TranslateX,
    TranslateY,
    Scale,
    /// Horizontal translation as a percentage of the element's own width.
    XPercent,
    /// A CSS custom property (without the leading `--`).
    Custom(Rc<str>),
}

impl Property {
    pub fn custom(name: &str) -> Self {
        Property::Custom(Rc::from(name))
    }

    fn accepts(&self, unit: Unit) -> bool {
        match self {
            Property::Opacity | Property::Scale => unit == Unit::None,
            Property::TranslateX | Property::TranslateY => {
                matches!(unit, Unit::Px | Unit::Percent | Unit::Vw | Unit::Vh)
            }
            Property::XPercent => unit == Unit::Percent,
            Property::Custom(_) => true,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Opacity => f.write_str("opacity"),
            Property::TranslateX => f.write_str("x"),
            Property::TranslateY => f.write_str("y"),
            Property::Scale => f.write_str("scale"),
            Property::XPercent => f.write_str("xPercent"),
            Property::Custom(name) => write!(f, "--{name}"),
        }
    }
}

/// Which sub-element of a panel a channel animates: a named part, optionally
/// one item of a repeated part (e.g. word 3 of the title).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Target {
    pub part: Rc<str>,
    pub item: Option<usize>,
}

impl Target {
    pub fn part(part: &str) -> Self {
        Self {
            part: Rc::from(part),
            item: None,
        }
    }

    pub fn item(part: &str, item: usize) -> Self {
        Self {
            part: Rc::from(part),
            item: Some(item),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item {
            Some(i) => write!(f, "{}[{}]", self.part, i),
            None => f.write_str(&self.part),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivationWindow {
    pub start: f32,
    pub end: f32,
}

impl ActivationWindow {
    /// Local progress inside the window, clamped to `[0, 1]`. A zero-width
    /// window is a step at `start`.
    #[inline]
    pub fn local(&self, progress: f32) -> f32 {
        let width = self.end - self.start;
        if width <= 0.0 {
            if progress >= self.start {
                1.0
            } else {
                0.0
            }
        } else {
            sanitize_unit((progress - self.start) / width)
        }
    }
}

#[derive(Clone, Debug)]
pub struct Channel {
    name: Rc<str>,
    target: Target,
    property: Property,
    window: ActivationWindow,
    easing: Easing,
    from: Quantity,
    to: Quantity,
}

impl Channel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn property(&self) -> &Property {
        &self.property
    }

    pub fn window(&self) -> ActivationWindow {
        self.window
    }

    pub fn output_range(&self) -> (Quantity, Quantity) {
        (self.from, self.to)
    }

    /// Eased fraction in `[0, 1]` for a progress value.
    #[inline]
    pub fn fraction(&self, progress: f32) -> f32 {
        let local = self.window.local(sanitize_unit(progress));
        sanitize_unit(self.easing.apply(local))
    }

    #[inline]
    pub fn resolve(&self, progress: f32) -> Quantity {
        Quantity {
            value: lerp_bounded(self.from.value, self.to.value, self.fraction(progress)),
            unit: self.from.unit,
        }
    }
}

/// Endpoints are returned exactly; anything in between is kept inside the
/// range regardless of rounding.
#[inline]
fn lerp_bounded(from: f32, to: f32, f: f32) -> f32 {
    if f <= 0.0 {
        from
    } else if f >= 1.0 {
        to
    } else {
        (from + (to - from) * f).clamp(from.min(to), from.max(to))
    }
}

/// Unvalidated description of one channel; turned into a [`Channel`] by
/// [`ChannelSetBuilder::build`].
#[derive(Clone, Debug)]
pub struct ChannelSpec {
    target: Target,
    property: Property,
    name: Option<String>,
    window: ActivationWindow,
    easing: Easing,
    from: Quantity,
    to: Quantity,
}

impl ChannelSpec {
    /// Linear, full-window channel from 0 to 1 (unitless).
    pub fn new(part: &str, property: Property) -> Self {
        Self {
            target: Target::part(part),
            property,
            name: None,
            window: ActivationWindow {
                start: 0.0,
                end: 1.0,
            },
            easing: Easing::Linear,
            from: Quantity::unitless(0.0),
            to: Quantity::unitless(1.0),
        }
    }

    pub fn opacity(part: &str) -> Self {
        Self::new(part, Property::Opacity)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn item(mut self, item: usize) -> Self {
        self.target.item = Some(item);
        self
    }

    pub fn window(mut self, start: f32, end: f32) -> Self {
        self.window = ActivationWindow { start, end };
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn from_to(mut self, from: Quantity, to: Quantity) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    fn resolved_name(&self) -> String {
        match &self.name {
            Some(n) => n.clone(),
            None => format!("{}.{}", self.target, self.property),
        }
    }

    fn validate(self) -> Result<Channel> {
        let name = self.resolved_name();
        if name.trim().is_empty() {
            return Err(ConfigurationError::EmptyChannelName);
        }
        let finite = [
            ("activation start", self.window.start),
            ("activation end", self.window.end),
            ("output from", self.from.value),
            ("output to", self.to.value),
        ];
        if let Some(&(field, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigurationError::NonFiniteValue { name, field });
        }
        if self.window.start > self.window.end {
            return Err(ConfigurationError::InvertedActivationWindow {
                name,
                start: self.window.start,
                end: self.window.end,
            });
        }
        if self.from.unit != self.to.unit {
            return Err(ConfigurationError::MismatchedOutputUnits {
                name,
                from: self.from.unit,
                to: self.to.unit,
            });
        }
        if !self.property.accepts(self.from.unit) {
            return Err(ConfigurationError::UnsupportedUnit {
                name,
                property: self.property.to_string(),
                unit: self.from.unit,
            });
        }
        Ok(Channel {
            name: Rc::from(name.as_str()),
            target: self.target,
            property: self.property,
            window: self.window,
            easing: self.easing,
            from: self.from,
            to: self.to,
        })
    }
}

/// Same-width activation windows offset by a fixed delay per item, producing
/// a wave of reveals as progress increases.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stagger {
    first_start: f32,
    width: f32,
    item_delay: f32,
}

impl Stagger {
    pub fn new(first_start: f32, width: f32, item_delay: f32) -> Result<Self> {
        if !item_delay.is_finite() || item_delay < 0.0 {
            return Err(ConfigurationError::NegativeStaggerDelay(item_delay));
        }
        if !width.is_finite() || width < 0.0 {
            return Err(ConfigurationError::NegativeStaggerWidth(width));
        }
        Ok(Self {
            first_start,
            width,
            item_delay,
        })
    }

    /// Stagger equivalent to `clamp((p * speed - i * delay) / width, 0, 1)`.
    pub fn scaled(speed: f32, delay: f32, width: f32) -> Result<Self> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ConfigurationError::InvalidStaggerSpeed(speed));
        }
        Self::new(0.0, width / speed, delay / speed)
    }

    #[inline]
    pub fn window(&self, item: usize) -> ActivationWindow {
        let start = self.first_start + item as f32 * self.item_delay;
        ActivationWindow {
            start,
            end: start + self.width,
        }
    }
}

#[derive(Default)]
pub struct ChannelSetBuilder {
    specs: Vec<ChannelSpec>,
}

impl ChannelSetBuilder {
    pub fn channel(mut self, spec: ChannelSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Add `templates` once per item `0..count`, each copy targeting that
    /// item and using the stagger's window for it.
    pub fn staggered(mut self, count: usize, stagger: Stagger, templates: &[ChannelSpec]) -> Self {
        for i in 0..count {
            let window = stagger.window(i);
            for template in templates {
                self.specs
                    .push(template.clone().item(i).window(window.start, window.end));
            }
        }
        self
    }

    pub fn build(self) -> Result<ChannelSet> {
        let mut seen = FnvHashSet::default();
        let mut channels = SmallVec::with_capacity(self.specs.len());
        for spec in self.specs {
            let channel = spec.validate()?;
            if !seen.insert(channel.name.clone()) {
                return Err(ConfigurationError::DuplicateChannel(channel.name.to_string()));
            }
            channels.push(channel);
        }
        Ok(ChannelSet { channels })
    }
}

/// Ordered, validated channels for one panel.
#[derive(Clone, Debug, Default)]
pub struct ChannelSet {
    channels: SmallVec<[Channel; 8]>,
}

impl ChannelSet {
    pub fn builder() -> ChannelSetBuilder {
        ChannelSetBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| &*c.name == name)
    }

    pub fn resolve(&self, progress: f32) -> ResolvedVisualState {
        let mut state = ResolvedVisualState::with_capacity(self.channels.len());
        self.resolve_into(progress, &mut state);
        state
    }

    /// Resolve into an existing buffer, reusing its allocation.
    pub fn resolve_into(&self, progress: f32, state: &mut ResolvedVisualState) {
        state.entries.clear();
        state.entries.extend(self.channels.iter().map(|c| ResolvedValue {
            name: c.name.clone(),
            target: c.target.clone(),
            property: c.property.clone(),
            value: c.resolve(progress),
        }));
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedValue {
    pub name: Rc<str>,
    pub target: Target,
    pub property: Property,
    pub value: Quantity,
}

/// Channel name → resolved output, in channel-set order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedVisualState {
    entries: Vec<ResolvedValue>,
}

impl ResolvedVisualState {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedValue> {
        self.entries.iter()
    }

    pub fn get(&self, name: &str) -> Option<Quantity> {
        self.entries
            .iter()
            .find(|e| &*e.name == name)
            .map(|e| e.value)
    }

    pub fn value(&self, name: &str) -> Option<f32> {
        self.get(name).map(|q| q.value)
    }
}
