//! Grouping of resolved channels into per-element style declarations.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::reveal::{Property, Quantity, ResolvedVisualState, Target};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetStyle {
    pub opacity: Option<f32>,
    pub translate_x: Option<Quantity>,
    pub translate_y: Option<Quantity>,
    pub x_percent: Option<f32>,
    pub scale: Option<f32>,
    pub custom: SmallVec<[(Rc<str>, Quantity); 2]>,
}

impl TargetStyle {
    pub fn set(&mut self, property: &Property, value: Quantity) {
        match property {
            Property::Opacity => self.opacity = Some(value.value),
            Property::TranslateX => self.translate_x = Some(value),
            Property::TranslateY => self.translate_y = Some(value),
            Property::XPercent => self.x_percent = Some(value.value),
            Property::Scale => self.scale = Some(value.value),
            Property::Custom(name) => match self.custom.iter_mut().find(|(n, _)| n == name) {
                Some(slot) => slot.1 = value,
                None => self.custom.push((name.clone(), value)),
            },
        }
    }

    /// CSS `transform` value, or `None` when no transform channel is present.
    pub fn transform_css(&self) -> Option<String> {
        let mut parts: SmallVec<[String; 3]> = SmallVec::new();
        if let Some(pct) = self.x_percent {
            parts.push(format!("translateX({}%)", css_number(pct)));
        }
        if self.translate_x.is_some() || self.translate_y.is_some() {
            let axis = |q: Option<Quantity>| {
                q.map(|q| format!("{}{}", css_number(q.value), q.unit.suffix()))
                    .unwrap_or_else(|| "0px".to_string())
            };
            parts.push(format!(
                "translate3d({}, {}, 0px)",
                axis(self.translate_x),
                axis(self.translate_y)
            ));
        }
        if let Some(s) = self.scale {
            parts.push(format!("scale({})", css_number(s)));
        }
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    pub fn opacity_css(&self) -> Option<String> {
        self.opacity.map(css_number)
    }

    /// `(--name, value)` pairs for custom properties.
    pub fn custom_properties(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.custom.iter().map(|(name, q)| {
            (
                format!("--{name}"),
                format!("{}{}", css_number(q.value), q.unit.suffix()),
            )
        })
    }
}

/// One style per target, in order of first appearance in the state.
pub fn group_by_target(state: &ResolvedVisualState) -> Vec<(Target, TargetStyle)> {
    let mut out: Vec<(Target, TargetStyle)> = Vec::new();
    for entry in state.iter() {
        let idx = match out.iter().position(|(t, _)| *t == entry.target) {
            Some(i) => i,
            None => {
                out.push((entry.target.clone(), TargetStyle::default()));
                out.len() - 1
            }
        };
        out[idx].1.set(&entry.property, entry.value);
    }
    out
}

/// Shortest form with at most three decimals: `-80`, `0.5`, `1.06`.
pub fn css_number(v: f32) -> String {
    let v = if v.is_finite() { v } else { 0.0 };
    let text = format!("{:.3}", v);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" || text.is_empty() {
        "0".to_string()
    } else {
        text.to_string()
    }
}
