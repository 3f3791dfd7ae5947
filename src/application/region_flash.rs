use crate::application::config::RegionFlashStyle;
use crate::domain::geography::RegionIndex;
use crate::domain::logging::LogComponent;
use crate::domain::trades::{Side, TradeEvent};
use crate::log_warn;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

const FALLBACK_BASE: Rgb = Rgb { r: 0x26, g: 0x26, b: 0x26 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// `#rrggbb` or `#rgb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        let channel = |text: &str| u8::from_str_radix(text, 16).ok();
        match digits.len() {
            6 => Some(Self {
                r: channel(digits.get(0..2)?)?,
                g: channel(digits.get(2..4)?)?,
                b: channel(digits.get(4..6)?)?,
            }),
            3 => {
                let short = |i: usize| channel(digits.get(i..i + 1)?).map(|v| v * 17);
                Some(Self { r: short(0)?, g: short(1)?, b: short(2)? })
            }
            _ => None,
        }
    }

    /// Every channel scaled by `0.7^k`.
    pub fn darker(self, k: f64) -> Self {
        let factor = 0.7_f64.powf(k.max(0.0));
        let scale = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
        Self { r: scale(self.r), g: scale(self.g), b: scale(self.b) }
    }

    /// Linear blend towards `other`; `t` is clamped to `[0, 1]`.
    pub fn mix(self, other: Self, t: f64) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self { r: lerp(self.r, other.r), g: lerp(self.g, other.g), b: lerp(self.b, other.b) }
    }

    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fill for one boundary feature in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionFill {
    pub feature: usize,
    pub color: Rgb,
}

#[derive(Debug, Clone)]
struct RegionGlow {
    from: Rgb,
    target: Rgb,
    triggered_at: f64,
    /// End times of the flashes still overlapping.
    overlaps: VecDeque<f64>,
}

/// States lit up by the trades booked in them, fading back to the base fill.
pub struct RegionFlashLayer {
    style: RegionFlashStyle,
    regions: RegionIndex,
    base: Rgb,
    buy: Rgb,
    sell: Rgb,
    glows: BTreeMap<usize, RegionGlow>,
}

impl RegionFlashLayer {
    pub fn new(style: RegionFlashStyle, regions: RegionIndex) -> Self {
        let parse = |hex: &str, fallback: Rgb| {
            Rgb::from_hex(hex).unwrap_or_else(|| {
                log_warn!(
                    LogComponent::Application("RegionFlashLayer"),
                    "Unreadable colour {:?}, using {}",
                    hex,
                    fallback.to_css()
                );
                fallback
            })
        };
        let base = parse(&style.base_color, FALLBACK_BASE);
        let buy = parse(&style.colors.buy, Rgb { r: 0xF4, g: 0xF6, b: 0x7E });
        let sell = parse(&style.colors.sell, Rgb { r: 0xFA, g: 0x7F, b: 0x26 });
        Self { style, regions, base, buy, sell, glows: BTreeMap::new() }
    }

    fn color_at(&self, glow: &RegionGlow, now: f64) -> Rgb {
        let elapsed = (now - glow.triggered_at).max(0.0);
        if elapsed < self.style.flash_ms {
            return glow.from.mix(glow.target, elapsed / self.style.flash_ms);
        }
        let fading = elapsed - self.style.flash_ms;
        if fading < self.style.fade_ms {
            glow.target.mix(self.base, fading / self.style.fade_ms)
        } else {
            self.base
        }
    }

    fn expires_at(&self, glow: &RegionGlow) -> f64 {
        glow.triggered_at + self.style.flash_ms + self.style.fade_ms
    }

    /// Starts a flash for every event booked in a known region; returns how
    /// many flashes were started.
    pub fn trigger(&mut self, events: &[TradeEvent], now: f64) -> usize {
        let mut started = 0;
        for event in events {
            let Some(region) = event.region.as_deref() else {
                continue;
            };
            let features = self.regions.features_of(region).to_vec();
            if features.is_empty() {
                continue;
            }
            for feature in features {
                self.flash(feature, event.side, now);
            }
            started += 1;
        }
        started
    }

    fn flash(&mut self, feature: usize, side: Side, now: f64) {
        let from = match self.glows.get(&feature) {
            Some(glow) => self.color_at(glow, now),
            None => self.base,
        };
        let flash_ms = self.style.flash_ms;
        let glow = self.glows.entry(feature).or_insert_with(|| RegionGlow {
            from,
            target: from,
            triggered_at: now,
            overlaps: VecDeque::new(),
        });
        while glow.overlaps.front().is_some_and(|end| *end <= now) {
            glow.overlaps.pop_front();
        }
        glow.overlaps.push_back(now + flash_ms);

        let intensity = (glow.overlaps.len() as u32).min(self.style.max_intensity);
        let color = match side {
            Side::Buy => self.buy,
            Side::Sell => self.sell,
        };
        glow.from = from;
        glow.target = color.darker(f64::from(intensity) * self.style.darken_step);
        glow.triggered_at = now;
    }

    /// Fills for every region still lit at `now`; finished glows are dropped.
    pub fn advance(&mut self, now: f64) -> Vec<RegionFill> {
        let expired: Vec<usize> = self
            .glows
            .iter()
            .filter(|(_, glow)| now >= self.expires_at(glow))
            .map(|(feature, _)| *feature)
            .collect();
        for feature in expired {
            self.glows.remove(&feature);
        }
        self.glows
            .iter()
            .map(|(feature, glow)| RegionFill { feature: *feature, color: self.color_at(glow, now) })
            .collect()
    }

    /// Current overlap count of `feature`, as used for its darkening.
    pub fn intensity_of(&self, feature: usize, now: f64) -> u32 {
        self.glows
            .get(&feature)
            .map(|glow| glow.overlaps.iter().filter(|end| **end > now).count() as u32)
            .unwrap_or(0)
            .min(self.style.max_intensity)
    }

    pub fn active_count(&self) -> usize {
        self.glows.len()
    }

    pub fn clear(&mut self) {
        self.glows.clear();
    }

    pub fn base_color(&self) -> Rgb {
        self.base
    }
}
