use super::interface::InterfaceResult;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_CONTACT_COMPONENT: u8 = 40;
pub const MAX_DISTANCE_COMPONENT: u8 = 40;
pub const MAX_CLASH_COMPONENT: u8 = 20;

/// Mean contact distances inside this band score full distance points.
const IDEAL_DISTANCE_BAND: (f64, f64) = (3.5, 4.5);
/// Mean contact distances inside this band score partial distance points.
const ACCEPTABLE_DISTANCE_BAND: (f64, f64) = (3.0, 5.0);
const SAFE_MIN_DISTANCE: f64 = 2.8;
const TOLERABLE_MIN_DISTANCE: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_total(total: u8) -> Self {
        match total {
            85.. => Grade::A,
            70..=84 => Grade::B,
            50..=69 => Grade::C,
            30..=49 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::A => "Excellent",
            Grade::B => "Good",
            Grade::C => "Moderate",
            Grade::D => "Weak",
            Grade::F => "Poor",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            Grade::A => "Strong, well-packed interface; the binder is a promising candidate.",
            Grade::B => "Good interface with minor weaknesses; worth taking forward.",
            Grade::C => "Moderate interface; refine the binder before experimental follow-up.",
            Grade::D => "Weak interface; binding is doubtful without substantial redesign.",
            Grade::F => "No convincing interface; the binder is unlikely to bind this target.",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{}", letter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreBreakdown {
    pub contact_component: u8,
    pub distance_component: u8,
    pub clash_component: u8,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        (self.contact_component as u16 + self.distance_component as u16 + self.clash_component as u16)
            .min(100) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualityScore {
    pub total: u8,
    pub breakdown: ScoreBreakdown,
    pub grade: Grade,
    pub recommendations: Vec<String>,
}

impl QualityScore {
    pub fn verdict(&self) -> &'static str {
        self.grade.verdict()
    }
}

/// Scores an interface on a 0–100 heuristic rubric.
///
/// | Component | Max | Full marks                       |
/// |-----------|-----|----------------------------------|
/// | Contacts  | 40  | 15 or more residue contacts      |
/// | Distance  | 40  | mean distance in [3.5, 4.5] Å    |
/// | Clash     | 20  | closest contact at least 2.8 Å   |
///
/// An interface without contacts scores 0 for contacts and distance and full marks
/// for clashes, since nothing overlaps.
pub fn score(result: &InterfaceResult) -> QualityScore {
    let breakdown = ScoreBreakdown {
        contact_component: contact_component(result.contact_count()),
        distance_component: distance_component(result.mean_distance()),
        clash_component: clash_component(result.min_distance()),
    };
    let total = breakdown.total();
    QualityScore {
        total,
        breakdown,
        grade: Grade::from_total(total),
        recommendations: recommendations(result, &breakdown),
    }
}

fn contact_component(count: usize) -> u8 {
    match count {
        15.. => 40,
        10..=14 => 30,
        5..=9 => 15,
        _ => 0,
    }
}

fn distance_component(mean: Option<f64>) -> u8 {
    let Some(mean) = mean else {
        return 0;
    };
    let (ideal_lo, ideal_hi) = IDEAL_DISTANCE_BAND;
    let (ok_lo, ok_hi) = ACCEPTABLE_DISTANCE_BAND;
    if (ideal_lo..=ideal_hi).contains(&mean) {
        40
    } else if (ok_lo..=ok_hi).contains(&mean) {
        25
    } else {
        let off_band = if mean < ok_lo { ok_lo - mean } else { mean - ok_hi };
        round_points(15.0 - 5.0 * (off_band / 2.0).min(1.0))
    }
}

fn clash_component(min: Option<f64>) -> u8 {
    match min {
        None => 20,
        Some(d) if d >= SAFE_MIN_DISTANCE => 20,
        Some(d) if d >= TOLERABLE_MIN_DISTANCE => 10,
        Some(_) => 0,
    }
}

/// Rounds half away from zero after snapping away floating-point noise, so a value
/// that is mathematically 12.5 rounds to 13 even when computed as 12.4999999.
fn round_points(value: f64) -> u8 {
    let snapped = (value * 1e9).round() / 1e9;
    snapped.round().clamp(0.0, 100.0) as u8
}

fn recommendations(result: &InterfaceResult, breakdown: &ScoreBreakdown) -> Vec<String> {
    let mut hints = Vec::new();

    if breakdown.contact_component < MAX_CONTACT_COMPONENT {
        let count = result.contact_count();
        hints.push(match count {
            0 => format!(
                "No residue contacts within {:.1} Å; the binder does not reach the target surface. \
                 Reposition or redesign the binder against the intended epitope.",
                result.cutoff()
            ),
            1..=4 => format!(
                "Only {} residue contacts; the interface is too small for stable binding. \
                 Extend the binder along the target surface.",
                count
            ),
            _ => format!(
                "{} residue contacts; adding interface residues would strengthen binding \
                 (15 or more scores full marks).",
                count
            ),
        });
    }

    if breakdown.distance_component < MAX_DISTANCE_COMPONENT {
        if let Some(mean) = result.mean_distance() {
            if mean < IDEAL_DISTANCE_BAND.0 {
                hints.push(format!(
                    "Mean contact distance {:.2} Å is shorter than the ideal 3.5–4.5 Å; \
                     the interface may be over-packed.",
                    mean
                ));
            } else {
                hints.push(format!(
                    "Mean contact distance {:.2} Å is longer than the ideal 3.5–4.5 Å; \
                     the interface is loosely packed.",
                    mean
                ));
            }
        }
    }

    if breakdown.clash_component < MAX_CLASH_COMPONENT {
        if let Some(min) = result.min_distance() {
            if min < TOLERABLE_MIN_DISTANCE {
                hints.push(format!(
                    "Steric clash: closest contact is {:.2} Å (below {:.1} Å). \
                     Relax or redesign the clashing residues.",
                    min, TOLERABLE_MIN_DISTANCE
                ));
            } else {
                hints.push(format!(
                    "Closest contact is {:.2} Å, near the clash range; check for strained contacts.",
                    min
                ));
            }
        }
    }

    hints
}
