//! Transition rules: the function from (alive, living neighbors) to the
//! cell's next state.

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};
use rand::Rng;

/// A transition rule, called once per cell per generation.
///
/// Every `FnMut(bool, u8) -> bool` is a rule, so plain functions such as
/// [`conway`] and closures can be passed directly.
pub trait Rule {
    fn next(&mut self, alive: bool, living_neighbors: u8) -> bool;
}

impl<F> Rule for F
where
    F: FnMut(bool, u8) -> bool,
{
    fn next(&mut self, alive: bool, living_neighbors: u8) -> bool {
        self(alive, living_neighbors)
    }
}

/// Standard Game of Life: survive on 2 or 3, birth on exactly 3.
pub fn conway(alive: bool, living_neighbors: u8) -> bool {
    match (alive, living_neighbors) {
        (true, 2) | (true, 3) => true,
        (false, 3) => true,
        _ => false,
    }
}

pub fn always_alive(_alive: bool, _living_neighbors: u8) -> bool {
    true
}

pub fn always_dead(_alive: bool, _living_neighbors: u8) -> bool {
    false
}

pub fn invert(alive: bool, _living_neighbors: u8) -> bool {
    !alive
}

/// Ignores the current state and makes each cell alive with probability
/// `density`, clamped to `[0, 1]`. NaN is treated as 0.
pub fn random_fill<R: Rng>(density: f64, mut rng: R) -> impl FnMut(bool, u8) -> bool {
    let density = if density.is_nan() {
        0.0
    } else {
        density.clamp(0.0, 1.0)
    };
    move |_, _| rng.gen_bool(density)
}

/// Outer-totalistic rule in `B…/S…` notation. Bit `n` of `birth` set means a
/// dead cell with `n` neighbors comes alive; bit `n` of `survival` set means
/// a live cell with `n` neighbors stays alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LifeLike {
    pub birth: u16,
    pub survival: u16,
}

impl LifeLike {
    /// B3/S23
    pub const fn conway() -> Self {
        Self {
            birth: 1 << 3,
            survival: (1 << 2) | (1 << 3),
        }
    }

    /// B36/S23
    pub const fn highlife() -> Self {
        Self {
            birth: (1 << 3) | (1 << 6),
            survival: (1 << 2) | (1 << 3),
        }
    }

    /// B2/S
    pub const fn seeds() -> Self {
        Self {
            birth: 1 << 2,
            survival: 0,
        }
    }

    /// B3678/S34678
    pub const fn day_and_night() -> Self {
        Self {
            birth: (1 << 3) | (1 << 6) | (1 << 7) | (1 << 8),
            survival: (1 << 3) | (1 << 4) | (1 << 6) | (1 << 7) | (1 << 8),
        }
    }

    /// B3/S012345678
    pub const fn life_without_death() -> Self {
        Self {
            birth: 1 << 3,
            survival: 0x1FF,
        }
    }

    pub fn apply(&self, alive: bool, living_neighbors: u8) -> bool {
        let mask = if alive { self.survival } else { self.birth };
        living_neighbors <= 8 && mask & (1 << living_neighbors) != 0
    }
}

impl Default for LifeLike {
    fn default() -> Self {
        Self::conway()
    }
}

impl Rule for LifeLike {
    fn next(&mut self, alive: bool, living_neighbors: u8) -> bool {
        self.apply(alive, living_neighbors)
    }
}

fn parse_counts(digits: &str, rulestring: &str) -> Result<u16> {
    let mut mask = 0u16;
    for ch in digits.chars() {
        let n = ch
            .to_digit(10)
            .filter(|&n| n <= 8)
            .with_context(|| format!("invalid neighbor count {ch:?} in rule {rulestring:?}"))?;
        mask |= 1 << n;
    }
    Ok(mask)
}

impl FromStr for LifeLike {
    type Err = anyhow::Error;

    /// Parses `B3/S23`-style rulestrings. Case-insensitive, and the birth and
    /// survival halves may appear in either order.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let Some((first, second)) = trimmed.split_once('/') else {
            bail!("rule {trimmed:?} is missing '/' between birth and survival");
        };

        let mut birth = None;
        let mut survival = None;
        for part in [first, second] {
            let part = part.trim();
            let mut chars = part.chars();
            match chars.next().map(|c| c.to_ascii_uppercase()) {
                Some('B') if birth.is_none() => {
                    birth = Some(parse_counts(chars.as_str(), trimmed)?)
                }
                Some('S') if survival.is_none() => {
                    survival = Some(parse_counts(chars.as_str(), trimmed)?)
                }
                _ => bail!("rule {trimmed:?} must have one B part and one S part"),
            }
        }

        match (birth, survival) {
            (Some(birth), Some(survival)) => Ok(Self { birth, survival }),
            _ => bail!("rule {trimmed:?} must have one B part and one S part"),
        }
    }
}

impl fmt::Display for LifeLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |mask: u16| -> String {
            (0..=8u8)
                .filter(|&n| mask & (1u16 << n) != 0)
                .map(|n| char::from(b'0' + n))
                .collect()
        };
        write!(f, "B{}/S{}", digits(self.birth), digits(self.survival))
    }
}

/// Named rule selector used by configuration and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleKind {
    #[default]
    Conway,
    HighLife,
    Seeds,
    DayAndNight,
    LifeWithoutDeath,
    Custom(LifeLike),
}

impl RuleKind {
    pub fn to_rule(self) -> LifeLike {
        match self {
            RuleKind::Conway => LifeLike::conway(),
            RuleKind::HighLife => LifeLike::highlife(),
            RuleKind::Seeds => LifeLike::seeds(),
            RuleKind::DayAndNight => LifeLike::day_and_night(),
            RuleKind::LifeWithoutDeath => LifeLike::life_without_death(),
            RuleKind::Custom(rule) => rule,
        }
    }
}

impl FromStr for RuleKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conway" | "life" => Ok(RuleKind::Conway),
            "highlife" => Ok(RuleKind::HighLife),
            "seeds" => Ok(RuleKind::Seeds),
            "day-and-night" => Ok(RuleKind::DayAndNight),
            "life-without-death" => Ok(RuleKind::LifeWithoutDeath),
            _ => s
                .parse::<LifeLike>()
                .map(RuleKind::Custom)
                .with_context(|| format!("unknown rule: {s}")),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Conway => f.write_str("conway"),
            RuleKind::HighLife => f.write_str("highlife"),
            RuleKind::Seeds => f.write_str("seeds"),
            RuleKind::DayAndNight => f.write_str("day-and-night"),
            RuleKind::LifeWithoutDeath => f.write_str("life-without-death"),
            RuleKind::Custom(rule) => write!(f, "{rule}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn live_cells_with_fewer_than_two_neighbors_die() {
        assert!(!conway(true, 0));
        assert!(!conway(true, 1));
    }

    #[test]
    fn live_cells_with_two_or_three_neighbors_survive() {
        assert!(conway(true, 2));
        assert!(conway(true, 3));
    }

    #[test]
    fn live_cells_with_more_than_three_neighbors_die() {
        for n in 4..=8 {
            assert!(!conway(true, n), "{n} neighbors");
        }
    }

    #[test]
    fn dead_cells_come_alive_with_exactly_three() {
        assert!(conway(false, 3));
        for n in (0..=8).filter(|&n| n != 3) {
            assert!(!conway(false, n), "{n} neighbors");
        }
    }

    #[test]
    fn life_like_conway_matches_conway_fn() {
        let rule = LifeLike::conway();
        for alive in [false, true] {
            for n in 0..=8 {
                assert_eq!(rule.apply(alive, n), conway(alive, n));
            }
        }
    }

    #[test]
    fn parses_rulestrings() -> Result<()> {
        assert_eq!("B3/S23".parse::<LifeLike>()?, LifeLike::conway());
        assert_eq!("s23/b36".parse::<LifeLike>()?, LifeLike::highlife());
        assert_eq!("B2/S".parse::<LifeLike>()?, LifeLike::seeds());
        assert_eq!(LifeLike::day_and_night().to_string(), "B3678/S34678");
        Ok(())
    }

    #[test]
    fn rejects_bad_rulestrings() {
        assert!("B3S23".parse::<LifeLike>().is_err());
        assert!("B9/S23".parse::<LifeLike>().is_err());
        assert!("B3/B23".parse::<LifeLike>().is_err());
        assert!("X3/S23".parse::<LifeLike>().is_err());
    }

    #[test]
    fn rule_kind_names() -> Result<()> {
        assert_eq!("conway".parse::<RuleKind>()?, RuleKind::Conway);
        assert_eq!("HighLife".parse::<RuleKind>()?, RuleKind::HighLife);
        assert_eq!(
            "B36/S125".parse::<RuleKind>()?.to_rule().to_string(),
            "B36/S125"
        );
        assert!("nonsense".parse::<RuleKind>().is_err());
        Ok(())
    }

    #[test]
    fn random_fill_respects_extremes() {
        let mut never = random_fill(0.0, StdRng::seed_from_u64(1));
        let mut always = random_fill(1.0, StdRng::seed_from_u64(1));
        for n in 0..=8 {
            assert!(!never.next(true, n));
            assert!(always.next(false, n));
        }
    }

    #[test]
    fn random_fill_tolerates_out_of_range_density() {
        let mut nan = random_fill(f64::NAN, StdRng::seed_from_u64(7));
        let mut huge = random_fill(f64::INFINITY, StdRng::seed_from_u64(7));
        let mut negative = random_fill(-3.0, StdRng::seed_from_u64(7));
        for n in 0..=8 {
            assert!(!nan.next(true, n));
            assert!(huge.next(false, n));
            assert!(!negative.next(true, n));
        }
    }
}
