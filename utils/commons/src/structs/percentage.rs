use super::*;

use core::ops::Mul;

/// Fixed point percentage value with micro percent precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, SchemaType)]
pub struct Percentage(u64);

impl Percentage {
    pub fn from_micro_percent(micro_percent: u64) -> Self {
        Self(micro_percent)
    }

    pub fn from_percent(percent: u64) -> Self {
        Self(percent * 1_000_000)
    }
}

impl Mul<Amount> for Percentage {
    type Output = Amount;

    // Rounds down to whole micro CCD.
    fn mul(self, rhs: Amount) -> Self::Output {
        Amount::from_micro_ccd((rhs.micro_ccd as u128 * self.0 as u128 / 100_000_000) as u64)
    }
}
