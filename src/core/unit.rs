use serde::{Deserialize, Serialize};
use std::fmt;

pub type Army = Vec<Unit>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[readonly::make]
pub struct Unit {
    pub health: u32,
    pub damage: u32,
}

impl Unit {
    pub fn new(health: u32, damage: u32) -> Self {
        Self { health, damage }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Copy of this unit after taking `damage`, health floored at zero.
    pub fn wounded(&self, damage: u32) -> Self {
        Self {
            health: self.health.saturating_sub(damage),
            damage: self.damage,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[H:{} D:{}]", self.health, self.damage)
    }
}

pub fn total_health(army: &[Unit]) -> i64 {
    army.iter().map(|unit| i64::from(unit.health)).sum()
}

pub fn alive_indices(army: &[Unit]) -> impl Iterator<Item = usize> + '_ {
    army.iter()
        .enumerate()
        .filter(|(_, unit)| unit.is_alive())
        .map(|(idx, _)| idx)
}

pub fn army_text(army: &[Unit]) -> String {
    army.iter()
        .map(|unit| unit.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
