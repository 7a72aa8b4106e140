use serde::{Deserialize, Serialize};

/// Gameplay modifier bitmask as stored in the replay.
///
/// # Examples
/// ```
/// use osrgraph_core::Mods;
///
/// let mods = Mods::from_bits(Mods::HIDDEN | Mods::DOUBLE_TIME);
/// assert!(mods.contains(Mods::HIDDEN));
/// assert_eq!(mods.names(), vec!["HD", "DT"]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mods(u32);

impl Mods {
    pub const NO_FAIL: u32 = 1 << 0;
    pub const EASY: u32 = 1 << 1;
    pub const TOUCH_DEVICE: u32 = 1 << 2;
    pub const HIDDEN: u32 = 1 << 3;
    pub const HARD_ROCK: u32 = 1 << 4;
    pub const SUDDEN_DEATH: u32 = 1 << 5;
    pub const DOUBLE_TIME: u32 = 1 << 6;
    pub const RELAX: u32 = 1 << 7;
    pub const HALF_TIME: u32 = 1 << 8;
    pub const NIGHTCORE: u32 = 1 << 9;
    pub const FLASHLIGHT: u32 = 1 << 10;
    pub const AUTOPLAY: u32 = 1 << 11;
    pub const SPUN_OUT: u32 = 1 << 12;
    pub const AUTOPILOT: u32 = 1 << 13;
    pub const PERFECT: u32 = 1 << 14;
    pub const SCORE_V2: u32 = 1 << 29;
    pub const MIRROR: u32 = 1 << 30;

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    /// Short names of the known flags that are set, lowest bit first.
    ///
    /// Nightcore and Perfect imply DoubleTime and SuddenDeath; only the
    /// stronger flag is listed.
    pub fn names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        for &(flag, name) in MOD_NAMES {
            if !self.contains(flag) {
                continue;
            }
            if flag == Self::DOUBLE_TIME && self.contains(Self::NIGHTCORE) {
                continue;
            }
            if flag == Self::SUDDEN_DEATH && self.contains(Self::PERFECT) {
                continue;
            }
            names.push(name);
        }
        names
    }
}

const MOD_NAMES: &[(u32, &str)] = &[
    (Mods::NO_FAIL, "NF"),
    (Mods::EASY, "EZ"),
    (Mods::TOUCH_DEVICE, "TD"),
    (Mods::HIDDEN, "HD"),
    (Mods::HARD_ROCK, "HR"),
    (Mods::SUDDEN_DEATH, "SD"),
    (Mods::DOUBLE_TIME, "DT"),
    (Mods::RELAX, "RX"),
    (Mods::HALF_TIME, "HT"),
    (Mods::NIGHTCORE, "NC"),
    (Mods::FLASHLIGHT, "FL"),
    (Mods::AUTOPLAY, "AT"),
    (Mods::SPUN_OUT, "SO"),
    (Mods::AUTOPILOT, "AP"),
    (Mods::PERFECT, "PF"),
    (Mods::SCORE_V2, "V2"),
    (Mods::MIRROR, "MR"),
];

#[cfg(test)]
mod tests {
    use super::Mods;

    #[test]
    fn empty_mask_has_no_names() {
        assert!(Mods::default().names().is_empty());
    }

    #[test]
    fn nightcore_hides_double_time() {
        let mods = Mods::from_bits(Mods::NIGHTCORE | Mods::DOUBLE_TIME | Mods::HIDDEN);
        assert_eq!(mods.names(), vec!["HD", "NC"]);
    }

    #[test]
    fn perfect_hides_sudden_death() {
        let mods = Mods::from_bits(Mods::PERFECT | Mods::SUDDEN_DEATH);
        assert_eq!(mods.names(), vec!["PF"]);
    }

    #[test]
    fn unknown_bits_are_kept_but_unnamed() {
        let mods = Mods::from_bits(1 << 20);
        assert_eq!(mods.bits(), 1 << 20);
        assert!(mods.names().is_empty());
    }
}
