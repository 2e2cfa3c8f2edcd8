use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Legacy (stable) mod bits, as sent by the client and stored with each play.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Mods: u32 {
        const NoFail = 1 << 0;
        const Easy = 1 << 1;
        const TouchDevice = 1 << 2;
        const Hidden = 1 << 3;
        const HardRock = 1 << 4;
        const SuddenDeath = 1 << 5;
        const DoubleTime = 1 << 6;
        const Relax = 1 << 7;
        const HalfTime = 1 << 8;
        const Nightcore = 1 << 9;
        const Flashlight = 1 << 10;
        const Autoplay = 1 << 11;
        const SpunOut = 1 << 12;
        const Autopilot = 1 << 13;
        const Perfect = 1 << 14;
        const Key4 = 1 << 15;
        const Key5 = 1 << 16;
        const Key6 = 1 << 17;
        const Key7 = 1 << 18;
        const Key8 = 1 << 19;
        const FadeIn = 1 << 20;
        const Random = 1 << 21;
        const Cinema = 1 << 22;
        const Target = 1 << 23;
        const Key9 = 1 << 24;
        const KeyCoop = 1 << 25;
        const Key1 = 1 << 26;
        const Key3 = 1 << 27;
        const Key2 = 1 << 28;
        const ScoreV2 = 1 << 29;
        const Mirror = 1 << 30;
    }
}

const MOD_ACRONYMS: &[(Mods, &str)] = &[
    (Mods::NoFail, "NF"),
    (Mods::Easy, "EZ"),
    (Mods::TouchDevice, "TD"),
    (Mods::Hidden, "HD"),
    (Mods::HardRock, "HR"),
    (Mods::SuddenDeath, "SD"),
    (Mods::DoubleTime, "DT"),
    (Mods::Relax, "RX"),
    (Mods::HalfTime, "HT"),
    (Mods::Nightcore, "NC"),
    (Mods::Flashlight, "FL"),
    (Mods::Autoplay, "AT"),
    (Mods::SpunOut, "SO"),
    (Mods::Autopilot, "AP"),
    (Mods::Perfect, "PF"),
    (Mods::FadeIn, "FI"),
    (Mods::Random, "RD"),
    (Mods::Cinema, "CN"),
    (Mods::Target, "TP"),
    (Mods::Key1, "1K"),
    (Mods::Key2, "2K"),
    (Mods::Key3, "3K"),
    (Mods::Key4, "4K"),
    (Mods::Key5, "5K"),
    (Mods::Key6, "6K"),
    (Mods::Key7, "7K"),
    (Mods::Key8, "8K"),
    (Mods::Key9, "9K"),
    (Mods::KeyCoop, "CO"),
    (Mods::ScoreV2, "V2"),
    (Mods::Mirror, "MR"),
];

impl fmt::Display for Mods {
    /// Short acronym form, e.g. `HDNC`. Nightcore hides DoubleTime and
    /// Perfect hides SuddenDeath, matching how the client shows them.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut mods = *self;
        if mods.contains(Mods::Nightcore) {
            mods.remove(Mods::DoubleTime);
        }
        if mods.contains(Mods::Perfect) {
            mods.remove(Mods::SuddenDeath);
        }
        if mods.is_empty() {
            return f.write_str("NM");
        }
        for (flag, acronym) in MOD_ACRONYMS {
            if mods.contains(*flag) {
                f.write_str(acronym)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_nm_for_no_mods() {
        assert_eq!(Mods::empty().to_string(), "NM");
    }

    #[test]
    fn display_collapses_implied_mods() {
        let mods = Mods::Hidden | Mods::DoubleTime | Mods::Nightcore;
        assert_eq!(mods.to_string(), "HDNC");
        let mods = Mods::SuddenDeath | Mods::Perfect | Mods::HardRock;
        assert_eq!(mods.to_string(), "HRPF");
    }

    #[test]
    fn unknown_bits_are_retained() {
        let mods = Mods::from_bits_retain(64 | (1 << 31));
        assert!(mods.contains(Mods::DoubleTime));
        assert_eq!(mods.bits(), 64 | (1 << 31));
    }
}
