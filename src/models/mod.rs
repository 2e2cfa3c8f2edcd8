pub mod beatmaps;
pub mod leaderboards;
pub mod mods;
pub mod performance;
pub mod profiles;
pub mod scores;

#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Standard = 0,
    Taiko = 1,
    Catch = 2,
    Mania = 3,
}

impl TryFrom<u8> for Mode {
    type Error = std::io::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use std::io::{Error, ErrorKind};

        match value {
            0 => Ok(Mode::Standard),
            1 => Ok(Mode::Taiko),
            2 => Ok(Mode::Catch),
            3 => Ok(Mode::Mania),
            _ => Err(Error::new(ErrorKind::InvalidData, "invalid mode")),
        }
    }
}
