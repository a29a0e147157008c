pub mod adif;
pub mod adts;
pub mod asc;
pub mod pce;

pub use adts::AdtsHeader;
pub use asc::AudioSpecificConfig;
pub use pce::ProgramConfig;
