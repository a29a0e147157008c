pub mod cpe;
pub mod element;
pub mod gain;
pub mod ics;
pub mod ltp;
pub mod pulse;
pub mod tns;

pub use element::{decode_raw_data_block, RawDataBlockResult};
pub use ics::{Ics, IcsInfo, WindowSequence};
