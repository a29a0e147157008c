pub mod mdct;
pub mod window;

pub use mdct::Imdct;
