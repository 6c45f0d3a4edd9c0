pub mod salon;

pub use salon::*;
