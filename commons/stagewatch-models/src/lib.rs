pub mod enums;
pub mod environment;
pub mod status;

pub use enums::*;
pub use environment::*;
pub use status::*;
