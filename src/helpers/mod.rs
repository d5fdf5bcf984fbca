pub(crate) mod correspondence;
pub(crate) mod dates;

pub use correspondence::*;
pub use dates::*;
