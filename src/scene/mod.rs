pub mod conversion;
pub mod definition;
mod loader;

pub use conversion::*;
pub use definition::*;
