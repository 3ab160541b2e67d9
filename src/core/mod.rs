pub mod population;
pub mod space;

pub use population::{Agent, Population};
pub use space::{BoundedSpace, Bounds};
