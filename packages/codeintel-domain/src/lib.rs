pub mod cursor;
pub mod location;
pub mod page;

mod error;

pub use cursor::CursorMap;
pub use error::{Error, Result};
pub use location::{Location, Position, PositionQuery, Range, Upload};
pub use page::{Hover, ResultPage};
