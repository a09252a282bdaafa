pub mod course;
pub mod points;
pub mod types;
pub mod utils;

pub use course::*;
pub use points::*;
pub use types::*;
pub use utils::*;
