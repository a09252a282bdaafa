pub mod context;
pub mod hole;
pub mod league;
pub mod match_result;
pub mod strokes;

pub use context::*;
pub use hole::*;
pub use league::*;
pub use match_result::*;
pub use strokes::*;
