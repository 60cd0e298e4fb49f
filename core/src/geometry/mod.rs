pub mod utils_2d;
pub use utils_2d::*;
