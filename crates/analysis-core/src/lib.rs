pub mod error;
pub mod status;
pub mod traits;
pub mod types;

pub use error::*;
pub use status::*;
pub use traits::*;
pub use types::*;
