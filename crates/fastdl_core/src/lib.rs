pub mod error;
pub mod id;
pub mod protocol;
pub mod traits;

pub mod prelude {
    pub use super::error::*;
    pub use super::id::*;
    pub use super::protocol::*;
    pub use super::traits::*;
}
