// Data models and request/response shapes

pub mod user;
pub mod workout;

pub use user::*;
pub use workout::*;
