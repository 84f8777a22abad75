pub mod user;
pub mod club;
pub mod membership;
pub mod event;

pub use user::*;
pub use club::*;
pub use membership::*;
pub use event::*;
