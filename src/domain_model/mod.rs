mod token;
mod unit;
mod user;

pub use token::*;
pub use unit::*;
pub use user::*;
