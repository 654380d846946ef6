pub mod date;
pub mod jwt;
pub mod money;
pub mod password;
pub mod reference;

pub use date::*;
pub use jwt::*;
pub use money::*;
pub use password::*;
pub use reference::*;
