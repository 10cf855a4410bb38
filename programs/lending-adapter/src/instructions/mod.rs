pub mod add_owner;
pub mod initialize;
pub mod invest;
pub mod set_yield_rate;
pub mod views;
pub mod withdraw;

pub use add_owner::*;
pub use initialize::*;
pub use invest::*;
pub use set_yield_rate::*;
pub use views::*;
pub use withdraw::*;
