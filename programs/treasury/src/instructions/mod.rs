pub mod add_currency;
pub mod add_owner;
pub mod add_protocol;
pub mod aggregated_yield;
pub mod balance_of;
pub mod deposit;
pub mod get_currency;
pub mod get_protocol;
pub mod initialize;
pub mod invest;
pub mod invest_of;
pub mod is_owner;
pub mod position_of;
pub mod toggle_currency;
pub mod toggle_protocol;
pub mod update_protocol;
pub mod withdraw;
pub mod withdraw_balance;

pub use add_currency::*;
pub use add_owner::*;
pub use add_protocol::*;
pub use aggregated_yield::*;
pub use balance_of::*;
pub use deposit::*;
pub use get_currency::*;
pub use get_protocol::*;
pub use initialize::*;
pub use invest::*;
pub use invest_of::*;
pub use is_owner::*;
pub use position_of::*;
pub use toggle_currency::*;
pub use toggle_protocol::*;
pub use update_protocol::*;
pub use withdraw::*;
pub use withdraw_balance::*;
