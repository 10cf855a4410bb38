pub mod currency;
pub mod ledger;
pub mod protocol;
pub mod treasury;

pub use currency::*;
pub use ledger::*;
pub use protocol::*;
pub use treasury::*;
