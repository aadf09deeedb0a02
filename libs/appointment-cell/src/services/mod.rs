pub mod admin;
pub mod booking;
pub mod ledger;
pub mod queue;

pub use admin::AdminConsole;
pub use booking::BookingService;
pub use ledger::BookingLedger;
