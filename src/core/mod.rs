pub mod booking_manager;
pub mod services;

pub use booking_manager::BookingManager;
