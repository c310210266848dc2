pub mod stripe;
pub mod verify;
