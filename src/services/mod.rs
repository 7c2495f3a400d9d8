pub mod booking;
pub mod mail;
pub mod otp;
pub mod slots;
