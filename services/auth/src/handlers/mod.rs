pub mod health;
pub mod password;
pub mod registration;
pub mod session;
pub mod two_factor;
pub mod users;
