pub mod password;
pub mod recovery;
pub mod registration;
pub mod session;
pub mod two_factor;
