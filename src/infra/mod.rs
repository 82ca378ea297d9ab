pub mod factory;
pub mod identity;
pub mod notify;
pub mod payment;
pub mod repositories;
