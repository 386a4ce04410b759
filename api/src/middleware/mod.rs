//! Request middleware

pub mod auth;
pub mod site_lock;
