pub mod auth;
pub mod bills;
pub mod dashboard;
pub mod events;
pub mod menu;
