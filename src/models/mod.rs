//! Database rows and configuration models.

pub mod booking;
pub mod config;
pub mod notification;
pub mod preference;
pub mod support_ticket;
pub mod work_order;
