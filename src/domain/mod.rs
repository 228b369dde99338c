//! Domain entities managed by the dashboard lists.

pub mod booking;
pub mod item;
pub mod notification;
pub mod support_ticket;
pub mod types;
pub mod work_order;
