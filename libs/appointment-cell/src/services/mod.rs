pub mod booking;
pub mod lifecycle;

pub use booking::{BookingService, ListScope};
pub use lifecycle::AppointmentLifecycleService;
