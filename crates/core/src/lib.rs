//! Record-level building blocks shared by the picking and clinic extensions.
//!
//! The host application owns storage, access rules and notification delivery;
//! this crate only defines the seams the field logic talks to.
pub mod activity;
pub mod calendar;
pub mod ids;
pub mod mail;

pub use activity::{Activity, ActivityState, HasActivities};
pub use calendar::{
    fixed_clock, parse_timezone, system_clock, CalendarError, ClinicCalendar, Clock,
};
pub use ids::{PartyId, ThreadRef};
pub use mail::{
    HubError, MailThread, MemoryHub, NotificationHub, SubscribeRequest, TrackedChange,
};
