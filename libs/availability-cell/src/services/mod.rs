pub mod availability;
pub mod generator;
pub mod store;

pub use availability::AvailabilityService;
pub use store::{ScheduleStore, SlotStore, StoreBackedSchedules, StoreBackedSlots};
