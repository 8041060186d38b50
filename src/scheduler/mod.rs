//! Periodic jobs

mod daily_schedule;
mod overdue_notifier;

pub use daily_schedule::{DailySchedule, ScheduleParseError};
pub use overdue_notifier::{OverdueNotifierJob, spawn_overdue_notifier};
