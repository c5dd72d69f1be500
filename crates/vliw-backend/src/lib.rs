mod alloc;
mod config;
mod error;
mod list;
mod modulo;
mod timeline;

#[cfg(test)]
mod testing;

pub use config::SchedulerConfig;
pub use error::{RegisterKind, ScheduleError};
pub use list::schedule_loop;
pub use modulo::{lower_bound, schedule_pipelined};
