pub mod csv_format;
pub mod employee;
pub mod record;
pub mod token;

pub use employee::Employee;
pub use record::{ReviewRecord, ReviewStatus};
pub use token::{AccessToken, Role};

use chrono::{Local, NaiveDateTime, Timelike};

/// Current local wall-clock time at the one-second precision the tables store.
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
