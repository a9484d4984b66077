//! Unit tests for the scheduler's cron conversion

use pairscope::core::scheduler::cron_schedule;

#[test]
fn zero_interval_is_refused() {
    assert!(cron_schedule(0).is_err());
}

#[test]
fn sub_minute_intervals_use_second_fields() {
    assert!(cron_schedule(30).is_ok());
    assert!(cron_schedule(1).is_ok());
}

#[test]
fn minute_intervals_convert() {
    assert!(cron_schedule(60).is_ok());
    assert!(cron_schedule(900).is_ok());
}

#[test]
fn schedule_produces_upcoming_ticks() {
    let schedule = cron_schedule(300).expect("schedule");
    let mut upcoming = schedule.upcoming(chrono::Utc);
    assert!(upcoming.next().is_some());
}
