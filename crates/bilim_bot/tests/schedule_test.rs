use bilim_bot::{DailyTrigger, Schedule, ScheduleCheck, Scheduler};
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Asia::Tashkent;
use chrono_tz::Europe::Berlin;

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn tashkent(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Tashkent
        .with_ymd_and_hms(2024, 11, day, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn default_times() -> Vec<NaiveTime> {
    vec![hm(9, 0), hm(13, 0), hm(17, 0), hm(21, 0)]
}

#[test]
fn test_next_execution_same_day_and_next_day() {
    let trigger = DailyTrigger::new(hm(9, 0), Tashkent);

    assert_eq!(
        trigger.next_execution(tashkent(3, 8, 0)),
        Some(tashkent(3, 9, 0))
    );
    assert_eq!(
        trigger.next_execution(tashkent(3, 9, 0)),
        Some(tashkent(4, 9, 0))
    );
    assert_eq!(
        trigger.next_execution(tashkent(3, 22, 30)),
        Some(tashkent(4, 9, 0))
    );
}

#[test]
fn test_trigger_times_are_local_to_timezone() {
    let trigger = DailyTrigger::new(hm(9, 0), Tashkent);
    let next = trigger
        .next_execution(Utc.with_ymd_and_hms(2024, 11, 3, 0, 0, 0).unwrap())
        .unwrap();

    // Tashkent is UTC+5 all year.
    assert_eq!(next, Utc.with_ymd_and_hms(2024, 11, 3, 4, 0, 0).unwrap());
}

#[test]
fn test_check_reports_run_and_next_day() {
    let trigger = DailyTrigger::new(hm(13, 0), Tashkent);

    assert_eq!(
        trigger.check(tashkent(3, 12, 0), tashkent(3, 12, 59)),
        ScheduleCheck::wait_until(tashkent(3, 13, 0))
    );
    assert_eq!(
        trigger.check(tashkent(3, 12, 0), tashkent(3, 13, 1)),
        ScheduleCheck::run_and_schedule(tashkent(4, 13, 0))
    );
}

#[test]
fn test_skipped_wall_clock_time_moves_to_next_day() {
    // 02:30 does not exist in Berlin on 2024-03-31.
    let trigger = DailyTrigger::new(hm(2, 30), Berlin);
    let after = Berlin
        .with_ymd_and_hms(2024, 3, 31, 0, 0, 0)
        .unwrap()
        .with_timezone(&Utc);

    let next = trigger.next_execution(after).unwrap();
    assert_eq!(
        next,
        Berlin
            .with_ymd_and_hms(2024, 4, 1, 2, 30, 0)
            .unwrap()
            .with_timezone(&Utc)
    );
}

#[test]
fn test_scheduler_fires_each_trigger_once_per_day() {
    let mut scheduler = Scheduler::new(Tashkent, default_times(), tashkent(3, 8, 0));

    assert!(scheduler.due(tashkent(3, 8, 1)).is_empty());
    assert_eq!(scheduler.next_due(), Some(tashkent(3, 9, 0)));

    assert_eq!(scheduler.due(tashkent(3, 9, 0)), vec![hm(9, 0)]);
    assert!(scheduler.due(tashkent(3, 9, 1)).is_empty());
    assert_eq!(scheduler.next_due(), Some(tashkent(3, 13, 0)));

    assert_eq!(scheduler.due(tashkent(3, 13, 0)), vec![hm(13, 0)]);
    assert_eq!(scheduler.due(tashkent(3, 17, 0)), vec![hm(17, 0)]);
    assert_eq!(scheduler.due(tashkent(3, 21, 0)), vec![hm(21, 0)]);
    assert_eq!(scheduler.next_due(), Some(tashkent(4, 9, 0)));

    assert_eq!(scheduler.due(tashkent(4, 9, 0)), vec![hm(9, 0)]);
}

#[test]
fn test_missed_triggers_fire_together_in_order() {
    let mut scheduler = Scheduler::new(Tashkent, default_times(), tashkent(3, 8, 0));

    // The loop was blocked from 08:00 until 14:00.
    assert_eq!(scheduler.due(tashkent(3, 14, 0)), vec![hm(9, 0), hm(13, 0)]);
    assert_eq!(scheduler.next_due(), Some(tashkent(3, 17, 0)));
}

#[test]
fn test_long_outage_fires_each_trigger_once() {
    let mut scheduler = Scheduler::new(Tashkent, vec![hm(9, 0)], tashkent(3, 8, 0));

    assert_eq!(scheduler.due(tashkent(6, 10, 0)), vec![hm(9, 0)]);
    assert!(scheduler.due(tashkent(6, 10, 1)).is_empty());
    assert_eq!(scheduler.next_due(), Some(tashkent(7, 9, 0)));
}

#[test]
fn test_triggers_are_sorted_and_deduplicated() {
    let scheduler = Scheduler::new(
        Tashkent,
        vec![hm(21, 0), hm(9, 0), hm(13, 0), hm(9, 0)],
        tashkent(3, 0, 0),
    );

    assert_eq!(scheduler.times(), vec![hm(9, 0), hm(13, 0), hm(21, 0)]);
}

#[test]
fn test_start_exactly_at_trigger_waits_for_next_day() {
    let mut scheduler = Scheduler::new(Tashkent, vec![hm(9, 0)], tashkent(3, 9, 0));

    assert!(scheduler.due(tashkent(3, 9, 0)).is_empty());
    assert_eq!(scheduler.next_due(), Some(tashkent(4, 9, 0)));
}
