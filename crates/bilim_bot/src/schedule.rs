//! Daily trigger scheduling.
//!
//! Triggers are wall-clock times in a named timezone. The [`Scheduler`] keeps
//! them as a sorted list and is asked once per tick which of them are due.

use crate::ScheduleConfig;
use bilim_error::BilimResult;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, info};

/// Result of checking if a task should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleCheck {
    /// Whether the task should run now
    pub should_run: bool,
    /// When the task should run next (if applicable)
    pub next_run: Option<DateTime<Utc>>,
}

impl ScheduleCheck {
    /// Create a new schedule check result.
    pub fn new(should_run: bool, next_run: Option<DateTime<Utc>>) -> Self {
        Self {
            should_run,
            next_run,
        }
    }

    /// Task should not run yet, schedule for future time.
    pub fn wait_until(next_run: DateTime<Utc>) -> Self {
        Self::new(false, Some(next_run))
    }

    /// Task should run now and schedule for future time.
    pub fn run_and_schedule(next_run: DateTime<Utc>) -> Self {
        Self::new(true, Some(next_run))
    }
}

/// Trait for schedule types that can determine when tasks should run.
pub trait Schedule {
    /// Check if a task should run at `now` given its last reference time.
    ///
    /// # Arguments
    ///
    /// * `last_run` - When the task last ran, or when it was registered
    /// * `now` - Current time
    fn check(&self, last_run: DateTime<Utc>, now: DateTime<Utc>) -> ScheduleCheck;

    /// Calculate the next execution time strictly after a given reference time.
    fn next_execution(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

/// Fires once a day at a wall-clock time in a timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTrigger {
    time: NaiveTime,
    tz: Tz,
}

impl DailyTrigger {
    /// Creates a trigger firing at `time` local to `tz`.
    pub fn new(time: NaiveTime, tz: Tz) -> Self {
        Self { time, tz }
    }

    /// Local trigger time.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Trigger instant on a local calendar date, if that wall-clock time exists.
    fn on(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        self.tz
            .from_local_datetime(&date.and_time(self.time))
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }
}

impl Schedule for DailyTrigger {
    fn check(&self, last_run: DateTime<Utc>, now: DateTime<Utc>) -> ScheduleCheck {
        match self.next_execution(last_run) {
            Some(due) if now >= due => match self.next_execution(now) {
                Some(next) => ScheduleCheck::run_and_schedule(next),
                None => ScheduleCheck::new(true, None),
            },
            Some(due) => ScheduleCheck::wait_until(due),
            None => ScheduleCheck::new(false, None),
        }
    }

    fn next_execution(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut date = after.with_timezone(&self.tz).date_naive();
        // A skipped wall-clock time (DST gap) only shifts the search by a day.
        for _ in 0..3 {
            if let Some(candidate) = self.on(date).filter(|candidate| *candidate > after) {
                return Some(candidate);
            }
            date = date.checked_add_days(Days::new(1))?;
        }
        None
    }
}

#[derive(Debug, Clone)]
struct TriggerState {
    trigger: DailyTrigger,
    last_run: DateTime<Utc>,
    next_run: Option<DateTime<Utc>>,
}

/// Evaluates a sorted list of daily triggers.
///
/// # Examples
///
/// ```
/// use bilim_bot::Scheduler;
/// use chrono::{NaiveTime, TimeZone, Utc};
///
/// let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let start = Utc.with_ymd_and_hms(2024, 11, 3, 3, 0, 0).unwrap(); // 08:00 Tashkent
/// let mut scheduler = Scheduler::new(chrono_tz::Asia::Tashkent, vec![nine], start);
///
/// assert!(scheduler.due(start).is_empty());
/// let nine_local = Utc.with_ymd_and_hms(2024, 11, 3, 4, 0, 0).unwrap();
/// assert_eq!(scheduler.due(nine_local), vec![nine]);
/// assert!(scheduler.due(nine_local).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler {
    tz: Tz,
    triggers: Vec<TriggerState>,
}

impl Scheduler {
    /// Creates a scheduler whose triggers first fire after `now`.
    pub fn new(tz: Tz, mut times: Vec<NaiveTime>, now: DateTime<Utc>) -> Self {
        times.sort();
        times.dedup();

        let triggers = times
            .into_iter()
            .map(|time| {
                let trigger = DailyTrigger::new(time, tz);
                TriggerState {
                    trigger,
                    last_run: now,
                    next_run: trigger.next_execution(now),
                }
            })
            .collect();

        Self { tz, triggers }
    }

    /// Creates a scheduler from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the timezone or a trigger time is invalid.
    pub fn from_config(config: &ScheduleConfig, now: DateTime<Utc>) -> BilimResult<Self> {
        Ok(Self::new(config.tz()?, config.trigger_times()?, now))
    }

    /// Timezone the triggers are evaluated in.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Trigger times, ascending.
    pub fn times(&self) -> Vec<NaiveTime> {
        self.triggers.iter().map(|state| state.trigger.time()).collect()
    }

    /// Earliest upcoming trigger instant.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.triggers.iter().filter_map(|state| state.next_run).min()
    }

    /// Returns every trigger due at `now` and advances each to its next day.
    pub fn due(&mut self, now: DateTime<Utc>) -> Vec<NaiveTime> {
        let mut fired = Vec::new();

        for state in &mut self.triggers {
            let check = state.trigger.check(state.last_run, now);
            if check.should_run {
                state.last_run = now;
                fired.push(state.trigger.time());
                info!(
                    trigger = %state.trigger.time().format("%H:%M"),
                    next_run = ?check.next_run.map(|next| next.with_timezone(&self.tz)),
                    "Trigger due"
                );
            } else {
                debug!(trigger = %state.trigger.time().format("%H:%M"), "Trigger not due");
            }
            state.next_run = check.next_run;
        }

        fired
    }
}
