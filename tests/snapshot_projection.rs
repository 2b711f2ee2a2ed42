use chrono::{Month, NaiveDate, Weekday};
use habitual::analytics::MetricAnalytics;
use habitual::calendar::{self, CalendarMonth, ShadedCell};
use habitual::growth::GrowthProjector;
use habitual::store::Snapshot;

const SNAPSHOT: &str = r#"
[[habit]]
id = "pushups"
name = "Push-ups"
created = "2024-01-01"

[[habit.logs]]
date = "2024-01-01"

[[habit.logs]]
date = "2024-01-15"
notes = "felt strong"
satisfaction = 5

[habit.metric]
name = "Repetitions"
unit = "reps"
frequency = "daily"
direction = "increase"

[[habit.metrics]]
date = "2024-01-01"
value = 50.0

[[habit.metrics]]
date = "2024-02-15"
value = 80.0

[[habit.metrics]]
date = "2024-03-31"
value = 68.0
"#;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn projection_from_snapshot() {
    let snapshot = SNAPSHOT.parse::<Snapshot>().unwrap();
    let habit = snapshot.habit("pushups").unwrap();
    let metric = habit.metric.as_ref().unwrap();

    // 90 days after the first entry
    let as_of = date(2024, 3, 31);
    let analytics = MetricAnalytics::new(&habit.metrics, metric, as_of);

    assert_eq!(analytics.latest_value(), Some(68.0));
    assert_eq!(analytics.best_value(), Some(80.0));

    let improvement = analytics.improvement().unwrap();
    assert!((improvement - 36.0).abs() < 1e-9);

    let projections = GrowthProjector::default()
        .project_guarded(&analytics.series(), Some(improvement), as_of)
        .unwrap();

    assert_eq!(projections.len(), 2);
    assert_eq!(projections[0].horizon_days, 30);
    assert!((projections[0].value - 68.0 * 1.12).abs() < 1e-9);
    assert!((projections[1].value - 68.0 * 1.36).abs() < 1e-9);
}

#[test]
fn calendar_marks_logged_days() {
    let snapshot = SNAPSHOT.parse::<Snapshot>().unwrap();
    let habit = snapshot.habit("Push-ups").unwrap();

    let month = CalendarMonth::new(2024, Month::January);
    let cells = calendar::build_for_week_start(month, Weekday::Mon);
    let shaded = calendar::shade(&cells, habit.logs.as_slice());

    let completed: Vec<NaiveDate> = shaded
        .iter()
        .filter_map(|cell| match cell {
            ShadedCell::Day {
                date,
                completed: true,
            } => Some(*date),
            _ => None,
        })
        .collect();

    assert_eq!(completed, vec![date(2024, 1, 1), date(2024, 1, 15)]);
}
