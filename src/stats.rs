use crate::completion::completion_pct;
use crate::dates::{date_key, days_in_month, month_leading_blanks, sleep_duration, week_dates};
use crate::errors::TrackerError;
use crate::models::{
    Blood, CalendarDay, DailyRecord, DaySummary, HistoryAggregate, HistoryResponse, HomeResponse,
    InsightsResponse, Medication, RecordsMap, WeekDay,
};
use crate::record::empty_record;
use chrono::NaiveDate;

// Completed days needed before insights are worth computing.
pub const INSIGHTS_MIN_RECORDS: usize = 14;

pub fn build_home(
    today: NaiveDate,
    records: &RecordsMap,
    draft: &DailyRecord,
    medications: &[Medication],
) -> HomeResponse {
    let today_key = date_key(today);
    let record = match records.get(&today_key) {
        Some(record) => record.clone(),
        None if draft.date == today_key => draft.clone(),
        None => empty_record(&today_key, medications),
    };

    let week = week_dates(&today_key)
        .unwrap_or_default()
        .into_iter()
        .map(|date| {
            let stored = records.get(&date);
            WeekDay {
                is_today: date == today_key,
                completed: stored.is_some_and(|r| r.completed),
                condition_score: stored.map(|r| r.condition_score),
                date,
            }
        })
        .collect();

    let summary = record.completed.then(|| DaySummary {
        bowel_count: record.bowel_count,
        blood: record.blood,
        condition_score: record.condition_score,
        sleep: sleep_duration(&record.sleep_start, &record.sleep_end).map(|s| s.to_string()),
    });

    HomeResponse {
        completion_pct: completion_pct(&record, medications),
        completed: record.completed,
        date: today_key,
        week,
        summary,
    }
}

pub fn build_history(
    today: NaiveDate,
    records: &RecordsMap,
    year: i32,
    month: u32,
) -> Result<HistoryResponse, TrackerError> {
    let invalid = || TrackerError::Invalid(format!("no such month {year}-{month:02}"));
    let leading_blanks = month_leading_blanks(year, month).ok_or_else(invalid)?;
    let length = days_in_month(year, month).ok_or_else(invalid)?;

    let days = (1..=length)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day).map(|date| (day, date)))
        .map(|(day, date)| {
            let key = date_key(date);
            CalendarDay {
                day,
                is_today: date == today,
                condition_score: records.get(&key).map(|r| r.condition_score),
                date: key,
            }
        })
        .collect();

    Ok(HistoryResponse {
        year,
        month,
        leading_blanks,
        days,
        aggregate: aggregate(records),
    })
}

// Averages over completed days; `None` when nothing is completed yet.
pub fn aggregate(records: &RecordsMap) -> Option<HistoryAggregate> {
    let completed: Vec<&DailyRecord> = records.values().filter(|r| r.completed).collect();
    if completed.is_empty() {
        return None;
    }
    let count = completed.len() as f64;
    let condition: f64 = completed.iter().map(|r| f64::from(r.condition_score)).sum();
    let bowel: f64 = completed.iter().map(|r| f64::from(r.bowel_count)).sum();
    let blood_days = completed.iter().filter(|r| r.blood != Blood::None).count();

    Some(HistoryAggregate {
        avg_condition: one_decimal(condition / count),
        avg_bowel: one_decimal(bowel / count),
        blood_days: blood_days as u32,
    })
}

pub fn build_insights(records: &RecordsMap) -> InsightsResponse {
    let record_count = records.values().filter(|r| r.completed).count();
    InsightsResponse {
        record_count,
        days_remaining: INSIGHTS_MIN_RECORDS.saturating_sub(record_count),
        ready: record_count >= INSIGHTS_MIN_RECORDS,
    }
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(key: &str, condition: u8, bowel: u32, blood: Blood, completed: bool) -> DailyRecord {
        DailyRecord {
            condition_score: condition,
            bowel_count: bowel,
            blood,
            completed,
            ..empty_record(key, &[])
        }
    }

    fn map(records: Vec<DailyRecord>) -> RecordsMap {
        records.into_iter().map(|r| (r.date.clone(), r)).collect()
    }

    #[test]
    fn home_week_strip_marks_completed_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        let records = map(vec![
            day("2024-03-04", 7, 1, Blood::None, true),
            day("2024-03-05", 4, 3, Blood::Trace, false),
        ]);
        let draft = empty_record("2024-03-06", &[]);
        let home = build_home(today, &records, &draft, &[]);

        assert_eq!(home.week.len(), 7);
        assert_eq!(home.week[0].date, "2024-03-04");
        assert!(home.week[0].completed);
        assert_eq!(home.week[0].condition_score, Some(7));
        assert!(!home.week[1].completed);
        assert_eq!(home.week[1].condition_score, Some(4));
        assert!(home.week[2].is_today);
        assert_eq!(home.week[2].condition_score, None);
        assert!(home.summary.is_none());
        assert!(home.completion_pct < 100);
    }

    #[test]
    fn home_summary_for_completed_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        let mut saved = day("2024-03-06", 8, 2, Blood::None, true);
        saved.sleep_start = "23:30".into();
        saved.sleep_end = "07:00".into();
        let records = map(vec![saved]);
        let draft = empty_record("2024-03-01", &[]);
        let home = build_home(today, &records, &draft, &[]);

        assert_eq!(home.completion_pct, 100);
        let summary = home.summary.unwrap();
        assert_eq!(summary.bowel_count, 2);
        assert_eq!(summary.sleep.as_deref(), Some("7h30m"));
    }

    #[test]
    fn history_grid_and_aggregate() {
        let today = NaiveDate::from_ymd_opt(2024, 9, 10).unwrap();
        let records = map(vec![
            day("2024-09-01", 6, 2, Blood::None, true),
            day("2024-09-02", 3, 5, Blood::Moderate, true),
            day("2024-09-03", 9, 1, Blood::None, false),
        ]);
        let history = build_history(today, &records, 2024, 9).unwrap();

        assert_eq!(history.leading_blanks, 6);
        assert_eq!(history.days.len(), 30);
        assert_eq!(history.days[0].condition_score, Some(6));
        assert_eq!(history.days[2].condition_score, Some(9));
        assert!(history.days[9].is_today);
        assert_eq!(
            history.aggregate,
            Some(HistoryAggregate {
                avg_condition: 4.5,
                avg_bowel: 3.5,
                blood_days: 1,
            })
        );
    }

    #[test]
    fn history_rejects_bad_month() {
        let today = NaiveDate::from_ymd_opt(2024, 9, 10).unwrap();
        assert!(build_history(today, &RecordsMap::new(), 2024, 13).is_err());
    }

    #[test]
    fn aggregate_needs_completed_days() {
        let records = map(vec![day("2024-09-03", 9, 1, Blood::None, false)]);
        assert_eq!(aggregate(&records), None);
    }

    #[test]
    fn insights_count_down_to_threshold() {
        let records = map(
            (1..=5)
                .map(|d| day(&format!("2024-09-{d:02}"), 5, 0, Blood::None, true))
                .collect(),
        );
        let insights = build_insights(&records);
        assert_eq!(insights.record_count, 5);
        assert_eq!(insights.days_remaining, 9);
        assert!(!insights.ready);
    }
}
