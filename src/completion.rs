use crate::dates::sleep_duration;
use crate::models::{AbdominalPain, Blood, DailyRecord, Medication, StoolType};
use crate::record::DEFAULT_CONDITION_SCORE;

// Scores are kept in tenths of a dimension.
const FULL: u32 = 10;
const PARTIAL: u32 = 3;
const DIMENSIONS: u32 = 7;

fn score(filled: bool) -> u32 {
    if filled { FULL } else { PARTIAL }
}

// Seven equal dimensions. Untouched ones still earn PARTIAL; work always
// counts as filled. Only catalog medications are scored.
pub fn completion_pct(record: &DailyRecord, medications: &[Medication]) -> u8 {
    if record.completed {
        return 100;
    }

    let bowel = record.bowel_count > 0
        || record.blood != Blood::None
        || record.stool_type != StoolType::Normal;
    let pain = record.abdominal_pain != AbdominalPain::None;
    let meds = medications.is_empty()
        || medications
            .iter()
            .any(|med| record.meds.get(&med.id).copied().unwrap_or(false));
    let meals = !record.meals.is_empty();
    let sleep = sleep_duration(&record.sleep_start, &record.sleep_end).is_some();
    let condition = record.condition_score != DEFAULT_CONDITION_SCORE;

    let done = score(bowel)
        + score(pain)
        + score(meds)
        + score(meals)
        + score(sleep)
        + score(condition)
        + FULL;
    let total = DIMENSIONS * FULL;
    let pct = (done * 100 + total / 2) / total;
    pct.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealEntry, Medication};
    use crate::record::empty_record;

    fn catalog() -> Vec<Medication> {
        vec![Medication {
            id: "med_1".into(),
            name: "Mesalazine".into(),
            dosage: "1000mg".into(),
        }]
    }

    #[test]
    fn completed_is_always_full() {
        let mut record = empty_record("2024-03-06", &catalog());
        record.completed = true;
        assert_eq!(completion_pct(&record, &catalog()), 100);
    }

    #[test]
    fn blank_record_is_low_but_nonzero() {
        let pct = completion_pct(&empty_record("2024-03-06", &catalog()), &catalog());
        assert!(pct > 0 && pct < 50, "got {pct}");
    }

    #[test]
    fn filling_fields_never_lowers_the_score() {
        let mut record = empty_record("2024-03-06", &catalog());
        let mut last = completion_pct(&record, &catalog());

        let steps: [fn(&mut DailyRecord); 7] = [
            |r| r.bowel_count = 3,
            |r| r.blood = Blood::Trace,
            |r| r.abdominal_pain = AbdominalPain::Mild,
            |r| {
                r.meds.insert("med_1".into(), true);
            },
            |r| r.meals.push(MealEntry::default()),
            |r| {
                r.sleep_start = "23:00".into();
                r.sleep_end = "07:00".into();
            },
            |r| r.condition_score = 7,
        ];

        for step in steps {
            step(&mut record);
            let pct = completion_pct(&record, &catalog());
            assert!(pct >= last, "{pct} < {last}");
            last = pct;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn only_start_time_does_not_count_as_sleep() {
        let mut record = empty_record("2024-03-06", &[]);
        let before = completion_pct(&record, &[]);
        record.sleep_start = "23:00".into();
        assert_eq!(completion_pct(&record, &[]), before);
    }

    #[test]
    fn flags_for_removed_medications_are_ignored() {
        let mut record = empty_record("2024-03-06", &catalog());
        assert_eq!(
            completion_pct(&record, &[]),
            completion_pct(&empty_record("2024-03-06", &[]), &[])
        );

        record.meds.insert("med_gone".into(), true);
        let with_catalog = completion_pct(&record, &catalog());
        record.meds.insert("med_1".into(), true);
        assert!(completion_pct(&record, &catalog()) > with_catalog);
    }
}
