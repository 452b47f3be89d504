use crate::dates::parse_time;
use crate::errors::TrackerError;
use crate::models::{
    AbdominalPain, Blood, DailyRecord, Medication, RecordPatch, StoolType, WorkLocation,
};
use std::collections::BTreeMap;

pub const DEFAULT_CONDITION_SCORE: u8 = 5;
pub const DEFAULT_WORK_HOURS: u8 = 8;
pub const DEFAULT_STRESS_LEVEL: u8 = 3;
pub const MAX_WORK_HOURS: u8 = 16;

impl Default for DailyRecord {
    fn default() -> Self {
        Self {
            date: String::new(),
            bowel_count: 0,
            blood: Blood::None,
            stool_type: StoolType::Normal,
            abdominal_pain: AbdominalPain::None,
            sleep_start: String::new(),
            sleep_end: String::new(),
            work_location: WorkLocation::OnSite,
            work_hours: DEFAULT_WORK_HOURS,
            stress_level: DEFAULT_STRESS_LEVEL,
            condition_score: DEFAULT_CONDITION_SCORE,
            memo: String::new(),
            meals: Vec::new(),
            meds: BTreeMap::new(),
            completed: false,
        }
    }
}

pub fn empty_record(date: &str, medications: &[Medication]) -> DailyRecord {
    DailyRecord {
        date: date.to_string(),
        meds: medications
            .iter()
            .map(|med| (med.id.clone(), false))
            .collect(),
        ..DailyRecord::default()
    }
}

// Adds an untaken entry for every catalog id the record has not seen yet.
// Entries for medications no longer in the catalog are kept.
pub fn reconcile_meds(record: &mut DailyRecord, medications: &[Medication]) {
    for med in medications {
        record.meds.entry(med.id.clone()).or_insert(false);
    }
}

impl DailyRecord {
    pub fn stress(&self) -> Option<u8> {
        match self.work_location {
            WorkLocation::Off => None,
            _ => Some(self.stress_level),
        }
    }

    pub fn sanitize(&mut self) {
        self.work_hours = self.work_hours.min(MAX_WORK_HOURS);
        if !(1..=5).contains(&self.stress_level) {
            self.stress_level = DEFAULT_STRESS_LEVEL;
        }
        if !(1..=10).contains(&self.condition_score) {
            self.condition_score = DEFAULT_CONDITION_SCORE;
        }
        if parse_time(&self.sleep_start).is_none() {
            self.sleep_start.clear();
        }
        if parse_time(&self.sleep_end).is_none() {
            self.sleep_end.clear();
        }
    }

    // Applies every field of `patch`, or none of them if any is invalid.
    pub fn apply_patch(&mut self, patch: RecordPatch) -> Result<(), TrackerError> {
        patch.validate()?;

        if let Some(value) = patch.bowel_count {
            self.bowel_count = value;
        }
        if let Some(value) = patch.blood {
            self.blood = value;
        }
        if let Some(value) = patch.stool_type {
            self.stool_type = value;
        }
        if let Some(value) = patch.abdominal_pain {
            self.abdominal_pain = value;
        }
        if let Some(value) = patch.sleep_start {
            self.sleep_start = value.trim().to_string();
        }
        if let Some(value) = patch.sleep_end {
            self.sleep_end = value.trim().to_string();
        }
        if let Some(value) = patch.work_location {
            self.work_location = value;
        }
        if let Some(value) = patch.work_hours {
            self.work_hours = value;
        }
        if let Some(value) = patch.stress_level {
            self.stress_level = value;
        }
        if let Some(value) = patch.condition_score {
            self.condition_score = value;
        }
        if let Some(value) = patch.memo {
            self.memo = value;
        }
        Ok(())
    }
}

impl RecordPatch {
    pub fn validate(&self) -> Result<(), TrackerError> {
        if let Some(hours) = self.work_hours {
            if hours > MAX_WORK_HOURS {
                return Err(TrackerError::Invalid(format!(
                    "workHours must be 0-{MAX_WORK_HOURS}, got {hours}"
                )));
            }
        }
        if let Some(level) = self.stress_level {
            if !(1..=5).contains(&level) {
                return Err(TrackerError::Invalid(format!(
                    "stressLevel must be 1-5, got {level}"
                )));
            }
        }
        if let Some(score) = self.condition_score {
            if !(1..=10).contains(&score) {
                return Err(TrackerError::Invalid(format!(
                    "conditionScore must be 1-10, got {score}"
                )));
            }
        }
        for (field, value) in [("sleepStart", &self.sleep_start), ("sleepEnd", &self.sleep_end)] {
            if let Some(value) = value {
                let value = value.trim();
                if !value.is_empty() && parse_time(value).is_none() {
                    return Err(TrackerError::Invalid(format!(
                        "{field} must be HH:MM, got {value:?}"
                    )));
                }
            }
        }
        Ok(())
    }
}
