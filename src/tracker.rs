use crate::completion::completion_pct;
use crate::dates::{date_key, parse_date_key, sleep_duration, today};
use crate::errors::TrackerError;
use crate::models::{
    DailyRecord, MealEntry, MedCheck, Medication, RecordPatch, RecordsMap, SaveResponse,
    StateResponse,
};
use crate::record::{empty_record, reconcile_meds};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Loading,
    Ready,
    Saving,
}

// Persistence is left to the caller: `begin_save` hands back the map to write
// and `finish_save` returns to `Ready` whatever the write's outcome was.
#[derive(Debug)]
pub struct Tracker {
    phase: Phase,
    records: RecordsMap,
    medications: Vec<Medication>,
    selected: String,
    draft: DailyRecord,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker {
    pub fn new() -> Self {
        let selected = today();
        Self {
            phase: Phase::Loading,
            records: RecordsMap::new(),
            medications: Vec::new(),
            draft: empty_record(&selected, &[]),
            selected,
        }
    }

    pub fn finish_loading(
        &mut self,
        records: RecordsMap,
        medications: Vec<Medication>,
        today: &str,
    ) -> Result<(), TrackerError> {
        self.records = records;
        self.medications = medications;
        self.phase = Phase::Ready;
        info!(
            records = self.records.len(),
            medications = self.medications.len(),
            "tracker ready"
        );
        self.select_date(today)?;
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn records(&self) -> &RecordsMap {
        &self.records
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn selected_date(&self) -> &str {
        &self.selected
    }

    pub fn draft(&self) -> &DailyRecord {
        &self.draft
    }

    fn ensure_ready(&self) -> Result<(), TrackerError> {
        match self.phase {
            Phase::Ready => Ok(()),
            _ => Err(TrackerError::NotReady),
        }
    }

    pub fn select_date(&mut self, date: &str) -> Result<&DailyRecord, TrackerError> {
        self.ensure_ready()?;
        let day = parse_date_key(date)?;
        let key = date_key(day);

        let draft = match self.records.get(&key) {
            Some(stored) => {
                let mut draft = stored.clone();
                reconcile_meds(&mut draft, &self.medications);
                draft
            }
            None => {
                // Routine fields carry over from the day before.
                let mut draft = empty_record(&key, &self.medications);
                let previous = day.pred_opt().map(date_key);
                if let Some(prev) = previous.and_then(|prev| self.records.get(&prev)) {
                    draft.sleep_start = prev.sleep_start.clone();
                    draft.sleep_end = prev.sleep_end.clone();
                    draft.work_location = prev.work_location;
                    draft.work_hours = prev.work_hours;
                }
                draft
            }
        };

        debug!(date = %key, stored = self.records.contains_key(&key), "date selected");
        self.selected = key;
        self.draft = draft;
        Ok(&self.draft)
    }

    pub fn update(&mut self, patch: RecordPatch) -> Result<&DailyRecord, TrackerError> {
        self.ensure_ready()?;
        self.draft.apply_patch(patch)?;
        Ok(&self.draft)
    }

    pub fn add_meal(&mut self, mut meal: MealEntry) -> Result<&DailyRecord, TrackerError> {
        self.ensure_ready()?;
        meal.text = meal.text.trim().to_string();
        if meal.text.is_empty() {
            return Err(TrackerError::Invalid("meal text is required".into()));
        }
        self.draft.meals.push(meal);
        Ok(&self.draft)
    }

    pub fn remove_meal(&mut self, index: usize) -> Result<MealEntry, TrackerError> {
        self.ensure_ready()?;
        if index >= self.draft.meals.len() {
            return Err(TrackerError::MealIndex(index));
        }
        Ok(self.draft.meals.remove(index))
    }

    pub fn set_med_taken(&mut self, id: &str, taken: Option<bool>) -> Result<bool, TrackerError> {
        self.ensure_ready()?;
        if !self.medications.iter().any(|med| med.id == id) {
            return Err(TrackerError::UnknownMedication(id.to_string()));
        }
        // `None` flips the flag.
        let entry = self.draft.meds.entry(id.to_string()).or_insert(false);
        *entry = taken.unwrap_or(!*entry);
        Ok(*entry)
    }

    pub fn checklist(&self) -> Vec<MedCheck> {
        self.medications
            .iter()
            .map(|med| MedCheck {
                id: med.id.clone(),
                name: med.name.clone(),
                dosage: med.dosage.clone(),
                taken: self.draft.meds.get(&med.id).copied().unwrap_or(false),
            })
            .collect()
    }

    pub fn add_medication(
        &mut self,
        name: &str,
        dosage: Option<&str>,
    ) -> Result<Medication, TrackerError> {
        self.ensure_ready()?;
        let name = validate_med_name(name)?;
        let med = Medication {
            id: format!("med_{}", Uuid::new_v4().simple()),
            name,
            dosage: dosage.unwrap_or_default().trim().to_string(),
        };
        self.draft.meds.insert(med.id.clone(), false);
        self.medications.push(med.clone());
        info!(id = %med.id, "medication added");
        Ok(med)
    }

    pub fn edit_medication(
        &mut self,
        id: &str,
        name: &str,
        dosage: Option<&str>,
    ) -> Result<Medication, TrackerError> {
        self.ensure_ready()?;
        let name = validate_med_name(name)?;
        let med = self
            .medications
            .iter_mut()
            .find(|med| med.id == id)
            .ok_or_else(|| TrackerError::UnknownMedication(id.to_string()))?;
        med.name = name;
        med.dosage = dosage.unwrap_or_default().trim().to_string();
        Ok(med.clone())
    }

    pub fn delete_medication(&mut self, id: &str) -> Result<Medication, TrackerError> {
        self.ensure_ready()?;
        let index = self
            .medications
            .iter()
            .position(|med| med.id == id)
            .ok_or_else(|| TrackerError::UnknownMedication(id.to_string()))?;
        info!(id = %id, "medication deleted");
        Ok(self.medications.remove(index))
    }

    pub fn begin_save(&mut self) -> Result<RecordsMap, TrackerError> {
        self.ensure_ready()?;
        self.phase = Phase::Saving;
        self.draft.completed = true;
        self.records
            .insert(self.selected.clone(), self.draft.clone());
        info!(date = %self.selected, "record committed");
        Ok(self.records.clone())
    }

    pub fn finish_save(&mut self, persisted: bool) -> SaveResponse {
        self.phase = Phase::Ready;
        if !persisted {
            warn!(date = %self.selected, "record kept in memory only");
        }
        SaveResponse {
            record: self.draft.clone(),
            persisted,
        }
    }

    pub fn snapshot(&self) -> StateResponse {
        StateResponse {
            phase: self.phase,
            selected_date: self.selected.clone(),
            draft: self.draft.clone(),
            checklist: self.checklist(),
            completion_pct: completion_pct(&self.draft, &self.medications),
            sleep: sleep_duration(&self.draft.sleep_start, &self.draft.sleep_end),
        }
    }
}

fn validate_med_name(name: &str) -> Result<String, TrackerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TrackerError::Invalid("medication name is required".into()));
    }
    Ok(name.to_string())
}
