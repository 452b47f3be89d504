use crate::dates::SleepDuration;
use crate::tracker::Phase;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// Legacy aliases accept the Japanese labels written by the first version of
// the journal, so its exported blobs load without conversion.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Blood {
    #[default]
    #[serde(alias = "なし")]
    None,
    #[serde(alias = "少量")]
    Trace,
    #[serde(alias = "中量")]
    Moderate,
    #[serde(alias = "多量")]
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StoolType {
    #[serde(alias = "下痢")]
    Loose,
    #[serde(alias = "軟便")]
    Soft,
    #[default]
    #[serde(alias = "普通")]
    Normal,
    #[serde(alias = "硬い")]
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AbdominalPain {
    #[default]
    #[serde(alias = "なし")]
    None,
    #[serde(alias = "軽い")]
    Mild,
    #[serde(alias = "中程度")]
    Moderate,
    #[serde(alias = "強い")]
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WorkLocation {
    #[default]
    #[serde(alias = "出社")]
    OnSite,
    #[serde(alias = "リモート")]
    Remote,
    #[serde(alias = "休み")]
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MealType {
    #[serde(alias = "朝食")]
    Breakfast,
    #[default]
    #[serde(alias = "昼食")]
    Lunch,
    #[serde(alias = "夕食")]
    Dinner,
    #[serde(alias = "間食")]
    Snack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoodTag {
    #[serde(alias = "脂質")]
    Fat,
    #[serde(alias = "香辛料")]
    Spice,
    #[serde(alias = "乳製品")]
    Dairy,
    #[serde(rename = "FODMAP", alias = "fodmap")]
    Fodmap,
    #[serde(alias = "アルコール")]
    Alcohol,
    #[serde(alias = "カフェイン")]
    Caffeine,
    #[serde(alias = "小麦")]
    Wheat,
    #[serde(alias = "生もの")]
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MealEntry {
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub meal_type: MealType,
    #[serde(alias = "content", deserialize_with = "lenient")]
    pub text: String,
    #[serde(deserialize_with = "lenient_items")]
    pub tags: BTreeSet<FoodTag>,
}

// Fields other than `date` fall back to the blank-day default when missing,
// `null` or mistyped. Collections drop only their bad elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyRecord {
    pub date: String,
    #[serde(deserialize_with = "lenient")]
    pub bowel_count: u32,
    #[serde(deserialize_with = "lenient")]
    pub blood: Blood,
    #[serde(deserialize_with = "lenient")]
    pub stool_type: StoolType,
    #[serde(deserialize_with = "lenient")]
    pub abdominal_pain: AbdominalPain,
    #[serde(deserialize_with = "lenient")]
    pub sleep_start: String,
    #[serde(deserialize_with = "lenient")]
    pub sleep_end: String,
    #[serde(deserialize_with = "lenient")]
    pub work_location: WorkLocation,
    #[serde(deserialize_with = "lenient")]
    pub work_hours: u8,
    #[serde(deserialize_with = "lenient")]
    pub stress_level: u8,
    #[serde(deserialize_with = "lenient")]
    pub condition_score: u8,
    #[serde(deserialize_with = "lenient")]
    pub memo: String,
    #[serde(deserialize_with = "lenient_items")]
    pub meals: Vec<MealEntry>,
    #[serde(deserialize_with = "lenient_flags")]
    pub meds: BTreeMap<String, bool>,
    #[serde(deserialize_with = "lenient")]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub dosage: String,
}

pub type RecordsMap = BTreeMap<String, DailyRecord>;

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

fn lenient_items<'de, D, C>(deserializer: D) -> Result<C, D::Error>
where
    D: Deserializer<'de>,
    C: Default + IntoIterator + FromIterator<<C as IntoIterator>::Item>,
    C::Item: DeserializeOwned,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<C::Item>(item).ok())
            .collect()),
        _ => Ok(C::default()),
    }
}

fn lenient_flags<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Object(entries) => Ok(entries
            .into_iter()
            .filter_map(|(id, taken)| taken.as_bool().map(|taken| (id, taken)))
            .collect()),
        _ => Ok(BTreeMap::new()),
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub date: String,
}

// Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecordPatch {
    pub bowel_count: Option<u32>,
    pub blood: Option<Blood>,
    pub stool_type: Option<StoolType>,
    pub abdominal_pain: Option<AbdominalPain>,
    pub sleep_start: Option<String>,
    pub sleep_end: Option<String>,
    pub work_location: Option<WorkLocation>,
    pub work_hours: Option<u8>,
    pub stress_level: Option<u8>,
    pub condition_score: Option<u8>,
    pub memo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MedToggleRequest {
    pub taken: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct MedicationRequest {
    pub name: String,
    #[serde(default)]
    pub dosage: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MedCheck {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub taken: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    pub phase: Phase,
    pub selected_date: String,
    pub draft: DailyRecord,
    pub checklist: Vec<MedCheck>,
    pub completion_pct: u8,
    pub sleep: Option<SleepDuration>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub record: DailyRecord,
    pub persisted: bool,
}

#[derive(Debug, Serialize)]
pub struct MedicationsResponse {
    pub medications: Vec<Medication>,
    pub persisted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub bowel_count: u32,
    pub blood: Blood,
    pub condition_score: u8,
    pub sleep: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDay {
    pub date: String,
    pub is_today: bool,
    pub completed: bool,
    pub condition_score: Option<u8>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    pub date: String,
    pub completion_pct: u8,
    pub completed: bool,
    pub week: Vec<WeekDay>,
    pub summary: Option<DaySummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: String,
    pub day: u32,
    pub is_today: bool,
    pub condition_score: Option<u8>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryAggregate {
    pub avg_condition: f64,
    pub avg_bowel: f64,
    pub blood_days: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
    pub aggregate: Option<HistoryAggregate>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub record_count: usize,
    pub days_remaining: usize,
    pub ready: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_values_serialize_as_kebab_case() {
        assert_eq!(serde_json::to_string(&WorkLocation::OnSite).unwrap(), "\"on-site\"");
        assert_eq!(serde_json::to_string(&FoodTag::Fodmap).unwrap(), "\"FODMAP\"");
        assert_eq!(serde_json::to_string(&Blood::None).unwrap(), "\"none\"");
    }

    #[test]
    fn legacy_labels_are_accepted() {
        let record: DailyRecord = serde_json::from_str(
            r#"{"date":"2024-03-06","blood":"少量","stoolType":"軟便","abdominalPain":"強い","workLocation":"リモート"}"#,
        )
        .unwrap();
        assert_eq!(record.blood, Blood::Trace);
        assert_eq!(record.stool_type, StoolType::Soft);
        assert_eq!(record.abdominal_pain, AbdominalPain::Severe);
        assert_eq!(record.work_location, WorkLocation::Remote);
    }

    #[test]
    fn malformed_fields_fall_back_to_defaults() {
        let record: DailyRecord = serde_json::from_str(
            r#"{"date":"2024-03-06","blood":"purple","bowelCount":-3,"sleepStart":null,"meals":"none","conditionScore":7}"#,
        )
        .unwrap();
        assert_eq!(record.blood, Blood::None);
        assert_eq!(record.bowel_count, 0);
        assert_eq!(record.sleep_start, "");
        assert!(record.meals.is_empty());
        assert_eq!(record.condition_score, 7);
    }

    #[test]
    fn meal_accepts_legacy_content_field() {
        let meal: MealEntry =
            serde_json::from_str(r#"{"type":"夕食","content":"udon","tags":["小麦","FODMAP"]}"#)
                .unwrap();
        assert_eq!(meal.meal_type, MealType::Dinner);
        assert_eq!(meal.text, "udon");
        assert!(meal.tags.contains(&FoodTag::Wheat));
        assert!(meal.tags.contains(&FoodTag::Fodmap));
    }

    #[test]
    fn bad_collection_elements_are_skipped_individually() {
        let record: DailyRecord = serde_json::from_str(
            r#"{"date":"2024-03-06",
                "meals":[{"type":"lunch","text":"rice","tags":["wheat","glitter","dairy"]}, 42, "toast"],
                "meds":{"med_1":true,"med_2":"yes","med_3":false}}"#,
        )
        .unwrap();
        assert_eq!(record.meals.len(), 1);
        assert_eq!(record.meals[0].text, "rice");
        assert_eq!(
            record.meals[0].tags,
            BTreeSet::from([FoodTag::Wheat, FoodTag::Dairy])
        );
        assert_eq!(
            record.meds,
            BTreeMap::from([("med_1".to_string(), true), ("med_3".to_string(), false)])
        );
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let result: Result<RecordPatch, _> = serde_json::from_str(r#"{"date":"2024-01-01"}"#);
        assert!(result.is_err());
    }
}
