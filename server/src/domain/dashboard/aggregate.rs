//! Record aggregation
//!
//! Turns the flat upstream record array into per-step occurrence counts
//! (`jornadas`) and per-step value distributions (`details`).

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;

/// Upstream field holding the step name
pub const KEY_NAME_FIELD: &str = "user_variable_key_name";

/// Upstream field holding the recorded value
pub const KEY_VALUE_FIELD: &str = "user_variable_key_value";

/// Steps with this many distinct values or more are left out of `details`
pub const DETAIL_VALUE_LIMIT: usize = 50;

/// One logged user interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key_name: String,
    /// `None` only when the value field is absent
    pub key_value: Option<String>,
}

/// Occurrences of a name (step or value)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepCount {
    pub name: String,
    pub value: u64,
}

/// Value distribution recorded under one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detail {
    pub name: String,
    pub values: Vec<StepCount>,
}

/// Intermediate structure consumed by the metrics stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    pub jornadas: Vec<StepCount>,
    pub details: Vec<Detail>,
}

impl Aggregates {
    /// Count for a step, 0 when the step never occurred
    pub fn step_value(&self, name: &str) -> u64 {
        self.jornadas
            .iter()
            .find(|step| step.name == name)
            .map_or(0, |step| step.value)
    }

    pub fn detail(&self, name: &str) -> Option<&Detail> {
        self.details.iter().find(|detail| detail.name == name)
    }
}

/// Stringify a step name. A present `null` counts as the name `"null"`;
/// objects and arrays yield `None`.
fn name_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Stringify a recorded value. Any present value is counted: strings as
/// is, everything else as its compact JSON text (`null`, `7`, `true`).
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// True for entries the counting stages must skip: non-objects and objects
/// without a scalar or null step name.
pub fn is_malformed(entry: &Value) -> bool {
    entry
        .get(KEY_NAME_FIELD)
        .and_then(name_to_string)
        .is_none()
}

impl Record {
    /// Parse one upstream entry, `None` when malformed
    pub fn from_value(entry: &Value) -> Option<Self> {
        if is_malformed(entry) {
            return None;
        }
        let key_name = entry.get(KEY_NAME_FIELD).and_then(name_to_string)?;
        let key_value = entry.get(KEY_VALUE_FIELD).map(value_to_string);
        Some(Self {
            key_name,
            key_value,
        })
    }
}

/// Filter stage: keep well-formed records, drop everything else.
/// A non-array payload yields no records.
pub fn well_formed_records(payload: &Value) -> Vec<Record> {
    let Some(entries) = payload.as_array() else {
        if !payload.is_null() {
            tracing::debug!("Upstream payload is not an array, treating as empty");
        }
        return Vec::new();
    };

    let records: Vec<Record> = entries.iter().filter_map(Record::from_value).collect();
    let skipped = entries.len() - records.len();
    if skipped > 0 {
        tracing::debug!(skipped, total = entries.len(), "Skipped malformed records");
    }
    records
}

/// Insertion-ordered counter
#[derive(Default)]
struct OrderedCounter {
    counts: Vec<StepCount>,
    index: FxHashMap<String, usize>,
}

impl OrderedCounter {
    fn increment(&mut self, name: &str) {
        match self.index.get(name) {
            Some(&pos) => self.counts[pos].value += 1,
            None => {
                self.index.insert(name.to_string(), self.counts.len());
                self.counts.push(StepCount {
                    name: name.to_string(),
                    value: 1,
                });
            }
        }
    }

    fn into_counts(self) -> Vec<StepCount> {
        self.counts
    }
}

/// Occurrences per distinct step name, in order of first occurrence
pub fn count_by_key_name(records: &[Record]) -> Vec<StepCount> {
    let mut counter = OrderedCounter::default();
    for record in records {
        counter.increment(&record.key_name);
    }
    counter.into_counts()
}

/// Occurrences per distinct value among records of one step
pub fn count_by_key_value_for_name(records: &[Record], target_name: &str) -> Vec<StepCount> {
    let mut counter = OrderedCounter::default();
    for record in records.iter().filter(|r| r.key_name == target_name) {
        if let Some(value) = &record.key_value {
            counter.increment(value);
        }
    }
    counter.into_counts()
}

/// Build `jornadas` and the bounded `details` list
pub fn build_aggregates(records: &[Record]) -> Aggregates {
    let jornadas = count_by_key_name(records);

    let details = jornadas
        .iter()
        .filter_map(|step| {
            let values = count_by_key_value_for_name(records, &step.name);
            if values.len() < DETAIL_VALUE_LIMIT {
                Some(Detail {
                    name: step.name.clone(),
                    values,
                })
            } else {
                tracing::trace!(
                    step = %step.name,
                    distinct = values.len(),
                    "Detail omitted (too many distinct values)"
                );
                None
            }
        })
        .collect();

    Aggregates { jornadas, details }
}

/// Filter and aggregate a raw upstream payload in one go
pub fn aggregate_payload(payload: &Value) -> Aggregates {
    build_aggregates(&well_formed_records(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(name: &str, value: &str) -> Record {
        Record {
            key_name: name.to_string(),
            key_value: Some(value.to_string()),
        }
    }

    #[test]
    fn test_count_by_key_name_first_occurrence_order() {
        let records = vec![
            record("b", "1"),
            record("a", "1"),
            record("b", "2"),
            record("c", "1"),
            record("a", "3"),
            record("b", "1"),
        ];
        let counts = count_by_key_name(&records);
        let pairs: Vec<(&str, u64)> = counts.iter().map(|c| (c.name.as_str(), c.value)).collect();
        assert_eq!(pairs, vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn test_count_by_key_name_sum_matches_record_count() {
        let payload = json!([
            {"user_variable_key_name": "x", "user_variable_key_value": "1"},
            {"user_variable_key_name": "y"},
            "not an object",
            42,
            {"other": "field"},
            {"user_variable_key_name": "x", "user_variable_key_value": "2"},
            {"user_variable_key_name": null},
            {"user_variable_key_name": ["x"]},
        ]);
        let records = well_formed_records(&payload);
        let counts = count_by_key_name(&records);
        let total: u64 = counts.iter().map(|c| c.value).sum();
        assert_eq!(total, 4);
        assert_eq!(counts.last().map(|c| c.name.as_str()), Some("null"));
    }

    #[test]
    fn test_count_by_key_name_empty_and_non_array() {
        assert!(count_by_key_name(&[]).is_empty());
        assert!(well_formed_records(&json!({"a": 1})).is_empty());
        assert!(well_formed_records(&Value::Null).is_empty());
        assert!(well_formed_records(&json!("text")).is_empty());
    }

    #[test]
    fn test_count_by_key_value_for_name() {
        let records = vec![
            record("maior_de_idade", "Sim"),
            record("maior_de_idade", "Não"),
            record("outro", "Sim"),
            record("maior_de_idade", "Sim"),
        ];
        let counts = count_by_key_value_for_name(&records, "maior_de_idade");
        assert_eq!(
            counts,
            vec![
                StepCount {
                    name: "Sim".to_string(),
                    value: 2
                },
                StepCount {
                    name: "Não".to_string(),
                    value: 1
                },
            ]
        );
        assert!(count_by_key_value_for_name(&records, "missing").is_empty());
    }

    #[test]
    fn test_count_by_key_value_sum_matches_valued_records() {
        let payload = json!([
            {"user_variable_key_name": "n", "user_variable_key_value": "a"},
            {"user_variable_key_name": "n"},
            {"user_variable_key_name": "n", "user_variable_key_value": 7},
            {"user_variable_key_name": "n", "user_variable_key_value": {"nested": true}},
            {"user_variable_key_name": "m", "user_variable_key_value": "a"},
        ]);
        let records = well_formed_records(&payload);
        let total: u64 = count_by_key_value_for_name(&records, "n")
            .iter()
            .map(|c| c.value)
            .sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_null_value_keeps_detail_sum_equal_to_step_count() {
        let payload = json!([
            {"user_variable_key_name": "maior_de_idade", "user_variable_key_value": null},
            {"user_variable_key_name": "maior_de_idade", "user_variable_key_value": "Sim"},
            {"user_variable_key_name": null, "user_variable_key_value": "x"},
        ]);
        let aggregates = aggregate_payload(&payload);

        assert_eq!(aggregates.step_value("maior_de_idade"), 2);
        assert_eq!(aggregates.step_value("null"), 1);

        let detail = aggregates.detail("maior_de_idade").unwrap();
        let names: Vec<&str> = detail.values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["null", "Sim"]);
        let sum: u64 = detail.values.iter().map(|v| v.value).sum();
        assert_eq!(sum, aggregates.step_value("maior_de_idade"));
    }

    #[test]
    fn test_scalar_names_are_stringified() {
        let payload = json!([
            {"user_variable_key_name": 12, "user_variable_key_value": true},
        ]);
        let records = well_formed_records(&payload);
        assert_eq!(records, vec![record("12", "true")]);
    }

    #[test]
    fn test_is_malformed() {
        assert!(is_malformed(&json!(null)));
        assert!(is_malformed(&json!([1, 2])));
        assert!(is_malformed(&json!({"user_variable_key_value": "x"})));
        assert!(is_malformed(&json!({"user_variable_key_name": ["x"]})));
        assert!(!is_malformed(&json!({"user_variable_key_name": "x"})));
        assert!(!is_malformed(&json!({"user_variable_key_name": null})));
    }

    fn step_with_distinct_values(name: &str, distinct: usize) -> Vec<Record> {
        (0..distinct).map(|i| record(name, &format!("v{}", i))).collect()
    }

    #[test]
    fn test_detail_with_49_values_is_included() {
        let records = step_with_distinct_values("texto_livre", 49);
        let aggregates = build_aggregates(&records);
        let detail = aggregates.detail("texto_livre").unwrap();
        assert_eq!(detail.values.len(), 49);
    }

    #[test]
    fn test_detail_with_50_values_is_omitted() {
        let mut records = step_with_distinct_values("texto_livre", 50);
        records.push(record("inicio_de_jornada", "1"));
        let aggregates = build_aggregates(&records);

        assert!(aggregates.detail("texto_livre").is_none());
        assert_eq!(aggregates.step_value("texto_livre"), 50);
        assert!(aggregates.detail("inicio_de_jornada").is_some());
    }

    #[test]
    fn test_detail_sums_match_step_counts() {
        let records = vec![
            record("a", "1"),
            record("a", "2"),
            record("b", "x"),
            record("a", "1"),
        ];
        let aggregates = build_aggregates(&records);
        for detail in &aggregates.details {
            let sum: u64 = detail.values.iter().map(|v| v.value).sum();
            assert_eq!(sum, aggregates.step_value(&detail.name));
        }
    }

    #[test]
    fn test_step_value_missing_is_zero() {
        let aggregates = Aggregates::default();
        assert_eq!(aggregates.step_value("api_lead"), 0);
    }

    #[test]
    fn test_aggregates_serialize_shape() {
        let aggregates = build_aggregates(&[record("a", "1")]);
        let json = serde_json::to_value(&aggregates).unwrap();
        assert_eq!(
            json,
            json!({
                "jornadas": [{"name": "a", "value": 1}],
                "details": [{"name": "a", "values": [{"name": "1", "value": 1}]}]
            })
        );
    }
}
