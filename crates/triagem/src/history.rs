//! Consultation history.
//!
//! History is a newest-first list of [`HistoryEntry`] values stored under
//! [`CONSULTATION_HISTORY_KEY`]. When the key is absent on first read it is
//! seeded with three sample consultations; once the key exists it is never
//! seeded again, even if the list is empty.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assessment::AssessmentRecord;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::report::{format_date, format_time, render_assessment, summary_line, Urgency};
use crate::storage::{self, KeyValueStore, CONSULTATION_HISTORY_KEY};

/// Shown when the history list is empty.
pub const EMPTY_HISTORY_MESSAGE: &str =
    "Nenhuma consulta encontrada. Faça sua primeira avaliação!";

/// A committed consultation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique, time-based id.
    pub id: i64,
    /// `dd/mm/yyyy` at creation.
    pub date: String,
    /// `HH:MM` at creation.
    pub time: String,
    /// Urgency badge.
    pub urgency: Urgency,
    /// One-line summary.
    pub summary: String,
    /// Assessment paragraph.
    pub assessment: String,
    /// Reported symptoms.
    pub symptoms: String,
    /// Intensity as entered.
    pub intensity: String,
    /// Duration as entered.
    pub duration: String,
}

impl HistoryEntry {
    /// Derive an entry from a submitted record.
    #[must_use]
    pub fn from_record(record: &AssessmentRecord, id: i64, at: &DateTime<Local>) -> Self {
        Self {
            id,
            date: format_date(at),
            time: format_time(at),
            urgency: Urgency::for_record(record),
            summary: summary_line(record),
            assessment: render_assessment(record),
            symptoms: record.symptoms.clone(),
            intensity: record.intensity.clone(),
            duration: record.duration.as_str().to_string(),
        }
    }
}

/// Pick the id for a new entry created at `at`.
///
/// Milliseconds since the epoch, bumped past the largest existing id when
/// the clock has not moved on.
///
/// # Errors
///
/// Returns [`Error::HistoryIdOverflow`] if the largest stored id is
/// `i64::MAX`.
pub fn next_id(history: &[HistoryEntry], at: &DateTime<Local>) -> Result<i64> {
    let candidate = at.timestamp_millis();
    match history.iter().map(|entry| entry.id).max() {
        Some(max) if max >= candidate => max
            .checked_add(1)
            .ok_or(Error::HistoryIdOverflow { max }),
        _ => Ok(candidate),
    }
}

/// The three sample consultations written to an empty store.
#[must_use]
pub fn seed_entries() -> Vec<HistoryEntry> {
    vec![
        HistoryEntry {
            id: 1,
            date: "25/09/2025".to_string(),
            time: "14:30".to_string(),
            urgency: Urgency::Alta,
            summary: "1 sintoma(s) - 12 anos - masculino".to_string(),
            assessment: "Paciente de 12 anos, sexo masculino. Histórico: Problemas Cardíacos, Depressão/Ansiedade. Quadro clínico inespecífico - monitoramento e avaliação médica recomendados. Monitore a evolução e consulte médico se persistir.".to_string(),
            symptoms: "Dor de cabeça intensa".to_string(),
            intensity: "8".to_string(),
            duration: "2-3 dias".to_string(),
        },
        HistoryEntry {
            id: 2,
            date: "23/09/2025".to_string(),
            time: "09:15".to_string(),
            urgency: Urgency::Baixa,
            summary: "1 sintoma(s) - 25 anos - feminino".to_string(),
            assessment: "Paciente de 25 anos, sexo feminino. Histórico: Asma. Quadro clínico inespecífico - monitoramento e avaliação médica recomendados. Monitore a evolução e consulte médico se persistir.".to_string(),
            symptoms: "Dor leve no estômago".to_string(),
            intensity: "3".to_string(),
            duration: "1 dia".to_string(),
        },
        HistoryEntry {
            id: 3,
            date: "21/09/2025".to_string(),
            time: "16:45".to_string(),
            urgency: Urgency::Media,
            summary: "1 sintoma(s) - 45 anos - masculino".to_string(),
            assessment: "Paciente de 45 anos, sexo masculino. Histórico: Diabetes, Hipertensão. Quadro clínico inespecífico - monitoramento e avaliação médica recomendados. Recomenda-se consulta médica em 24-48h.".to_string(),
            symptoms: "Tontura e fadiga".to_string(),
            intensity: "5".to_string(),
            duration: "1 semana".to_string(),
        },
    ]
}

/// Read the history, seeding it if the key is absent.
///
/// With `history.seed_samples` disabled an absent key reads as an empty list
/// and nothing is written.
///
/// # Errors
///
/// Returns an error if the store fails or the stored list is corrupt under
/// [`crate::config::CorruptPolicy::Fail`].
pub fn load_history<S>(store: &mut S, config: &Config) -> Result<Vec<HistoryEntry>>
where
    S: KeyValueStore + ?Sized,
{
    if let Some(history) = storage::load(&*store, CONSULTATION_HISTORY_KEY, config.storage.on_corrupt)? {
        return Ok(history);
    }

    if !config.history.seed_samples {
        return Ok(Vec::new());
    }

    let seeded = seed_entries();
    storage::save(store, CONSULTATION_HISTORY_KEY, &seeded)?;
    info!("Seeded consultation history with {} sample entries", seeded.len());
    Ok(seeded)
}

/// Derive an entry from `record`, prepend it to the history and persist.
///
/// # Errors
///
/// Returns an error if the history cannot be read or written.
pub fn append_to_history<S>(
    store: &mut S,
    config: &Config,
    record: &AssessmentRecord,
    at: &DateTime<Local>,
) -> Result<HistoryEntry>
where
    S: KeyValueStore + ?Sized,
{
    let mut history = load_history(store, config)?;
    let entry = HistoryEntry::from_record(record, next_id(&history, at)?, at);

    history.insert(0, entry.clone());
    storage::save(store, CONSULTATION_HISTORY_KEY, &history)?;

    info!("Appended consultation {} ({} total)", entry.id, history.len());
    Ok(entry)
}

/// Render the history list as plain text.
#[must_use]
pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return format!("{EMPTY_HISTORY_MESSAGE}\n");
    }

    let mut out = String::from("Histórico de Consultas\n======================\n");
    for entry in entries {
        out.push('\n');
        out.push_str(&format!("{}  [{}]\n", entry.date, entry.urgency));
        out.push_str(&format!("{}\n", entry.summary));
        out.push_str(&format!("{}\n", entry.assessment));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{DurationBucket, Field, MedicalCondition, Sex};
    use crate::config::CorruptPolicy;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn record() -> AssessmentRecord {
        AssessmentRecord::new()
            .update_field(Field::Age("30".to_string()))
            .update_field(Field::Sex(Sex::Feminino))
            .toggle_condition(MedicalCondition::Diabetes, true)
            .update_field(Field::Symptoms("febre".to_string()))
            .update_field(Field::Intensity("6".to_string()))
            .update_field(Field::Duration(DurationBucket::Dias))
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 10, 2, 18, 40, 0).unwrap()
    }

    #[test]
    fn test_seed_entries() {
        let seeds = seed_entries();
        let ids: Vec<i64> = seeds.iter().map(|e| e.id).collect();
        let urgencies: Vec<Urgency> = seeds.iter().map(|e| e.urgency).collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(urgencies, vec![Urgency::Alta, Urgency::Baixa, Urgency::Media]);
        assert_eq!(seeds[0].date, "25/09/2025");
        assert_eq!(seeds[2].date, "21/09/2025");
    }

    #[test]
    fn test_load_history_seeds_once() {
        let mut store = MemoryStore::new();
        let config = Config::default();

        assert_eq!(load_history(&mut store, &config).unwrap().len(), 3);
        assert_eq!(load_history(&mut store, &config).unwrap().len(), 3);
        assert!(store.read(CONSULTATION_HISTORY_KEY).unwrap().is_some());
    }

    #[test]
    fn test_load_history_does_not_reseed_empty_list() {
        let mut store = MemoryStore::new();
        store.write(CONSULTATION_HISTORY_KEY, &json!([])).unwrap();

        assert!(load_history(&mut store, &Config::default()).unwrap().is_empty());
    }

    #[test]
    fn test_load_history_without_seeding() {
        let mut store = MemoryStore::new();
        let mut config = Config::default();
        config.history.seed_samples = false;

        assert!(load_history(&mut store, &config).unwrap().is_empty());
        assert!(store.read(CONSULTATION_HISTORY_KEY).unwrap().is_none());
    }

    #[test]
    fn test_load_history_corrupt_fails() {
        let mut store = MemoryStore::new();
        store.write(CONSULTATION_HISTORY_KEY, &json!({"not": "a list"})).unwrap();

        let err = load_history(&mut store, &Config::default()).unwrap_err();
        assert!(err.is_corrupt_value());
    }

    #[test]
    fn test_load_history_corrupt_reset_reseeds() {
        let mut store = MemoryStore::new();
        store.write(CONSULTATION_HISTORY_KEY, &json!("garbage")).unwrap();
        let mut config = Config::default();
        config.storage.on_corrupt = CorruptPolicy::Reset;

        assert_eq!(load_history(&mut store, &config).unwrap().len(), 3);
    }

    #[test]
    fn test_from_record() {
        let entry = HistoryEntry::from_record(&record(), 99, &at());

        assert_eq!(entry.id, 99);
        assert_eq!(entry.date, "02/10/2025");
        assert_eq!(entry.time, "18:40");
        assert_eq!(entry.urgency, Urgency::Media);
        assert_eq!(entry.summary, "1 sintoma(s) - 30 anos - feminino");
        assert!(entry.assessment.contains("Histórico: Diabetes."));
        assert_eq!(entry.symptoms, "febre");
        assert_eq!(entry.intensity, "6");
        assert_eq!(entry.duration, "dias");
    }

    #[test]
    fn test_append_prepends_after_seed() {
        let mut store = MemoryStore::new();
        let config = Config::default();

        let entry = append_to_history(&mut store, &config, &record(), &at()).unwrap();
        let history = load_history(&mut store, &config).unwrap();

        assert_eq!(history.len(), 4);
        assert_eq!(history[0], entry);
        assert_eq!(history[1].id, 1);
    }

    #[test]
    fn test_append_twice_gives_distinct_ids() {
        let mut store = MemoryStore::new();
        let config = Config::default();

        let first = append_to_history(&mut store, &config, &record(), &at()).unwrap();
        let second = append_to_history(&mut store, &config, &record(), &at()).unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.id > first.id);
        let history = load_history(&mut store, &config).unwrap();
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].id, second.id);
    }

    #[test]
    fn test_next_id() {
        let millis = at().timestamp_millis();
        assert_eq!(next_id(&[], &at()).unwrap(), millis);

        let mut ahead = HistoryEntry::from_record(&record(), millis + 10, &at());
        assert_eq!(
            next_id(std::slice::from_ref(&ahead), &at()).unwrap(),
            millis + 11
        );

        ahead.id = 3;
        assert_eq!(next_id(&[ahead], &at()).unwrap(), millis);
    }

    #[test]
    fn test_next_id_overflow() {
        let last = HistoryEntry::from_record(&record(), i64::MAX, &at());
        let err = next_id(&[last], &at()).unwrap_err();
        assert!(matches!(err, Error::HistoryIdOverflow { max: i64::MAX }));
    }

    #[test]
    fn test_append_after_max_id_fails_without_writing() {
        let mut store = MemoryStore::new();
        let config = Config::default();
        let stored = vec![HistoryEntry::from_record(&record(), i64::MAX, &at())];
        storage::save(&mut store, CONSULTATION_HISTORY_KEY, &stored).unwrap();

        let err = append_to_history(&mut store, &config, &record(), &at()).unwrap_err();
        assert!(matches!(err, Error::HistoryIdOverflow { .. }));
        assert_eq!(load_history(&mut store, &config).unwrap(), stored);
    }

    #[test]
    fn test_entry_json_shape() {
        let json = serde_json::to_value(&seed_entries()[2]).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["urgency"], "MÉDIA");
        assert_eq!(json["duration"], "1 semana");
    }

    #[test]
    fn test_render_history() {
        let text = render_history(&seed_entries());
        assert!(text.contains("25/09/2025  [ALTA]"));
        assert!(text.contains("1 sintoma(s) - 25 anos - feminino"));

        assert_eq!(render_history(&[]).trim(), EMPTY_HISTORY_MESSAGE);
    }
}
