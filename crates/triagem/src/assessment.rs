//! Intake record for a single preliminary assessment.
//!
//! An [`AssessmentRecord`] starts empty and is edited one field at a time.
//! Nothing is validated: empty or out-of-range answers flow through to the
//! rendered assessment unchanged.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Self-reported sex, as offered by the intake form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// `masculino`
    #[serde(rename = "masculino")]
    Masculino,
    /// `feminino`
    #[serde(rename = "feminino")]
    Feminino,
    /// `outro`
    #[serde(rename = "outro")]
    Outro,
    /// Not answered yet.
    #[default]
    #[serde(rename = "")]
    Unspecified,
}

impl Sex {
    /// The stored value, also used verbatim in rendered text.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Masculino => "masculino",
            Self::Feminino => "feminino",
            Self::Outro => "outro",
            Self::Unspecified => "",
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-existing conditions the form lets the patient tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MedicalCondition {
    /// `Diabetes`
    #[serde(rename = "Diabetes")]
    Diabetes,
    /// `Asma`
    #[serde(rename = "Asma")]
    Asma,
    /// `Problemas Cardíacos`
    #[serde(rename = "Problemas Cardíacos")]
    ProblemasCardiacos,
    /// `Hipertensão`
    #[serde(rename = "Hipertensão")]
    Hipertensao,
    /// `Alergias`
    #[serde(rename = "Alergias")]
    Alergias,
    /// `Depressão/Ansiedade`
    #[serde(rename = "Depressão/Ansiedade")]
    DepressaoAnsiedade,
}

impl MedicalCondition {
    /// Every condition, in form order.
    pub const ALL: [Self; 6] = [
        Self::Diabetes,
        Self::Asma,
        Self::ProblemasCardiacos,
        Self::Hipertensao,
        Self::Alergias,
        Self::DepressaoAnsiedade,
    ];

    /// The label shown to the user and stored in JSON.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Diabetes => "Diabetes",
            Self::Asma => "Asma",
            Self::ProblemasCardiacos => "Problemas Cardíacos",
            Self::Hipertensao => "Hipertensão",
            Self::Alergias => "Alergias",
            Self::DepressaoAnsiedade => "Depressão/Ansiedade",
        }
    }
}

impl std::fmt::Display for MedicalCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How long the symptoms have lasted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationBucket {
    /// A few minutes.
    Minutos,
    /// A few hours.
    Horas,
    /// One to two days.
    Dias,
    /// About a week.
    Semana,
    /// Several weeks.
    Semanas,
    /// Several months.
    Meses,
    /// Not answered yet.
    #[default]
    #[serde(rename = "")]
    Unspecified,
}

impl DurationBucket {
    /// The stored value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minutos => "minutos",
            Self::Horas => "horas",
            Self::Dias => "dias",
            Self::Semana => "semana",
            Self::Semanas => "semanas",
            Self::Meses => "meses",
            Self::Unspecified => "",
        }
    }

    /// The option label shown by the intake form.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Minutos => "Alguns minutos",
            Self::Horas => "Algumas horas",
            Self::Dias => "1-2 dias",
            Self::Semana => "1 semana",
            Self::Semanas => "Várias semanas",
            Self::Meses => "Vários meses",
            Self::Unspecified => "",
        }
    }
}

impl std::fmt::Display for DurationBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-field edit of an [`AssessmentRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Replace `age`.
    Age(String),
    /// Replace `sex`.
    Sex(Sex),
    /// Replace `symptoms`.
    Symptoms(String),
    /// Replace `intensity`.
    Intensity(String),
    /// Replace `duration`.
    Duration(DurationBucket),
    /// Replace `additionalInfo`.
    AdditionalInfo(String),
}

/// The answers of one intake questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssessmentRecord {
    /// Free-text age.
    pub age: String,
    /// Self-reported sex.
    pub sex: Sex,
    /// Ticked conditions, in the order they were ticked.
    pub medical_history: Vec<MedicalCondition>,
    /// Free-text symptom description.
    pub symptoms: String,
    /// Intensity from 1 to 10, kept as entered.
    pub intensity: String,
    /// Duration bucket.
    pub duration: DurationBucket,
    /// Optional free-text notes.
    pub additional_info: String,
}

impl AssessmentRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the record with one field replaced.
    #[must_use]
    pub fn update_field(mut self, field: Field) -> Self {
        match field {
            Field::Age(age) => self.age = age,
            Field::Sex(sex) => self.sex = sex,
            Field::Symptoms(symptoms) => self.symptoms = symptoms,
            Field::Intensity(intensity) => self.intensity = intensity,
            Field::Duration(duration) => self.duration = duration,
            Field::AdditionalInfo(info) => self.additional_info = info,
        }
        self
    }

    /// Return the record with `condition` ticked (`present`) or unticked.
    ///
    /// Ticking an already ticked condition, or unticking an absent one,
    /// leaves the record unchanged.
    #[must_use]
    pub fn toggle_condition(mut self, condition: MedicalCondition, present: bool) -> Self {
        if present {
            if !self.medical_history.contains(&condition) {
                self.medical_history.push(condition);
            }
        } else {
            self.medical_history.retain(|c| *c != condition);
        }
        self
    }

    /// The ticked conditions joined by `", "`, or `None` when there are none.
    #[must_use]
    pub fn history_line(&self) -> Option<String> {
        if self.medical_history.is_empty() {
            return None;
        }
        let labels: Vec<&str> = self.medical_history.iter().map(MedicalCondition::label).collect();
        Some(labels.join(", "))
    }

    /// BLAKE3 hex digest of the record's JSON encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}
