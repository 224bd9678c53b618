//! Preliminary assessment text and the results view.
//!
//! The "assessment" is a fixed template over the patient's age, sex and
//! medical history. Symptoms, intensity and duration never change it, and
//! the urgency of a fresh result is always [`Urgency::Media`]. Both are
//! placeholders for a triage rule that does not exist yet.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::assessment::AssessmentRecord;

/// Closing sentences shared by every generated assessment.
const ASSESSMENT_TAIL: &str = "Quadro clínico inespecífico - monitoramento e avaliação médica recomendados. Recomenda-se consulta médica em 24-48h.";

/// Advice shown under the urgency banner.
pub const URGENCY_ADVICE: &str = "Considere agendar consulta médica em 24-48h.";

/// Footer shown on every results view.
pub const DISCLAIMER: &str = "Importante: Esta é apenas uma avaliação preliminar por IA. Sempre consulte um profissional de saúde qualificado para diagnóstico adequado.";

/// Fixed recommendations, in display order.
pub const RECOMMENDATIONS: [&str; 5] = [
    "Agende consulta médica nas próximas 24-48 horas",
    "Monitor os sintomas de perto",
    "Mantenha-se hidratado",
    "Não tome medicamentos sem prescrição médica",
    "Mantenha uma alimentação leve",
];

/// Urgency level attached to an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    /// `ALTA`
    #[serde(rename = "ALTA")]
    Alta,
    /// `MÉDIA`
    #[serde(rename = "MÉDIA")]
    Media,
    /// `BAIXA`
    #[serde(rename = "BAIXA")]
    Baixa,
}

impl Urgency {
    /// Urgency assigned to a freshly generated assessment.
    ///
    /// Always `MÉDIA`; the record is not inspected.
    #[must_use]
    pub fn for_record(_record: &AssessmentRecord) -> Self {
        Self::Media
    }

    /// The badge text.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alta => "ALTA",
            Self::Media => "MÉDIA",
            Self::Baixa => "BAIXA",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render the preliminary assessment paragraph for `record`.
///
/// ```
/// use triagem::assessment::{AssessmentRecord, Field};
/// use triagem::report::render_assessment;
///
/// let record = AssessmentRecord::new().update_field(Field::Age("30".into()));
/// assert!(render_assessment(&record).starts_with("Paciente de 30 anos, sexo ."));
/// ```
#[must_use]
pub fn render_assessment(record: &AssessmentRecord) -> String {
    let history = record
        .history_line()
        .map(|line| format!("Histórico: {line}. "))
        .unwrap_or_default();
    format!(
        "Paciente de {} anos, sexo {}. {history}{ASSESSMENT_TAIL}",
        record.age, record.sex
    )
}

/// One-line summary stored with a history entry.
///
/// The symptom count is fixed at 1.
#[must_use]
pub fn summary_line(record: &AssessmentRecord) -> String {
    format!("1 sintoma(s) - {} anos - {}", record.age, record.sex)
}

/// `dd/mm/yyyy`, as shown in the history list.
#[must_use]
pub fn format_date(at: &DateTime<Local>) -> String {
    at.format("%d/%m/%Y").to_string()
}

/// `HH:MM`, 24-hour clock.
#[must_use]
pub fn format_time(at: &DateTime<Local>) -> String {
    at.format("%H:%M").to_string()
}

/// Everything the results page shows for a pending assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    /// Urgency badge.
    pub urgency: Urgency,
    /// Advice under the badge.
    pub urgency_advice: &'static str,
    /// The assessment paragraph.
    pub assessment: String,
    /// Fixed recommendations.
    pub recommendations: Vec<&'static str>,
    /// `"{age} anos, {sex}"`.
    pub profile: String,
    /// Medical history line, when any condition is ticked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    /// `"{date} às {time}"` of the consultation.
    pub consulted_at: String,
    /// Reported symptoms.
    pub symptoms: String,
    /// Stored duration value.
    pub duration: String,
    /// Intensity as entered.
    pub intensity: String,
    /// Footer disclaimer.
    pub disclaimer: &'static str,
}

impl ResultsView {
    /// Build the view for `record`, consulted at `at`.
    #[must_use]
    pub fn new(record: &AssessmentRecord, at: &DateTime<Local>) -> Self {
        Self {
            urgency: Urgency::for_record(record),
            urgency_advice: URGENCY_ADVICE,
            assessment: render_assessment(record),
            recommendations: RECOMMENDATIONS.to_vec(),
            profile: format!("{} anos, {}", record.age, record.sex),
            medical_history: record.history_line(),
            consulted_at: format!("{} às {}", format_date(at), format_time(at)),
            symptoms: record.symptoms.clone(),
            duration: record.duration.as_str().to_string(),
            intensity: record.intensity.clone(),
            disclaimer: DISCLAIMER,
        }
    }

    /// Render as plain text.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Resultado da Avaliação\n");
        out.push_str("======================\n\n");
        out.push_str(&format!("Nível de Urgência: {}\n", self.urgency));
        out.push_str(&format!("{}\n\n", self.urgency_advice));

        out.push_str("Avaliação Preliminar (IA)\n");
        out.push_str(&format!("{}\n\n", self.assessment));

        out.push_str("Recomendações\n");
        for recommendation in &self.recommendations {
            out.push_str(&format!("  - {recommendation}\n"));
        }
        out.push('\n');

        out.push_str("Resumo da Consulta\n");
        out.push_str(&format!("  Perfil do Paciente: {}\n", self.profile));
        if let Some(history) = &self.medical_history {
            out.push_str(&format!("  Histórico: {history}\n"));
        }
        out.push_str(&format!("  Data da Consulta:   {}\n", self.consulted_at));
        out.push_str(&format!("  Sintomas Reportados: {}\n", self.symptoms));
        out.push_str(&format!(
            "  Duração: {}   Intensidade: {}/10\n\n",
            self.duration, self.intensity
        ));

        out.push_str(self.disclaimer);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{DurationBucket, Field, MedicalCondition, Sex};
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn scenario_record() -> AssessmentRecord {
        AssessmentRecord::new()
            .update_field(Field::Age("30".to_string()))
            .update_field(Field::Sex(Sex::Feminino))
            .toggle_condition(MedicalCondition::Diabetes, true)
            .update_field(Field::Symptoms("febre".to_string()))
            .update_field(Field::Intensity("6".to_string()))
            .update_field(Field::Duration(DurationBucket::Dias))
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 10, 1, 9, 5, 0).unwrap()
    }

    #[test]
    fn test_render_with_history() {
        assert_eq!(
            render_assessment(&scenario_record()),
            "Paciente de 30 anos, sexo feminino. Histórico: Diabetes. Quadro clínico inespecífico - monitoramento e avaliação médica recomendados. Recomenda-se consulta médica em 24-48h."
        );
    }

    #[test]
    fn test_render_without_history() {
        let record = scenario_record().toggle_condition(MedicalCondition::Diabetes, false);
        let text = render_assessment(&record);

        assert!(!text.contains("Histórico:"));
        assert_eq!(
            text,
            "Paciente de 30 anos, sexo feminino. Quadro clínico inespecífico - monitoramento e avaliação médica recomendados. Recomenda-se consulta médica em 24-48h."
        );
    }

    #[test]
    fn test_render_multiple_conditions() {
        let record = AssessmentRecord::new()
            .update_field(Field::Age("45".to_string()))
            .update_field(Field::Sex(Sex::Masculino))
            .toggle_condition(MedicalCondition::Diabetes, true)
            .toggle_condition(MedicalCondition::Hipertensao, true);

        assert!(render_assessment(&record)
            .contains("sexo masculino. Histórico: Diabetes, Hipertensão. Quadro"));
    }

    #[test]
    fn test_render_empty_record() {
        assert!(render_assessment(&AssessmentRecord::new()).starts_with("Paciente de  anos, sexo . Quadro"));
    }

    #[test]
    fn test_render_ignores_symptom_fields() {
        let a = scenario_record();
        let b = a
            .clone()
            .update_field(Field::Symptoms("dor no peito".to_string()))
            .update_field(Field::Intensity("10".to_string()))
            .update_field(Field::Duration(DurationBucket::Minutos));

        assert_eq!(render_assessment(&a), render_assessment(&b));
    }

    #[test]
    fn test_urgency_always_media() {
        let record = scenario_record().update_field(Field::Intensity("10".to_string()));
        assert_eq!(Urgency::for_record(&record), Urgency::Media);
        assert_eq!(Urgency::Media.to_string(), "MÉDIA");
    }

    #[test]
    fn test_urgency_serde() {
        assert_eq!(serde_json::to_string(&Urgency::Media).unwrap(), "\"MÉDIA\"");
        let u: Urgency = serde_json::from_str("\"ALTA\"").unwrap();
        assert_eq!(u, Urgency::Alta);
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(summary_line(&scenario_record()), "1 sintoma(s) - 30 anos - feminino");
    }

    #[test]
    fn test_format_date_and_time() {
        let at = fixed_time();
        assert_eq!(format_date(&at), "01/10/2025");
        assert_eq!(format_time(&at), "09:05");
    }

    #[test]
    fn test_results_view() {
        let view = ResultsView::new(&scenario_record(), &fixed_time());

        assert_eq!(view.urgency, Urgency::Media);
        assert_eq!(view.profile, "30 anos, feminino");
        assert_eq!(view.medical_history.as_deref(), Some("Diabetes"));
        assert_eq!(view.consulted_at, "01/10/2025 às 09:05");
        assert_eq!(view.duration, "dias");
        assert_eq!(view.recommendations.len(), 5);
    }

    #[test]
    fn test_results_view_text() {
        let text = ResultsView::new(&scenario_record(), &fixed_time()).to_text();

        assert!(text.contains("Nível de Urgência: MÉDIA"));
        assert!(text.contains("Mantenha-se hidratado"));
        assert!(text.contains("Intensidade: 6/10"));
        assert!(text.contains("Histórico: Diabetes\n"));
    }

    #[test]
    fn test_results_view_json_omits_empty_history() {
        let record = scenario_record().toggle_condition(MedicalCondition::Diabetes, false);
        let json = serde_json::to_value(ResultsView::new(&record, &fixed_time())).unwrap();

        assert!(json.get("medical_history").is_none());
        assert_eq!(json["urgency"], "MÉDIA");
    }

    proptest! {
        #[test]
        fn render_is_deterministic(age in ".{0,12}", symptoms in ".{0,24}", with_history in any::<bool>()) {
            let record = AssessmentRecord::new()
                .update_field(Field::Age(age))
                .update_field(Field::Symptoms(symptoms))
                .toggle_condition(MedicalCondition::Asma, with_history);

            prop_assert_eq!(render_assessment(&record), render_assessment(&record.clone()));
        }
    }
}
