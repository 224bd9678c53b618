//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::app::ResultsExit;
use crate::assessment::{AssessmentRecord, DurationBucket, Field, MedicalCondition, Sex};

/// Questionnaire answers.
///
/// Every field is optional; missing answers are stored empty.
#[derive(Debug, Args)]
pub struct AssessCommand {
    /// Age in years
    #[arg(long)]
    pub age: Option<String>,

    /// Sex
    #[arg(long, value_enum)]
    pub sex: Option<SexArg>,

    /// Pre-existing condition (repeatable)
    #[arg(long = "condition", value_enum)]
    pub conditions: Vec<ConditionArg>,

    /// Symptom description
    #[arg(long)]
    pub symptoms: Option<String>,

    /// Intensity from 1 to 10
    #[arg(long)]
    pub intensity: Option<String>,

    /// How long the symptoms have lasted
    #[arg(long, value_enum)]
    pub duration: Option<DurationArg>,

    /// Additional information (medication, recent surgery, ...)
    #[arg(long = "info")]
    pub additional_info: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

impl AssessCommand {
    /// Build the record these answers describe.
    #[must_use]
    pub fn to_record(&self) -> AssessmentRecord {
        let mut record = AssessmentRecord::new()
            .update_field(Field::Age(self.age.clone().unwrap_or_default()))
            .update_field(Field::Sex(self.sex.map_or(Sex::Unspecified, Sex::from)))
            .update_field(Field::Symptoms(self.symptoms.clone().unwrap_or_default()))
            .update_field(Field::Intensity(self.intensity.clone().unwrap_or_default()))
            .update_field(Field::Duration(
                self.duration.map_or(DurationBucket::Unspecified, DurationBucket::from),
            ))
            .update_field(Field::AdditionalInfo(
                self.additional_info.clone().unwrap_or_default(),
            ));

        for condition in &self.conditions {
            record = record.toggle_condition(MedicalCondition::from(*condition), true);
        }
        record
    }
}

/// Arguments shared by commands that only render a view.
#[derive(Debug, Args)]
pub struct ViewCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Finish command arguments.
#[derive(Debug, Args)]
pub struct FinishCommand {
    /// Where to go after saving
    #[arg(long, value_enum, default_value = "new")]
    pub then: ExitArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// History command arguments.
#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Show at most this many entries (overrides configuration)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Open command arguments.
#[derive(Debug, Args)]
pub struct OpenCommand {
    /// Route path
    pub route: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Sex argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SexArg {
    /// Masculino
    Masculino,
    /// Feminino
    Feminino,
    /// Outro
    Outro,
}

impl From<SexArg> for Sex {
    fn from(arg: SexArg) -> Self {
        match arg {
            SexArg::Masculino => Self::Masculino,
            SexArg::Feminino => Self::Feminino,
            SexArg::Outro => Self::Outro,
        }
    }
}

/// Medical condition argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConditionArg {
    /// Diabetes
    Diabetes,
    /// Asma
    Asma,
    /// Problemas Cardíacos
    ProblemasCardiacos,
    /// Hipertensão
    Hipertensao,
    /// Alergias
    Alergias,
    /// Depressão/Ansiedade
    DepressaoAnsiedade,
}

impl From<ConditionArg> for MedicalCondition {
    fn from(arg: ConditionArg) -> Self {
        match arg {
            ConditionArg::Diabetes => Self::Diabetes,
            ConditionArg::Asma => Self::Asma,
            ConditionArg::ProblemasCardiacos => Self::ProblemasCardiacos,
            ConditionArg::Hipertensao => Self::Hipertensao,
            ConditionArg::Alergias => Self::Alergias,
            ConditionArg::DepressaoAnsiedade => Self::DepressaoAnsiedade,
        }
    }
}

/// Duration argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DurationArg {
    /// Alguns minutos
    Minutos,
    /// Algumas horas
    Horas,
    /// 1-2 dias
    Dias,
    /// 1 semana
    Semana,
    /// Várias semanas
    Semanas,
    /// Vários meses
    Meses,
}

impl From<DurationArg> for DurationBucket {
    fn from(arg: DurationArg) -> Self {
        match arg {
            DurationArg::Minutos => Self::Minutos,
            DurationArg::Horas => Self::Horas,
            DurationArg::Dias => Self::Dias,
            DurationArg::Semana => Self::Semana,
            DurationArg::Semanas => Self::Semanas,
            DurationArg::Meses => Self::Meses,
        }
    }
}

/// Exit from the results view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExitArg {
    /// Nova Consulta
    New,
    /// Histórico
    History,
}

impl From<ExitArg> for ResultsExit {
    fn from(arg: ExitArg) -> Self {
        match arg {
            ExitArg::New => Self::NewConsultation,
            ExitArg::History => Self::GoToHistory,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
