use serde::{Deserialize, Serialize};
use std::fmt;

use super::entry::AnswerValue;

/// Stable identifier of a health section. Display names are never used for lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Mood,
    SexualHealth,
    Exercise,
    ReproductiveHealth,
    Social,
}

impl SectionId {
    pub const ALL: [SectionId; 5] = [
        SectionId::Mood,
        SectionId::SexualHealth,
        SectionId::Exercise,
        SectionId::ReproductiveHealth,
        SectionId::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Mood => "mood",
            SectionId::SexualHealth => "sexual_health",
            SectionId::Exercise => "exercise",
            SectionId::ReproductiveHealth => "reproductive_health",
            SectionId::Social => "social",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SectionId {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "mood" => Ok(SectionId::Mood),
            "sexual_health" => Ok(SectionId::SexualHealth),
            "exercise" => Ok(SectionId::Exercise),
            "reproductive_health" => Ok(SectionId::ReproductiveHealth),
            "social" => Ok(SectionId::Social),
            other => Err(format!("unsupported health section: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Scale,
    Boolean,
    Text,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Scale => "scale",
            QuestionKind::Boolean => "boolean",
            QuestionKind::Text => "text",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScaleSpec {
    pub min: i64,
    pub max: i64,
    /// Anchor labels from the low end to the high end of the scale.
    pub labels: Vec<String>,
}

impl ScaleSpec {
    pub fn new(min: i64, max: i64, labels: &[&str]) -> Self {
        Self {
            min,
            max,
            labels: labels.iter().map(|label| label.to_string()).collect(),
        }
    }

    /// Where an untouched slider sits.
    pub fn default_value(&self) -> i64 {
        (self.min + self.max).div_euclid(2)
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn low_label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    pub fn high_label(&self) -> Option<&str> {
        self.labels.last().map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleSpec>,
}

impl Question {
    pub fn scale(id: &str, prompt: &str, scale: ScaleSpec) -> Self {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            kind: QuestionKind::Scale,
            scale: Some(scale),
        }
    }

    pub fn boolean(id: &str, prompt: &str) -> Self {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            kind: QuestionKind::Boolean,
            scale: None,
        }
    }

    pub fn text(id: &str, prompt: &str) -> Self {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            kind: QuestionKind::Text,
            scale: None,
        }
    }

    /// Checks that `value` is a well-formed answer to this question.
    pub fn check_answer(&self, value: &AnswerValue) -> Result<(), String> {
        match (self.kind, value) {
            (QuestionKind::Boolean, AnswerValue::Boolean(_)) => Ok(()),
            (QuestionKind::Text, AnswerValue::Text(_)) => Ok(()),
            (QuestionKind::Scale, AnswerValue::Integer(number)) => match &self.scale {
                Some(scale) if !scale.contains(*number) => Err(format!(
                    "{} must be between {} and {}, got {number}",
                    self.id, scale.min, scale.max
                )),
                _ => Ok(()),
            },
            (kind, other) => Err(format!(
                "{} expects a {kind} answer, got {}",
                self.id,
                other.kind_name()
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    pub description: String,
    pub questions: Vec<Question>,
}

impl Section {
    /// Placeholder for a section the catalog does not define: no questions, never blocks.
    pub fn empty(id: SectionId) -> Self {
        Self {
            id,
            name: id.as_str().to_string(),
            description: String::new(),
            questions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_id_round_trips_through_str() {
        for id in SectionId::ALL {
            assert_eq!(SectionId::try_from(id.as_str()), Ok(id));
        }
        assert!(SectionId::try_from("Mental Health").is_err());
    }

    #[test]
    fn scale_default_value_is_floored_midpoint() {
        assert_eq!(ScaleSpec::new(1, 10, &[]).default_value(), 5);
        assert_eq!(ScaleSpec::new(0, 120, &[]).default_value(), 60);
        assert_eq!(ScaleSpec::new(1, 5, &[]).default_value(), 3);

        let stress = ScaleSpec::new(1, 10, &["No Stress", "Low", "High"]);
        assert_eq!(stress.low_label(), Some("No Stress"));
        assert_eq!(stress.high_label(), Some("High"));
        assert_eq!(ScaleSpec::new(1, 10, &[]).low_label(), None);
    }

    #[test]
    fn check_answer_enforces_kind_and_bounds() {
        let mood = Question::scale("mood_rating", "Mood?", ScaleSpec::new(1, 10, &[]));
        assert!(mood.check_answer(&AnswerValue::Integer(7)).is_ok());
        assert!(mood.check_answer(&AnswerValue::Integer(11)).is_err());
        assert!(mood.check_answer(&AnswerValue::Boolean(true)).is_err());

        let anxiety = Question::boolean("anxiety", "Anxious?");
        assert!(anxiety.check_answer(&AnswerValue::Boolean(false)).is_ok());
        assert!(anxiety.check_answer(&AnswerValue::Text("no".into())).is_err());

        let notes = Question::text("notes", "Anything else?");
        assert!(notes.check_answer(&AnswerValue::Text(String::new())).is_ok());
    }
}
