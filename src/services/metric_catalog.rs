use crate::models::catalog::{Question, ScaleSpec, Section, SectionId};
use crate::models::session::SessionScope;

/// Order in which a full check-in walks the sections.
const CHECK_IN_ORDER: [SectionId; 5] = [
    SectionId::SexualHealth,
    SectionId::Mood,
    SectionId::ReproductiveHealth,
    SectionId::Social,
    SectionId::Exercise,
];

const SATISFACTION_LABELS: [&str; 5] = [
    "Very Dissatisfied",
    "Dissatisfied",
    "Neutral",
    "Satisfied",
    "Very Satisfied",
];

/// Read-only set of health sections and their questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCatalog {
    sections: Vec<Section>,
}

impl Default for MetricCatalog {
    fn default() -> Self {
        Self::new(default_sections())
    }
}

impl MetricCatalog {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn index_of(&self, id: SectionId) -> Option<usize> {
        self.sections.iter().position(|section| section.id == id)
    }

    /// Questions of `id`, or none when the catalog does not define the section.
    pub fn questions_for(&self, id: SectionId) -> &[Question] {
        self.section(id)
            .map(|section| section.questions.as_slice())
            .unwrap_or(&[])
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.all_questions()
            .find(|question| question.id == question_id)
    }

    pub fn all_questions(&self) -> impl Iterator<Item = &Question> + '_ {
        self.sections
            .iter()
            .flat_map(|section| section.questions.iter())
    }

    pub fn question_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.questions.len())
            .sum()
    }

    pub fn check_in_order(&self) -> &'static [SectionId] {
        &CHECK_IN_ORDER
    }

    /// Sections a session with `scope` walks, in walking order. Sections missing from the
    /// catalog come back empty rather than failing.
    pub fn session_sections(&self, scope: SessionScope) -> Vec<Section> {
        let resolve = |id: SectionId| {
            self.section(id)
                .cloned()
                .unwrap_or_else(|| Section::empty(id))
        };

        match scope {
            SessionScope::Full => CHECK_IN_ORDER.iter().copied().map(resolve).collect(),
            SessionScope::Focus(id) => vec![resolve(id)],
        }
    }
}

fn default_sections() -> Vec<Section> {
    vec![
        Section {
            id: SectionId::Mood,
            name: "Mental Health".to_string(),
            description: "Track your emotional wellbeing and mental state".to_string(),
            questions: vec![
                Question::scale(
                    "mood_rating",
                    "How would you rate your overall mood today?",
                    ScaleSpec::new(1, 10, &["Very Poor", "Poor", "Fair", "Good", "Excellent"]),
                ),
                Question::scale(
                    "stress_level",
                    "How stressed do you feel today?",
                    ScaleSpec::new(
                        1,
                        10,
                        &["No Stress", "Low", "Moderate", "High", "Very High"],
                    ),
                ),
                Question::boolean("anxiety", "Did you experience anxiety today?"),
            ],
        },
        Section {
            id: SectionId::SexualHealth,
            name: "Sexual Health".to_string(),
            description: "Track your sexual wellness and intimate health".to_string(),
            questions: vec![
                Question::scale(
                    "sexual_satisfaction",
                    "How satisfied are you with your sexual life?",
                    ScaleSpec::new(1, 10, &SATISFACTION_LABELS),
                ),
                Question::scale(
                    "sexual_comfort",
                    "How comfortable do you feel discussing sexual health?",
                    ScaleSpec::new(
                        1,
                        10,
                        &[
                            "Very Uncomfortable",
                            "Uncomfortable",
                            "Neutral",
                            "Comfortable",
                            "Very Comfortable",
                        ],
                    ),
                ),
                Question::boolean(
                    "sexual_wellness_concern",
                    "Do you have any concerns about your sexual health?",
                ),
            ],
        },
        Section {
            id: SectionId::Exercise,
            name: "Physical Health".to_string(),
            description: "Track your exercise and physical activity levels".to_string(),
            questions: vec![
                Question::scale(
                    "exercise_duration",
                    "How many minutes of exercise did you do today?",
                    ScaleSpec::new(0, 120, &["None", "1-15m", "16-30m", "31-60m", "60+m"]),
                ),
                Question::scale(
                    "exercise_intensity",
                    "How intense was your physical activity?",
                    ScaleSpec::new(
                        1,
                        5,
                        &[
                            "Light",
                            "Light-Moderate",
                            "Moderate",
                            "Vigorous",
                            "Very Vigorous",
                        ],
                    ),
                ),
                Question::scale(
                    "energy_level",
                    "How is your energy level today?",
                    ScaleSpec::new(1, 10, &["Very Low", "Low", "Fair", "High", "Very High"]),
                ),
            ],
        },
        Section {
            id: SectionId::ReproductiveHealth,
            name: "Reproductive Health".to_string(),
            description: "Monitor your reproductive wellness and menstrual health".to_string(),
            questions: vec![
                Question::boolean(
                    "menstrual_cycle",
                    "Are you currently tracking your menstrual cycle?",
                ),
                Question::boolean(
                    "reproductive_concerns",
                    "Do you have any reproductive health concerns?",
                ),
                Question::scale(
                    "contraceptive_satisfaction",
                    "How satisfied are you with your current contraceptive method (if applicable)?",
                    ScaleSpec::new(1, 10, &SATISFACTION_LABELS),
                ),
            ],
        },
        Section {
            id: SectionId::Social,
            name: "Social Health".to_string(),
            description: "Track your social interactions and relationships".to_string(),
            questions: vec![
                Question::scale(
                    "social_interaction",
                    "How much meaningful social interaction did you have today?",
                    ScaleSpec::new(
                        1,
                        10,
                        &["None", "Very Little", "Some", "Good Amount", "Plenty"],
                    ),
                ),
                Question::boolean("support_system", "Do you feel supported by friends/family?"),
                Question::boolean("loneliness", "Did you feel lonely today?"),
            ],
        },
    ]
}
