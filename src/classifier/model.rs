use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroGender {
    Male,
    Female,
    Unknown,
}

/// A yes/no tag. The Russian answers are accepted when reading older files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    #[serde(alias = "да")]
    Yes,
    #[serde(alias = "нет")]
    No,
}

impl fmt::Display for HeroGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeroGender::Male => f.write_str("male"),
            HeroGender::Female => f.write_str("female"),
            HeroGender::Unknown => f.write_str("unknown"),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Yes => f.write_str("yes"),
            Answer::No => f.write_str("no"),
        }
    }
}

/// Tags assigned to a title from its description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub hero_gender: HeroGender,
    pub violence: Answer,
    pub mystical: Answer,
    pub romance_focus: Answer,
    pub approximate_age: String,
}

impl Classification {
    /// Substituted when the classifier fails, so the record stays in the set.
    pub fn fallback() -> Self {
        Self {
            hero_gender: HeroGender::Unknown,
            violence: Answer::No,
            mystical: Answer::No,
            romance_focus: Answer::No,
            approximate_age: "unknown".to_string(),
        }
    }
}
