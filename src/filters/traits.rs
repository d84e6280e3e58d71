use crate::catalog::AnimeRecord;
use crate::classifier::{Answer, HeroGender};
use crate::filters::RecordFilter;

pub const DEFAULT_MIN_AGE: i64 = 18;

/// Final cut over the AI tags: a female lead, no violence, no mysticism,
/// romance as the main focus and an adult lead.
pub struct TraitFilter {
    min_age: i64,
}

impl TraitFilter {
    pub fn new(min_age: i64) -> Self {
        Self { min_age }
    }
}

impl Default for TraitFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_AGE)
    }
}

impl RecordFilter for TraitFilter {
    fn name(&self) -> &'static str {
        "traits"
    }

    fn accepts(&self, _title: &str, record: &AnimeRecord) -> bool {
        let age_ok = min_age(record.approximate_age.as_deref()).is_some_and(|age| age >= self.min_age);

        record.hero_gender == Some(HeroGender::Female)
            && record.violence == Some(Answer::No)
            && record.mystical == Some(Answer::No)
            && record.romance_focus == Some(Answer::Yes)
            && age_ok
    }
}

/// Lower bound of an age estimate: `"18-25"` -> 18, `"22"` -> 22.
pub fn min_age(age: Option<&str>) -> Option<i64> {
    let age = age?;
    let head = match age.split_once('-') {
        Some((head, _)) => head,
        None => age,
    };
    head.trim().parse().ok()
}
