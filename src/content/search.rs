use crate::content::course::{Course, VocabKind};
use crate::content::spelling::fold;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    Word,
    Phrase,
    Lesson,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub kind: HitKind,
    /// Quechua form, or the lesson title for lesson hits.
    pub title: String,
    pub detail: String,
    pub lesson_id: Option<String>,
}

/// Anything that can answer a free-text query.
pub trait Lookup {
    fn search(&self, query: &str) -> Vec<SearchHit>;
}

struct Indexed {
    keys: Vec<String>,
    hit: SearchHit,
}

/// In-memory index over the vocabulary and lesson titles of a course.
pub struct CourseIndex {
    entries: Vec<Indexed>,
}

impl CourseIndex {
    pub fn from_course(course: &Course) -> Self {
        let mut entries = Vec::new();
        for v in &course.vocabulary {
            entries.push(Indexed {
                keys: vec![fold(&v.quechua), fold(&v.spanish)],
                hit: SearchHit {
                    kind: match v.kind {
                        VocabKind::Word => HitKind::Word,
                        VocabKind::Phrase => HitKind::Phrase,
                    },
                    title: v.quechua.clone(),
                    detail: v.spanish.clone(),
                    lesson_id: None,
                },
            });
        }
        for l in &course.lessons {
            entries.push(Indexed {
                keys: vec![fold(&l.title), fold(&l.summary)],
                hit: SearchHit {
                    kind: HitKind::Lesson,
                    title: l.title.clone(),
                    detail: l.summary.clone(),
                    lesson_id: Some(l.id.clone()),
                },
            });
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lookup for CourseIndex {
    fn search(&self, query: &str) -> Vec<SearchHit> {
        let needle = fold(query);
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| e.keys.iter().any(|k| k.contains(&needle)))
            .map(|e| e.hit.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> CourseIndex {
        CourseIndex::from_course(&Course::bundled().unwrap())
    }

    #[test]
    fn test_matches_quechua_and_spanish() {
        let idx = index();
        let by_quechua = idx.search("muna");
        assert!(by_quechua.iter().any(|h| h.title == "munay" && h.kind == HitKind::Word));
        assert!(by_quechua.iter().any(|h| h.title == "munakuyki" && h.kind == HitKind::Phrase));

        let by_spanish = idx.search("te quiero");
        assert_eq!(by_spanish.len(), 1);
        assert_eq!(by_spanish[0].title, "munakuyki");
    }

    #[test]
    fn test_case_and_spelling_insensitive() {
        let idx = index();
        assert!(idx.search("CIMSA").iter().any(|h| h.title == "kimsa"));
    }

    #[test]
    fn test_lessons_are_searchable() {
        let hits = index().search("sufijos");
        let lesson = hits.iter().find(|h| h.kind == HitKind::Lesson).unwrap();
        assert_eq!(lesson.lesson_id.as_deref(), Some("sufijos"));
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let idx = index();
        assert!(idx.search("   ").is_empty());
        assert!(idx.search("zzzz").is_empty());
        assert!(!idx.is_empty());
    }
}
