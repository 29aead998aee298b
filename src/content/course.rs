use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use rust_embed::Embed;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::engine::navigation::Route;

#[derive(Embed)]
#[folder = "assets/course/"]
struct CourseAssets;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("course file {0} not found")]
    Missing(String),
    #[error("course file {file} is not valid UTF-8")]
    Encoding { file: String },
    #[error("invalid course file {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
    #[error("quiz question '{question}' has no option '{answer}'")]
    UnknownAnswer { question: String, answer: String },
    #[error("unknown resource target '{0}'")]
    BadTarget(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub prompt: String,
    pub answer: String,
    #[serde(default)]
    pub hint: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, rename = "exercise")]
    pub exercises: Vec<Exercise>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuizOption {
    pub value: String,
    pub label: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub correct: String,
    #[serde(rename = "option")]
    pub options: Vec<QuizOption>,
}

/// A root or suffix, with the gloss shown as its tooltip.
#[derive(Clone, Debug, Deserialize)]
pub struct Morpheme {
    pub text: String,
    pub tooltip: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabKind {
    Word,
    Phrase,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VocabEntry {
    pub kind: VocabKind,
    pub quechua: String,
    pub spanish: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Resource {
    pub label: String,
    /// `None` marks a placeholder entry with nowhere to go yet.
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Deserialize)]
struct LessonsFile {
    #[serde(default, rename = "lesson")]
    lessons: Vec<Lesson>,
}

#[derive(Deserialize)]
struct QuizFile {
    #[serde(default, rename = "question")]
    questions: Vec<QuizQuestion>,
}

#[derive(Deserialize)]
struct MorphemesFile {
    #[serde(default, rename = "root")]
    roots: Vec<Morpheme>,
    #[serde(default, rename = "suffix")]
    suffixes: Vec<Morpheme>,
}

#[derive(Deserialize)]
struct VocabularyFile {
    #[serde(default, rename = "entry")]
    entries: Vec<VocabEntry>,
}

#[derive(Deserialize)]
struct ResourcesFile {
    #[serde(default, rename = "resource")]
    resources: Vec<Resource>,
}

#[derive(Clone, Debug, Default)]
pub struct Course {
    pub lessons: Vec<Lesson>,
    pub quiz: Vec<QuizQuestion>,
    pub roots: Vec<Morpheme>,
    pub suffixes: Vec<Morpheme>,
    pub vocabulary: Vec<VocabEntry>,
    pub resources: Vec<Resource>,
}

/// Bundled copy of a course file, `None` when it is not shipped.
fn embedded(name: &str) -> Result<Option<String>, ContentError> {
    match CourseAssets::get(name) {
        Some(file) => std::str::from_utf8(file.data.as_ref())
            .map(|s| Some(s.to_string()))
            .map_err(|_| ContentError::Encoding {
                file: name.to_string(),
            }),
        None => Ok(None),
    }
}

impl Course {
    /// Load the course, preferring files in the user's config dir over the
    /// bundled copies, one file at a time.
    pub fn load() -> Result<Self, ContentError> {
        let user_dir = Self::user_dir();
        Self::from_source(|name| {
            if let Some(ref dir) = user_dir {
                let path = dir.join(name);
                if let Ok(content) = fs::read_to_string(&path) {
                    info!(file = %path.display(), "using user course file");
                    return Ok(Some(content));
                }
            }
            embedded(name)
        })
    }

    pub fn bundled() -> Result<Self, ContentError> {
        Self::from_source(embedded)
    }

    pub fn from_source(
        mut read: impl FnMut(&str) -> Result<Option<String>, ContentError>,
    ) -> Result<Self, ContentError> {
        let lessons: LessonsFile = parse(&mut read, "lessons.toml")?;
        let quiz: QuizFile = parse(&mut read, "quiz.toml")?;
        let morphemes: MorphemesFile = parse(&mut read, "morphemes.toml")?;
        let vocabulary: VocabularyFile = parse(&mut read, "vocabulary.toml")?;
        let resources: ResourcesFile = parse(&mut read, "resources.toml")?;

        let course = Self {
            lessons: lessons.lessons,
            quiz: quiz.questions,
            roots: morphemes.roots,
            suffixes: morphemes.suffixes,
            vocabulary: vocabulary.entries,
            resources: resources.resources,
        };
        course.validate()?;
        debug!(
            lessons = course.lessons.len(),
            questions = course.quiz.len(),
            "course loaded"
        );
        Ok(course)
    }

    fn validate(&self) -> Result<(), ContentError> {
        unique("lesson", self.lessons.iter().map(|l| l.id.as_str()))?;
        for lesson in &self.lessons {
            unique("exercise", lesson.exercises.iter().map(|e| e.id.as_str()))?;
        }
        unique("question", self.quiz.iter().map(|q| q.id.as_str()))?;
        for q in &self.quiz {
            unique("option", q.options.iter().map(|o| o.value.as_str()))?;
            if !q.options.iter().any(|o| o.value == q.correct) {
                return Err(ContentError::UnknownAnswer {
                    question: q.id.clone(),
                    answer: q.correct.clone(),
                });
            }
        }
        for r in &self.resources {
            if let Some(ref target) = r.target
                && parse_target(target).is_none()
            {
                return Err(ContentError::BadTarget(target.clone()));
            }
        }
        Ok(())
    }

    fn user_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("runasimi").join("course"))
    }

    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    pub fn question(&self, id: &str) -> Option<&QuizQuestion> {
        self.quiz.iter().find(|q| q.id == id)
    }
}

fn parse<T: DeserializeOwned>(
    read: &mut impl FnMut(&str) -> Result<Option<String>, ContentError>,
    name: &str,
) -> Result<T, ContentError> {
    let content = read(name)?.ok_or_else(|| ContentError::Missing(name.to_string()))?;
    toml::from_str(&content).map_err(|source| ContentError::Parse {
        file: name.to_string(),
        source,
    })
}

fn unique<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ContentError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Resource targets: `home`, `quiz`, `word-builder`, `search`, `lesson:<id>`.
pub fn parse_target(target: &str) -> Option<Route> {
    match target {
        "home" => Some(Route::Home),
        "quiz" => Some(Route::Quiz),
        "word-builder" => Some(Route::WordBuilder),
        "search" => Some(Route::Search),
        _ => target
            .strip_prefix("lesson:")
            .filter(|id| !id.is_empty())
            .map(|id| Route::Lesson(id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_files(overrides: &[(&str, &str)]) -> Result<Course, ContentError> {
        let overrides: HashMap<&str, &str> = overrides.iter().copied().collect();
        Course::from_source(|name| {
            if let Some(content) = overrides.get(name) {
                return Ok(Some(content.to_string()));
            }
            Ok(CourseAssets::get(name)
                .and_then(|f| std::str::from_utf8(f.data.as_ref()).ok().map(str::to_string)))
        })
    }

    #[test]
    fn test_bundled_course_is_valid() {
        let course = Course::bundled().unwrap();
        assert!(!course.lessons.is_empty());
        assert!(!course.quiz.is_empty());
        assert!(!course.roots.is_empty());
        assert!(!course.suffixes.is_empty());
        assert_eq!(course.lesson("saludos").map(|l| l.exercises.len()), Some(3));
        assert_eq!(course.question("q1").map(|q| q.correct.as_str()), Some("b"));
    }

    #[test]
    fn test_embedded_reads_shipped_files_only() {
        assert!(embedded("lessons.toml").unwrap().is_some_and(|c| c.contains("saludos")));
        assert!(embedded("missing.toml").unwrap().is_none());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = Course::from_source(|_| Ok(None)).unwrap_err();
        assert!(matches!(err, ContentError::Missing(ref f) if f == "lessons.toml"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = with_files(&[("quiz.toml", "[[question]]\nid = 1")]).unwrap_err();
        assert!(err.to_string().contains("quiz.toml"));
    }

    #[test]
    fn test_duplicate_lesson_rejected() {
        let lessons = r#"
[[lesson]]
id = "a"
title = "A"

[[lesson]]
id = "a"
title = "B"
"#;
        let err = with_files(&[("lessons.toml", lessons)]).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateId { kind: "lesson", .. }));
    }

    #[test]
    fn test_quiz_answer_must_be_an_option() {
        let quiz = r#"
[[question]]
id = "q"
prompt = "?"
correct = "z"
option = [{ value = "a", label = "A" }]
"#;
        let err = with_files(&[("quiz.toml", quiz)]).unwrap_err();
        assert!(matches!(err, ContentError::UnknownAnswer { .. }));
    }

    #[test]
    fn test_bad_resource_target_rejected() {
        let resources = r#"resource = [{ label = "x", target = "nowhere" }]"#;
        let err = with_files(&[("resources.toml", resources)]).unwrap_err();
        assert!(matches!(err, ContentError::BadTarget(_)));
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("quiz"), Some(Route::Quiz));
        assert_eq!(parse_target("lesson:numeros"), Some(Route::Lesson("numeros".into())));
        assert_eq!(parse_target("lesson:"), None);
        assert_eq!(parse_target("#"), None);
    }
}
