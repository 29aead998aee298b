use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq)]
pub enum ExerciseOutcome {
    /// No lesson is running.
    Ignored,
    /// Exercise was already recorded in this lesson.
    Duplicate,
    /// Recorded, but the lesson has no exercises to measure against.
    Recorded,
    Progressed { percent: f64 },
    /// Last exercise done; the caller marks the lesson complete.
    LessonComplete { lesson_id: String },
}

/// Exercise progress within the lesson currently on screen.
#[derive(Clone, Debug, Default)]
pub struct LessonTracker {
    lesson_id: Option<String>,
    completed: HashSet<String>,
    total_exercises: usize,
    progress: f64,
}

impl LessonTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or restart) a lesson. Any previous session is discarded.
    pub fn start_lesson(&mut self, lesson_id: &str, total_exercises: usize) {
        self.lesson_id = Some(lesson_id.to_string());
        self.completed.clear();
        self.total_exercises = total_exercises;
        self.progress = 0.0;
    }

    pub fn complete_exercise(&mut self, exercise_id: &str) -> ExerciseOutcome {
        let Some(lesson_id) = self.lesson_id.as_ref() else {
            return ExerciseOutcome::Ignored;
        };
        if !self.completed.insert(exercise_id.to_string()) {
            return ExerciseOutcome::Duplicate;
        }
        if self.total_exercises == 0 {
            return ExerciseOutcome::Recorded;
        }

        self.progress = self.completed.len() as f64 / self.total_exercises as f64 * 100.0;
        if self.completed.len() == self.total_exercises {
            ExerciseOutcome::LessonComplete {
                lesson_id: lesson_id.clone(),
            }
        } else {
            ExerciseOutcome::Progressed {
                percent: self.progress,
            }
        }
    }

    pub fn lesson_id(&self) -> Option<&str> {
        self.lesson_id.as_deref()
    }

    pub fn is_done(&self, exercise_id: &str) -> bool {
        self.completed.contains(exercise_id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn total_exercises(&self) -> usize {
        self.total_exercises
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn progress_rounded(&self) -> u8 {
        self.progress.round().clamp(0.0, 100.0) as u8
    }

    pub fn ratio(&self) -> f64 {
        self.progress / 100.0
    }
}
