/// Root plus an ordered run of suffixes, with an edit history kept in
/// lockstep: `history[i] == format!("+{}", suffixes[i])`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordBuffer {
    root: String,
    suffixes: Vec<String>,
    history: Vec<String>,
}

impl WordBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the root. Suffixes already attached stay.
    pub fn set_root(&mut self, root: &str) {
        self.root = root.to_string();
    }

    pub fn add_suffix(&mut self, suffix: &str) {
        self.suffixes.push(suffix.to_string());
        self.history.push(format!("+{suffix}"));
    }

    pub fn remove_last(&mut self) -> Option<String> {
        let suffix = self.suffixes.pop()?;
        self.history.pop();
        Some(suffix)
    }

    pub fn clear(&mut self) {
        self.root.clear();
        self.suffixes.clear();
        self.history.clear();
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn result(&self) -> String {
        let mut word = self.root.clone();
        for s in &self.suffixes {
            word.push_str(s);
        }
        word
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.suffixes.iter().all(|s| s.is_empty())
    }

    /// The composed word, or `placeholder` when there is nothing to show.
    pub fn display(&self, placeholder: &str) -> String {
        if self.is_empty() {
            placeholder.to_string()
        } else {
            self.result()
        }
    }

    pub fn history_line(&self) -> String {
        self.history.join(" ")
    }
}
