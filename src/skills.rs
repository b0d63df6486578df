use crate::config::SkillConfig;

pub struct SkillRegistry {
  skills: Vec<SkillConfig>,
}

impl SkillRegistry {
  pub fn new(skills: Vec<SkillConfig>) -> Self {
    Self { skills }
  }

  /// Skills whose keywords appear in `prompt` as whole words, in registry order.
  pub fn detect(&self, prompt: &str) -> Vec<&SkillConfig> {
    let haystack = normalize(prompt);
    self
      .skills
      .iter()
      .filter(|skill| {
        skill
          .keywords
          .iter()
          .map(|k| normalize(k))
          .any(|k| !k.trim().is_empty() && haystack.contains(&k))
      })
      .collect()
  }
}

/// Lowercases and collapses everything that isn't alphanumeric into single
/// spaces, padded on both ends so phrase matching lands on word boundaries.
fn normalize(text: &str) -> String {
  let words: Vec<String> = text
    .split(|c: char| !c.is_alphanumeric())
    .filter(|w| !w.is_empty())
    .map(str::to_lowercase)
    .collect();
  format!(" {} ", words.join(" "))
}

/// Context files of the matched skills, de-duplicated, first occurrence wins.
pub fn context_files(skills: &[&SkillConfig]) -> Vec<String> {
  let mut files: Vec<String> = Vec::new();
  for file in skills.iter().flat_map(|s| s.context_files.iter()) {
    if !files.contains(file) {
      files.push(file.clone());
    }
  }
  files
}

pub fn additional_context(skills: &[&SkillConfig]) -> String {
  let lines: Vec<String> = skills
    .iter()
    .map(|s| match &s.hint {
      Some(hint) => format!("- {}: {hint}", s.name),
      None => format!("- {}", s.name),
    })
    .collect();
  format!("Relevant skills for this prompt:\n{}", lines.join("\n"))
}
