use crate::{
    assets::source::ImageRef,
    foundation::error::{TemplatrError, TemplatrResult},
    geometry::placement::SavedLayout,
    render::pipeline::ComposablePair,
};

pub const MAX_FOLDER_QUESTIONS: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Exactly one question image.
    Standalone,
    /// Up to [`MAX_FOLDER_QUESTIONS`] question images, one record each.
    Folder,
}

impl TemplateKind {
    pub fn max_questions(self) -> usize {
        match self {
            TemplateKind::Standalone => 1,
            TemplateKind::Folder => MAX_FOLDER_QUESTIONS,
        }
    }
}

pub fn validate_question_count(kind: TemplateKind, count: usize) -> TemplatrResult<()> {
    if count == 0 {
        return Err(TemplatrError::validation(
            "at least one question image is required",
        ));
    }
    if count > kind.max_questions() {
        return Err(TemplatrError::validation(format!(
            "{kind:?} templates allow at most {} question image(s), got {count}",
            kind.max_questions()
        )));
    }
    Ok(())
}

/// Record names for `count` question images uploaded under `base`.
///
/// Folder uploads with several questions get `"<base> - Question <n>"` (1-based); everything
/// else reuses the trimmed base name.
pub fn template_names(base: &str, kind: TemplateKind, count: usize) -> TemplatrResult<Vec<String>> {
    let base = base.trim();
    if base.is_empty() {
        return Err(TemplatrError::validation("template name is required"));
    }
    validate_question_count(kind, count)?;

    let numbered = kind == TemplateKind::Folder && count > 1;
    Ok((1..=count)
        .map(|n| {
            if numbered {
                format!("{base} - Question {n}")
            } else {
                base.to_owned()
            }
        })
        .collect())
}

/// One template as consumed by deck export and the CLI.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TemplateRecord {
    pub name: String,
    #[serde(default)]
    pub background: Option<ImageRef>,
    #[serde(default)]
    pub question: Option<ImageRef>,
    /// Placement saved from the editor, if the user customized it.
    #[serde(default)]
    pub layout: Option<SavedLayout>,
}

impl TemplateRecord {
    /// One record per question image, named per [`template_names`].
    pub fn expand(
        base: &str,
        kind: TemplateKind,
        background: &ImageRef,
        questions: &[ImageRef],
    ) -> TemplatrResult<Vec<Self>> {
        let names = template_names(base, kind, questions.len())?;
        Ok(names
            .into_iter()
            .zip(questions)
            .map(|(name, question)| Self {
                name,
                background: Some(background.clone()),
                question: Some(question.clone()),
                layout: None,
            })
            .collect())
    }

    /// The full-resolution render job, available once the record has both images and a layout.
    pub fn composable_pair(&self) -> Option<ComposablePair> {
        match (&self.background, &self.question, &self.layout) {
            (Some(bg), Some(q), Some(layout)) => Some(ComposablePair::from_layout(
                bg.clone(),
                q.clone(),
                layout,
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/record.rs"]
mod tests;
