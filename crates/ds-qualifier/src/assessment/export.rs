use super::report::AssessmentResult;
use chrono::NaiveDateTime;
use std::fmt::Write;

/// Leading part of every exported file name.
pub const EXPORT_FILE_STEM: &str = "DS-Readiness-Assessment";

/// `DS-Readiness-Assessment-<YYYY-MM-DD-HHMMSS>.<extension>`
pub fn export_filename(generated_at: NaiveDateTime, extension: &str) -> String {
    format!(
        "{EXPORT_FILE_STEM}-{}.{extension}",
        generated_at.format("%Y-%m-%d-%H%M%S")
    )
}

/// Human readable assessment date, e.g. `March 4, 2026 at 9:05 AM`.
pub fn assessment_date(generated_at: NaiveDateTime) -> String {
    generated_at.format("%B %-d, %Y at %-I:%M %p").to_string()
}

/// Turns an [`AssessmentResult`] into a downloadable document.
pub trait DocumentRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;
    fn extension(&self) -> &'static str;
    fn render(
        &self,
        result: &AssessmentResult,
        generated_at: NaiveDateTime,
    ) -> Result<Vec<u8>, ExportError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

pub fn export_document<R>(
    renderer: &R,
    result: &AssessmentResult,
    generated_at: NaiveDateTime,
) -> Result<ExportDocument, ExportError>
where
    R: DocumentRenderer + ?Sized,
{
    let body = renderer.render(result, generated_at)?;
    Ok(ExportDocument {
        filename: export_filename(generated_at, renderer.extension()),
        content_type: renderer.content_type(),
        body,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to format document: {0}")]
    Format(#[from] std::fmt::Error),
    #[error("renderer failed: {0}")]
    Renderer(String),
}

/// Plain-text rendition of the exported report.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextRenderer;

impl DocumentRenderer for PlainTextRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(
        &self,
        result: &AssessmentResult,
        generated_at: NaiveDateTime,
    ) -> Result<Vec<u8>, ExportError> {
        let mut out = String::new();
        let date = assessment_date(generated_at);

        writeln!(out, "Digital Sovereignty Readiness Assessment Results")?;
        writeln!(out, "Assessment Date: {date}")?;
        writeln!(out)?;

        writeln!(out, "{} Maturity Level", result.maturity.label)?;
        writeln!(out, "{}%", result.composite_percentage)?;
        writeln!(
            out,
            "{:.1} of {} points (weighted)",
            result.composite_score, result.max_score
        )?;
        writeln!(
            out,
            "Raw score: {} points | Profile: {}",
            result.raw_total, result.profile.name
        )?;
        writeln!(out, "{}", result.maturity.description)?;
        writeln!(out)?;

        writeln!(out, "Domain Analysis")?;
        writeln!(
            out,
            "{:<26} {:>6} {:>6} {:>7}  Maturity Level",
            "Domain", "Score", "Pct", "Weight"
        )?;
        for domain in &result.domains {
            writeln!(
                out,
                "{:<26} {:>6} {:>5}% {:>6.1}x  {}",
                domain.domain,
                format!("{}/{}", domain.raw_score, domain.max_score),
                domain.percentage,
                domain.weight,
                domain.maturity_label
            )?;
        }
        writeln!(out)?;

        let actions = result.recommended_actions;
        writeln!(out, "Recommended Improvement Actions")?;
        writeln!(out, "{}", actions.heading)?;
        writeln!(out, "{}", actions.intro)?;
        for action in actions.actions {
            writeln!(out, "  - {}: {}", action.title, action.detail)?;
        }
        if let Some(list) = &actions.supporting {
            writeln!(out, "{}:", list.heading)?;
            for item in list.items {
                writeln!(out, "  - {item}")?;
            }
        }
        if let Some(note) = actions.note {
            writeln!(out, "Note: {note}")?;
        }

        if !result.unknown_questions.is_empty() {
            writeln!(out)?;
            writeln!(out, "Questions to Research")?;
            writeln!(
                out,
                "The following questions were marked as \"Don't Know\". Research these areas to get a complete picture of your organization's Digital Sovereignty readiness:"
            )?;
            for group in &result.unknown_questions {
                writeln!(out, "{}", group.domain)?;
                for question in &group.questions {
                    writeln!(out, "  * {}", question.text)?;
                    if let Some(tooltip) = &question.tooltip {
                        writeln!(out, "    {tooltip}")?;
                    }
                }
            }
        }

        writeln!(out)?;
        writeln!(out, "Generated by Digital Sovereignty Readiness Assessment")?;
        writeln!(out, "{date}")?;

        Ok(out.into_bytes())
    }
}
