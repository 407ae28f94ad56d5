//! Resume and cover letter uploads.

use jobfill_protocols::{
    ControlFamily, DocumentBlob, Documents, ElementHandle, Field, FieldError, Page, RunError,
};
use tracing::{debug, warn};

use super::{Orchestrator, RunState, classification_error};
use crate::text::{contains_whole_word, normalize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Document {
    Resume,
    CoverLetter,
}

fn describes(field: &Field, word: &str) -> bool {
    let text = normalize(&format!("{} {}", field.label, field.context.as_deref().unwrap_or("")));
    contains_whole_word(&text, word)
}

fn is_cover_letter(field: &Field) -> bool {
    describes(field, "cover letter")
}

fn is_resume(field: &Field) -> bool {
    (describes(field, "resume") || describes(field, "cv")) && !is_cover_letter(field)
}

/// The resume control, falling back to the first unanswered non-cover-letter one.
fn resume_target(controls: &[Field]) -> Option<&Field> {
    controls.iter().find(|f| is_resume(f)).or_else(|| {
        controls
            .iter()
            .find(|f| !f.answered.is_answered() && !is_cover_letter(f))
    })
}

fn cover_letter_target<'a>(controls: &'a [Field], resume: Option<&ElementHandle>) -> Option<&'a Field> {
    controls
        .iter()
        .find(|f| is_cover_letter(f) && Some(&f.handle) != resume)
}

impl Orchestrator {
    pub(super) async fn attach_documents(
        &self,
        page: &dyn Page,
        documents: &Documents,
        run: &mut RunState,
    ) -> Result<(), RunError> {
        if documents.resume.is_none() && documents.cover_letter.is_none() {
            return Ok(());
        }
        let controls: Vec<Field> = self
            .classifier
            .scan_static(page)
            .await
            .map_err(classification_error)?
            .into_iter()
            .filter(|f| f.family == ControlFamily::File)
            .collect();
        if controls.is_empty() {
            debug!("No file controls on page");
            return Ok(());
        }

        let resume = resume_target(&controls);
        if let (Some(blob), Some(field)) = (&documents.resume, resume) {
            self.upload(page, field, blob, Document::Resume, run).await?;
        }
        if let Some(blob) = &documents.cover_letter {
            if let Some(field) = cover_letter_target(&controls, resume.map(|f| &f.handle)) {
                self.upload(page, field, blob, Document::CoverLetter, run).await?;
            }
        }
        Ok(())
    }

    async fn upload(
        &self,
        page: &dyn Page,
        field: &Field,
        blob: &DocumentBlob,
        document: Document,
        run: &mut RunState,
    ) -> Result<(), RunError> {
        let mark = |run: &mut RunState| match document {
            Document::Resume => run.outcome.uploaded.resume = true,
            Document::CoverLetter => run.outcome.uploaded.cover_letter = true,
        };

        if field.answered.is_answered() {
            mark(run);
            run.outcome.record_skipped(&field.label);
            return Ok(());
        }
        match self.injector.attach(page, field, blob).await {
            Ok(_) => {
                debug!("Attached {} to '{}'", blob.filename, field.label);
                mark(run);
                Ok(())
            }
            Err(FieldError::AlreadyAnswered) => {
                mark(run);
                run.outcome.record_skipped(&field.label);
                Ok(())
            }
            Err(FieldError::PageGone) => {
                run.outcome.record_failed(&field.label, FieldError::PageGone.to_string());
                Err(RunError::PageGone)
            }
            Err(e) => {
                warn!("Upload of {} failed: {}", blob.filename, e);
                run.outcome.record_failed(&field.label, e.to_string());
                Ok(())
            }
        }
    }
}
