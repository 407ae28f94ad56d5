//! Radio groups and checkboxes: a user-level click on the matching member.

use jobfill_protocols::{ControlState, Field, FieldError, Page};

use super::{Committed, Injector};
use crate::resolver::AnswerCandidate;
use crate::resolver::candidates::is_affirmative;

pub(super) async fn commit(
    injector: &Injector,
    page: &dyn Page,
    field: &Field,
    live: ControlState,
    candidates: &AnswerCandidate,
) -> Result<Committed, FieldError> {
    let ControlState::Toggle { members } = live else {
        return Err(FieldError::NotCommitted("not a toggle group".to_string()));
    };
    let labels: Vec<String> = members.iter().map(|m| m.label.clone()).collect();

    let index = if members.len() == 1 {
        let agrees = candidates.iter().any(is_affirmative)
            || injector.resolver.best_match(&labels, candidates).is_some();
        if !agrees {
            return Err(FieldError::NoMatch);
        }
        0
    } else {
        injector
            .resolver
            .best_match(&labels, candidates)
            .ok_or(FieldError::NoMatch)?
            .option_index
    };

    let member = &members[index];
    page.user_click(&member.handle).await?;

    match page.control_state(&field.handle).await? {
        ControlState::Toggle { members } if members.get(index).is_some_and(|m| m.checked) => {
            Ok(Committed {
                value: member.label.clone(),
            })
        }
        _ => Err(FieldError::NotCommitted(format!("'{}' did not become checked", member.label))),
    }
}
