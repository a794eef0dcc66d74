//! Vacancy transition table.
//!
//! A transition is selected by the pair (current status, requested status).
//! Four pairs are legal; every other pair is rejected with
//! `IllegalLifecycleTransition`. Applying a transition is a pure function of
//! the stored vacancy, the requested edit, and the clock, so the service can
//! run it before touching storage.

use chrono::{DateTime, Utc};
use proofwork_types::error::VacancyError;
use proofwork_types::skill::SkillId;
use proofwork_types::vacancy::{Vacancy, VacancyStatus};

/// A legal vacancy transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// DRAFT -> DRAFT: replace title, content, and skills.
    Redraft,
    /// DRAFT -> PUBLISHED: replace fields, bind skills, stamp first publication.
    Publish,
    /// PUBLISHED -> HIDDEN: status only.
    Hide,
    /// HIDDEN -> PUBLISHED: status only, publication timestamp kept.
    Reopen,
}

impl Transition {
    /// Status the vacancy ends up in.
    pub fn target(&self) -> VacancyStatus {
        match self {
            Transition::Redraft => VacancyStatus::Draft,
            Transition::Publish | Transition::Reopen => VacancyStatus::Published,
            Transition::Hide => VacancyStatus::Hidden,
        }
    }

    /// Whether the transition replaces title, content, and the skill set.
    pub fn replaces_fields(&self) -> bool {
        matches!(self, Transition::Redraft | Transition::Publish)
    }
}

/// Look up the transition for a (current, requested) pair.
pub fn plan_transition(
    current: VacancyStatus,
    requested: VacancyStatus,
) -> Result<Transition, VacancyError> {
    use VacancyStatus::{Draft, Hidden, Published};

    match (current, requested) {
        (Draft, Draft) => Ok(Transition::Redraft),
        (Draft, Published) => Ok(Transition::Publish),
        (Published, Hidden) => Ok(Transition::Hide),
        (Hidden, Published) => Ok(Transition::Reopen),
        (from, to) => Err(VacancyError::IllegalLifecycleTransition { from, to }),
    }
}

/// Validate the status requested at creation time.
pub fn initial_status(requested: VacancyStatus) -> Result<VacancyStatus, VacancyError> {
    match requested {
        VacancyStatus::Draft | VacancyStatus::Published => Ok(requested),
        VacancyStatus::Hidden => Err(VacancyError::InvalidInitialState(requested)),
    }
}

/// Entering PUBLISHED with replaced fields requires a non-empty skill set.
pub fn check_publish_guard(
    target: VacancyStatus,
    skill_ids: &[SkillId],
) -> Result<(), VacancyError> {
    if target == VacancyStatus::Published && skill_ids.is_empty() {
        return Err(VacancyError::Validation(
            "a vacancy needs at least one skill to be published".to_string(),
        ));
    }
    Ok(())
}

/// Field values carried by a modification request.
#[derive(Debug, Clone)]
pub struct VacancyEdit {
    pub title: String,
    pub content: String,
    pub skill_ids: Vec<SkillId>,
}

/// Produce the next version of `vacancy` under `transition`.
///
/// `edit` is ignored by status-only transitions. The revision is bumped on
/// every transition.
pub fn apply_transition(
    vacancy: &Vacancy,
    transition: Transition,
    edit: VacancyEdit,
    now: DateTime<Utc>,
) -> Vacancy {
    let mut next = vacancy.clone();

    if transition.replaces_fields() {
        next.title = edit.title;
        next.content = edit.content;
        next.skill_ids = edit.skill_ids;
    }

    if transition == Transition::Publish && next.published_at.is_none() {
        next.published_at = Some(now);
    }

    next.status = transition.target();
    next.revision = vacancy.revision + 1;
    next.updated_at = now;
    next
}
