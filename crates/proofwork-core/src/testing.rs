//! In-memory repository doubles shared by the service tests.
//!
//! One `InMemoryStore` implements every repository trait over a single
//! mutex-guarded state, so a ledger write and the reads that follow see the
//! same data the way a real database would.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use proofwork_types::error::RepositoryError;
use proofwork_types::kudos::{
    KudosHistoryEntry, KudosHistoryId, KudosHistoryItem, KudosReceipt, KudosedProof,
    KudosedProofOrder, SkillKudosHistoryEntry, SkillKudosTotal,
};
use proofwork_types::page::{Page, PageRequest};
use proofwork_types::proof::{Proof, ProofId, ProofStatus};
use proofwork_types::skill::{Skill, SkillId};
use proofwork_types::sponsor::{Sponsor, SponsorId};
use proofwork_types::submission::{Submission, SubmissionId};
use proofwork_types::talent::{Talent, TalentId};
use proofwork_types::vacancy::{Vacancy, VacancyId, VacancyStatus};

use crate::repository::kudos::{KudosPosting, KudosRepository, PostOutcome};
use crate::repository::proof::ProofRepository;
use crate::repository::skill::SkillRepository;
use crate::repository::sponsor::SponsorRepository;
use crate::repository::submission::SubmissionRepository;
use crate::repository::talent::TalentRepository;
use crate::repository::vacancy::VacancyRepository;

#[derive(Default)]
struct State {
    skills: Vec<Skill>,
    proofs: HashMap<ProofId, Proof>,
    sponsors: HashMap<SponsorId, Sponsor>,
    talents: HashMap<TalentId, Talent>,
    talent_skills: HashMap<TalentId, Vec<SkillId>>,
    skill_kudos: HashMap<(ProofId, SkillId), i64>,
    history: Vec<KudosHistoryEntry>,
    skill_history: Vec<SkillKudosHistoryEntry>,
    vacancies: HashMap<VacancyId, Vacancy>,
    submissions: Vec<Submission>,
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub(crate) fn seed_skill(&self, name: &str) -> Skill {
        let skill = Skill {
            id: SkillId::new(),
            name: name.to_string(),
        };
        self.lock().skills.push(skill.clone());
        skill
    }

    pub(crate) fn seed_sponsor(&self, kudos: i64) -> Sponsor {
        let sponsor = Sponsor {
            id: SponsorId::new(),
            fullname: "Ada Sponsor".to_string(),
            avatar: None,
            kudos,
            created_at: Utc::now(),
        };
        self.lock().sponsors.insert(sponsor.id, sponsor.clone());
        sponsor
    }

    pub(crate) fn seed_talent(&self, skills: &[SkillId]) -> Talent {
        let talent = Talent {
            id: TalentId::new(),
            fullname: "Tess Talent".to_string(),
            avatar: None,
            created_at: Utc::now(),
        };
        let mut state = self.lock();
        state.talents.insert(talent.id, talent.clone());
        state.talent_skills.insert(talent.id, skills.to_vec());
        talent
    }

    pub(crate) fn seed_proof(&self, status: ProofStatus) -> Proof {
        let now = Utc::now();
        let proof = Proof {
            id: ProofId::new(),
            talent_id: TalentId::new(),
            title: "Async ledger".to_string(),
            summary: "A ledger in Rust".to_string(),
            content: "Full write-up".to_string(),
            icon: Some("ledger.png".to_string()),
            status,
            published_at: (status == ProofStatus::Published).then_some(now),
            created_at: now,
            updated_at: now,
        };
        self.lock().proofs.insert(proof.id, proof.clone());
        proof
    }

    pub(crate) fn balance(&self, sponsor_id: &SponsorId) -> i64 {
        self.lock().sponsors[sponsor_id].kudos
    }

    pub(crate) fn history_len(&self) -> usize {
        self.lock().history.len()
    }

    pub(crate) fn skill_history_len(&self) -> usize {
        self.lock().skill_history.len()
    }

    pub(crate) fn skill_kudos_rows(&self, proof_id: &ProofId) -> usize {
        self.lock()
            .skill_kudos
            .keys()
            .filter(|(p, _)| p == proof_id)
            .count()
    }

    /// Overwrite a cache row directly, bypassing the ledger.
    pub(crate) fn corrupt_cache(&self, proof_id: ProofId, skill_id: SkillId, kudos: i64) {
        self.lock().skill_kudos.insert((proof_id, skill_id), kudos);
    }
}

fn paginate<T: Clone>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as i64;
    let slice = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.size as usize)
        .collect();
    Page::new(slice, page, total)
}

fn skill_name(state: &State, id: &SkillId) -> String {
    state
        .skills
        .iter()
        .find(|s| &s.id == id)
        .map(|s| s.name.clone())
        .unwrap_or_default()
}

fn sorted_totals(state: &State, totals: HashMap<SkillId, i64>) -> Vec<SkillKudosTotal> {
    let mut rows: Vec<SkillKudosTotal> = totals
        .into_iter()
        .map(|(skill_id, kudos)| SkillKudosTotal {
            skill_id,
            skill_name: skill_name(state, &skill_id),
            kudos,
        })
        .collect();
    rows.sort_by(|a, b| b.kudos.cmp(&a.kudos).then(a.skill_name.cmp(&b.skill_name)));
    rows
}

impl SkillRepository for InMemoryStore {
    async fn create(&self, skill: &Skill) -> Result<Skill, RepositoryError> {
        let mut state = self.lock();
        if state
            .skills
            .iter()
            .any(|s| s.name.eq_ignore_ascii_case(&skill.name))
        {
            return Err(RepositoryError::Conflict(format!(
                "skill '{}' already exists",
                skill.name
            )));
        }
        state.skills.push(skill.clone());
        Ok(skill.clone())
    }

    async fn get_by_id(&self, id: &SkillId) -> Result<Option<Skill>, RepositoryError> {
        Ok(self.lock().skills.iter().find(|s| &s.id == id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Skill>, RepositoryError> {
        Ok(self
            .lock()
            .skills
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[SkillId]) -> Result<Vec<Skill>, RepositoryError> {
        Ok(self
            .lock()
            .skills
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Skill>, RepositoryError> {
        let mut skills = self.lock().skills.clone();
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }
}

impl ProofRepository for InMemoryStore {
    async fn create(&self, proof: &Proof) -> Result<Proof, RepositoryError> {
        self.lock().proofs.insert(proof.id, proof.clone());
        Ok(proof.clone())
    }

    async fn get_by_id(&self, id: &ProofId) -> Result<Option<Proof>, RepositoryError> {
        Ok(self.lock().proofs.get(id).cloned())
    }

    async fn update(&self, proof: &Proof) -> Result<Proof, RepositoryError> {
        let mut state = self.lock();
        match state.proofs.get_mut(&proof.id) {
            Some(slot) => {
                *slot = proof.clone();
                Ok(proof.clone())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

impl SponsorRepository for InMemoryStore {
    async fn create(&self, sponsor: &Sponsor) -> Result<Sponsor, RepositoryError> {
        self.lock().sponsors.insert(sponsor.id, sponsor.clone());
        Ok(sponsor.clone())
    }

    async fn get_by_id(&self, id: &SponsorId) -> Result<Option<Sponsor>, RepositoryError> {
        Ok(self.lock().sponsors.get(id).cloned())
    }

    async fn increase_kudos(&self, id: &SponsorId, amount: i64) -> Result<i64, RepositoryError> {
        let mut state = self.lock();
        let sponsor = state.sponsors.get_mut(id).ok_or(RepositoryError::NotFound)?;
        sponsor.kudos += amount;
        Ok(sponsor.kudos)
    }
}

impl TalentRepository for InMemoryStore {
    async fn create(&self, talent: &Talent) -> Result<Talent, RepositoryError> {
        self.lock().talents.insert(talent.id, talent.clone());
        Ok(talent.clone())
    }

    async fn get_by_id(&self, id: &TalentId) -> Result<Option<Talent>, RepositoryError> {
        Ok(self.lock().talents.get(id).cloned())
    }

    async fn set_skills(&self, id: &TalentId, skill_ids: &[SkillId]) -> Result<(), RepositoryError> {
        self.lock().talent_skills.insert(*id, skill_ids.to_vec());
        Ok(())
    }

    async fn skill_ids(&self, id: &TalentId) -> Result<Vec<SkillId>, RepositoryError> {
        Ok(self.lock().talent_skills.get(id).cloned().unwrap_or_default())
    }
}

impl KudosRepository for InMemoryStore {
    async fn post(&self, posting: &KudosPosting) -> Result<PostOutcome, RepositoryError> {
        let mut state = self.lock();

        let balance = state
            .sponsors
            .get(&posting.sponsor_id)
            .ok_or(RepositoryError::NotFound)?
            .kudos;
        if balance < posting.total {
            return Ok(PostOutcome::InsufficientBalance { balance });
        }

        if let Some(sponsor) = state.sponsors.get_mut(&posting.sponsor_id) {
            sponsor.kudos -= posting.total;
        }
        state.history.push(KudosHistoryEntry {
            id: posting.history_id,
            sponsor_id: posting.sponsor_id,
            proof_id: posting.proof_id,
            kudos: posting.total,
            sent_at: posting.sent_at,
        });
        for line in &posting.lines {
            state.skill_history.push(SkillKudosHistoryEntry {
                history_id: posting.history_id,
                skill_id: line.skill_id,
                kudos: line.amount,
            });
            *state
                .skill_kudos
                .entry((posting.proof_id, line.skill_id))
                .or_insert(0) += line.amount;
        }

        let current_count_kudos = state
            .skill_kudos
            .iter()
            .filter(|((p, _), _)| p == &posting.proof_id)
            .map(|(_, v)| *v)
            .sum();
        let current_sum_kudos_by_sponsor = state
            .history
            .iter()
            .filter(|h| h.sponsor_id == posting.sponsor_id && h.proof_id == posting.proof_id)
            .map(|h| h.kudos)
            .sum();

        Ok(PostOutcome::Accepted(KudosReceipt {
            current_count_kudos,
            current_sum_kudos_by_sponsor,
            current_sponsor_balance: balance - posting.total,
        }))
    }

    async fn has_endorsed(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .lock()
            .history
            .iter()
            .any(|h| &h.sponsor_id == sponsor_id && &h.proof_id == proof_id))
    }

    async fn cached_total(&self, proof_id: &ProofId) -> Result<i64, RepositoryError> {
        Ok(self
            .lock()
            .skill_kudos
            .iter()
            .filter(|((p, _), _)| p == proof_id)
            .map(|(_, v)| *v)
            .sum())
    }

    async fn ledger_total(&self, proof_id: &ProofId) -> Result<i64, RepositoryError> {
        let state = self.lock();
        let ids: Vec<KudosHistoryId> = state
            .history
            .iter()
            .filter(|h| &h.proof_id == proof_id)
            .map(|h| h.id)
            .collect();
        Ok(state
            .skill_history
            .iter()
            .filter(|s| ids.contains(&s.history_id))
            .map(|s| s.kudos)
            .sum())
    }

    async fn skill_totals(&self, proof_id: &ProofId) -> Result<Vec<SkillKudosTotal>, RepositoryError> {
        let state = self.lock();
        let totals = state
            .skill_kudos
            .iter()
            .filter(|((p, _), _)| p == proof_id)
            .map(|((_, s), v)| (*s, *v))
            .collect();
        Ok(sorted_totals(&state, totals))
    }

    async fn sponsor_skill_breakdown(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> Result<Vec<SkillKudosTotal>, RepositoryError> {
        let state = self.lock();
        let ids: Vec<KudosHistoryId> = state
            .history
            .iter()
            .filter(|h| &h.sponsor_id == sponsor_id && &h.proof_id == proof_id)
            .map(|h| h.id)
            .collect();
        let mut totals: HashMap<SkillId, i64> = HashMap::new();
        for row in state.skill_history.iter().filter(|s| ids.contains(&s.history_id)) {
            *totals.entry(row.skill_id).or_insert(0) += row.kudos;
        }
        Ok(sorted_totals(&state, totals))
    }

    async fn sponsor_total(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> Result<i64, RepositoryError> {
        Ok(self
            .lock()
            .history
            .iter()
            .filter(|h| &h.sponsor_id == sponsor_id && &h.proof_id == proof_id)
            .map(|h| h.kudos)
            .sum())
    }

    async fn history(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
        page: PageRequest,
    ) -> Result<Page<KudosHistoryItem>, RepositoryError> {
        let state = self.lock();
        let mut rows: Vec<&KudosHistoryEntry> = state
            .history
            .iter()
            .filter(|h| &h.sponsor_id == sponsor_id && &h.proof_id == proof_id)
            .collect();
        rows.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
        let items = rows
            .into_iter()
            .map(|h| KudosHistoryItem {
                sent_at: h.sent_at,
                kudos: h.kudos,
            })
            .collect();
        Ok(paginate(items, page))
    }

    async fn kudosed_proofs(
        &self,
        sponsor_id: &SponsorId,
        order: KudosedProofOrder,
        page: PageRequest,
    ) -> Result<Page<KudosedProof>, RepositoryError> {
        let state = self.lock();
        let mut by_proof: HashMap<ProofId, KudosedProof> = HashMap::new();
        for h in state.history.iter().filter(|h| &h.sponsor_id == sponsor_id) {
            let Some(proof) = state.proofs.get(&h.proof_id) else {
                continue;
            };
            let entry = by_proof.entry(h.proof_id).or_insert_with(|| KudosedProof {
                proof_id: proof.id,
                icon: proof.icon.clone(),
                title: proof.title.clone(),
                sent_at: h.sent_at,
                total_kudos_from_sponsor: 0,
            });
            entry.total_kudos_from_sponsor += h.kudos;
            if h.sent_at > entry.sent_at {
                entry.sent_at = h.sent_at;
            }
        }
        let mut items: Vec<KudosedProof> = by_proof.into_values().collect();
        match order {
            KudosedProofOrder::Newest => items.sort_by(|a, b| b.sent_at.cmp(&a.sent_at)),
            KudosedProofOrder::TotalKudos => items.sort_by(|a, b| {
                b.total_kudos_from_sponsor
                    .cmp(&a.total_kudos_from_sponsor)
                    .then(b.sent_at.cmp(&a.sent_at))
            }),
        }
        Ok(paginate(items, page))
    }

    async fn entries(
        &self,
        sponsor_id: &SponsorId,
        proof_id: &ProofId,
    ) -> Result<Vec<KudosHistoryEntry>, RepositoryError> {
        Ok(self
            .lock()
            .history
            .iter()
            .filter(|h| &h.sponsor_id == sponsor_id && &h.proof_id == proof_id)
            .cloned()
            .collect())
    }

    async fn skill_entries(
        &self,
        history_id: &KudosHistoryId,
    ) -> Result<Vec<SkillKudosHistoryEntry>, RepositoryError> {
        Ok(self
            .lock()
            .skill_history
            .iter()
            .filter(|s| &s.history_id == history_id)
            .cloned()
            .collect())
    }
}

impl VacancyRepository for InMemoryStore {
    async fn create(&self, vacancy: &Vacancy) -> Result<Vacancy, RepositoryError> {
        self.lock().vacancies.insert(vacancy.id, vacancy.clone());
        Ok(vacancy.clone())
    }

    async fn get_by_id(&self, id: &VacancyId) -> Result<Option<Vacancy>, RepositoryError> {
        Ok(self.lock().vacancies.get(id).cloned())
    }

    async fn update(
        &self,
        vacancy: &Vacancy,
        expected_revision: i64,
        replace_skills: bool,
    ) -> Result<Vacancy, RepositoryError> {
        let mut state = self.lock();
        let stored = state
            .vacancies
            .get_mut(&vacancy.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.revision != expected_revision {
            return Err(RepositoryError::Conflict(format!(
                "vacancy {} is at revision {}, expected {expected_revision}",
                vacancy.id, stored.revision
            )));
        }
        let skill_ids = if replace_skills {
            vacancy.skill_ids.clone()
        } else {
            stored.skill_ids.clone()
        };
        *stored = Vacancy {
            skill_ids,
            ..vacancy.clone()
        };
        Ok(stored.clone())
    }

    async fn list_by_sponsor(
        &self,
        sponsor_id: &SponsorId,
        page: PageRequest,
    ) -> Result<Page<Vacancy>, RepositoryError> {
        let mut items: Vec<Vacancy> = self
            .lock()
            .vacancies
            .values()
            .filter(|v| &v.sponsor_id == sponsor_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(items, page))
    }

    async fn list_by_status(
        &self,
        status: VacancyStatus,
        page: PageRequest,
    ) -> Result<Page<Vacancy>, RepositoryError> {
        let mut items: Vec<Vacancy> = self
            .lock()
            .vacancies
            .values()
            .filter(|v| v.status == status)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(paginate(items, page))
    }
}

impl SubmissionRepository for InMemoryStore {
    async fn create(&self, submission: &Submission) -> Result<Submission, RepositoryError> {
        self.lock().submissions.push(submission.clone());
        Ok(submission.clone())
    }

    async fn get_by_id(&self, id: &SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        Ok(self.lock().submissions.iter().find(|s| &s.id == id).cloned())
    }

    async fn list_for_vacancy(
        &self,
        vacancy_id: &VacancyId,
        page: PageRequest,
    ) -> Result<Page<Submission>, RepositoryError> {
        let mut items: Vec<Submission> = self
            .lock()
            .submissions
            .iter()
            .filter(|s| &s.vacancy_id == vacancy_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        Ok(paginate(items, page))
    }

    async fn list_for_talent(
        &self,
        talent_id: &TalentId,
        page: PageRequest,
    ) -> Result<Page<Submission>, RepositoryError> {
        let mut items: Vec<Submission> = self
            .lock()
            .submissions
            .iter()
            .filter(|s| &s.talent_id == talent_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        Ok(paginate(items, page))
    }
}
