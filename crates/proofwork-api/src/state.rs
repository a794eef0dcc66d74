//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository traits, but AppState pins them to the
//! SQLite implementations.

use std::path::PathBuf;
use std::sync::Arc;

use proofwork_core::service::endorsement::ProofEndorsement;
use proofwork_core::service::kudos::KudosLedger;
use proofwork_core::service::profile::ProfileService;
use proofwork_core::service::skill::SkillCatalog;
use proofwork_core::service::submission::SubmissionLink;
use proofwork_core::service::vacancy::VacancyLifecycle;
use proofwork_infra::config::{load_global_config, resolve_data_dir};
use proofwork_infra::sqlite::api_key::SqliteApiKeyStore;
use proofwork_infra::sqlite::kudos::SqliteKudosRepository;
use proofwork_infra::sqlite::pool::{DatabasePool, database_url};
use proofwork_infra::sqlite::proof::SqliteProofRepository;
use proofwork_infra::sqlite::skill::SqliteSkillRepository;
use proofwork_infra::sqlite::sponsor::SqliteSponsorRepository;
use proofwork_infra::sqlite::submission::SqliteSubmissionRepository;
use proofwork_infra::sqlite::talent::SqliteTalentRepository;
use proofwork_infra::sqlite::vacancy::SqliteVacancyRepository;
use proofwork_types::config::GlobalConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteSkillCatalog = SkillCatalog<SqliteSkillRepository>;

pub type ConcreteKudosLedger = KudosLedger<
    SqliteKudosRepository,
    SqliteProofRepository,
    SqliteSponsorRepository,
    SqliteSkillRepository,
>;

pub type ConcreteProofEndorsement = ProofEndorsement<SqliteKudosRepository, SqliteProofRepository>;

pub type ConcreteVacancyLifecycle =
    VacancyLifecycle<SqliteVacancyRepository, SqliteSkillRepository, SqliteSponsorRepository>;

pub type ConcreteSubmissionLink =
    SubmissionLink<SqliteSubmissionRepository, SqliteVacancyRepository, SqliteTalentRepository>;

pub type ConcreteProfileService = ProfileService<
    SqliteSponsorRepository,
    SqliteTalentRepository,
    SqliteProofRepository,
    SqliteSkillRepository,
>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub skills: Arc<ConcreteSkillCatalog>,
    pub kudos_ledger: Arc<ConcreteKudosLedger>,
    pub endorsement: Arc<ConcreteProofEndorsement>,
    pub vacancies: Arc<ConcreteVacancyLifecycle>,
    pub submissions: Arc<ConcreteSubmissionLink>,
    pub profiles: Arc<ConcreteProfileService>,
    pub api_keys: Arc<SqliteApiKeyStore>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        let db_url = format!("{}?mode=rwc", database_url(&data_dir));
        let db_pool = DatabasePool::new(&db_url).await?;

        Ok(Self::wire(db_pool, config, data_dir))
    }

    /// Build every service over one pool.
    pub fn wire(db_pool: DatabasePool, config: GlobalConfig, data_dir: PathBuf) -> Self {
        let catalog = || SkillCatalog::new(SqliteSkillRepository::new(db_pool.clone()));

        let kudos_ledger = KudosLedger::new(
            SqliteKudosRepository::new(db_pool.clone()),
            SqliteProofRepository::new(db_pool.clone()),
            SqliteSponsorRepository::new(db_pool.clone()),
            catalog(),
            config.max_kudos_lines,
        );

        let endorsement = ProofEndorsement::new(
            SqliteKudosRepository::new(db_pool.clone()),
            SqliteProofRepository::new(db_pool.clone()),
        );

        let vacancies = VacancyLifecycle::new(
            SqliteVacancyRepository::new(db_pool.clone()),
            catalog(),
            SqliteSponsorRepository::new(db_pool.clone()),
            config.default_skills_matched_percent,
        );

        let submissions = SubmissionLink::new(
            SqliteSubmissionRepository::new(db_pool.clone()),
            SqliteVacancyRepository::new(db_pool.clone()),
            SqliteTalentRepository::new(db_pool.clone()),
        );

        let profiles = ProfileService::new(
            SqliteSponsorRepository::new(db_pool.clone()),
            SqliteTalentRepository::new(db_pool.clone()),
            SqliteProofRepository::new(db_pool.clone()),
            catalog(),
        );

        Self {
            skills: Arc::new(catalog()),
            kudos_ledger: Arc::new(kudos_ledger),
            endorsement: Arc::new(endorsement),
            vacancies: Arc::new(vacancies),
            submissions: Arc::new(submissions),
            profiles: Arc::new(profiles),
            api_keys: Arc::new(SqliteApiKeyStore::new(db_pool.clone())),
            config: Arc::new(config),
            data_dir,
        }
    }
}
