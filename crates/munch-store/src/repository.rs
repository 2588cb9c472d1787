use crate::adapter::{DecisionStore, HistoryQuery};
use crate::error::StoreError;
use crate::lockfile::Lockfile;
use crate::memory::DECISION_TAG;
use crate::query;
use chrono::{DateTime, Utc};
use munch_core::model::{
    normalize_refs, Ballot, Collection, CollectionId, Decision, DecisionDraft, DecisionResult,
    DecisionStatus, Group, GroupId, Restaurant, RestaurantId, RestaurantRef, UserId,
};
use munch_core::serialize::salted_id;
use munch_core::hash::MIN_PREFIX_LEN;
use munch_core::{DecisionId, EngineConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MUNCH_DIR: &str = ".munch";
const LOCK_ATTEMPTS: u32 = 200;
const LOCK_PAUSE: Duration = Duration::from_millis(5);

/// Contents of `.munch/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositoryConfig {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// File-backed store rooted at a `.munch/` directory.
///
/// Layout:
/// - `config.json`
/// - `collections/<id>.json`, `restaurants/<id>.json`, `groups/<id>.json`
/// - `decisions/<2-char fan-out>/<remaining 62 chars>.json`
/// - `ballots/<decision hex>/<hex-encoded user id>.json`
///
/// Ballots live in one file per voter so a submission never rewrites
/// anyone else's ballot. Status transitions and ballot writes hold the
/// decision's lock file for their read-check-write.
pub struct Repository {
    root: PathBuf,
    munch_dir: PathBuf,
}

impl Repository {
    /// Initialize a new repository at `path`.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        let munch_dir = root.join(MUNCH_DIR);

        if munch_dir.exists() {
            return Err(StoreError::RepositoryExists(
                munch_dir.display().to_string(),
            ));
        }

        for sub in ["collections", "restaurants", "groups", "decisions", "ballots"] {
            fs::create_dir_all(munch_dir.join(sub))?;
        }

        let repo = Self { root, munch_dir };
        repo.write_config(&RepositoryConfig {
            version: 1,
            created_at: Utc::now(),
            log_level: default_log_level(),
            engine: EngineConfig::default(),
        })?;
        Ok(repo)
    }

    /// Open an existing repository at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        let munch_dir = root.join(MUNCH_DIR);

        if !munch_dir.exists() {
            return Err(StoreError::RepositoryNotFound(root.display().to_string()));
        }

        Ok(Self { root, munch_dir })
    }

    /// Search upward from `start` for a `.munch/` directory.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut current = start.as_ref().to_path_buf();
        loop {
            if current.join(MUNCH_DIR).exists() {
                return Self::open(&current);
            }
            if !current.pop() {
                return Err(StoreError::RepositoryNotFound(
                    start.as_ref().display().to_string(),
                ));
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> Result<RepositoryConfig, StoreError> {
        read_json(&self.munch_dir.join("config.json"))?
            .ok_or_else(|| StoreError::RepositoryNotFound(self.root.display().to_string()))
    }

    pub fn write_config(&self, config: &RepositoryConfig) -> Result<(), StoreError> {
        write_json_atomic(&self.munch_dir.join("config.json"), config)
    }

    // --- collections, restaurants, groups ---

    fn named_path(&self, dir: &str, kind: &'static str, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(kind, name)?;
        Ok(self.munch_dir.join(dir).join(format!("{name}.json")))
    }

    pub fn put_collection(&self, collection: &Collection) -> Result<(), StoreError> {
        let path = self.named_path("collections", "collection", collection.id.as_str())?;
        write_json_atomic(&path, collection)
    }

    /// Append a member reference under the collection's lock.
    pub fn add_to_collection(
        &self,
        id: &CollectionId,
        reference: RestaurantRef,
    ) -> Result<Collection, StoreError> {
        let path = self.named_path("collections", "collection", id.as_str())?;
        let mut lock = Lockfile::acquire_with_retry(&path, LOCK_ATTEMPTS, LOCK_PAUSE)?;
        let mut collection: Collection = read_json(&path)?
            .ok_or_else(|| StoreError::CollectionNotFound(id.to_string()))?;
        if !collection.restaurants.contains(&reference) {
            collection.restaurants.push(reference);
        }
        lock.write_all(serde_json::to_string_pretty(&collection)?.as_bytes())?;
        lock.commit()?;
        Ok(collection)
    }

    pub fn put_restaurant(&self, restaurant: &Restaurant) -> Result<(), StoreError> {
        let path = self.named_path("restaurants", "restaurant", restaurant.id.as_str())?;
        write_json_atomic(&path, restaurant)
    }

    pub fn get_restaurant(&self, id: &RestaurantId) -> Result<Option<Restaurant>, StoreError> {
        read_json(&self.named_path("restaurants", "restaurant", id.as_str())?)
    }

    pub fn list_restaurants(&self) -> Result<Vec<Restaurant>, StoreError> {
        list_json(&self.munch_dir.join("restaurants"))
    }

    pub fn put_group(&self, group: &Group) -> Result<(), StoreError> {
        let path = self.named_path("groups", "group", group.id.as_str())?;
        write_json_atomic(&path, group)
    }

    // --- decisions ---

    fn decision_path(&self, id: &DecisionId) -> PathBuf {
        let (dir, file) = id.fan_out();
        self.munch_dir
            .join("decisions")
            .join(dir)
            .join(format!("{file}.json"))
    }

    fn ballot_dir(&self, id: &DecisionId) -> PathBuf {
        self.munch_dir.join("ballots").join(id.hex())
    }

    fn ballot_path(&self, id: &DecisionId, user: &UserId) -> PathBuf {
        self.ballot_dir(id)
            .join(format!("{}.json", hex::encode(user.as_str())))
    }

    /// Read the stored record without its ballots.
    fn read_record(&self, id: &DecisionId) -> Result<Option<Decision>, StoreError> {
        let Some(decision) = read_json::<Decision>(&self.decision_path(id))? else {
            return Ok(None);
        };
        if &decision.id != id {
            return Err(StoreError::IntegrityError {
                expected: id.hex().to_string(),
                actual: decision.id.hex().to_string(),
            });
        }
        Ok(Some(decision))
    }

    fn read_ballots(&self, id: &DecisionId) -> Result<Vec<Ballot>, StoreError> {
        let mut ballots: Vec<Ballot> = list_json(&self.ballot_dir(id))?;
        ballots.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(ballots)
    }

    fn load_decision(&self, id: &DecisionId) -> Result<Option<Decision>, StoreError> {
        let Some(mut decision) = self.read_record(id)? else {
            return Ok(None);
        };
        decision.ballots = self.read_ballots(id)?;
        Ok(Some(decision))
    }

    /// Every stored decision, ballots included. Unreadable records are skipped.
    pub fn iter_decisions(&self) -> Result<Vec<Decision>, StoreError> {
        let mut results = Vec::new();
        let decisions_dir = self.munch_dir.join("decisions");
        let entries = match fs::read_dir(&decisions_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(results),
            Err(e) => return Err(StoreError::Io(e)),
        };
        for fan_entry in entries {
            let fan_entry = fan_entry?;
            let fan_name = fan_entry.file_name().to_string_lossy().to_string();
            if fan_name.len() != 2 || !fan_entry.path().is_dir() {
                continue;
            }
            for entry in fs::read_dir(fan_entry.path())? {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().to_string();
                let Some(rest) = name.strip_suffix(".json") else {
                    continue;
                };
                let Ok(id) = DecisionId::parse(&format!("{fan_name}{rest}")) else {
                    continue;
                };
                match self.load_decision(&id) {
                    Ok(Some(decision)) => results.push(decision),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(decision = %id, error = %e, "skipping unreadable decision")
                    }
                }
            }
        }
        Ok(results)
    }

    /// Resolve a full id or a unique prefix of at least 4 hex chars.
    pub fn resolve_decision(&self, prefix: &str) -> Result<DecisionId, StoreError> {
        if let Ok(id) = DecisionId::parse(prefix) {
            return Ok(id);
        }
        let trimmed = prefix.trim();
        if trimmed.len() < MIN_PREFIX_LEN {
            return Err(StoreError::AmbiguousPrefix {
                prefix: trimmed.to_string(),
                count: 0,
            });
        }
        let Some(prefix) = DecisionId::normalize_prefix(trimmed) else {
            return Err(StoreError::DecisionNotFound(trimmed.to_string()));
        };
        let mut matches: Vec<DecisionId> = self
            .iter_decisions()?
            .into_iter()
            .map(|d| d.id)
            .filter(|id| id.matches_prefix(&prefix))
            .collect();
        match matches.len() {
            0 => Err(StoreError::DecisionNotFound(prefix)),
            1 => Ok(matches.swap_remove(0)),
            count => Err(StoreError::AmbiguousPrefix { prefix, count }),
        }
    }

    /// Read-check-write under the decision's lock.
    fn transition<F>(&self, id: &DecisionId, apply: F) -> Result<Decision, StoreError>
    where
        F: FnOnce(&mut Decision),
    {
        let path = self.decision_path(id);
        let mut lock = Lockfile::acquire_with_retry(&path, LOCK_ATTEMPTS, LOCK_PAUSE)?;
        let mut decision = self
            .read_record(id)?
            .ok_or_else(|| StoreError::DecisionNotFound(id.hex().to_string()))?;
        if decision.status != DecisionStatus::Active {
            return Err(StoreError::PreconditionFailed(format!(
                "decision {} is {}",
                id.short(),
                decision.status
            )));
        }
        apply(&mut decision);
        lock.write_all(serde_json::to_string_pretty(&decision)?.as_bytes())?;
        lock.commit()?;
        decision.ballots = self.read_ballots(id)?;
        Ok(decision)
    }
}

impl DecisionStore for Repository {
    fn get_collection(&self, id: &CollectionId) -> Result<Option<Collection>, StoreError> {
        read_json(&self.named_path("collections", "collection", id.as_str())?)
    }

    fn get_restaurants_in_collection(
        &self,
        id: &CollectionId,
    ) -> Result<Vec<RestaurantId>, StoreError> {
        let collection = self
            .get_collection(id)?
            .ok_or_else(|| StoreError::CollectionNotFound(id.to_string()))?;
        let needs_registry = collection
            .restaurants
            .iter()
            .any(|r| matches!(r, RestaurantRef::External { .. }));
        let registry = if needs_registry {
            self.list_restaurants()?
        } else {
            Vec::new()
        };
        Ok(normalize_refs(&collection.restaurants, |external_id| {
            registry
                .iter()
                .find(|r| r.external_id.as_deref() == Some(external_id))
                .map(|r| r.id.clone())
        }))
    }

    fn get_recent_completed_decisions(
        &self,
        query: &HistoryQuery,
    ) -> Result<Vec<Decision>, StoreError> {
        Ok(query::recent_completed(self.iter_decisions()?, query))
    }

    fn create_decision(&self, draft: DecisionDraft) -> Result<Decision, StoreError> {
        loop {
            let id = salted_id(DECISION_TAG, &draft, rand::random())?;
            let path = self.decision_path(&id);
            if path.exists() {
                continue;
            }
            let mut lock = Lockfile::acquire(&path)?;
            let decision = draft.into_decision(id);
            lock.write_all(serde_json::to_string_pretty(&decision)?.as_bytes())?;
            lock.commit()?;
            return Ok(decision);
        }
    }

    fn finalize_decision(
        &self,
        id: &DecisionId,
        result: DecisionResult,
    ) -> Result<Decision, StoreError> {
        self.transition(id, |d| {
            d.updated_at = d.updated_at.max(result.selected_at);
            d.status = DecisionStatus::Completed;
            d.result = Some(result);
        })
    }

    fn expire_decision(&self, id: &DecisionId, at: DateTime<Utc>) -> Result<Decision, StoreError> {
        self.transition(id, |d| {
            d.updated_at = d.updated_at.max(at);
            d.status = DecisionStatus::Expired;
        })
    }

    fn upsert_ballot(&self, id: &DecisionId, ballot: Ballot) -> Result<(), StoreError> {
        let lock = Lockfile::acquire_with_retry(self.decision_path(id), LOCK_ATTEMPTS, LOCK_PAUSE)?;
        let decision = self
            .read_record(id)?
            .ok_or_else(|| StoreError::DecisionNotFound(id.hex().to_string()))?;
        if decision.status != DecisionStatus::Active {
            return Err(StoreError::PreconditionFailed(format!(
                "decision {} is {}",
                id.short(),
                decision.status
            )));
        }
        write_json_atomic(&self.ballot_path(id, &ballot.user_id), &ballot)?;
        lock.release();
        Ok(())
    }

    fn get_decision(&self, id: &DecisionId) -> Result<Option<Decision>, StoreError> {
        self.load_decision(id)
    }

    fn list_group_decisions(&self, group_id: &GroupId) -> Result<Vec<Decision>, StoreError> {
        Ok(query::group_decisions(self.iter_decisions()?, group_id))
    }

    fn get_group(&self, id: &GroupId) -> Result<Option<Group>, StoreError> {
        read_json(&self.named_path("groups", "group", id.as_str())?)
    }
}

/// Reject names that would escape their directory or hide as dotfiles.
fn validate_name(kind: &'static str, name: &str) -> Result<(), StoreError> {
    let reason = if name.is_empty() {
        Some("name cannot be empty")
    } else if name.contains('\0') {
        Some("name cannot contain null bytes")
    } else if name.contains('/') || name.contains('\\') {
        Some("name cannot contain path separators")
    } else if name.starts_with('.') {
        Some("name cannot start with '.'")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(StoreError::InvalidName {
            kind,
            name: name.replace('\0', "\\0"),
            reason: reason.into(),
        }),
        None => Ok(()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::Io(e)),
    }
}

fn list_json<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, StoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::Io(e)),
    };
    let mut out = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(value) = read_json(&path)? {
            out.push(value);
        }
    }
    Ok(out)
}

/// Temp file in the same directory, then rename over the target.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let parent = path
        .parent()
        .ok_or_else(|| StoreError::Io(std::io::Error::other("record path has no parent")))?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(serde_json::to_string_pretty(value)?.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}
