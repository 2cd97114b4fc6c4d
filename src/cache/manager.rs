use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{ClassSession, Course};

/// Consider cache stale after 1 hour.
/// Course lists change rarely; sessions are refreshed on view anyway.
const CACHE_STALE_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

pub struct CacheStore {
    cache_dir: PathBuf,
}

impl CacheStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        debug!(name = name, age_minutes = cached.age_minutes(), "Cache hit");
        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    fn invalidate(&self, name: &str) -> Result<()> {
        let path = self.cache_path(name);
        if path.exists() {
            std::fs::remove_file(&path)?;
            debug!(name = name, "Cache invalidated");
        }
        Ok(())
    }

    // ===== Courses =====

    pub fn load_courses(&self) -> Result<Option<CachedData<Vec<Course>>>> {
        self.load("courses")
    }

    pub fn save_courses(&self, courses: &[Course]) -> Result<()> {
        self.save("courses", &courses)
    }

    /// Called after course create/delete
    pub fn invalidate_courses(&self) -> Result<()> {
        self.invalidate("courses")
    }

    // ===== Class sessions (per course) =====

    pub fn load_sessions(&self, course_id: i64) -> Result<Option<CachedData<Vec<ClassSession>>>> {
        self.load(&format!("sessions-{}", course_id))
    }

    pub fn save_sessions(&self, course_id: i64, sessions: &[ClassSession]) -> Result<()> {
        self.save(&format!("sessions-{}", course_id), &sessions)
    }

    /// Called after session create/end/delete for the course
    pub fn invalidate_sessions(&self, course_id: i64) -> Result<()> {
        self.invalidate(&format!("sessions-{}", course_id))
    }
}
