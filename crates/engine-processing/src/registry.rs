use crate::{
    error::PassError,
    pass::{self, PassContext, PassReport},
    source::ChangeSource,
};
use async_trait::async_trait;
use engine_config::settings::SourceSettings;
use model::pass::PassArgs;
use std::{collections::HashMap, sync::Arc};
use tracing::info;

/// Object-safe face of a [`ChangeSource`], so sources with different record
/// types can live in one registry.
#[async_trait]
pub(crate) trait RegisteredSource: Send + Sync {
    fn settings(&self) -> SourceSettings;

    async fn run(
        &self,
        name: &str,
        args: &PassArgs,
        ctx: &PassContext<'_>,
    ) -> Result<PassReport, PassError>;
}

struct Entry<S>(S);

#[async_trait]
impl<S: ChangeSource + 'static> RegisteredSource for Entry<S> {
    fn settings(&self) -> SourceSettings {
        self.0.settings()
    }

    async fn run(
        &self,
        name: &str,
        args: &PassArgs,
        ctx: &PassContext<'_>,
    ) -> Result<PassReport, PassError> {
        pass::execute(&self.0, name, args, ctx).await
    }
}

/// Named change sources, fixed before any pass runs.
#[derive(Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn RegisteredSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S>(&mut self, name: impl Into<String>, source: S) -> Result<&mut Self, PassError>
    where
        S: ChangeSource + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PassError::InvalidConfiguration(
                "source name must not be blank".to_string(),
            ));
        }
        if self.sources.contains_key(&name) {
            return Err(PassError::DuplicateSource(name));
        }

        let settings = source.settings();
        if !settings.stale_age.is_valid() {
            return Err(PassError::InvalidConfiguration(format!(
                "stale age for '{name}' must be positive, got {}",
                settings.stale_age
            )));
        }

        info!(
            processor = %name,
            limit = %settings.limit,
            stale_age = %settings.stale_age,
            "Registered change source"
        );
        self.sources.insert(name, Arc::new(Entry(source)));
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn settings(&self, name: &str) -> Option<SourceSettings> {
        self.sources.get(name).map(|source| source.settings())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub(crate) fn get(&self, name: &str) -> Result<Arc<dyn RegisteredSource>, PassError> {
        self.sources
            .get(name)
            .cloned()
            .ok_or_else(|| PassError::UnknownSource(name.to_string()))
    }
}
