//! Rating lookup adapter.
//!
//! Wraps a [`RatingSource`] so callers get an explicit found / not-found
//! outcome for a schedule name instead of an absent value.

use async_trait::async_trait;

use super::names::{AliasTable, reduce_name};
use super::rmp::{RateMyProfessors, RatingSource};
use crate::error::Result;
use crate::models::{Config, RatingRecord};

/// Result of looking up one instructor.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(RatingRecord),
    NotFound,
}

/// Lookup of a single schedule name.
#[async_trait]
pub trait InstructorLookup: Send + Sync {
    async fn lookup(&self, name: &str) -> Result<LookupOutcome>;
}

/// Prepares names and issues exactly one search per call.
pub struct RatingLookup<S> {
    source: S,
    aliases: AliasTable,
}

impl RatingLookup<RateMyProfessors> {
    /// Production lookup against RateMyProfessors.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = RateMyProfessors::from_config(&config.rating)?;
        let aliases = AliasTable::new(config.aliases.clone());
        Ok(Self::new(source, aliases))
    }
}

impl<S: RatingSource> RatingLookup<S> {
    pub fn new(source: S, aliases: AliasTable) -> Self {
        Self { source, aliases }
    }

    /// The name actually sent to the rating source.
    pub fn prepare(&self, name: &str) -> String {
        self.aliases.normalize(&reduce_name(name))
    }
}

#[async_trait]
impl<S: RatingSource> InstructorLookup for RatingLookup<S> {
    async fn lookup(&self, name: &str) -> Result<LookupOutcome> {
        let query = self.prepare(name);
        match self.source.search(&query).await? {
            Some(record) => Ok(LookupOutcome::Found(record)),
            None => Ok(LookupOutcome::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::ExternalId;
    use std::sync::Mutex;

    /// Records every query and answers only for known names.
    struct FakeSource {
        known: Vec<(&'static str, RatingRecord)>,
        queries: Mutex<Vec<String>>,
        fail: bool,
    }

    impl FakeSource {
        fn new(known: Vec<(&'static str, RatingRecord)>) -> Self {
            Self {
                known,
                queries: Mutex::new(Vec::new()),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl RatingSource for FakeSource {
        async fn search(&self, query: &str) -> Result<Option<RatingRecord>> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(AppError::lookup(query, "connection reset"));
            }
            Ok(self
                .known
                .iter()
                .find(|(name, _)| *name == query)
                .map(|(_, record)| record.clone()))
        }
    }

    fn record(first: &str, last: &str) -> RatingRecord {
        RatingRecord {
            first_name: first.to_string(),
            last_name: last.to_string(),
            rating: Some(3.9),
            id: ExternalId::Numeric(7),
        }
    }

    #[tokio::test]
    async fn test_reduces_then_aliases_before_search() {
        let source = FakeSource::new(vec![("Bart Massey", record("Bart", "Massey"))]);
        let lookup = RatingLookup::new(source, AliasTable::new([("Barton", "Bart")]));

        let outcome = lookup.lookup("Barton C Massey").await.unwrap();

        assert!(matches!(outcome, LookupOutcome::Found(ref r) if r.last_name == "Massey"));
        assert_eq!(*lookup.source.queries.lock().unwrap(), vec!["Bart Massey"]);
    }

    #[tokio::test]
    async fn test_three_token_name_is_reduced() {
        let source = FakeSource::new(vec![("Mark Jones", record("Mark", "Jones"))]);
        let lookup = RatingLookup::new(source, AliasTable::default());

        let outcome = lookup.lookup("Mark P Jones").await.unwrap();
        assert!(matches!(outcome, LookupOutcome::Found(_)));
    }

    #[tokio::test]
    async fn test_no_match_is_not_found() {
        let lookup = RatingLookup::new(FakeSource::new(vec![]), AliasTable::default());
        assert_eq!(
            lookup.lookup("Unknown Person").await.unwrap(),
            LookupOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let mut source = FakeSource::new(vec![]);
        source.fail = true;
        let lookup = RatingLookup::new(source, AliasTable::default());

        assert!(lookup.lookup("Jane Doe").await.is_err());
        assert_eq!(lookup.source.queries.lock().unwrap().len(), 1);
    }
}
