use async_trait::async_trait;

use crate::RosterError;

/// Result of an operation against the member service
pub type Result<T, E = RosterError> = std::result::Result<T, E>;

#[async_trait]
pub trait Query<T> {
    type Filter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<T>>;
}

#[async_trait]
pub trait Insert<T> {
    async fn insert(&self, item: T) -> Result<()>;
}

#[async_trait]
pub trait Update<T> {
    type Key;
    async fn update(&self, key: &Self::Key, item: T) -> Result<()>;
}

#[async_trait]
pub trait Delete<T> {
    type Key;
    async fn delete(&self, key: &Self::Key) -> Result<()>;
}
