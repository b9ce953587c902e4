//! Per-issuer access token cache.

use std::collections::HashMap;

use chrono::{TimeDelta, Utc};
use parking_lot::RwLock;

use super::collaborators::{AccessToken, TokenProvider};

/// Wraps a [`TokenProvider`] and reuses tokens until shortly before they expire.
///
/// The lock only guards map reads and writes; it is never held while the
/// inner provider is fetching, so a slow token request for one issuer does
/// not block submissions for another. Tokens without an expiry are passed
/// through and never cached.
pub struct CachedTokens<T> {
    inner: T,
    leeway: TimeDelta,
    tokens: RwLock<HashMap<String, AccessToken>>,
}

impl<T: TokenProvider> CachedTokens<T> {
    pub fn new(inner: T) -> Self {
        Self::with_leeway(inner, TimeDelta::seconds(30))
    }

    /// Treat tokens as expired `leeway` before their reported expiry.
    pub fn with_leeway(inner: T, leeway: TimeDelta) -> Self {
        Self {
            inner,
            leeway,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Drop the cached token for `issuer` so the next call fetches a new one.
    pub fn invalidate(&self, issuer: &str) {
        self.tokens.write().remove(issuer);
    }

    fn cached(&self, issuer: &str) -> Option<AccessToken> {
        let now = Utc::now();
        self.tokens
            .read()
            .get(issuer)
            .filter(|t| t.expires_at.is_some_and(|exp| exp - self.leeway > now))
            .cloned()
    }
}

impl<T: TokenProvider> TokenProvider for CachedTokens<T> {
    async fn get_token(&self, issuer: &str) -> Option<AccessToken> {
        if let Some(token) = self.cached(issuer) {
            tracing::trace!(issuer, "using cached access token");
            return Some(token);
        }
        let Some(token) = self.inner.get_token(issuer).await else {
            self.invalidate(issuer);
            return None;
        };
        if token.expires_at.is_some() {
            self.tokens.write().insert(issuer.to_string(), token.clone());
        }
        Some(token)
    }

    fn refused(&self, issuer: &str) {
        tracing::debug!(issuer, "dropping refused access token");
        self.invalidate(issuer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
        lifetime: Option<TimeDelta>,
    }

    impl Counting {
        fn new(lifetime: Option<TimeDelta>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                lifetime,
            }
        }
    }

    impl TokenProvider for Counting {
        async fn get_token(&self, issuer: &str) -> Option<AccessToken> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let value = format!("{issuer}-{n}");
            Some(match self.lifetime {
                Some(l) => AccessToken::expiring_at(value, Utc::now() + l),
                None => AccessToken::new(value),
            })
        }
    }

    #[tokio::test]
    async fn reuses_fresh_token() {
        let cache = CachedTokens::new(Counting::new(Some(TimeDelta::minutes(5))));
        let a = cache.get_token("3101123456").await.unwrap();
        let b = cache.get_token("3101123456").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn tokens_are_per_issuer() {
        let cache = CachedTokens::new(Counting::new(Some(TimeDelta::minutes(5))));
        let a = cache.get_token("3101123456").await.unwrap();
        let b = cache.get_token("114480790").await.unwrap();
        assert_ne!(a.value, b.value);
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refetches_inside_leeway() {
        let cache = CachedTokens::new(Counting::new(Some(TimeDelta::seconds(10))));
        cache.get_token("3101123456").await.unwrap();
        cache.get_token("3101123456").await.unwrap();
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn tokens_without_expiry_are_not_cached() {
        let cache = CachedTokens::new(Counting::new(None));
        cache.get_token("3101123456").await.unwrap();
        cache.get_token("3101123456").await.unwrap();
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cache = CachedTokens::new(Counting::new(Some(TimeDelta::minutes(5))));
        cache.get_token("3101123456").await.unwrap();
        cache.invalidate("3101123456");
        cache.get_token("3101123456").await.unwrap();
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refused_token_is_not_reused() {
        let cache = CachedTokens::new(Counting::new(Some(TimeDelta::minutes(5))));
        let first = cache.get_token("114480790").await.unwrap();
        cache.refused("114480790");
        let second = cache.get_token("114480790").await.unwrap();
        assert_ne!(first, second);
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }
}
