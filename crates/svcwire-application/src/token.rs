//! Service tokens
//!
//! A token names a service contract. Its contract type only exists at compile
//! time (as a phantom parameter) and its scope is fixed on creation.
//!
//! ```ignore
//! use svcwire_application::token::ServiceToken;
//! use svcwire_domain::Root;
//!
//! static DATABASE: LazyLock<ServiceToken<Pool, Root>> =
//!     LazyLock::new(|| ServiceToken::new("db"));
//! static LOGGER: LazyLock<ServiceToken<dyn Logger>> =
//!     LazyLock::new(|| ServiceToken::builder("logger").default_factory(default_logger).build());
//! ```

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use futures::future::BoxFuture;
use svcwire_domain::constants::TOKEN_KIND;
use svcwire_domain::error::{BoxError, Error, Result};
use svcwire_domain::value_objects::{Plugin, ScopeMarker, ServiceScope};

use crate::factory::ServiceFactoryOrBuilder;

/// Async callback producing the fallback factory of a token
pub type DefaultFactoryFn = Arc<
    dyn Fn(AnyServiceToken) -> BoxFuture<'static, std::result::Result<ServiceFactoryOrBuilder, BoxError>>
        + Send
        + Sync,
>;

/// Process-unique identity of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenKey(u64);

impl TokenKey {
    fn next() -> Self {
        static NEXT_KEY: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw key value
    pub fn get(self) -> u64 {
        self.0
    }
}

struct TokenInner {
    key: TokenKey,
    id: String,
    scope: ServiceScope,
    contract: &'static str,
    default_factory: Option<DefaultFactoryFn>,
}

/// Token with its contract type erased
///
/// Equality and hashing follow token identity, not the id string.
#[derive(Clone)]
pub struct AnyServiceToken {
    inner: Arc<TokenInner>,
}

impl AnyServiceToken {
    /// Identity of the token
    pub fn key(&self) -> TokenKey {
        self.inner.key
    }

    /// Identifying string
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Scope fixed at creation
    pub fn scope(&self) -> ServiceScope {
        self.inner.scope
    }

    /// Name of the contract type, for diagnostics only
    pub fn contract_type_name(&self) -> &'static str {
        self.inner.contract
    }

    /// Discriminant tag of tokens
    pub fn kind(&self) -> &'static str {
        TOKEN_KIND
    }

    /// Whether the token ships a fallback factory
    pub fn has_default_factory(&self) -> bool {
        self.inner.default_factory.is_some()
    }

    /// Invoke the token's default factory callback, `None` when it has none
    pub async fn resolve_default_factory(
        &self,
    ) -> Option<std::result::Result<ServiceFactoryOrBuilder, BoxError>> {
        let callback = self.inner.default_factory.clone()?;
        Some(callback(self.clone()).await)
    }
}

impl PartialEq for AnyServiceToken {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for AnyServiceToken {}

impl Hash for AnyServiceToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for AnyServiceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token{{{}}}", self.id())
    }
}

impl fmt::Debug for AnyServiceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyServiceToken")
            .field("id", &self.inner.id)
            .field("scope", &self.inner.scope)
            .field("key", &self.inner.key)
            .field("contract", &self.inner.contract)
            .field("has_default_factory", &self.has_default_factory())
            .finish()
    }
}

/// Typed token for a service contract `T` in scope `S`
pub struct ServiceToken<T: ?Sized, S: ScopeMarker = Plugin> {
    erased: AnyServiceToken,
    _contract: PhantomData<fn() -> (Arc<T>, S)>,
}

/// Compile-time view of a token's contract
pub trait TokenContract {
    /// The service contract named by the token
    type Contract: ?Sized + Send + Sync + 'static;
    /// Scope marker of the token
    type Scope: ScopeMarker;
}

impl<T: ?Sized + Send + Sync + 'static, S: ScopeMarker> TokenContract for ServiceToken<T, S> {
    type Contract = T;
    type Scope = S;
}

/// Options accepted by [`create_service_token`]
#[derive(Clone)]
pub struct TokenOptions {
    /// Identifying string
    pub id: String,
    /// Fallback factory used when nothing is registered for the token
    pub default_factory: Option<DefaultFactoryFn>,
}

impl TokenOptions {
    /// Options with only an id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            default_factory: None,
        }
    }

    /// Attach a default factory callback
    pub fn with_default_factory<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(AnyServiceToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<ServiceFactoryOrBuilder, BoxError>>
            + Send
            + 'static,
    {
        self.default_factory = Some(Arc::new(move |token: AnyServiceToken| {
            callback(token).boxed()
        }));
        self
    }
}

impl fmt::Debug for TokenOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenOptions")
            .field("id", &self.id)
            .field("default_factory", &self.default_factory.is_some())
            .finish()
    }
}

/// Create a token from options; the scope is chosen by `S`
pub fn create_service_token<T, S>(options: TokenOptions) -> ServiceToken<T, S>
where
    T: ?Sized + Send + Sync + 'static,
    S: ScopeMarker,
{
    ServiceToken {
        erased: AnyServiceToken {
            inner: Arc::new(TokenInner {
                key: TokenKey::next(),
                id: options.id,
                scope: S::SCOPE,
                contract: std::any::type_name::<T>(),
                default_factory: options.default_factory,
            }),
        },
        _contract: PhantomData,
    }
}

impl<T, S> ServiceToken<T, S>
where
    T: ?Sized + Send + Sync + 'static,
    S: ScopeMarker,
{
    /// Create a token without a default factory
    pub fn new(id: impl Into<String>) -> Self {
        create_service_token(TokenOptions::new(id))
    }

    /// Start building a token
    pub fn builder(id: impl Into<String>) -> ServiceTokenBuilder<T, S> {
        ServiceTokenBuilder {
            options: TokenOptions::new(id),
            _contract: PhantomData,
        }
    }

    /// Identifying string
    pub fn id(&self) -> &str {
        self.erased.id()
    }

    /// Scope fixed at creation
    pub fn scope(&self) -> ServiceScope {
        S::SCOPE
    }

    /// Identity of the token
    pub fn key(&self) -> TokenKey {
        self.erased.key()
    }

    /// Type-erased form of this token
    pub fn as_any(&self) -> &AnyServiceToken {
        &self.erased
    }

    /// Read the contract type at runtime
    ///
    /// The contract is a compile-time marker only (see [`TokenContract`]), so
    /// this always fails.
    pub fn read_contract(&self) -> Result<Infallible> {
        Err(Error::contract_misuse(self.id()))
    }
}

impl<T: ?Sized, S: ScopeMarker> Clone for ServiceToken<T, S> {
    fn clone(&self) -> Self {
        Self {
            erased: self.erased.clone(),
            _contract: PhantomData,
        }
    }
}

impl<T: ?Sized, S: ScopeMarker> fmt::Display for ServiceToken<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.erased, f)
    }
}

impl<T: ?Sized, S: ScopeMarker> fmt::Debug for ServiceToken<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.erased, f)
    }
}

impl<T: ?Sized, S: ScopeMarker> From<ServiceToken<T, S>> for AnyServiceToken {
    fn from(token: ServiceToken<T, S>) -> Self {
        token.erased
    }
}

impl<T: ?Sized, S: ScopeMarker> AsRef<AnyServiceToken> for ServiceToken<T, S> {
    fn as_ref(&self) -> &AnyServiceToken {
        &self.erased
    }
}

/// Builder returned by [`ServiceToken::builder`]
pub struct ServiceTokenBuilder<T: ?Sized, S: ScopeMarker = Plugin> {
    options: TokenOptions,
    _contract: PhantomData<fn() -> (Arc<T>, S)>,
}

impl<T, S> ServiceTokenBuilder<T, S>
where
    T: ?Sized + Send + Sync + 'static,
    S: ScopeMarker,
{
    /// Attach a default factory callback
    pub fn default_factory<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(AnyServiceToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<ServiceFactoryOrBuilder, BoxError>>
            + Send
            + 'static,
    {
        self.options = self.options.with_default_factory(callback);
        self
    }

    /// Finish the token
    pub fn build(self) -> ServiceToken<T, S> {
        create_service_token(self.options)
    }
}
