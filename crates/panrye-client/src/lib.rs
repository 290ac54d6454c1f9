//! Resolution layer: keyword search client, the fallback-chain resolver,
//! and the legacy direct-call strategy.

mod direct;
mod resolver;
mod search;

pub use direct::{
    CallbackGuard, DIRECT_API_TIMEOUT, DEFAULT_OPERATOR, DirectApiClient, DirectApiError,
    PendingCallbacks,
};
pub use resolver::{DEFAULT_SEARCH_LIMIT, ResolveStrategy, Resolver};
pub use search::{DEFAULT_SEARCH_ENDPOINT, KeywordSearch, SearchCandidate, SearchClient, SearchError};
