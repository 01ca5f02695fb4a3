//! Marketplace surface around the scoring engine: input validation, the
//! seller reliability ledger, file import and the HTTP router.

pub mod import;
pub mod ledger;
pub mod payloads;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use import::{VendorFormat, VendorImportError, VendorImporter};
pub use ledger::{ensure_monotonic, LedgerError, SellerLedger, SellerLedgerEntry};
pub use payloads::{
    MatchQuoteRequest, NegotiationRequest, RankQuotesRequest, RankedQuotesResponse,
};
pub use router::marketplace_router;
pub use service::{MarketplaceError, MarketplaceService};
pub use validation::ValidationError;
