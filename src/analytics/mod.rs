//! Analytics reporting for Blog Core.
//!
//! - Provider: the seam to the external analytics service
//! - GA4: Google Analytics Data API client with service-account auth
//! - Reports: the fixed report catalogue and positional row decoding
//! - Aggregator: runs the catalogue concurrently and joins the results

mod aggregator;
mod credentials;
mod ga4;
mod provider;
mod reports;

pub use aggregator::*;
pub use credentials::*;
pub use ga4::*;
pub use provider::*;
pub use reports::*;
