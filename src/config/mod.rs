//! Configuration module

mod site;

pub use site::SiteConfig;
pub use site::CommentsConfig;
pub use site::DetailConfig;
pub use site::ListingConfig;
pub use site::PrismicConfig;
pub use site::ACCESS_TOKEN_ENV;
