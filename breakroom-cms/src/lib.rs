pub mod client;
pub mod fixture;
pub mod image;
mod record;
pub mod sanity;

pub use client::{CmsError, ContentStore, Result};
pub use fixture::FixtureStore;
pub use image::{ImageFit, ImageUrlBuilder};
pub use sanity::{SanityClient, SanityConfig};
