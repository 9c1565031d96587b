//! Image transport: probing, size-capped downloads and data URL encoding.

pub mod error;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;


pub use error::{FetchError, FetchResult};
pub use http::{HttpImageFetcher, NamedClient, image_width};
pub use types::{
    DownloadOptions, DownloadResult, ImageFetcher, encode_data_url, is_image_content_type,
    strip_mime_params,
};
