//! Rekognition HTTP client module.

#[cfg(feature = "config")]
mod rk_args;
mod rk_client;
mod rk_config;

#[cfg(feature = "config")]
#[cfg_attr(docsrs, doc(cfg(feature = "config")))]
pub use rk_args::RekognitionArgs;
pub use rk_client::RekognitionClient;
pub use rk_config::{
    DEFAULT_REGION, DEFAULT_TIMEOUT, KNOWN_REGIONS, RekognitionConfig, RekognitionConfigBuilder,
};
