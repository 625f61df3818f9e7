//! Platform-conditional source selection
//!
//! The one mutation this tool performs on a build environment: pick the
//! source filter that matches the detected platform and replace the
//! environment's filter entry with it.

use tracing::debug;

use crate::env::{BuildEnv, EnvValue};
use crate::filter::{SrcFilter, SrcPattern};
use crate::platform::TargetFamily;

/// Environment entry holding the detected platform identifier
pub const PLATFORM_VAR: &str = "PIOPLATFORM";

/// Environment entry holding the source filter consumed by source discovery
pub const SRC_FILTER_VAR: &str = "SRC_FILTER";

const INCLUDE_ALL: &str = "*";
const EXCLUDE_SPI: &str = "*_spi*";
const INCLUDE_ESP_SPI: &str = "*_esp_spi.c";

/// Compute the platform-conditional source filter and store it in the
/// environment, overwriting any previous `SRC_FILTER` entry.
///
/// Every platform excludes the SPI implementation files; the espressif32
/// family re-includes its own SPI implementation. An absent or
/// unrecognized platform entry takes the default branch, it is not an
/// error.
pub fn select_sources(env: &mut BuildEnv) {
    let platform = env.get_str(PLATFORM_VAR).unwrap_or_default();

    let mut filter = SrcFilter::new();
    filter.push(SrcPattern::include(INCLUDE_ALL));
    filter.push(SrcPattern::exclude(EXCLUDE_SPI));
    if platform == TargetFamily::Espressif32.as_str() {
        filter.push(SrcPattern::include(INCLUDE_ESP_SPI));
    }

    debug!(platform, filter = %filter, "selected source filter");
    env.replace(SRC_FILTER_VAR, EnvValue::Filter(filter));
}
