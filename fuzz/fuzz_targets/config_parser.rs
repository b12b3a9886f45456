//! Fuzz target for the `quarry.toml` parser.
//!
//! This target feeds arbitrary TOML strings to the config parser
//! to find crashes and panics.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use quarry_query::FilterCompiler;
use quarry_schema::QuarryConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // The parser should never panic, only return errors
        if let Ok(config) = QuarryConfig::from_str(input) {
            let env = config.environments.keys().next().cloned();
            let config = match env {
                Some(env) => config.with_environment(&env),
                None => config,
            };
            let _ = FilterCompiler::from_config(&config);
        }
    }
});
