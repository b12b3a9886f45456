//! `quarry version` command - Display version information.

use quarry_query::FilterOperator;
use quarry_schema::DatabaseProvider;

use crate::error::CliResult;
use crate::output::{self, kv};

/// Package version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
const NAME: &str = env!("CARGO_PKG_NAME");

/// Run the version command
pub async fn run() -> CliResult<()> {
    output::header("Quarry");

    kv("Version", VERSION);
    kv("Binary", NAME);

    #[cfg(debug_assertions)]
    let build_mode = "debug";
    #[cfg(not(debug_assertions))]
    let build_mode = "release";

    kv("Build", build_mode);

    let providers = DatabaseProvider::all()
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    kv("Providers", providers);

    output::newline();

    output::section("Components");
    kv("quarry-schema", VERSION);
    kv("quarry-query", VERSION);

    output::newline();

    let operators = FilterOperator::ALL
        .iter()
        .map(|op| op.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    output::section("Filter Operators");
    output::dim(&format!("  {}", operators));

    Ok(())
}
