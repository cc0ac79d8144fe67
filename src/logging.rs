/*
 * The contents of this file are subject to the terms of the
 * Common Development and Distribution License, Version 1.0 only
 * (the "License").  You may not use this file except in compliance
 * with the License.
 *
 * See the file LICENSE in this distribution for details.
 * A copy of the CDDL is also available via the Internet at
 * http://www.opensource.org/licenses/cddl1.txt
 *
 * When distributing Covered Code, include this CDDL HEADER in each
 * file and include the contents of the LICENSE file from this
 * distribution.
 */

// hostgrab - file hosting page downloader
// - logging.rs file -

use anyhow::{anyhow, Result};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

// --debug beats --verbose; without either only errors are shown.
pub fn level(debug: bool, verbose: bool) -> LevelFilter {
    if debug {
        LevelFilter::DEBUG
    } else if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::ERROR
    }
}

/// Plain `LEVEL message` lines on stderr. RUST_LOG wins over the flags.
pub fn init_logging(debug: bool, verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level(debug, verbose).to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("could not set up logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_wins() {
        assert_eq!(level(true, true), LevelFilter::DEBUG);
        assert_eq!(level(true, false), LevelFilter::DEBUG);
        assert_eq!(level(false, true), LevelFilter::INFO);
        assert_eq!(level(false, false), LevelFilter::ERROR);
    }
}
