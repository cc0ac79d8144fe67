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
// - main.rs file -

use anyhow::Result;
use clap::Parser;
use std::{path::PathBuf, process};
use tracing::{debug, error, info, warn};
use url::Url;

mod agent;
mod definitions;
mod download;
mod error;
mod handlers;
mod logging;
mod settings;
mod source;

use agent::{AgentBase, HostgrabAgent};
use definitions::Retrieval;
use error::ResolveError;
use settings::Settings;
use source::SourceUrl;

#[derive(Parser)]
#[clap(version, about = "Downloads videos from file hosting pages", long_about = None)]
struct Args {
    #[clap(long, help = "Shows every request while the URLs are processed")]
    debug: bool,

    #[clap(long, short = 'v', help = "Talks more while the URLs are processed")]
    verbose: bool,

    #[clap(
        long = "output-dir",
        short = 'o',
        help = "Sets the directory the videos are saved to",
        default_value = "."
    )]
    outputdir: PathBuf,

    #[clap(help = "Sets the page URLs to download from")]
    urls: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Downloaded(PathBuf),
    Skipped(PathBuf),
    Inspected,
}

// Runs one page URL through its site handler and saves the result.
fn fetch_url(url: &str, settings: &Settings) -> Result<Outcome, ResolveError> {
    let handler = definitions::handler_for(url)
        .ok_or_else(|| ResolveError::Unsupported(url.to_string()))?;
    debug!("Fetching {} from {}", url, handler.display_name());

    let source = SourceUrl::parse(url)?;
    let target = source.target_file(&settings.output_dir);
    if target.exists() {
        return Ok(Outcome::Skipped(target));
    }

    match handler.find_video(&source, settings)? {
        Retrieval::Stream { link, tokens } => {
            let link_url = Url::parse(&link).map_err(|_| ResolveError::PlayerCode {
                link: link.clone(),
                tokens: tokens.clone(),
            })?;
            let agent = HostgrabAgent::init(&link_url, settings)?;
            info!("{} -> {}", url, target.display());
            download::download(&agent, &link, &target, &tokens)?;
            Ok(Outcome::Downloaded(target))
        }
        Retrieval::Payload(payload) => {
            info!("{} -> {}", url, target.display());
            download::save(&target, &payload)?;
            Ok(Outcome::Downloaded(target))
        }
        Retrieval::Inspected => Ok(Outcome::Inspected),
    }
}

fn main() -> Result<()> {
    // Argument parsing:
    let args = Args::parse();
    logging::init_logging(args.debug, args.verbose)?;

    let settings = Settings::new(&args.outputdir);
    debug!("User-Agent: {}", settings.user_agent);

    for url in &args.urls {
        match fetch_url(url, &settings) {
            Ok(Outcome::Downloaded(target)) => {
                println!("\"{}\" successfully downloaded.", target.display());
            }
            Ok(Outcome::Skipped(target)) => {
                warn!("{} already exists. Skipping.", target.display());
            }
            Ok(Outcome::Inspected) => {
                info!("{} processed, nothing saved.", url);
            }
            Err(e) => {
                // First failure ends the run.
                error!("{}", e);
                process::exit(1);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn unknown_sites_fail_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::new(dir.path());
        let err = fetch_url("http://shortearn.eu/YrbNn1L", &settings).unwrap_err();
        assert!(matches!(err, ResolveError::Unsupported(_)));
        assert_eq!(err.to_string(), "Cannot handle http://shortearn.eu/YrbNn1L as of now.");
    }

    #[test]
    fn existing_targets_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::new(dir.path());
        let existing = dir.path().join("5ggryv3orudj.mp4");
        fs::write(&existing, b"done").unwrap();

        // Every handler would need the network; none of them gets to run.
        for url in [
            "https://www.file-up.org/5ggryv3orudj",
            "http://flash-files.com/5ggryv3orudj",
            "https://www.indishare.in/5ggryv3orudj/",
        ] {
            assert_eq!(
                fetch_url(url, &settings).unwrap(),
                Outcome::Skipped(existing.clone())
            );
            assert_eq!(
                fetch_url(url, &settings).unwrap(),
                Outcome::Skipped(existing.clone())
            );
        }
        assert_eq!(fs::read(&existing).unwrap(), b"done");
    }

    #[test]
    fn arguments_are_parsed() {
        let args = Args::parse_from([
            "hostgrab",
            "--debug",
            "-o",
            "videos",
            "https://www.file-up.org/a",
            "https://www.file-up.org/b",
        ]);
        assert!(args.debug);
        assert!(!args.verbose);
        assert_eq!(args.outputdir, PathBuf::from("videos"));
        assert_eq!(args.urls.len(), 2);

        let args = Args::parse_from(["hostgrab"]);
        assert!(args.urls.is_empty());
        assert_eq!(args.outputdir, PathBuf::from("."));
    }
}
