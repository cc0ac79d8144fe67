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
// - indishare.in handler -

use super::{css, fetch};
use crate::agent::{AgentBase, HostgrabAgent};
use crate::definitions::{Retrieval, SiteDefinition};
use crate::error::{describe, ResolveError};
use crate::settings::Settings;
use crate::source::SourceUrl;

use scraper::Html;
use std::io::Read;
use tracing::{debug, info};
use url::Url;

/// The first form on a page, ready to be sent back.
#[derive(Debug, PartialEq, Eq)]
pub struct FormSubmission {
    pub method: String,
    pub params: Vec<(String, String)>,
}

pub fn form_submission(page: &str, url: &str) -> Result<FormSubmission, ResolveError> {
    let document = Html::parse_document(page);
    let form = document
        .select(&css("form"))
        .next()
        .ok_or_else(|| ResolveError::FormNotFound(url.to_string()))?;

    let method = form
        .value()
        .attr("method")
        .unwrap_or("GET")
        .to_uppercase();

    // Nameless inputs (submit buttons, mostly) are not sent by browsers either.
    let params = form
        .select(&css("input"))
        .filter_map(|input| {
            let name = input.value().attr("name")?;
            let value = input.value().attr("value").unwrap_or_default();
            Some((name.to_string(), value.to_string()))
        })
        .collect();

    Ok(FormSubmission { method, params })
}

// Implement the site definition:
struct IndishareHandler;
impl SiteDefinition for IndishareHandler {
    fn can_handle_url(&self, url: &str) -> bool {
        url.contains("indishare.in")
    }

    fn rank(&self) -> u8 {
        2
    }

    fn display_name(&self) -> &'static str {
        "indishare.in"
    }

    // This only gets as far as submitting the download form and showing
    // the answer; nothing is saved yet.
    fn find_video(
        &self,
        source: &SourceUrl,
        settings: &Settings,
    ) -> Result<Retrieval, ResolveError> {
        let agent = HostgrabAgent::init_without_redirects(&source.url, settings)?;
        let first = fetch(&agent, source.url.as_str())?;

        let redirect = match first.header("Location") {
            Some(location) if (300..400).contains(&first.status()) => {
                Some(source.sibling(location)?)
            }
            _ => None,
        };
        let (page_url, resp): (Url, _) = match redirect {
            Some(target) => {
                info!("Redirect to {}", target);
                let agent = HostgrabAgent::init(&target, settings)?;
                let resp = fetch(&agent, target.as_str())?;
                (target, resp)
            }
            None => (source.url.clone(), first),
        };

        let page = resp.into_string()?;
        let form = form_submission(&page, page_url.as_str())?;
        debug!("Submitting {:?} to {}", form, page_url);

        let agent = HostgrabAgent::init(&page_url, settings)?;
        let request = form
            .params
            .iter()
            .fold(agent.request(&form.method, page_url.as_str()), |req, (k, v)| {
                req.query(k, v)
            });
        let resp = request.call().map_err(|e| {
            debug!("{} {} failed: {}", form.method, page_url, describe(&e));
            ResolveError::FormSubmit(page_url.to_string())
        })?;

        println!("{} {}", resp.status(), resp.status_text());
        for name in resp.headers_names() {
            if let Some(value) = resp.header(&name) {
                println!("{}: {}", name, value);
            }
        }
        let mut body = Vec::new();
        resp.into_reader().read_to_end(&mut body)?;
        debug!("{}", String::from_utf8_lossy(&body));

        Ok(Retrieval::Inspected)
    }
}

// Push the site definition to the list of known handlers:
inventory::submit! {
    &IndishareHandler as &dyn SiteDefinition
}
