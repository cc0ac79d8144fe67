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
// - flash-files.com handler -

use super::{css, fetch};
use crate::agent::{AgentBase, HostgrabAgent};
use crate::definitions::{Retrieval, SiteDefinition};
use crate::error::ResolveError;
use crate::settings::Settings;
use crate::source::SourceUrl;

use scraper::{ElementRef, Html};
use std::io::Read;
use tracing::{debug, info};

fn link_text(a: ElementRef) -> String {
    a.text().collect()
}

// The "share this file" box carries the file name as a link inside a textarea.
pub fn asset_name(page: &str, url: &str) -> Result<String, ResolveError> {
    let document = Html::parse_document(page);
    let panel = document
        .select(&css("div#panel4"))
        .next()
        .ok_or_else(|| ResolveError::MissingElement {
            element: "panel4 div",
            url: url.to_string(),
        })?;

    let no_link = || ResolveError::MissingElement {
        element: "download link",
        url: url.to_string(),
    };
    let textarea = panel.select(&css("textarea")).next().ok_or_else(no_link)?;

    if let Some(name) = textarea.select(&css("a")).next().map(link_text) {
        return Ok(name);
    }

    // Textarea content is raw text to an HTML5 parser, so parse it again.
    let inner = Html::parse_fragment(&textarea.text().collect::<String>());
    let name = inner.select(&css("a")).next().map(link_text);
    name.ok_or_else(no_link)
}

// Implement the site definition:
struct FlashFilesHandler;
impl SiteDefinition for FlashFilesHandler {
    fn can_handle_url(&self, url: &str) -> bool {
        url.contains("flash-files.com")
    }

    fn rank(&self) -> u8 {
        1
    }

    fn display_name(&self) -> &'static str {
        "flash-files.com"
    }

    fn find_video(
        &self,
        source: &SourceUrl,
        settings: &Settings,
    ) -> Result<Retrieval, ResolveError> {
        let agent = HostgrabAgent::init(&source.url, settings)?;
        let page = fetch(&agent, source.url.as_str())?.into_string()?;

        let name = asset_name(&page, source.url.as_str())?;
        info!("Title {}", name);

        let form = [
            ("p", name.as_str()),
            ("h", source.code.as_str()),
            ("websitereferer", "websitereferer"),
        ];
        let endpoint = source.sibling("/downloadfile.php")?;
        debug!("Posting {:?} to {}", form, endpoint);

        let resp = agent.post(endpoint.as_str()).send_form(&form).map_err(|e| {
            debug!("POST {} failed: {}", endpoint, e);
            ResolveError::Content(source.url.to_string())
        })?;

        // No length to check against; whatever arrives is the file.
        let mut payload = Vec::new();
        resp.into_reader().read_to_end(&mut payload)?;
        Ok(Retrieval::Payload(payload))
    }
}

// Push the site definition to the list of known handlers:
inventory::submit! {
    &FlashFilesHandler as &dyn SiteDefinition
}
