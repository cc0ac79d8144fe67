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
// - agent.rs file -

use crate::error::ResolveError;
use crate::settings::Settings;

use tracing::debug;
use ureq::{Agent, AgentBuilder, Proxy};
use url::Url;

pub trait AgentBase {
    fn init(url: &Url, settings: &Settings) -> Result<Agent, ResolveError>;
    fn init_without_redirects(url: &Url, settings: &Settings) -> Result<Agent, ResolveError>;
}

fn builder(url: &Url, settings: &Settings) -> Result<AgentBuilder, ResolveError> {
    let mut builder = AgentBuilder::new().user_agent(&settings.user_agent);

    if let Some(env_proxy) = env_proxy::for_url(url).host_port() {
        // Use a proxy:
        debug!("Using proxy {}:{} for {}", env_proxy.0, env_proxy.1, url);
        let proxy = Proxy::new(format!("{}:{}", env_proxy.0, env_proxy.1))
            .map_err(|e| ResolveError::Agent(e.to_string()))?;
        builder = builder.proxy(proxy);
    }

    Ok(builder)
}

pub struct HostgrabAgent;
impl AgentBase for HostgrabAgent {
    // Default agent: browser User-Agent, proxy from the environment,
    // redirects followed.
    fn init(url: &Url, settings: &Settings) -> Result<Agent, ResolveError> {
        Ok(builder(url, settings)?.build())
    }

    // Same, but 3xx responses are handed back to the caller.
    fn init_without_redirects(url: &Url, settings: &Settings) -> Result<Agent, ResolveError> {
        Ok(builder(url, settings)?.redirects(0).build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::{GET, HEAD};
    use httpmock::MockServer;
    use std::path::Path;

    #[test]
    fn every_request_carries_the_run_user_agent() {
        let server = MockServer::start();
        let settings = Settings::new(Path::new("."));
        let page = server.mock(|when, then| {
            when.method(GET)
                .path("/page")
                .header("user-agent", settings.user_agent.clone());
            then.status(200).body("ok");
        });
        let head = server.mock(|when, then| {
            when.method(HEAD)
                .path("/video.mp4")
                .header("user-agent", settings.user_agent.clone());
            then.status(200);
        });

        let url = Url::parse(&server.url("/page")).unwrap();
        let agent = HostgrabAgent::init(&url, &settings).unwrap();
        agent.get(url.as_str()).call().unwrap();
        agent.head(&server.url("/video.mp4")).call().unwrap();

        let agent = HostgrabAgent::init_without_redirects(&url, &settings).unwrap();
        agent.get(url.as_str()).call().unwrap();

        page.assert_hits(2);
        head.assert();
    }

    #[test]
    fn redirects_can_be_left_to_the_caller() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/moved");
            then.status(302).header("Location", "/landing");
        });
        let landing = server.mock(|when, then| {
            when.method(GET).path("/landing");
            then.status(200);
        });

        let settings = Settings::new(Path::new("."));
        let url = Url::parse(&server.url("/moved")).unwrap();
        let agent = HostgrabAgent::init_without_redirects(&url, &settings).unwrap();
        let resp = agent.get(url.as_str()).call().unwrap();

        assert_eq!(resp.status(), 302);
        assert_eq!(resp.header("Location"), Some("/landing"));
        landing.assert_hits(0);
    }
}
