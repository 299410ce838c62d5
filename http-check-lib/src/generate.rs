//! Candidate URL generation.
//!
//! Pure expansion from one domain to the ordered list of URLs that should be
//! probed for it. No network access, no shared state; the output is fully
//! determined by the inputs.

use std::collections::HashMap;

use crate::ports::catalog_ports;

/// Expand one domain into its candidate URLs.
///
/// Candidates appear in a fixed order: the default `http`/`https` pair first
/// (unless `skip_default`), then each probe spec's expansion in the order
/// the specs were supplied.
///
/// A spec is resolved in three steps: user-defined catalog name (shadows
/// built-ins), built-in catalog name, then literal `protocol:port`. A
/// literal that does not split into two non-empty halves is skipped without
/// error. Duplicate specs produce duplicate candidates.
pub fn candidate_urls(
    domain: &str,
    skip_default: bool,
    probe_specs: &[String],
    custom_catalogs: Option<&HashMap<String, Vec<u16>>>,
) -> Vec<String> {
    let mut urls = Vec::new();

    if !skip_default {
        urls.push(format!("http://{}", domain));
        urls.push(format!("https://{}", domain));
    }

    for spec in probe_specs {
        if let Some(ports) = custom_catalogs.and_then(|catalogs| catalogs.get(spec.as_str())) {
            push_catalog(&mut urls, domain, ports);
            continue;
        }

        if let Some(ports) = catalog_ports(spec) {
            push_catalog(&mut urls, domain, ports);
            continue;
        }

        if let Some((protocol, port)) = spec.split_once(':') {
            if !protocol.is_empty() && !port.is_empty() {
                // The port half is carried as text, not validated; a
                // nonsense port surfaces later as an unreachable candidate.
                urls.push(format!("{}://{}:{}", protocol, domain, port));
            }
        }
    }

    urls
}

fn push_catalog(urls: &mut Vec<String>, domain: &str, ports: &[u16]) {
    for port in ports {
        urls.push(format!("http://{}:{}", domain, port));
        urls.push(format!("https://{}:{}", domain, port));
    }
}
