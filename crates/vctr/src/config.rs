// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vctr config` command implementation.

use vctr_config::VctrConfig;
use vctr_core::VctrError;

const REDACTED: &str = "[REDACTED]";

/// Prints the effective configuration and which upstreams are usable.
pub fn run_config(config: &VctrConfig) -> Result<(), VctrError> {
    println!("{}", render(config)?);
    Ok(())
}

fn render(config: &VctrConfig) -> Result<String, VctrError> {
    let redacted = redact(config);
    let mut out = toml::to_string_pretty(&redacted)
        .map_err(|e| VctrError::Internal(format!("failed to render config: {e}")))?;

    out.push_str("\n# upstreams\n");
    for (name, configured) in upstreams(config) {
        let state = if configured { "configured" } else { "missing" };
        out.push_str(&format!("# {name}: {state}\n"));
    }
    Ok(out)
}

fn redact(config: &VctrConfig) -> VctrConfig {
    let mut copy = config.clone();
    let hide = |secret: &mut Option<String>| {
        if secret.is_some() {
            *secret = Some(REDACTED.to_string());
        }
    };
    hide(&mut copy.groq.api_key);
    hide(&mut copy.supabase.anon_key);
    hide(&mut copy.deepgram.api_key);
    copy
}

fn upstreams(config: &VctrConfig) -> [(&'static str, bool); 3] {
    [
        ("supabase", config.supabase.credentials().is_some()),
        ("groq", config.groq.key().is_some()),
        ("deepgram", config.deepgram.key().is_some()),
    ]
}
