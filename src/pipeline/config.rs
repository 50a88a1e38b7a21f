//! Per-platform pipeline parameterization.
//!
//! Platforms differ only in data: where the generated file lands, which
//! prompts drive generation, and how a fix prompt is built. Everything
//! else (the six-stage flow, the retry loop, the status reporting) is
//! the one generic pipeline. Adding a platform is a new constructor here,
//! not new pipeline code.

use super::prompts;
use crate::types::Platform;

/// Value object configuring one platform's pipeline.
#[derive(Clone)]
pub struct PlatformConfig {
    pub platform: Platform,
    /// Workspace-relative path for a generated component. The same
    /// function feeds the write stage and the post-lint re-read.
    pub path_for: fn(&str) -> String,
    pub system_prompt: &'static str,
    pub user_prompt_start: &'static str,
    pub fix_system_prompt: &'static str,
    pub fix_user_prompt: fn(&str, &str) -> String,
}

impl PlatformConfig {
    /// Web target: Next.js preview page.
    #[must_use]
    pub fn web() -> Self {
        Self {
            platform: Platform::Web,
            path_for: web_component_path,
            system_prompt: prompts::WEB_SYSTEM_PROMPT,
            user_prompt_start: prompts::WEB_USER_PROMPT_START,
            fix_system_prompt: prompts::WEB_FIX_SYSTEM_PROMPT,
            fix_user_prompt: prompts::web_fix_user_prompt,
        }
    }

    /// Mobile target: React Native preview screen.
    #[must_use]
    pub fn mobile() -> Self {
        Self {
            platform: Platform::Mobile,
            path_for: mobile_component_path,
            system_prompt: prompts::MOBILE_SYSTEM_PROMPT,
            user_prompt_start: prompts::MOBILE_USER_PROMPT_START,
            fix_system_prompt: prompts::MOBILE_FIX_SYSTEM_PROMPT,
            fix_user_prompt: prompts::mobile_fix_user_prompt,
        }
    }
}

/// `src/app/preview/<name>/page.tsx`
#[must_use]
pub fn web_component_path(component_name: &str) -> String {
    format!("src/app/preview/{component_name}/page.tsx")
}

/// `src/screens/preview/<name>.tsx`
#[must_use]
pub fn mobile_component_path(component_name: &str) -> String {
    format!("src/screens/preview/{component_name}.tsx")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_deterministic_per_platform() {
        assert_eq!(
            web_component_path("Card-abc12345"),
            "src/app/preview/Card-abc12345/page.tsx"
        );
        assert_eq!(
            mobile_component_path("Card-abc12345"),
            "src/screens/preview/Card-abc12345.tsx"
        );
    }
}
