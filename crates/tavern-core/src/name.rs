//! Group naming: display names, normalized command names, and the role
//! naming convention that binds a role pair to its group.

use chrono::Utc;

/// Suffix of the member role for a group, appended to the display name.
pub const MEMBER_ROLE_SUFFIX: &str = " Member";

/// Suffix of the GM role for a group, appended to the display name.
pub const GM_ROLE_SUFFIX: &str = " GM";

/// Generated default names are offset back by 50 years of seconds so they
/// come out as short hex tokens instead of raw timestamps.
const NAME_EPOCH_OFFSET_SECS: u64 = 50 * 31_536_000;

/// Quote characters stripped outright rather than collapsed to a separator,
/// so "Don't Panic" normalizes to `dont-panic`, not `don-t-panic`.
const QUOTES: [char; 7] = [
    '\'', '"', '`', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
];

// ---------------------------------------------------------------------------
// Command names
// ---------------------------------------------------------------------------

/// Derive the command-safe token for a display name: lowercased, quotes
/// stripped, every run of remaining non-alphanumeric characters collapsed
/// to a single `-`, no leading or trailing separator.
///
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(display_name: &str) -> String {
    let mut out = String::with_capacity(display_name.len());
    let mut pending_sep = false;
    for ch in display_name.chars() {
        if QUOTES.contains(&ch) {
            continue;
        }
        for lc in ch.to_lowercase() {
            if lc.is_alphanumeric() {
                if pending_sep && !out.is_empty() {
                    out.push('-');
                }
                pending_sep = false;
                out.push(lc);
            } else {
                pending_sep = true;
            }
        }
    }
    out
}

/// Synthesize a display name for a creation request that supplied none.
pub fn default_group_name() -> String {
    synthesized_name(Utc::now().timestamp().max(0) as u64)
}

fn synthesized_name(unix_seconds: u64) -> String {
    format!("{:X}", unix_seconds.saturating_sub(NAME_EPOCH_OFFSET_SECS))
}

// ---------------------------------------------------------------------------
// Role naming convention
// ---------------------------------------------------------------------------

pub fn member_role_name(display_name: &str) -> String {
    format!("{display_name}{MEMBER_ROLE_SUFFIX}")
}

pub fn gm_role_name(display_name: &str) -> String {
    format!("{display_name}{GM_ROLE_SUFFIX}")
}

/// If `role_name` follows the member-role convention, return the display
/// name it belongs to. Used by the purge sweep to find orphaned roles.
pub fn display_from_member_role(role_name: &str) -> Option<&str> {
    role_name.strip_suffix(MEMBER_ROLE_SUFFIX)
}

/// GM-role counterpart of [`display_from_member_role`].
pub fn display_from_gm_role(role_name: &str) -> Option<&str> {
    role_name.strip_suffix(GM_ROLE_SUFFIX)
}
