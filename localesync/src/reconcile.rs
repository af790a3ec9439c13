//! Matching local locale files against the remote locale list.
//!
//! The match rules are tried in priority order; for each rule every remote
//! locale is checked before moving on to the next rule. The first hit wins.

use crate::locale::{LocaleFile, RemoteLocale};
use crate::pattern::replace_placeholder_in_param;

/// What the caller configured beyond the file itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchContext<'a> {
    /// The `locale_id` parameter of the source, possibly holding `<locale_code>`.
    pub locale_id: &'a str,
}

pub type MatchRule = fn(&MatchContext<'_>, &LocaleFile, &RemoteLocale) -> bool;

pub const RULES: [(&str, MatchRule); 4] = [
    ("explicit locale id", matches_explicit_id),
    ("locale id with code", matches_param_substring),
    ("locale name", matches_name),
    ("locale code", matches_code),
];

/// The configured locale id names this remote locale, by name or by id.
pub fn matches_explicit_id(ctx: &MatchContext<'_>, _: &LocaleFile, remote: &RemoteLocale) -> bool {
    !ctx.locale_id.is_empty() && (remote.name == ctx.locale_id || remote.id == ctx.locale_id)
}

pub fn matches_param_substring(
    ctx: &MatchContext<'_>,
    file: &LocaleFile,
    remote: &RemoteLocale,
) -> bool {
    let locale_name = replace_placeholder_in_param(ctx.locale_id, &file.code);
    !locale_name.is_empty() && remote.name.contains(&locale_name)
}

pub fn matches_name(_: &MatchContext<'_>, file: &LocaleFile, remote: &RemoteLocale) -> bool {
    !file.name.is_empty() && remote.name == file.name
}

pub fn matches_code(_: &MatchContext<'_>, file: &LocaleFile, remote: &RemoteLocale) -> bool {
    !file.code.is_empty() && remote.name == file.code
}

pub fn find_remote<'r>(
    ctx: &MatchContext<'_>,
    file: &LocaleFile,
    remotes: &'r [RemoteLocale],
) -> Option<&'r RemoteLocale> {
    RULES.iter().find_map(|(rule_name, rule)| {
        let found = remotes.iter().find(|remote| rule(ctx, file, remote));
        if let Some(remote) = found {
            log::debug!(
                "Matched {:?} to remote locale {:?} by {}",
                file.code,
                remote.name,
                rule_name
            );
        }
        found
    })
}

/// Adopts the matching remote identity, if any. Returns whether one was found;
/// otherwise the file stays as extracted and counts as a new locale.
pub fn reconcile(ctx: &MatchContext<'_>, file: &mut LocaleFile, remotes: &[RemoteLocale]) -> bool {
    match find_remote(ctx, file, remotes) {
        Some(remote) => {
            file.adopt(remote);
            true
        }
        None => false,
    }
}
