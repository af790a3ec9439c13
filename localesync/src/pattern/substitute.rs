use std::path::{Path, PathBuf, is_separator};

use super::{Pattern, Placeholder};
use crate::error::PatternError;
use crate::locale::LocaleFile;
use crate::paths::absolute;

/// Fills the pattern's placeholders from a known locale and resolves the
/// result to an absolute path.
///
/// Every placeholder the pattern uses must have a value on the locale, and
/// that value must stay within its segment.
pub fn substitute(pattern: &Pattern, locale: &LocaleFile) -> Result<PathBuf, PatternError> {
    let mut path = pattern.as_str().to_string();

    for placeholder in Placeholder::ALL {
        if !pattern.contains(placeholder) {
            continue;
        }
        let value = locale.attribute(placeholder);
        if value.is_empty() {
            return Err(PatternError::MissingAttribute {
                pattern: pattern.to_string(),
                placeholder: placeholder.token(),
            });
        }
        if !is_path_safe(value) {
            return Err(PatternError::UnsafeAttribute {
                placeholder: placeholder.token(),
                value: value.to_string(),
            });
        }
        path = path.replace(placeholder.token(), value);
    }

    absolute(Path::new(&path)).map_err(|source| PatternError::Absolute {
        path: PathBuf::from(path),
        source,
    })
}

/// Remote values must stay inside the single segment they replace.
fn is_path_safe(value: &str) -> bool {
    !value.contains(is_separator)
        && !value.contains("..")
        && !Placeholder::ALL.iter().any(|p| value.contains(p.token()))
}

/// Replaces `<locale_code>` inside a configured locale id (e.g. `"app-<locale_code>"`).
///
/// Returns an empty string when there is no code or nothing to replace.
pub fn replace_placeholder_in_param(param: &str, code: &str) -> String {
    let token = Placeholder::LocaleCode.token();
    if !code.is_empty() && param.contains(token) {
        param.replacen(token, code, 1)
    } else {
        String::new()
    }
}
