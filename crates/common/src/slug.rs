//! Project name slugs for archive filenames, repository names, and deployments

/// Fallback slug for unnamed threads or names with no usable characters
pub const DEFAULT_PROJECT_SLUG: &str = "canvasforge-project";

/// Derive a URL- and filename-safe slug from a free-form project name.
///
/// Lowercases, replaces every run of non ASCII-alphanumeric characters with a
/// single hyphen, and trims hyphens at both ends. An empty result falls back
/// to [`DEFAULT_PROJECT_SLUG`] so downstream sinks always get a usable name.
pub fn project_slug(name: &str) -> String {
    let raw = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>();

    // Collapse consecutive hyphens and trim leading/trailing
    let mut slug = String::with_capacity(raw.len());
    let mut prev_hyphen = false;
    for ch in raw.chars() {
        if ch == '-' {
            if !prev_hyphen {
                slug.push(ch);
            }
            prev_hyphen = true;
        } else {
            slug.push(ch);
            prev_hyphen = false;
        }
    }
    let slug = slug.trim_matches('-').to_string();

    if slug.is_empty() {
        return DEFAULT_PROJECT_SLUG.to_string();
    }

    slug
}
