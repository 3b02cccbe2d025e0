//! Slug generation for scholar, category, and subcategory ids.

/// Fallback token for scholar ids.
pub const SCHOLAR_FALLBACK: &str = "scholar";
/// Fallback token for category ids.
pub const CATEGORY_FALLBACK: &str = "category";
/// Fallback token for subcategory ids.
pub const SUBCATEGORY_FALLBACK: &str = "subcategory";

/// Converts a display name to an id slug.
///
/// - Converts to lowercase
/// - Replaces every run of characters outside `[a-z0-9]` with one underscore
/// - Trims leading/trailing underscores
/// - Returns `fallback` for empty results
///
/// The result only contains `[a-z0-9_]` with no doubled or edge underscores,
/// so slugifying a slug returns it unchanged.
///
/// # Examples
///
/// ```
/// use corpus_vault::infra::slugify;
///
/// assert_eq!(slugify("Ibn Taymiyyah", "scholar"), "ibn_taymiyyah");
/// assert_eq!(slugify("Al-Nawawi (d. 676)", "scholar"), "al_nawawi_d_676");
/// assert_eq!(slugify("ابن تيمية", "scholar"), "scholar");
/// ```
pub fn slugify(input: &str, fallback: &str) -> String {
    let lower = input.to_lowercase();

    let mut result = String::with_capacity(lower.len());
    let mut last_underscore = false;
    for c in lower.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            result.push(c);
            last_underscore = false;
        } else if !last_underscore {
            result.push('_');
            last_underscore = true;
        }
    }

    let trimmed = result.trim_matches('_');
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Returns `base` if unused, else the first of `base_2`, `base_3`, ... that
/// `is_taken` rejects.
///
/// # Examples
///
/// ```
/// use corpus_vault::infra::unique_slug;
///
/// let taken = ["fiqh", "fiqh_2"];
/// assert_eq!(unique_slug("fiqh", |c| taken.contains(&c)), "fiqh_3");
/// assert_eq!(unique_slug("tafsir", |c| taken.contains(&c)), "tafsir");
/// ```
pub fn unique_slug(base: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(base) {
        return base.to_string();
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{}_{}", base, n);
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Joins slug parts with underscores, slugifying each part.
///
/// Used for child ids such as `{scholar_id}_{category}`.
pub fn child_slug(parent_id: &str, parts: &[&str], fallback: &str) -> String {
    let mut slug = parent_id.to_string();
    for part in parts {
        slug.push('_');
        slug.push_str(&slugify(part, fallback));
    }
    slug
}
