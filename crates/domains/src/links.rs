//! # Link Resolution
//!
//! Menu items carry an `href`, a link type, and (for categories) a
//! backing row id. Everything that derives or parses those hrefs lives
//! here so the menu graph, the ACL resolver, and the edge gate agree on
//! one set of rules.

use crate::models::LinkType;
use crate::slug::slugify;

/// Path prefix of category menu links (`/products/<slug>`).
pub const PRODUCTS_PREFIX: &str = "/products/";
/// Path prefix of the gated content pages (`/contents/<slug>/...`).
pub const CONTENTS_PREFIX: &str = "/contents/";
/// Base path of the community group.
pub const COMMUNITY_BASE: &str = "/community";

/// Builds the canonical menu href for a category slug.
pub fn category_href(slug: &str) -> String {
    format!("{PRODUCTS_PREFIX}{slug}")
}

/// Explicit link type wins; otherwise a `/community` href means
/// community, and everything else defaults to category.
pub fn resolve_link_type(explicit: Option<LinkType>, href: Option<&str>) -> LinkType {
    if let Some(lt) = explicit {
        return lt;
    }
    match href {
        Some(h) if h.starts_with(COMMUNITY_BASE) => LinkType::Community,
        _ => LinkType::Category,
    }
}

/// Resolves the category slug for a category-type menu item: a known
/// href prefix is stripped, a bare href is used as-is minus leading
/// slashes, and with no href at all the label is slugified. Empty
/// output means the item cannot be linked and must be rejected.
pub fn resolve_category_slug(href: Option<&str>, label: Option<&str>) -> String {
    if let Some(href) = href.filter(|h| !h.trim().is_empty()) {
        if let Some(slug) = strip_category_prefix(href) {
            return slug.to_string();
        }
        return href.trim_start_matches('/').trim().to_string();
    }
    label.map(slugify).unwrap_or_default()
}

/// Parses a category slug back out of a stored href. Accepts both the
/// menu form (`/products/...`) and the page-route form (`/contents/...`).
pub fn parse_category_slug_from_href(href: &str) -> Option<String> {
    let slug = strip_category_prefix(href)?;
    if slug.is_empty() {
        return None;
    }
    Some(slug.to_string())
}

fn strip_category_prefix(href: &str) -> Option<&str> {
    let rest = href
        .strip_prefix(PRODUCTS_PREFIX)
        .or_else(|| href.strip_prefix(CONTENTS_PREFIX))?;
    Some(rest.trim_start_matches('/').trim())
}

/// Derives the community-group slug for a community-type menu item:
/// the first path segment after `/community`, else a slug derived from
/// the label.
pub fn extract_community_slug(href: &str, label: &str) -> String {
    if let Some(rest) = href.strip_prefix(COMMUNITY_BASE) {
        let segment = rest
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or("")
            .trim();
        if !segment.is_empty() {
            return segment.to_string();
        }
    }
    slugify(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_type_resolution_order() {
        assert_eq!(
            resolve_link_type(Some(LinkType::Community), Some("/products/x")),
            LinkType::Community
        );
        assert_eq!(
            resolve_link_type(None, Some("/community/free")),
            LinkType::Community
        );
        assert_eq!(resolve_link_type(None, Some("/products/x")), LinkType::Category);
        assert_eq!(resolve_link_type(None, None), LinkType::Category);
    }

    #[test]
    fn category_slug_from_href_or_label() {
        assert_eq!(
            resolve_category_slug(Some("/products/vip-trip"), None),
            "vip-trip"
        );
        assert_eq!(
            resolve_category_slug(Some("/contents/golf"), None),
            "golf"
        );
        assert_eq!(resolve_category_slug(Some("/plain"), None), "plain");
        assert_eq!(
            resolve_category_slug(None, Some("VIP 여행")),
            slugify("VIP 여행")
        );
        assert_eq!(resolve_category_slug(None, None), "");
    }

    #[test]
    fn parses_stored_hrefs() {
        assert_eq!(
            parse_category_slug_from_href("/products/casino").as_deref(),
            Some("casino")
        );
        assert_eq!(
            parse_category_slug_from_href("/contents/vip-trip").as_deref(),
            Some("vip-trip")
        );
        assert_eq!(parse_category_slug_from_href("/elsewhere/x"), None);
        assert_eq!(parse_category_slug_from_href("/products/"), None);
    }

    #[test]
    fn community_slug_prefers_href_segment() {
        assert_eq!(extract_community_slug("/community/notice", "커뮤니티"), "notice");
        assert_eq!(
            extract_community_slug("/community/free/123", "커뮤니티"),
            "free"
        );
        assert_eq!(
            extract_community_slug("/community", "커뮤니티"),
            slugify("커뮤니티")
        );
        assert_eq!(extract_community_slug("", "Lounge"), "lounge");
    }
}
