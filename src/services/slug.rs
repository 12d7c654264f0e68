use crate::database::{DatabaseError, Gateway};

/// Store identifier the router treats as the domain-lookup namespace
pub const RESERVED_SLUG: &str = "by-domain";

/// Upper bound on disambiguation suffixes tried for one base slug
pub const MAX_SLUG_ATTEMPTS: u32 = 1000;

/// Derive the base slug for a store name.
///
/// Lowercases, keeps ASCII letters and digits, collapses every other run of
/// characters into a single `-`, and trims dashes at both ends:
/// `"My Shop!"` → `"my-shop"`. Names with nothing usable fall back to
/// `"store"`, and the reserved `by-domain` identifier is never produced.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        return "store".to_string();
    }
    if slug == RESERVED_SLUG {
        slug.push_str("-store");
    }
    slug
}

/// Candidate slug for a given attempt: the base first, then `base-1`, `base-2`, ...
pub fn candidate(base: &str, attempt: u32) -> String {
    match attempt {
        0 => base.to_string(),
        n => format!("{base}-{n}"),
    }
}

/// First candidate at or after `start` that the gateway does not know yet.
///
/// Returns the attempt number alongside the slug so a caller that loses an
/// insert race can resume from the next suffix. `None` once the attempt
/// bound is exhausted.
pub async fn next_free_slug(
    gateway: &dyn Gateway,
    base: &str,
    start: u32,
) -> Result<Option<(u32, String)>, DatabaseError> {
    for attempt in start..MAX_SLUG_ATTEMPTS {
        let slug = candidate(base, attempt);
        if !gateway.slug_exists(&slug).await? {
            return Ok(Some((attempt, slug)));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{NewSeller, NewStore};
    use crate::database::MemoryGateway;

    #[test]
    fn slugify_strips_punctuation_and_case() {
        assert_eq!(slugify("My Shop!"), "my-shop");
        assert_eq!(slugify("Acme"), "acme");
        assert_eq!(slugify("  Tea & Biscuits -- Co.  "), "tea-biscuits-co");
        assert_eq!(slugify("Café 42"), "caf-42");
    }

    #[test]
    fn slugify_never_yields_empty_or_reserved() {
        assert_eq!(slugify("!!!"), "store");
        assert_eq!(slugify(""), "store");
        assert_eq!(slugify("By Domain"), "by-domain-store");
    }

    #[test]
    fn candidates_are_strictly_increasing() {
        assert_eq!(candidate("my-shop", 0), "my-shop");
        assert_eq!(candidate("my-shop", 1), "my-shop-1");
        assert_eq!(candidate("my-shop", 12), "my-shop-12");
    }

    #[tokio::test]
    async fn next_free_slug_skips_taken_candidates() {
        let gateway = MemoryGateway::new();
        let (_, profile) = gateway
            .create_seller(NewSeller {
                email: "owner@example.com".to_string(),
                password_hash: "x".to_string(),
                first_name: None,
                last_name: None,
                store_name: "My Shop".to_string(),
                store_description: None,
            })
            .await
            .unwrap();

        for slug in ["my-shop", "my-shop-1"] {
            gateway
                .create_store(NewStore {
                    seller_id: profile.id,
                    slug: slug.to_string(),
                    name: "My Shop".to_string(),
                    description: None,
                    custom_domain: None,
                })
                .await
                .unwrap();
        }

        let next = next_free_slug(&gateway, "my-shop", 0).await.unwrap();
        assert_eq!(next, Some((2, "my-shop-2".to_string())));

        let resumed = next_free_slug(&gateway, "my-shop", 5).await.unwrap();
        assert_eq!(resumed, Some((5, "my-shop-5".to_string())));

        let exhausted = next_free_slug(&gateway, "my-shop", MAX_SLUG_ATTEMPTS).await.unwrap();
        assert_eq!(exhausted, None);
    }
}
