use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_COUNTRY: &str = "us";

/// Account record: credentials plus the preference and bookmark state owned
/// by that account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub interests: Vec<String>,
    pub notifications: Vec<String>,
    pub country: String,
    pub bookmarks: Vec<Value>,
    pub created_at: OffsetDateTime,
}

/// Identity key of an article snapshot: `url` when it carries a non-empty
/// one, `title` otherwise. Snapshots without either have no identity and
/// cannot be bookmarked.
pub fn bookmark_key(article: &Value) -> Option<&str> {
    article
        .get("url")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            article
                .get("title")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
}

impl User {
    pub fn new(name: &str, email: &str, password_hash: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash: password_hash.to_string(),
            interests: Vec::new(),
            notifications: Vec::new(),
            country: DEFAULT_COUNTRY.to_string(),
            bookmarks: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Strict bookmark toggle: removes the bookmark sharing the article's
    /// identity key if one exists, appends the snapshot otherwise. Calling
    /// twice with the same article restores the prior list.
    pub fn toggle_bookmark(&mut self, article: &Value) {
        let Some(key) = bookmark_key(article) else {
            return;
        };
        if self.bookmarks.iter().any(|b| bookmark_key(b) == Some(key)) {
            self.bookmarks.retain(|b| bookmark_key(b) != Some(key));
        } else {
            self.bookmarks.push(article.clone());
        }
    }

    /// Wholesale replacement of the provided preference fields. Arrays
    /// replace even when empty; `country` only when non-empty.
    pub fn apply_preferences(
        &mut self,
        categories: Option<&[String]>,
        sources: Option<&[String]>,
        country: Option<&str>,
    ) {
        if let Some(categories) = categories {
            self.interests = categories.to_vec();
        }
        if let Some(sources) = sources {
            self.notifications = sources.to_vec();
        }
        if let Some(country) = country {
            if !country.is_empty() {
                self.country = country.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> User {
        User::new("Ana", "ana@x.com", "$argon2$fake")
    }

    #[test]
    fn new_user_has_empty_state_and_default_country() {
        let u = user();
        assert!(u.interests.is_empty());
        assert!(u.notifications.is_empty());
        assert!(u.bookmarks.is_empty());
        assert_eq!(u.country, "us");
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let serialized = serde_json::to_string(&user()).unwrap();
        assert!(!serialized.contains("password_hash"));
        assert!(!serialized.contains("argon2"));
    }

    #[test]
    fn toggle_twice_restores_prior_list() {
        let mut u = user();
        u.toggle_bookmark(&json!({"url": "https://a", "title": "keep me"}));
        u.toggle_bookmark(&json!({"url": "https://b"}));
        let before = u.bookmarks.clone();

        let article = json!({"url": "https://c", "title": "c"});
        u.toggle_bookmark(&article);
        assert_eq!(u.bookmarks.len(), 3);
        u.toggle_bookmark(&article);
        assert_eq!(u.bookmarks, before);
    }

    #[test]
    fn toggle_preserves_insertion_order() {
        let mut u = user();
        u.toggle_bookmark(&json!({"url": "https://1"}));
        u.toggle_bookmark(&json!({"url": "https://2"}));
        u.toggle_bookmark(&json!({"url": "https://3"}));
        u.toggle_bookmark(&json!({"url": "https://2"}));
        let urls: Vec<&str> = u
            .bookmarks
            .iter()
            .map(|b| b["url"].as_str().unwrap())
            .collect();
        assert_eq!(urls, ["https://1", "https://3"]);
    }

    #[test]
    fn url_identity_wins_over_differing_fields() {
        let mut u = user();
        u.toggle_bookmark(&json!({"url": "https://a", "title": "first"}));
        // Same url, different title: still the same article.
        u.toggle_bookmark(&json!({"url": "https://a", "title": "second"}));
        assert!(u.bookmarks.is_empty());
    }

    #[test]
    fn title_identity_applies_when_url_absent() {
        let mut u = user();
        u.toggle_bookmark(&json!({"title": "breaking"}));
        u.toggle_bookmark(&json!({"title": "breaking", "source": "elsewhere"}));
        assert!(u.bookmarks.is_empty());
    }

    #[test]
    fn empty_url_falls_back_to_title() {
        assert_eq!(
            bookmark_key(&json!({"url": "", "title": "fallback"})),
            Some("fallback")
        );
        assert_eq!(bookmark_key(&json!({"source": "x"})), None);
        assert_eq!(bookmark_key(&json!({"url": "", "title": ""})), None);
    }

    #[test]
    fn toggle_ignores_article_without_identity() {
        let mut u = user();
        u.toggle_bookmark(&json!({"source": "nowhere"}));
        assert!(u.bookmarks.is_empty());
    }

    #[test]
    fn preferences_replace_wholesale() {
        let mut u = user();
        u.apply_preferences(Some(&["tech".into(), "sports".into()]), None, None);
        assert_eq!(u.interests, ["tech", "sports"]);
        assert!(u.notifications.is_empty());
        assert_eq!(u.country, "us");

        // A provided empty array clears, untouched fields stay.
        u.apply_preferences(Some(&[]), Some(&["bbc".into()]), Some("de"));
        assert!(u.interests.is_empty());
        assert_eq!(u.notifications, ["bbc"]);
        assert_eq!(u.country, "de");
    }

    #[test]
    fn empty_country_is_ignored() {
        let mut u = user();
        u.apply_preferences(None, None, Some("fr"));
        u.apply_preferences(None, None, Some(""));
        assert_eq!(u.country, "fr");
    }
}
