//! Resource models
//!
//! Every field the API may omit is an `Option` (or an empty `Vec` for tags),
//! and absent values are left out of serialized JSON. Values are built with
//! struct literals and `..Default::default()`.

use serde::{Deserialize, Serialize};

common::wire_enum! {
    /// Visibility of a post.
    pub enum PublishStatus {
        Public => "public",
        Draft => "draft",
        Unlisted => "unlisted",
    }
}

common::wire_enum! {
    /// Markup used by a submission's `content`.
    pub enum ContentFormat {
        Html => "html",
        Markdown => "markdown",
    }
}

common::wire_enum! {
    /// License a post is published under.
    pub enum License {
        AllRightsReserved => "all-rights-reserved",
        Cc40By => "cc-40-by",
        Cc40BySa => "cc-40-by-sa",
        Cc40ByNd => "cc-40-by-nd",
        Cc40ByNc => "cc-40-by-nc",
        Cc40ByNcNd => "cc-40-by-nc-nd",
        Cc40ByNcSa => "cc-40-by-nc-sa",
        Cc40Zero => "cc-40-zero",
        PublicDomain => "public-domain",
    }
}

common::wire_enum! {
    /// A user's relationship to a publication.
    pub enum Role {
        Editor => "editor",
        Writer => "writer",
    }
}

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Membership of a user in a publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub publication_id: String,
    pub user_id: String,
    pub role: Role,
}

/// A post as returned by the API after creation.
///
/// `published_at` is a unix timestamp in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_status: Option<PublishStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
}

/// A new post to create.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_format: Option<ContentFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_status: Option<PublishStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_followers: Option<bool>,
}

/// Error response body: `{"errors": [{"message": "...", "code": 6000}]}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub code: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::ModelConverter;
    use serde_json::json;

    #[test]
    fn license_wire_strings() {
        assert_eq!(License::AllRightsReserved.as_str(), "all-rights-reserved");
        assert_eq!(License::Cc40ByNcNd.as_str(), "cc-40-by-nc-nd");
        assert_eq!("public-domain".parse::<License>().unwrap(), License::PublicDomain);
        assert_eq!(License::ALL.len(), 9);
        assert!("cc-by".parse::<License>().is_err());
    }

    #[test]
    fn unknown_enum_values_fail_deserialization() {
        assert!(serde_json::from_str::<PublishStatus>(r#""scheduled""#).is_err());
        assert!(serde_json::from_str::<ContentFormat>(r#""rtf""#).is_err());
        assert!(serde_json::from_str::<Role>(r#""owner""#).is_err());
        assert!(serde_json::from_str::<PublishStatus>(r#""PUBLIC""#).is_err());
    }

    #[test]
    fn user_uses_camel_case_keys() {
        let user: User = serde_json::from_value(json!({
            "id": "5303d74c64f66366f00cb9b2a94f3251bf5",
            "username": "majelbstoat",
            "name": "Jamie Talbot",
            "url": "https://medium.com/@majelbstoat",
            "imageUrl": "https://images.medium.com/0*fkfQiTzT7TlUGGyI.png"
        }))
        .unwrap();
        assert_eq!(user.username.as_deref(), Some("majelbstoat"));
        assert!(user.image_url.is_some());
    }

    #[test]
    fn absent_fields_are_omitted_when_serializing() {
        let submission = Submission {
            title: Some("Liverpool FC".into()),
            content_format: Some(ContentFormat::Html),
            ..Submission::default()
        };
        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value, json!({"title": "Liverpool FC", "contentFormat": "html"}));
    }

    #[test]
    fn submission_serializes_every_field() {
        let submission = Submission {
            title: Some("Liverpool FC".into()),
            content_format: Some(ContentFormat::Markdown),
            content: Some("# Liverpool FC\nYou'll never walk alone.".into()),
            tags: vec!["football".into(), "sport".into()],
            canonical_url: Some("http://jamietalbot.com/posts/liverpool-fc".into()),
            publish_status: Some(PublishStatus::Draft),
            license: Some(License::Cc40By),
            notify_followers: Some(false),
        };
        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["contentFormat"], "markdown");
        assert_eq!(value["canonicalUrl"], "http://jamietalbot.com/posts/liverpool-fc");
        assert_eq!(value["publishStatus"], "draft");
        assert_eq!(value["license"], "cc-40-by");
        assert_eq!(value["notifyFollowers"], false);
        assert_eq!(value["tags"], json!(["football", "sport"]));
    }

    #[test]
    fn post_round_trips_through_converter_and_envelope() {
        let post = Post {
            id: Some("e6f36a".into()),
            title: Some("Liverpool FC".into()),
            author_id: Some("5303d74c64f66366f00cb9b2a94f3251bf5".into()),
            tags: vec!["football".into()],
            url: Some("https://medium.com/@majelbstoat/liverpool-fc-e6f36a".into()),
            canonical_url: Some("http://jamietalbot.com/posts/liverpool-fc".into()),
            publish_status: Some(PublishStatus::Public),
            published_at: Some(1442286338435),
            license: Some(License::AllRightsReserved),
            license_url: Some("https://medium.com/policy/9db0094a1e0f".into()),
        };
        let converter = ModelConverter;
        let json = converter.serialize(&post).unwrap();

        let bare: Post = converter.deserialize_single(&json).unwrap();
        let wrapped: Post = converter
            .deserialize_single(&format!(r#"{{"data":{json}}}"#))
            .unwrap();
        assert_eq!(bare, post);
        assert_eq!(wrapped, post);
    }

    #[test]
    fn contributor_requires_known_role() {
        let ok: Contributor = serde_json::from_value(json!({
            "publicationId": "b45573563f5a",
            "userId": "13a06af8f81849c64dafbce822cbafbfab7ed7cecf82135bca946807ea351290d",
            "role": "editor"
        }))
        .unwrap();
        assert_eq!(ok.role, Role::Editor);

        let bad = serde_json::from_value::<Contributor>(json!({
            "publicationId": "b45573563f5a",
            "userId": "x",
            "role": "admin"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn api_error_body_parses() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"errors":[{"message":"Token was invalid.","code":6003}]}"#,
        )
        .unwrap();
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].code, 6003);
    }
}
