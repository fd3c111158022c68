//! OAuth2 scopes

common::wire_enum! {
    /// A grant of API capability requested during authorization.
    ///
    /// Rendered on the wire (authorize URL, token responses) by its camelCase
    /// name, never by the Rust variant name.
    pub enum Scope {
        BasicProfile => "basicProfile",
        ListPublications => "listPublications",
        PublishPost => "publishPost",
        UploadImage => "uploadImage",
    }
}

/// Join scopes with `,` using their wire strings, preserving caller order.
pub fn join_scopes(scopes: &[Scope]) -> String {
    scopes
        .iter()
        .map(Scope::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
