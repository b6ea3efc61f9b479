use utoipa::OpenApi;

/// Aggregated OpenAPI document for the accounts API
#[derive(OpenApi)]
#[openapi(
    info(title = "Accounts API", description = "User account management"),
    nest(
        (path = "/api/users", api = domain_users::ApiDoc)
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_paths_are_published_under_api() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/api/users"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/users/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/users/{id}/password"));
    }
}
