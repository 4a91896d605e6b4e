use crate::utils::state::Config;

/// Avatars are stored as bare object keys; expand them to public URLs
/// before they leave the service.
pub fn normalize_url(url: Option<String>, config: &Config) -> Option<String> {
    match url {
        Some(u) if !u.contains("://") => Some(format!("{}/{}", config.storage_url, u)),
        Some(u) => Some(u),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            signature_key: "k".to_string(),
            url: "localhost:8080".to_string(),
            server_id: 0,
            storage_url: "https://storage.postline.app".to_string(),
        }
    }

    #[test]
    fn bare_keys_get_prefixed() {
        assert_eq!(
            normalize_url(Some("avatars/42.png".to_string()), &config()),
            Some("https://storage.postline.app/avatars/42.png".to_string())
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        let url = "https://cdn.example.com/a.png".to_string();
        assert_eq!(normalize_url(Some(url.clone()), &config()), Some(url));
        assert_eq!(normalize_url(None, &config()), None);
    }
}
