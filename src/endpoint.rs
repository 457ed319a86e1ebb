//! Turning connector and endpoint parameters into a request URL.

/// How the request URL is assembled from the connector and endpoint values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlResolution {
    /// Drop one leading `/` from the endpoint and append it to the host as-is.
    ///
    /// Assumes the connector host already ends with `/`.
    Concatenate,
    /// Trim every trailing `/` from the host and every leading `/` from the
    /// endpoint, then join them with exactly one `/`.
    JoinNormalized,
    /// The connector value is the full URL; there is no endpoint parameter.
    Verbatim,
}

impl UrlResolution {
    /// Whether this strategy reads a separate endpoint-path parameter.
    pub fn uses_endpoint(&self) -> bool {
        !matches!(self, UrlResolution::Verbatim)
    }

    /// Build the request URL. `endpoint` is ignored by [`Verbatim`](Self::Verbatim).
    pub fn resolve(&self, host: &str, endpoint: &str) -> String {
        match self {
            UrlResolution::Concatenate => {
                let path = endpoint.strip_prefix('/').unwrap_or(endpoint);
                format!("{host}{path}")
            }
            UrlResolution::JoinNormalized => format!(
                "{}/{}",
                host.trim_end_matches('/'),
                endpoint.trim_start_matches('/')
            ),
            UrlResolution::Verbatim => host.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concatenate() {
        let r = UrlResolution::Concatenate;
        assert_eq!(r.resolve("https://a.com/", "/x/"), "https://a.com/x/");
        assert_eq!(r.resolve("https://a.com/", "x/"), "https://a.com/x/");
        assert_eq!(
            r.resolve("https://a.com/", "/services/data/v54.0/sobjects/"),
            "https://a.com/services/data/v54.0/sobjects/"
        );
        // Only one leading slash is removed; the host is never touched.
        assert_eq!(r.resolve("https://a.com/", "//x"), "https://a.com//x");
        assert_eq!(r.resolve("https://a.com", "/x"), "https://a.comx");
    }

    #[test]
    fn test_join_normalized() {
        let r = UrlResolution::JoinNormalized;
        assert_eq!(r.resolve("https://a.com/", "/x/"), "https://a.com/x/");
        assert_eq!(r.resolve("https://a.com", "x"), "https://a.com/x");
        assert_eq!(r.resolve("https://a.com///", "///x/y/"), "https://a.com/x/y/");
        assert_eq!(r.resolve("https://a.com", ""), "https://a.com/");
    }

    #[test]
    fn test_join_normalized_always_one_separator() {
        for host_slashes in 0..4 {
            for path_slashes in 0..4 {
                let host = format!("https://a.com{}", "/".repeat(host_slashes));
                let path = format!("{}services/data", "/".repeat(path_slashes));
                assert_eq!(
                    UrlResolution::JoinNormalized.resolve(&host, &path),
                    "https://a.com/services/data"
                );
            }
        }
    }

    #[test]
    fn test_verbatim() {
        let r = UrlResolution::Verbatim;
        assert!(!r.uses_endpoint());
        assert_eq!(
            r.resolve("https://a.com//services/data/?q=1", "/ignored"),
            "https://a.com//services/data/?q=1"
        );
    }
}
