use url::Url;

/// The same-host scope of a crawl
///
/// Two addresses are in the same scope when their hosts match
/// case-insensitively and their explicit ports are equal. A port equal to
/// the scheme default is not explicit, so `http://example.com:80`,
/// `http://example.com` and `https://example.com` share a scope while
/// `127.0.0.1:3000` and `127.0.0.1:4000` do not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteScope {
    host: String,
    port: Option<u16>,
}

impl SiteScope {
    /// Builds the scope of the given URL
    ///
    /// Returns None if the URL has no host.
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use crawl_o_matic::url::SiteScope;
    ///
    /// let seed = Url::parse("https://EXAMPLE.com/start").unwrap();
    /// let scope = SiteScope::of(&seed).unwrap();
    /// assert_eq!(scope.host(), "example.com");
    ///
    /// assert!(scope.contains(&Url::parse("https://example.com/other").unwrap()));
    /// assert!(!scope.contains(&Url::parse("https://blog.example.com/").unwrap()));
    /// ```
    pub fn of(url: &Url) -> Option<Self> {
        let host = url.host_str().filter(|h| !h.is_empty())?;

        Some(Self {
            host: host.to_lowercase(),
            port: url.port(),
        })
    }

    /// Returns true if `url` is on the same host and port as this scope
    pub fn contains(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => {
                host.eq_ignore_ascii_case(&self.host) && url.port() == self.port
            }
            None => false,
        }
    }

    /// The lowercase host of this scope
    pub fn host(&self) -> &str {
        &self.host
    }
}
