/// Joins a host and port into an address, bracketing IPv6 literals.
pub fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Returns the string if it is set and not empty.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|x| !x.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_host_port() {
        assert_eq!(join_host_port("1.2.3.4", 443), "1.2.3.4:443");
        assert_eq!(join_host_port("example.com", 8443), "example.com:8443");
        assert_eq!(join_host_port("2001:db8::1", 443), "[2001:db8::1]:443");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(&None), None);
        assert_eq!(non_empty(&Some(String::new())), None);
        assert_eq!(non_empty(&Some("a".to_owned())), Some("a"));
    }
}
