//! Utility functions for API operations.

/// URL-encodes a string for use in paths and query parameters.
pub fn urlencode<T: AsRef<str>>(s: T) -> String {
    url::form_urlencoded::byte_serialize(s.as_ref().as_bytes()).collect()
}
