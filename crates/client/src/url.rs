//! URL joining.

/// Joins URL segments with `/`.
///
/// Runs of slashes collapse into one, except directly after a `:` so
/// schemes survive, and a trailing slash is dropped.
///
/// # Example
///
/// ```
/// use sushisync_client::url::build_url;
///
/// let url = build_url(&["http://localhost:3000/", "//v1/", "/sushi/"]);
/// assert_eq!(url, "http://localhost:3000/v1/sushi");
/// ```
pub fn build_url<S: AsRef<str>>(parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/");

    let mut url = String::with_capacity(joined.len());
    let mut keep_run = false;
    for c in joined.chars() {
        if c == '/' {
            if url.ends_with(':') {
                keep_run = true;
            } else if url.ends_with('/') && !keep_run {
                continue;
            }
        } else {
            keep_run = false;
        }
        url.push(c);
    }

    if url.ends_with('/') && !url.ends_with("://") {
        url.pop();
    }
    url
}
