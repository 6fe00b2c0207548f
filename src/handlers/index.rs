//! Contains the `/` preview page.

use axum::response::Html;
use axum::routing::get;
use axum::Router;

/// A small developer convenience page: type a date and a label, watch the
/// badge update in the embedded preview, copy the URL.
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<title>Countdown Badge</title>
<style>
  body { font-family: 'Hiragino Sans', 'Meiryo', sans-serif; max-width: 40rem; margin: 2rem auto; padding: 0 1rem; }
  label { display: block; margin-top: 1rem; }
  input { width: 100%; padding: 0.4rem; font-size: 1rem; box-sizing: border-box; }
  iframe { border: 1px solid #ccc; margin-top: 1.5rem; display: block; }
  #url-row { display: flex; gap: 0.5rem; margin-top: 1rem; }
  #url { flex: 1; }
</style>
</head>
<body>
<h1>Countdown Badge</h1>
<p>Builds an SVG badge counting down to (or up from) a date.</p>
<label>Event name <input id="event" type="text" value="launch-party" maxlength="64"></label>
<label>Date (YYYYMMDD) <input id="date" type="text" value="20301231" maxlength="8" pattern="\d{8}"></label>
<div id="url-row">
  <input id="url" type="text" readonly>
  <button id="copy" type="button">Copy URL</button>
</div>
<iframe id="preview" width="300" height="160" title="badge preview"></iframe>
<script>
  const event = document.getElementById('event');
  const date = document.getElementById('date');
  const url = document.getElementById('url');
  const preview = document.getElementById('preview');

  function refresh() {
    const path = '/' + date.value + '/' + encodeURIComponent(event.value);
    url.value = location.origin + path;
    preview.src = path;
  }

  event.addEventListener('input', refresh);
  date.addEventListener('input', refresh);
  document.getElementById('copy').addEventListener('click', () => {
    navigator.clipboard.writeText(url.value);
  });
  refresh();
</script>
</body>
</html>
"#;

pub trait IndexRoutes {
    /// Provides the interactive preview page.
    ///
    /// ```http
    /// GET / HTTP/1.1
    /// ```
    fn map_index_endpoint(self) -> Self;
}

impl<S> IndexRoutes for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // Ensure HttpCallMetricTracker is updated.
    fn map_index_endpoint(self) -> Self {
        self.route("/", get(index))
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_page_wires_inputs_to_the_iframe() {
        assert!(INDEX_HTML.contains("id=\"event\""));
        assert!(INDEX_HTML.contains("id=\"date\""));
        assert!(INDEX_HTML.contains("<iframe"));
        assert!(INDEX_HTML.contains("encodeURIComponent"));
    }
}
