//! HTML pages: the upload form and the result view.

use axum::extract::Path;
use axum::response::Html;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Parley</title></head>
<body>
  <h1>Speaker Sentiment Analysis</h1>
  <p>Upload a conversation as an audio recording or a text transcript.</p>
  <form action="/upload" method="post" enctype="multipart/form-data">
    <input type="file" name="file" required />
    <button type="submit">Analyse</button>
  </form>
</body>
</html>
"#;

/// `GET /` — the upload form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// `GET /result/{text}` — render the analysis with newlines as line breaks.
pub async fn show_result(Path(text): Path<String>) -> Html<String> {
    let rendered = escape_html(&text).replace('\n', "<br />");
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Parley</title></head>\n<body>\n\
         <h1>Analysis Result</h1>\n<p>{rendered}</p>\n<a href=\"/\">Analyse another</a>\n\
         </body>\n</html>\n"
    ))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
