//! Static informational page served at `/`.

use std::sync::LazyLock;

use crate::translator::ENDPOINT_RULES;

static WELCOME_HTML: LazyLock<String> = LazyLock::new(render);

/// The welcome page, rendered once from the endpoint table.
pub fn welcome_page() -> &'static str {
    &WELCOME_HTML
}

fn render() -> String {
    let endpoints: String = ENDPOINT_RULES
        .iter()
        .map(|rule| {
            format!(
                "        <li><code>{}</code> - {}</li>\n",
                rule.path, rule.description
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>iiko API Gateway</title>
    <style>
        body {{ font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }}
        code {{ background: #f0f0f0; padding: 2px 5px; }}
    </style>
</head>
<body>
    <h1>iiko API Gateway</h1>
    <p>This service forwards requests to the iiko Cloud API. Send a POST to <code>/api</code>:</p>

    <h2>Example request</h2>
    <pre><code>POST /api
Content-Type: application/json

{{
  "endpoint": "/api/1/access_token",
  "body": {{
    "apiLogin": "your_api_login"
  }}
}}</code></pre>

    <h2>Available endpoints</h2>
    <ul>
{endpoints}    </ul>
</body>
</html>
"#
    )
}
