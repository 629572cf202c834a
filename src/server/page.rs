use crate::cli::Args;
use crate::models::conversation::Conversation;
use serde_json::Value;

const CHAT_TEMPLATE: &str = include_str!("../../templates/chat.html");

/// Renders the polling chat page bound to `conversation`.
pub fn render(conversation: &Conversation, args: &Args) -> String {
    let title = conversation.title(&args.chat_title);
    let html_title = escape_html(title);
    let values = [
        ("title", html_title.clone()),
        ("heading", html_title),
        ("title_js", js_string(title)),
        ("cid_js", js_string(&conversation.id)),
        ("mode_js", js_string(conversation.state.kind())),
        ("poll_ms", args.poll_interval_ms.max(100).to_string()),
    ];
    fill(CHAT_TEMPLATE, &values)
}

/// Replaces `{{name}}` placeholders in one pass, so substituted text is never re-expanded.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after
            .find("}}")
            .and_then(|end| {
                let name = &after[..end];
                values
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (value, end))
            });
        match value {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Encodes `raw` as a JavaScript string literal that is safe inside a `<script>` element.
fn js_string(raw: &str) -> String {
    Value::from(raw).to_string().replace("</", "<\\/")
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
