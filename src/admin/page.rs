//! Console HTML rendering.

use std::fmt::Write;

use crate::bot::ConnectionSnapshot;
use crate::database::{CannedMessage, Settings};
use crate::gateway::ConnectionState;
use crate::utils::html_escape;

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem}\
table{border-collapse:collapse;width:100%}td,th{border:1px solid #ccc;padding:.4rem;vertical-align:top}\
form.inline{display:inline}textarea{width:100%}img{max-width:120px}\
.ok{color:#16a34a}.down{color:#dc2626}section{margin-bottom:2rem}";

/// Render the status and settings page.
pub fn render_index(settings: &Settings, connection: &ConnectionSnapshot) -> String {
    let mut html = String::with_capacity(8 * 1024);

    let _ = write!(
        html,
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>WhatsApp Bot</title>\
         <style>{}</style></head><body><h1>WhatsApp Bot</h1>",
        STYLE
    );

    render_status(&mut html, connection);
    render_templates(&mut html, settings);
    render_prefixes(&mut html, settings);
    render_commands(&mut html, settings);
    render_messages(&mut html, settings);

    html.push_str("</body></html>");
    html
}

fn render_status(html: &mut String, connection: &ConnectionSnapshot) {
    let (class, label) = match connection.state {
        ConnectionState::Open => ("ok", "Connected"),
        _ => ("down", "Disconnected"),
    };
    let detail = match (connection.state, connection.status_code) {
        (ConnectionState::Connecting, _) => " (connecting)".to_string(),
        (ConnectionState::Close, Some(code)) => format!(" (closed, status {})", code),
        _ => String::new(),
    };

    let _ = write!(
        html,
        "<section><h2>Status</h2><p class=\"{}\"><b>{}</b>{} since {}</p></section>",
        class,
        label,
        detail,
        connection.since.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

fn render_templates(html: &mut String, settings: &Settings) {
    let _ = write!(
        html,
        "<section><h2>Welcome &amp; leave messages</h2>\
         <p><code>@user</code> is replaced with a mention of the member.</p>\
         <form method=\"post\" action=\"/update-welcome\">\
         <textarea name=\"welcomeMessage\" rows=\"3\">{}</textarea>\
         <button type=\"submit\">Save welcome</button></form>\
         <form method=\"post\" action=\"/update-leave\">\
         <textarea name=\"leaveMessage\" rows=\"3\">{}</textarea>\
         <button type=\"submit\">Save leave</button></form></section>",
        html_escape(&settings.welcome_message),
        html_escape(&settings.leave_message)
    );
}

fn render_prefixes(html: &mut String, settings: &Settings) {
    html.push_str("<section><h2>Prefixes</h2><ul>");
    for prefix in &settings.prefixes {
        let prefix = html_escape(prefix);
        let _ = write!(
            html,
            "<li><code>{p}</code> \
             <form class=\"inline\" method=\"post\" action=\"/remove-prefix\">\
             <input type=\"hidden\" name=\"prefix\" value=\"{p}\">\
             <button type=\"submit\">Remove</button></form> \
             <form class=\"inline\" method=\"post\" action=\"/edit-prefix\">\
             <input type=\"hidden\" name=\"oldPrefix\" value=\"{p}\">\
             <input name=\"newPrefix\" placeholder=\"new prefix\" required>\
             <button type=\"submit\">Edit</button></form></li>",
            p = prefix
        );
    }
    if settings.prefixes.is_empty() {
        html.push_str("<li><em>No prefixes: chat commands are disabled.</em></li>");
    }
    html.push_str(
        "</ul><form method=\"post\" action=\"/add-prefix\">\
         <input name=\"prefix\" placeholder=\"prefix\" required>\
         <button type=\"submit\">Add prefix</button></form></section>",
    );
}

fn render_commands(html: &mut String, settings: &Settings) {
    html.push_str("<section><h2>Commands</h2><table><tr><th>Command</th><th>Response</th><th></th></tr>");
    for (command, response) in &settings.commands {
        let command = html_escape(command);
        let _ = write!(
            html,
            "<tr><td><code>{c}</code></td><td>\
             <form method=\"post\" action=\"/edit-command\">\
             <input type=\"hidden\" name=\"oldCommand\" value=\"{c}\">\
             <input name=\"newCommand\" value=\"{c}\" required>\
             <textarea name=\"response\" rows=\"2\" required>{r}</textarea>\
             <button type=\"submit\">Save</button></form></td><td>\
             <form method=\"post\" action=\"/remove-command\">\
             <input type=\"hidden\" name=\"command\" value=\"{c}\">\
             <button type=\"submit\">Remove</button></form></td></tr>",
            c = command,
            r = html_escape(response)
        );
    }
    html.push_str(
        "</table><form method=\"post\" action=\"/add-command\">\
         <input name=\"command\" placeholder=\"command\" required>\
         <textarea name=\"response\" rows=\"2\" placeholder=\"response\" required></textarea>\
         <button type=\"submit\">Add command</button></form></section>",
    );
}

fn render_messages(html: &mut String, settings: &Settings) {
    html.push_str(
        "<section><h2>Image &amp; canned commands</h2>\
         <table><tr><th>Command</th><th>Reply</th><th></th></tr>",
    );
    for (command, message) in &settings.messages {
        let reply = match message {
            CannedMessage::Text { content } => html_escape(content),
            CannedMessage::Image { image_url, caption } => format!(
                "<img src=\"{}\" alt=\"\"><br>{}",
                html_escape(image_url),
                html_escape(caption.as_deref().unwrap_or(""))
            ),
        };
        let command = html_escape(command);
        let _ = write!(
            html,
            "<tr><td><code>{c}</code></td><td>{r}</td><td>\
             <form method=\"post\" action=\"/remove-command-image\">\
             <input type=\"hidden\" name=\"command\" value=\"{c}\">\
             <button type=\"submit\">Remove</button></form></td></tr>",
            c = command,
            r = reply
        );
    }
    html.push_str(
        "</table><form method=\"post\" action=\"/add-command-image\" enctype=\"multipart/form-data\">\
         <input name=\"command\" placeholder=\"command\" required>\
         <input name=\"caption\" placeholder=\"caption\">\
         <input type=\"file\" name=\"imageUrl\" accept=\".jpg,.jpeg,.png\" required>\
         <button type=\"submit\">Add image command</button></form></section>",
    );
}
