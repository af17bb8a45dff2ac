//! AppleScript sources for the launchers and the terminal path.
//!
//! Applications are addressed by bundle identifier, and every user supplied value is
//! embedded as an escaped string literal. Per-URL steps are wrapped in `try` blocks so
//! a bad URL only loses its own tab.

use crate::family::{CHROME_BUNDLE_ID, FIREFOX_BUNDLE_ID, PREVIEW_BUNDLE_ID, SAFARI_BUNDLE_ID, TERMINAL_BUNDLE_ID};
use std::time::Duration;

/// Scripts ending with this statement return the id of the window they created.
pub const WINDOW_ID_RESULT: &str = "return winId";

/// Quote a value as an AppleScript string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// An AppleScript list of string literals: `{"a", "b"}`.
pub fn string_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| string_literal(v)).collect();
    format!("{{{}}}", quoted.join(", "))
}

fn app(bundle_identifier: &str) -> String {
    format!("application id {}", string_literal(bundle_identifier))
}

/// Run `body` inside a tell block only if the application is already running,
/// so that closing never launches it.
fn when_running(bundle_identifier: &str, body: &str) -> String {
    format!(
        "if {app} is running then\n\
         tell {app}\n\
         {body}\n\
         end tell\n\
         end if",
        app = app(bundle_identifier),
        body = body
    )
}

/// One new Chrome window holding one tab per URL; the window's initial blank tab is
/// closed when the requested tabs were added after it.
pub fn chrome_open(urls: &[String]) -> String {
    format!(
        "tell {app}\n\
         activate\n\
         set newWindow to make new window\n\
         set winId to id of newWindow\n\
         set addedTabs to 0\n\
         repeat with theUrl in {urls}\n\
         try\n\
         tell window id winId to make new tab with properties {{URL:(contents of theUrl)}}\n\
         set addedTabs to addedTabs + 1\n\
         end try\n\
         end repeat\n\
         if addedTabs > 0 then\n\
         set extraTabs to (count of tabs of window id winId) - addedTabs\n\
         repeat extraTabs times\n\
         close tab 1 of window id winId\n\
         end repeat\n\
         end if\n\
         {ret}\n\
         end tell",
        app = app(CHROME_BUNDLE_ID),
        urls = string_list(urls),
        ret = WINDOW_ID_RESULT
    )
}

/// Close the tabs of a recorded Chrome window, then the window itself.
pub fn chrome_close(window_id: i64) -> String {
    let body = format!(
        "if (exists window id {id}) then\n\
         try\n\
         close every tab of window id {id}\n\
         end try\n\
         try\n\
         close window id {id}\n\
         end try\n\
         end if",
        id = window_id
    );
    when_running(CHROME_BUNDLE_ID, &body)
}

/// One new Safari window for the URLs.
///
/// When Safari is not yet running it opens its own default window on launch; the
/// script waits `startup_delay` and closes that window before making the intended one.
pub fn safari_open(urls: &[String], already_running: bool, startup_delay: Duration) -> String {
    let mut lines = vec![format!("tell {}", app(SAFARI_BUNDLE_ID)), "activate".to_string()];
    if !already_running {
        lines.push(format!("delay {:.2}", startup_delay.as_secs_f64()));
        lines.push("try".to_string());
        lines.push("close window 1".to_string());
        lines.push("end try".to_string());
    }
    match urls {
        [] => {}
        [only] => {
            lines.push(format!(
                "make new document with properties {{URL:{}}}",
                string_literal(only)
            ));
            lines.push("set winId to id of front window".to_string());
        }
        [first, rest @ ..] => {
            lines.push("make new document".to_string());
            lines.push("set winId to id of front window".to_string());
            lines.push("try".to_string());
            lines.push(format!(
                "set URL of current tab of window id winId to {}",
                string_literal(first)
            ));
            lines.push("end try".to_string());
            lines.push(format!("repeat with theUrl in {}", string_list(rest)));
            lines.push("try".to_string());
            lines.push(
                "tell window id winId to set newTab to make new tab at end of tabs".to_string(),
            );
            lines.push("set URL of newTab to (contents of theUrl)".to_string());
            lines.push("end try".to_string());
            lines.push("end repeat".to_string());
        }
    }
    lines.push(WINDOW_ID_RESULT.to_string());
    lines.push("end tell".to_string());
    lines.join("\n")
}

pub fn safari_close(window_id: i64) -> String {
    let body = format!(
        "if (exists window id {id}) then\n\
         try\n\
         close window id {id}\n\
         end try\n\
         end if",
        id = window_id
    );
    when_running(SAFARI_BUNDLE_ID, &body)
}

/// A new Firefox window and one `open location` per URL. Returns nothing: Firefox's
/// scripting dictionary does not expose a usable window id.
pub fn firefox_open(urls: &[String]) -> String {
    format!(
        "tell {app}\n\
         activate\n\
         make new window\n\
         repeat with theUrl in {urls}\n\
         try\n\
         open location (contents of theUrl)\n\
         end try\n\
         end repeat\n\
         end tell",
        app = app(FIREFOX_BUNDLE_ID),
        urls = string_list(urls)
    )
}

/// Close every open Preview document whose path equals `path`, walking the
/// document list from the end so closing does not shift unvisited indices.
pub fn preview_close(path: &str) -> String {
    let body = format!(
        "repeat with i from (count of documents) to 1 by -1\n\
         try\n\
         if path of document i is equal to {path} then close document i\n\
         end try\n\
         end repeat",
        path = string_literal(path)
    );
    when_running(PREVIEW_BUNDLE_ID, &body)
}

/// New Terminal window: change to `working_directory`, then run `command`.
pub fn terminal_run(working_directory: &str, command: &str) -> String {
    format!(
        "tell {app}\n\
         activate\n\
         do script (\"cd \" & quoted form of {dir} & \"; \" & {cmd})\n\
         end tell",
        app = app(TERMINAL_BUNDLE_ID),
        dir = string_literal(working_directory),
        cmd = string_literal(command)
    )
}

/// Graceful quit, skipped when the application is not running.
pub fn quit_application(bundle_identifier: &str) -> String {
    format!(
        "if {app} is running then\n\
         tell {app} to quit\n\
         end if",
        app = app(bundle_identifier)
    )
}
