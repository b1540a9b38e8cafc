//! Line-based interaction scripts.
//!
//! One command per line; blank lines and `#` comments are skipped.
//!
//! ```text
//! focus
//! type chennai
//! click SRM IST Vadapalani Campus (Chennai)
//! blur
//! wait 150
//! move 80.04 12.82
//! marker SRM University, Sikkim (Gangtok)
//! submit
//! ```

use foundation::math::LngLat;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Focus,
    Blur,
    Type(String),
    Click(String),
    Submit,
    Move(LngLat),
    Marker(String),
    Wait(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

/// A command with its 1-based source line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub line: usize,
    pub command: ScriptCommand,
}

fn number(line: usize, what: &str, raw: &str) -> Result<f64, ScriptError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ScriptError {
            line,
            message: format!("{what} must be a number, got {raw:?}"),
        })
}

pub fn parse_script(src: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, raw) in src.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let (verb, rest) = match text.split_once(char::is_whitespace) {
            Some((v, r)) => (v, r.trim()),
            None => (text, ""),
        };
        let err = |message: String| ScriptError { line, message };

        let command = match verb {
            "focus" => ScriptCommand::Focus,
            "blur" => ScriptCommand::Blur,
            "submit" => ScriptCommand::Submit,
            // `type` keeps inner whitespace; an empty argument clears the query.
            "type" => ScriptCommand::Type(rest.to_string()),
            "click" | "marker" if rest.is_empty() => {
                return Err(err(format!("`{verb}` needs a campus name")));
            }
            "click" => ScriptCommand::Click(rest.to_string()),
            "marker" => ScriptCommand::Marker(rest.to_string()),
            "move" => {
                let mut parts = rest.split_whitespace();
                let (Some(lng), Some(lat), None) = (parts.next(), parts.next(), parts.next())
                else {
                    return Err(err("`move` takes <lng> <lat>".to_string()));
                };
                ScriptCommand::Move(LngLat::new(
                    number(line, "lng", lng)?,
                    number(line, "lat", lat)?,
                ))
            }
            "wait" => {
                let ms = number(line, "wait", rest)?;
                if ms < 0.0 {
                    return Err(err(format!("wait must not be negative, got {ms}")));
                }
                ScriptCommand::Wait(ms)
            }
            other => return Err(err(format!("unknown command `{other}`"))),
        };
        steps.push(ScriptStep { line, command });
    }
    Ok(steps)
}
