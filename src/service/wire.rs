//! JSON-lines front end for [`HighlightService`].
//!
//! Each input line is one call:
//!
//! ```text
//! {"id": 1, "method": "HighlightRect", "params": [10, 10, 400, 200, "hello"]}
//! {"id": 2, "method": "Press", "params": {"x": 20, "y": 20}}
//! ```
//!
//! Highlight calls are answered when their step settles, which may be many
//! lines later. Property writes go out as `PropertyChanged` signals.

use crate::service::{HighlightService, Property, PropertyChange};
use crate::session::{Completion, CompletionState, HeadlessSurface};
use crate::shell::ShellEnvironment;
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

fn default_button() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum Request {
    HighlightRect {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        #[serde(default)]
        text: String,
    },
    HighlightCircle {
        x: u32,
        y: u32,
        radius: u32,
        #[serde(default)]
        text: String,
    },
    HighlightWidget {
        #[serde(alias = "className")]
        class_name: String,
        #[serde(default)]
        text: String,
    },
    HighlightDesktopIcon {
        #[serde(alias = "appId")]
        app_id: String,
        #[serde(default)]
        text: String,
    },
    HighlightFuzzy {
        position: String,
        size: String,
        #[serde(default)]
        shape: String,
        #[serde(default)]
        text: String,
    },
    ShowImage {
        path: String,
        size: String,
        #[serde(default)]
        text: String,
    },
    Overview {
        method: String,
    },
    Clean {},
    Skip {},
    Get {
        property: String,
    },
    Set {
        property: String,
        value: bool,
    },
    Press {
        x: f64,
        y: f64,
        #[serde(default = "default_button")]
        button: u32,
    },
    Snapshot {
        path: PathBuf,
    },
}

impl Request {
    /// Parameter names for `method`, in positional order.
    fn param_names(method: &str) -> Option<&'static [&'static str]> {
        let names: &'static [&'static str] = match method {
            "HighlightRect" => &["x", "y", "width", "height", "text"],
            "HighlightCircle" => &["x", "y", "radius", "text"],
            "HighlightWidget" => &["class_name", "text"],
            "HighlightDesktopIcon" => &["app_id", "text"],
            "HighlightFuzzy" => &["position", "size", "shape", "text"],
            "ShowImage" => &["path", "size", "text"],
            "Overview" => &["method"],
            "Clean" | "Skip" => &[],
            "Get" => &["property"],
            "Set" => &["property", "value"],
            "Press" => &["x", "y", "button"],
            "Snapshot" => &["path"],
            _ => return None,
        };
        Some(names)
    }

    /// Build a request from a method name and positional or named params.
    ///
    /// Positional params are matched to names in call order. Trailing
    /// params with defaults may be left out. Null params mean no arguments.
    pub fn from_call(method: &str, params: Value) -> Result<Self> {
        let names =
            Self::param_names(method).ok_or_else(|| anyhow!("unknown method {method:?}"))?;
        let params = match params {
            Value::Null => Value::Object(Map::new()),
            Value::Array(values) => {
                if values.len() > names.len() {
                    bail!(
                        "{method} takes at most {} params, got {}",
                        names.len(),
                        values.len()
                    );
                }
                let named: Map<String, Value> = names
                    .iter()
                    .map(|name| (*name).to_string())
                    .zip(values)
                    .collect();
                Value::Object(named)
            }
            Value::Object(named) => Value::Object(named),
            other => bail!("params for {method} must be an array or object, got {other}"),
        };
        serde_json::from_value(json!({ "method": method, "params": params }))
            .with_context(|| format!("invalid call to {method}"))
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    id: Option<u64>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
struct Reply {
    id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Reply {
    fn ok(id: Option<u64>, result: Vec<Value>) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Option<u64>, error: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct Signal {
    signal: &'static str,
    property: Property,
    value: bool,
}

impl From<PropertyChange> for Signal {
    fn from(change: PropertyChange) -> Self {
        Self {
            signal: "PropertyChanged",
            property: change.property,
            value: change.value,
        }
    }
}

enum CallResult {
    Immediate(Vec<Value>),
    Deferred(Completion),
}

/// Owns the service and the host end of its headless surface, and keeps
/// track of highlight calls still waiting for an answer.
pub struct Driver<S> {
    service: HighlightService<S>,
    surface: HeadlessSurface,
    pending: Vec<(Option<u64>, Completion)>,
    changes: Receiver<PropertyChange>,
}

impl<S: ShellEnvironment> Driver<S> {
    pub fn new(mut service: HighlightService<S>, surface: HeadlessSurface) -> Self {
        let changes = service.subscribe();
        Self {
            service,
            surface,
            pending: Vec::new(),
            changes,
        }
    }

    pub fn service(&self) -> &HighlightService<S> {
        &self.service
    }

    pub fn surface(&self) -> &HeadlessSurface {
        &self.surface
    }

    pub fn pending_calls(&self) -> usize {
        self.pending.len()
    }

    /// Process one input line and return the output lines it produced: the
    /// call's own reply, replies to earlier calls that settled, then signals.
    pub fn handle_line(&mut self, line: &str) -> Vec<String> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }

        let mut replies = Vec::new();
        match serde_json::from_str::<Envelope>(line) {
            Ok(envelope) => {
                let id = envelope.id;
                let outcome = Request::from_call(&envelope.method, envelope.params)
                    .and_then(|request| self.call(request));
                match outcome {
                    Ok(CallResult::Immediate(result)) => replies.push(Reply::ok(id, result)),
                    Ok(CallResult::Deferred(completion)) => self.pending.push((id, completion)),
                    Err(err) => {
                        tracing::warn!(?id, error = %format!("{err:#}"), "call failed");
                        replies.push(Reply::err(id, format!("{err:#}")));
                    }
                }
            }
            Err(err) => {
                tracing::warn!(%err, "malformed request line");
                replies.push(Reply::err(None, format!("malformed request: {err}")));
            }
        }
        replies.extend(self.settle());

        let mut out: Vec<String> = replies.iter().filter_map(encode).collect();
        out.extend(self.changes.try_iter().map(Signal::from).filter_map(|s| encode(&s)));
        out
    }

    fn call(&mut self, request: Request) -> Result<CallResult> {
        tracing::debug!(?request, "handling call");
        let service = &mut self.service;
        let deferred = match request {
            Request::HighlightRect {
                x,
                y,
                width,
                height,
                text,
            } => service.highlight_rect(x, y, width, height, &text)?,
            Request::HighlightCircle { x, y, radius, text } => {
                service.highlight_circle(x, y, radius, &text)?
            }
            Request::HighlightWidget { class_name, text } => {
                service.highlight_widget(&class_name, &text)?
            }
            Request::HighlightDesktopIcon { app_id, text } => {
                service.highlight_desktop_icon(&app_id, &text)?
            }
            Request::HighlightFuzzy {
                position,
                size,
                shape,
                text,
            } => service.highlight_fuzzy(&position, &size, &shape, &text)?,
            Request::ShowImage { path, size, text } => service.show_image(&path, &size, &text)?,
            Request::Overview { method } => {
                service.overview(&method);
                return Ok(CallResult::Immediate(Vec::new()));
            }
            Request::Clean {} => {
                service.clean();
                return Ok(CallResult::Immediate(Vec::new()));
            }
            Request::Skip {} => {
                service.skip();
                return Ok(CallResult::Immediate(Vec::new()));
            }
            Request::Get { property } => {
                let value = service.get_property(property.parse()?)?;
                return Ok(CallResult::Immediate(vec![Value::Bool(value)]));
            }
            Request::Set { property, value } => {
                service.set_property(property.parse()?, value)?;
                return Ok(CallResult::Immediate(Vec::new()));
            }
            Request::Press { x, y, button } => {
                match self.surface.press((x, y), button) {
                    Some(event) => {
                        service.dispatch(event);
                    }
                    None => tracing::debug!(x, y, "press hit no listener"),
                }
                return Ok(CallResult::Immediate(Vec::new()));
            }
            Request::Snapshot { path } => {
                self.surface.write_snapshot(&path)?;
                return Ok(CallResult::Immediate(Vec::new()));
            }
        };
        Ok(CallResult::Deferred(deferred))
    }

    fn settle(&mut self) -> Vec<Reply> {
        let mut replies = Vec::new();
        self.pending.retain_mut(|(id, completion)| match completion.poll() {
            CompletionState::Pending => true,
            CompletionState::Resolved(outcome) => {
                replies.push(Reply::ok(*id, vec![Value::Bool(outcome.as_reply())]));
                false
            }
            CompletionState::Cancelled => {
                replies.push(Reply::err(*id, "cancelled"));
                false
            }
        });
        replies
    }

    /// Serve lines from `input` until it closes.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read request line")?;
            for reply in self.handle_line(&line) {
                writeln!(output, "{reply}").context("failed to write reply")?;
            }
            output.flush().context("failed to flush replies")?;
        }
        if !self.pending.is_empty() {
            tracing::info!(pending = self.pending.len(), "input closed with unanswered calls");
        }
        Ok(())
    }
}

fn encode<T: Serialize>(value: &T) -> Option<String> {
    serde_json::to_string(value)
        .map_err(|err| tracing::error!(%err, "failed to encode reply"))
        .ok()
}

/// Parse a `WxH` monitor size such as `1920x1080`.
pub fn parse_monitor_size(spec: &str) -> Result<(f64, f64)> {
    let (w, h) = spec
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| anyhow!("expected WIDTHxHEIGHT, got {spec:?}"))?;
    let width: u32 = w.trim().parse().with_context(|| format!("bad width in {spec:?}"))?;
    let height: u32 = h.trim().parse().with_context(|| format!("bad height in {spec:?}"))?;
    Ok((f64::from(width), f64::from(height)))
}
