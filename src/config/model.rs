use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::{Map, Value};

use crate::foundation::core::display_scalar;
use crate::foundation::error::{ChainviewError, ChainviewResult};

/// Ordered processing chain of a single channel.
///
/// Channels are identified by their position in the linearized configuration (0-based,
/// contiguous, matching source order).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ChannelConfig {
    /// Stages in signal order.
    pub stages: Vec<StageDescriptor>,
}

impl ChannelConfig {
    /// Build a channel from its stages.
    pub fn new(stages: Vec<StageDescriptor>) -> Self {
        Self { stages }
    }
}

/// One element of a channel's processing chain.
///
/// On the wire stages use the duck-typed form produced by the configuration owner, e.g.
/// `{"type": "filter", "Low Shelf": {"type": "Biquad", "parameters": {..}}}`. Parsing resolves
/// that form once into this tagged structure; a stage that cannot be classified becomes
/// [`StageDescriptor::Unknown`] instead of failing the whole configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum StageDescriptor {
    /// Capture device feeding the chain.
    Input(DeviceStage),
    /// Playback device terminating the chain.
    Output(DeviceStage),
    /// Channel mixer.
    Mixer(MixerStage),
    /// Named filter.
    Filter(FilterStage),
    /// Stage that could not be classified.
    Unknown(UnknownStage),
}

/// Device reference of an input or output stage.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceStage {
    /// Device name, e.g. `hw:0`.
    #[serde(default)]
    pub device: String,
    /// Sample format, e.g. `S32LE`.
    #[serde(default)]
    pub format: String,
}

/// Mixer stage. Only the number of sources is used for display.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MixerStage {
    /// Source references in declaration order.
    pub sources: Vec<Value>,
}

/// Filter stage with its display name resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterStage {
    /// Display name; `None` when the stage carried no named filter entry.
    pub name: Option<String>,
    /// Filter definition.
    pub spec: FilterSpec,
}

/// Filter definition: a kind plus free-form parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSpec {
    /// Filter kind.
    pub kind: FilterKind,
    /// Raw parameters.
    pub parameters: Map<String, Value>,
}

/// Known filter kinds. Anything else is kept verbatim in [`FilterKind::Other`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FilterKind {
    /// Second-order IIR section.
    Biquad,
    /// Plain gain.
    Gain,
    /// FIR convolution.
    Conv,
    /// No type tag was given.
    #[default]
    Unspecified,
    /// Unrecognized kind with its raw name.
    Other(String),
}

/// Placeholder for a stage whose type was missing or unrecognized.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnknownStage {
    /// Raw `type` tag, if one was present.
    pub type_name: Option<String>,
}

impl FilterKind {
    /// Parse a raw filter type tag.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Biquad" => Self::Biquad,
            "Gain" => Self::Gain,
            "Conv" => Self::Conv,
            "" => Self::Unspecified,
            other => Self::Other(other.to_string()),
        }
    }

    /// Raw type tag as it appears in configuration.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Biquad => "Biquad",
            Self::Gain => "Gain",
            Self::Conv => "Conv",
            Self::Unspecified => "",
            Self::Other(name) => name,
        }
    }
}

impl FilterSpec {
    /// Create a filter spec of the given kind with no parameters.
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            parameters: Map::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Biquad section of the given sub-kind (e.g. `Peaking`, `Lowshelf`).
    pub fn biquad(sub_kind: impl Into<String>) -> Self {
        Self::new(FilterKind::Biquad).with_param("type", sub_kind.into())
    }

    /// Gain filter.
    pub fn gain(db: f64) -> Self {
        Self::new(FilterKind::Gain).with_param("gain", db)
    }

    /// Convolution filter.
    pub fn conv() -> Self {
        Self::new(FilterKind::Conv)
    }

    /// Look up a parameter, treating JSON `null` as absent.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key).filter(|v| !v.is_null())
    }
}

impl StageDescriptor {
    /// Input stage.
    pub fn input(device: impl Into<String>, format: impl Into<String>) -> Self {
        Self::Input(DeviceStage {
            device: device.into(),
            format: format.into(),
        })
    }

    /// Output stage.
    pub fn output(device: impl Into<String>, format: impl Into<String>) -> Self {
        Self::Output(DeviceStage {
            device: device.into(),
            format: format.into(),
        })
    }

    /// Mixer stage with the given source references.
    pub fn mixer(sources: Vec<Value>) -> Self {
        Self::Mixer(MixerStage { sources })
    }

    /// Named filter stage.
    pub fn filter(name: impl Into<String>, spec: FilterSpec) -> Self {
        Self::Filter(FilterStage {
            name: Some(name.into()),
            spec,
        })
    }

    /// Lower-case type name, as used for node headers and diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Input(_) => "input",
            Self::Output(_) => "output",
            Self::Mixer(_) => "mixer",
            Self::Filter(_) => "filter",
            Self::Unknown(u) => u.type_name.as_deref().unwrap_or("unknown"),
        }
    }

    /// Resolve a raw stage object.
    ///
    /// Never fails: stages that cannot be classified are logged and returned as
    /// [`StageDescriptor::Unknown`].
    pub fn from_value(value: &Value) -> Self {
        classify(value).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "degrading stage to unknown");
            Self::Unknown(UnknownStage {
                type_name: raw_type(value).map(str::to_string),
            })
        })
    }

    /// Raw stage object in the configuration owner's duck-typed form.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        match self {
            Self::Input(d) | Self::Output(d) => {
                obj.insert("type".into(), Value::from(self.type_name()));
                obj.insert(
                    "device".into(),
                    serde_json::json!({ "device": d.device, "format": d.format }),
                );
            }
            Self::Mixer(m) => {
                obj.insert("type".into(), Value::from("mixer"));
                obj.insert("sources".into(), Value::Array(m.sources.clone()));
            }
            Self::Filter(f) => {
                obj.insert("type".into(), Value::from("filter"));
                if let Some(name) = &f.name {
                    let mut spec = Map::new();
                    spec.insert("type".into(), Value::from(f.spec.kind.as_str()));
                    spec.insert(
                        "parameters".into(),
                        Value::Object(f.spec.parameters.clone()),
                    );
                    obj.insert(name.clone(), Value::Object(spec));
                }
            }
            Self::Unknown(u) => {
                if let Some(t) = &u.type_name {
                    obj.insert("type".into(), Value::from(t.as_str()));
                }
            }
        }
        Value::Object(obj)
    }
}

impl From<Value> for StageDescriptor {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

impl From<StageDescriptor> for Value {
    fn from(stage: StageDescriptor) -> Self {
        stage.to_value()
    }
}

fn raw_type(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

fn classify(value: &Value) -> ChainviewResult<StageDescriptor> {
    let obj = value
        .as_object()
        .ok_or_else(|| ChainviewError::malformed_stage(format!("stage is not an object: {value}")))?;
    let ty = raw_type(value)
        .ok_or_else(|| ChainviewError::malformed_stage("stage has no string `type` tag"))?;

    match ty.to_ascii_lowercase().as_str() {
        "input" => Ok(StageDescriptor::Input(device_of(obj))),
        "output" => Ok(StageDescriptor::Output(device_of(obj))),
        "mixer" => {
            let sources = match obj.get("sources") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items.clone(),
                Some(other) => {
                    return Err(ChainviewError::malformed_stage(format!(
                        "mixer sources must be a list, got {other}"
                    )));
                }
            };
            Ok(StageDescriptor::mixer(sources))
        }
        "filter" => Ok(StageDescriptor::Filter(filter_of(obj))),
        other => Err(ChainviewError::malformed_stage(format!(
            "unrecognized stage type '{other}'"
        ))),
    }
}

/// Device reference of a stage already tagged input or output.
///
/// The tag decides the variant; a malformed reference only degrades the text shown.
fn device_of(obj: &Map<String, Value>) -> DeviceStage {
    match obj.get("device") {
        None | Some(Value::Null) => DeviceStage::default(),
        Some(Value::Object(dev)) => DeviceStage {
            device: device_field(dev, "device"),
            format: device_field(dev, "format"),
        },
        Some(other) => {
            tracing::warn!(
                error = %ChainviewError::malformed_stage(format!("device reference is not an object: {other}")),
                "showing raw device reference"
            );
            DeviceStage {
                device: display_scalar(other),
                format: String::new(),
            }
        }
    }
}

fn device_field(dev: &Map<String, Value>, key: &str) -> String {
    match dev.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            tracing::warn!(
                error = %ChainviewError::malformed_stage(format!("device {key} is not a string: {other}")),
                "showing raw device field"
            );
            display_scalar(other)
        }
    }
}

fn filter_of(obj: &Map<String, Value>) -> FilterStage {
    let named = obj
        .iter()
        .find(|(k, v)| k.as_str() != "type" && v.is_object());
    let Some((name, spec)) = named else {
        tracing::warn!(
            error = %ChainviewError::malformed_stage("filter stage has no named filter entry"),
            "rendering filter as unknown"
        );
        return FilterStage {
            name: None,
            spec: FilterSpec::default(),
        };
    };

    let kind = FilterKind::from_name(spec.get("type").and_then(Value::as_str).unwrap_or(""));
    let parameters = spec
        .get("parameters")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    FilterStage {
        name: Some(name.clone()),
        spec: FilterSpec { kind, parameters },
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum LinearizedDoc {
    Bare(Vec<ChannelConfig>),
    Wrapped { channels: Vec<ChannelConfig> },
}

/// Parse a linearized configuration from a JSON reader.
///
/// Accepts either a bare array of channels or an object with a `channels` array.
pub fn linearized_from_reader<R: std::io::Read>(r: R) -> ChainviewResult<Vec<ChannelConfig>> {
    let doc: LinearizedDoc = serde_json::from_reader(r)
        .map_err(|e| ChainviewError::validation(format!("parse linearized config JSON: {e}")))?;
    Ok(match doc {
        LinearizedDoc::Bare(channels) | LinearizedDoc::Wrapped { channels } => channels,
    })
}

/// Parse a linearized configuration from a JSON file on disk.
pub fn linearized_from_path(path: impl AsRef<Path>) -> ChainviewResult<Vec<ChannelConfig>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| {
        ChainviewError::validation(format!("open config JSON '{}': {e}", path.display()))
    })?;
    linearized_from_reader(BufReader::new(f))
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
